//! Client of the content-addressed file store (IPFS HTTP API).

mod config;

#[cfg(any(test, feature = "test"))]
pub mod testing;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, stream::BoxStream};
use hotel_cid::{CidError, ContentIdentifier};
use reqwest::{
    StatusCode, Url,
    multipart::{Form, Part},
};
use serde::Deserialize;
use tracing::{debug, warn};

pub use config::{Config, ConfigBuilder};

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A finite stream of content chunks. It can be consumed only once.
pub type Chunks = BoxStream<'static, Result<Bytes, Error>>;

/// Storage of immutable content addressed by its identifier.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `data` and return its identifier.
    async fn add(&self, data: Bytes) -> Result<ContentIdentifier, Error>;

    /// Fetch the content of `cid` as a stream of chunks.
    async fn cat(&self, cid: &ContentIdentifier) -> Result<Chunks, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api status: {0}")]
    Status(StatusCode),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store returned an invalid identifier: {0}")]
    Identifier(#[from] CidError),
}

impl Error {
    /// Did the request fail to reach the store?
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::Status(s) => s.is_server_error(),
            _ => false,
        }
    }
}

/// Response of `/api/v0/add`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Added {
    name: String,
    hash: String,
    #[serde(default)]
    size: Option<String>,
}

/// A client for the IPFS HTTP API.
#[derive(Debug, Clone)]
pub struct Client {
    config: Config,
    client: reqwest::Client,
}

impl Client {
    pub fn new(c: Config) -> Result<Self, Error> {
        let r = reqwest::Client::builder()
            .timeout(c.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            config: c,
            client: r,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.config.base_url.join(path)?)
    }
}

#[async_trait]
impl FileStore for Client {
    async fn add(&self, data: Bytes) -> Result<ContentIdentifier, Error> {
        let url = self.endpoint("api/v0/add")?;
        let len = data.len();
        let form = Form::new().part("file", Part::bytes(Vec::from(data)).file_name("file"));
        let res = self.client.post(url.clone()).multipart(form).send().await?;
        if !res.status().is_success() {
            warn!(node = %self.config.label, %url, status = %res.status(), "add failed");
            return Err(Error::Status(res.status()));
        }
        let added: Added = serde_json::from_slice(&res.bytes().await?)?;
        debug!(
            node = %self.config.label,
            name = %added.name,
            hash = %added.hash,
            size = ?added.size,
            %len,
            "added file"
        );
        Ok(added.hash.parse()?)
    }

    async fn cat(&self, cid: &ContentIdentifier) -> Result<Chunks, Error> {
        let mut url = self.endpoint("api/v0/cat")?;
        url.query_pairs_mut().append_pair("arg", cid.as_str());
        let res = self.client.post(url.clone()).send().await?;
        if !res.status().is_success() {
            warn!(node = %self.config.label, %url, status = %res.status(), "cat failed");
            return Err(Error::Status(res.status()));
        }
        Ok(res.bytes_stream().map(|r| r.map_err(Error::from)).boxed())
    }
}
