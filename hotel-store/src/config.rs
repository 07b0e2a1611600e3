use std::time::Duration;

use bon::Builder;
use url::Url;

#[derive(Debug, Clone, Builder)]
pub struct Config {
    /// Log label.
    #[builder(into, default = "ipfs".to_string())]
    pub(crate) label: String,

    /// Base URL of the IPFS HTTP API, e.g. `http://localhost:5001/`.
    pub(crate) base_url: Url,

    /// Timeout of a single request.
    ///
    /// Downloads are streamed, the timeout covers the whole transfer.
    #[builder(default = Duration::from_secs(300))]
    pub(crate) timeout: Duration,
}
