//! In-memory [`FileStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, stream};
use hotel_cid::{ContentIdentifier, MultihashParts};
use parking_lot::Mutex;
use reqwest::StatusCode;
use sha2::{Digest, Sha256};

use crate::{Chunks, Error, FileStore};

/// Identifiers are the sha2-256 multihash of the raw content, which differs
/// from what IPFS computes for the same bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<ContentIdentifier, Bytes>>,
    unavailable: bool,
    chunk_size: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails with a server error.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Split content into chunks of at most `n` bytes on `cat`.
    pub fn with_chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = Some(n.max(1));
        self
    }

    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn add(&self, data: Bytes) -> Result<ContentIdentifier, Error> {
        if self.unavailable {
            return Err(Error::Status(StatusCode::SERVICE_UNAVAILABLE));
        }
        let digest: [u8; 32] = Sha256::digest(&data).into();
        let cid = MultihashParts::sha2_256(digest).to_cid();
        self.files.lock().insert(cid.clone(), data);
        Ok(cid)
    }

    async fn cat(&self, cid: &ContentIdentifier) -> Result<Chunks, Error> {
        if self.unavailable {
            return Err(Error::Status(StatusCode::SERVICE_UNAVAILABLE));
        }
        let Some(data) = self.files.lock().get(cid).cloned() else {
            return Err(Error::Status(StatusCode::NOT_FOUND));
        };
        let n = self.chunk_size.unwrap_or(data.len().max(1));
        let chunks: Vec<Result<Bytes, Error>> = (0..data.len())
            .step_by(n)
            .map(|i| Ok(data.slice(i..(i + n).min(data.len()))))
            .collect();
        Ok(stream::iter(chunks).boxed())
    }
}
