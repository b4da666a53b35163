//! Remote record store
//!
//! The registration flow talks to storage only through [`ContentStore`]: read
//! the encoded file at a path together with its [`ConcurrencyToken`], or
//! replace it by presenting the token that was read. [`GitHubContentStore`]
//! backs this with the GitHub contents API; [`MemoryContentStore`] keeps files
//! in process with the same token rules.

mod codec;
mod error;
mod github;
mod memory;

use async_trait::async_trait;
use std::fmt;

pub use codec::{decode_records, encode_records};
pub use error::{CodecError, StoreError};
pub use github::GitHubContentStore;
pub use memory::MemoryContentStore;

/// Opaque version marker handed out by the store on read.
///
/// Only the store interprets it; callers hand it back unchanged on write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConcurrencyToken(String);

impl ConcurrencyToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConcurrencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file that exists in the store.
#[derive(Debug, Clone)]
pub struct StoredContent {
    /// Transport-encoded (base64) file body.
    pub encoded: String,
    pub token: ConcurrencyToken,
}

/// A full replacement of one file.
#[derive(Debug, Clone)]
pub struct ContentUpdate {
    /// Change description recorded with the commit.
    pub message: String,
    pub encoded: String,
    /// `None` creates the file; the store rejects it if the file already exists.
    pub token: Option<ConcurrencyToken>,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// `Ok(None)` when nothing is stored at `path`.
    async fn get_content(&self, path: &str) -> Result<Option<StoredContent>, StoreError>;

    async fn put_content(&self, path: &str, update: ContentUpdate) -> Result<(), StoreError>;
}
