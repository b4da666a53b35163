use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{ConcurrencyToken, ContentStore, ContentUpdate, StoreError, StoredContent};

#[derive(Debug, Clone)]
struct MemoryFile {
    encoded: String,
    token: ConcurrencyToken,
    message: String,
}

/// In-process store with the same compare-on-write rules as GitHub:
/// replacing a file needs its current token, creating one needs none.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    files: Mutex<HashMap<String, MemoryFile>>,
    next_version: AtomicU64,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without counting it as a write.
    pub fn with_file(self, path: &str, encoded: impl Into<String>) -> Self {
        let token = self.mint_token();
        self.lock().insert(
            path.to_string(),
            MemoryFile {
                encoded: encoded.into(),
                token,
                message: String::from("seed"),
            },
        );
        self
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.lock().get(path).map(|f| f.encoded.clone())
    }

    /// Change description of the last write to `path`.
    pub fn last_message(&self, path: &str) -> Option<String> {
        self.lock().get(path).map(|f| f.message.clone())
    }

    /// Number of `get_content` calls, found or not.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of accepted `put_content` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn mint_token(&self) -> ConcurrencyToken {
        let version = self.next_version.fetch_add(1, Ordering::SeqCst) + 1;
        ConcurrencyToken::new(format!("mem-{:08x}", version))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, MemoryFile>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_content(&self, path: &str) -> Result<Option<StoredContent>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.lock().get(path).map(|f| StoredContent {
            encoded: f.encoded.clone(),
            token: f.token.clone(),
        }))
    }

    async fn put_content(&self, path: &str, update: ContentUpdate) -> Result<(), StoreError> {
        let mut files = self.lock();
        let current = files.get(path).map(|f| &f.token);
        match (current, update.token.as_ref()) {
            (None, None) => {}
            (Some(held), Some(given)) if held == given => {}
            (Some(_), None) => {
                return Err(StoreError::Conflict {
                    status: 422,
                    body: format!("\"sha\" wasn't supplied for existing file {}", path),
                });
            }
            (current, Some(given)) => {
                return Err(StoreError::Conflict {
                    status: 409,
                    body: format!(
                        "{} is at {} but the write was based on {}",
                        path,
                        current.map(ConcurrencyToken::as_str).unwrap_or("nothing"),
                        given
                    ),
                });
            }
        }
        let token = self.mint_token();
        files.insert(
            path.to_string(),
            MemoryFile {
                encoded: update.encoded,
                token,
                message: update.message,
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
