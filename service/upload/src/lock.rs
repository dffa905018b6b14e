use std::sync::Arc;

use dashmap::DashMap;
use domain_upload::model::vo::ContentHash;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per hash mutual exclusion.
///
/// Staging, merging and alias changes of one hash never interleave, different hashes
/// don't wait on each other. A hash's entry is dropped when its last holder releases it.
#[derive(Default)]
pub struct HashLocks {
    locks: DashMap<ContentHash, Arc<Mutex<()>>>,
}

impl HashLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, hash: &ContentHash) -> HashGuard<'_> {
        let mutex = self.locks.entry(hash.to_owned()).or_default().clone();
        let guard = mutex.lock_owned().await;
        HashGuard {
            locks: self,
            hash: hash.to_owned(),
            guard: Some(guard),
        }
    }

    /// Number of hashes currently locked or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

pub struct HashGuard<'a> {
    locks: &'a HashLocks,
    hash: ContentHash,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for HashGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.locks.remove_if(&self.hash, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
