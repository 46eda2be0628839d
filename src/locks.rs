use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::{Mutex, RwLock};

/// Lock table keyed by ranker rowid. Mutations hold the ranker's mutex for
/// the whole check-then-act span so contradictory inserts serialize per
/// ranker rather than globally.
#[derive(Default)]
pub(crate) struct RankerLocks {
    inner: RwLock<AHashMap<i64, Arc<Mutex<()>>>>,
}

impl RankerLocks {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(AHashMap::new()),
        }
    }

    pub fn for_ranker(&self, ranker: i64) -> Arc<Mutex<()>> {
        if let Some(lock) = self.inner.read().get(&ranker) {
            return lock.clone();
        }
        self.inner.write().entry(ranker).or_default().clone()
    }

    pub fn remove(&self, ranker: i64) {
        self.inner.write().remove(&ranker);
    }
}
