//! Memoization of load results keyed by source identity and point cap.

use std::collections::HashMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use esbmap_core::DatasetBundle;

use crate::loader::SourcePaths;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FileStamp {
    path: PathBuf,
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn probe(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        Some(Self {
            path: path.to_path_buf(),
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Path, modification time and length of all three sources at one instant.
/// Any change to a file produces a different identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceIdentity {
    files: [FileStamp; 3],
}

impl SourceIdentity {
    /// `None` when any source cannot be stat'ed; such a load is never cached.
    #[must_use]
    pub fn probe(paths: &SourcePaths) -> Option<Self> {
        Some(Self {
            files: [
                FileStamp::probe(&paths.esb)?,
                FileStamp::probe(&paths.scraper)?,
                FileStamp::probe(&paths.matches)?,
            ],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    identity: SourceIdentity,
    max_points: usize,
}

/// Distinct `max_points` values kept per source identity by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 4;

/// Bundle plus the access order of its last hit or insertion.
#[derive(Debug)]
struct CacheEntry {
    bundle: Arc<DatasetBundle>,
    last_access: AtomicU64,
}

/// Read-mostly cache of loaded bundles. Hits hand out the same `Arc`, so
/// concurrent readers share one bundle.
///
/// At most `capacity` entries are kept; storing beyond that evicts the least
/// recently used one.
#[derive(Debug)]
pub struct LoadCache {
    capacity: NonZeroUsize,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    access_counter: AtomicU64,
}

impl Default for LoadCache {
    fn default() -> Self {
        Self::with_capacity(
            NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        )
    }
}

impl LoadCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(HashMap::new()),
            access_counter: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    fn next_access(&self) -> u64 {
        self.access_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[must_use]
    pub fn get(&self, identity: &SourceIdentity, max_points: usize) -> Option<Arc<DatasetBundle>> {
        let key = CacheKey {
            identity: identity.clone(),
            max_points,
        };
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(&key)?;
        entry
            .last_access
            .store(self.next_access(), Ordering::Relaxed);
        Some(Arc::clone(&entry.bundle))
    }

    /// Store a bundle, evicting entries recorded under any other identity
    /// since those describe files that have since changed. When the cache is
    /// still over capacity the least recently used entries go.
    pub fn store(&self, identity: SourceIdentity, max_points: usize, bundle: Arc<DatasetBundle>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|key, _| key.identity == identity);
        entries.insert(
            CacheKey {
                identity,
                max_points,
            },
            CacheEntry {
                bundle,
                last_access: AtomicU64::new(self.next_access()),
            },
        );

        while entries.len() > self.capacity.get() {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access.load(Ordering::Relaxed))
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    entries.remove(&key);
                }
                None => break,
            }
        }
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
