use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::Dataset;
use crate::loader::LoaderError;

type Cache = RwLock<HashMap<String, Arc<Dataset>>>;

static CACHE: OnceLock<Cache> = OnceLock::new();

fn cache() -> &'static Cache {
    CACHE.get_or_init(Default::default)
}

/// Returns the cached dataset for `key`, loading it on first access.
///
/// The load runs outside the lock. If two callers race on the same key, the
/// first dataset inserted wins and both receive it.
pub(super) fn get_or_load<F>(key: &str, load: F) -> Result<Arc<Dataset>, LoaderError>
where
    F: FnOnce() -> Result<Dataset, LoaderError>,
{
    if let Some(dataset) = lookup(key) {
        debug!("Dataset cache hit for {}", key);
        return Ok(dataset);
    }

    let dataset = Arc::new(load()?);
    let mut guard = cache().write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(guard.entry(key.to_string()).or_insert(dataset)))
}

/// Swaps in a new dataset for `key`.
///
/// Readers holding the previous `Arc` keep a complete, unchanged dataset.
pub(super) fn replace(key: &str, dataset: Dataset) -> Arc<Dataset> {
    let dataset = Arc::new(dataset);
    let mut guard = cache().write().unwrap_or_else(PoisonError::into_inner);
    guard.insert(key.to_string(), Arc::clone(&dataset));
    dataset
}

/// The cached dataset for `key`, if any
pub fn lookup(key: &str) -> Option<Arc<Dataset>> {
    let guard = cache().read().unwrap_or_else(PoisonError::into_inner);
    guard.get(key).cloned()
}

/// Drops the cached dataset for `key`, returning whether one was cached
pub fn evict(key: &str) -> bool {
    let mut guard = cache().write().unwrap_or_else(PoisonError::into_inner);
    guard.remove(key).is_some()
}

/// Empties the process-wide dataset cache
pub fn reset_cache() {
    let mut guard = cache().write().unwrap_or_else(PoisonError::into_inner);
    guard.clear();
}
