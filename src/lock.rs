//! Process-wide registry of per-file read/write locks.
//!
//! Every store operation spans a full read-modify-write of a shared file, so
//! overlapping mutations would silently lose writes without serialization.
//! Handles opened on the same path share one lock: mutating operations hold
//! the write side for their whole read-mutate-write span, read-only
//! operations hold the read side (concurrent with each other, serialized
//! against writers).

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static REGISTRY: Lazy<Mutex<HashMap<PathBuf, Arc<RwLock<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Lock guarding the file at `path`. Relative paths are resolved against the
/// current directory so `db.json` and `./db.json` share a lock; symlinked
/// spellings of the same file do not.
pub(crate) fn for_path(path: &Path) -> Arc<RwLock<()>> {
    let key = absolute(path);
    let mut registry = REGISTRY.lock();
    Arc::clone(registry.entry(key).or_default())
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
