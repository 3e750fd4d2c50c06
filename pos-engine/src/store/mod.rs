//! Snapshot persistence boundary.
//!
//! The engine treats its state as serializable slices saved on every
//! mutation and reloaded on startup; last saved snapshot wins. The actual
//! storage (browser storage, embedded KV, a file) is the host's concern -
//! this trait is the seam.

use dashmap::DashMap;
use serde_json::Value;

/// Host-provided snapshot storage.
///
/// Implementations must not fail loudly: a POS floor keeps serving when the
/// disk hiccups, so `save` is fire-and-forget and `load` is best-effort.
pub trait SnapshotStore: Send + Sync {
    /// Last saved snapshot for `key`, if any.
    fn load(&self, key: &str) -> Option<Value>;

    /// Persist `value` under `key`, replacing any previous snapshot.
    fn save(&self, key: &str, value: Value);
}

/// In-process store: the default for tests, demos and single-process
/// deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.iter().map(|e| e.key().clone()).collect()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.inner.get(key).map(|v| v.value().clone())
    }

    fn save(&self, key: &str, value: Value) {
        self.inner.insert(key.to_string(), value);
    }
}
