//! 审计日志服务
//!
//! `AuditRecorder` is a pure side-effect sink: `log` always succeeds,
//! prepends to a bounded list, and fans the entry out to subscribers.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use shared::types::{Actor, Unit};
use tokio::sync::broadcast;

use crate::store::SnapshotStore;

use super::types::{AuditEntry, AuditTransaction};

/// Persistence key for the audit slice.
const STORE_KEY: &str = "audit";

/// Bounded, user-attributed audit feed. Newest entries first.
pub struct AuditRecorder {
    entries: RwLock<VecDeque<AuditEntry>>,
    cap: usize,
    next_id: AtomicU64,
    tx: broadcast::Sender<AuditEntry>,
    store: RwLock<Option<Arc<dyn SnapshotStore>>>,
}

impl std::fmt::Debug for AuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder")
            .field("cap", &self.cap)
            .field("len", &self.entries.read().len())
            .finish_non_exhaustive()
    }
}

impl AuditRecorder {
    pub fn new(cap: usize, channel_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(channel_capacity);
        Self {
            entries: RwLock::new(VecDeque::new()),
            cap,
            next_id: AtomicU64::new(1),
            tx,
            store: RwLock::new(None),
        }
    }

    /// Attach a snapshot store; the feed is saved after every append.
    pub fn set_store(&self, store: Arc<dyn SnapshotStore>) {
        *self.store.write() = Some(store);
    }

    /// Restore the feed from the store, if a snapshot exists.
    pub fn restore(&self, store: &dyn SnapshotStore) {
        let Some(value) = store.load(STORE_KEY) else {
            return;
        };
        match serde_json::from_value::<Vec<AuditEntry>>(value) {
            Ok(saved) => {
                let max_id = saved.iter().map(|e| e.id).max().unwrap_or(0);
                self.next_id.store(max_id + 1, Ordering::SeqCst);
                *self.entries.write() = saved.into_iter().collect();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable audit snapshot");
            }
        }
    }

    /// Append one entry. No failure modes; always accepted.
    #[allow(clippy::too_many_arguments)]
    pub fn log(
        &self,
        item_name: &str,
        category: &str,
        delta: f64,
        unit: Unit,
        note: &str,
        actor: &Actor,
        group_id: Option<&str>,
        image: Option<&str>,
    ) -> AuditEntry {
        let entry = AuditEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            timestamp: shared::util::now_millis(),
            item_name: item_name.to_string(),
            category: category.to_string(),
            delta,
            unit,
            note: note.to_string(),
            actor: actor.clone(),
            group_id: group_id.map(str::to_string),
            image: image.map(str::to_string),
        };

        {
            let mut entries = self.entries.write();
            entries.push_front(entry.clone());
            entries.truncate(self.cap);
        }

        tracing::debug!(
            item = item_name,
            delta,
            actor = %actor.name,
            group_id = ?group_id,
            "Audit entry recorded"
        );

        if self.tx.receiver_count() > 0 && self.tx.send(entry.clone()).is_err() {
            tracing::warn!("Audit broadcast failed: no active receivers");
        }

        self.persist();
        entry
    }

    /// Subscribe to appended entries.
    pub fn subscribe(&self) -> broadcast::Receiver<AuditEntry> {
        self.tx.subscribe()
    }

    /// All entries, newest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Render the feed as transactions: consecutive entries sharing a group
    /// id collapse into one, ungrouped entries stand alone.
    pub fn grouped(&self) -> Vec<AuditTransaction> {
        let entries = self.entries.read();
        let mut out: Vec<AuditTransaction> = Vec::new();
        for entry in entries.iter() {
            match (&entry.group_id, out.last_mut()) {
                (Some(gid), Some(last)) if last.group_id.as_deref() == Some(gid.as_str()) => {
                    last.entries.push(entry.clone());
                }
                _ => out.push(AuditTransaction {
                    group_id: entry.group_id.clone(),
                    note: entry.note.clone(),
                    timestamp: entry.timestamp,
                    actor: entry.actor.clone(),
                    entries: vec![entry.clone()],
                }),
            }
        }
        out
    }

    fn persist(&self) {
        let Some(store) = self.store.read().clone() else {
            return;
        };
        let entries = self.entries();
        match serde_json::to_value(&entries) {
            Ok(value) => store.save(STORE_KEY, value),
            Err(e) => tracing::error!(error = %e, "Failed to serialize audit feed"),
        }
    }
}
