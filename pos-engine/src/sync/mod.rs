//! Committed-state fan-out to floor tabs.
//!
//! # 架构
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                   SyncBus                    │
//! │   broadcast::Sender<StateUpdate>             │
//! └──────────────┬───────────────────────────────┘
//!                │
//!      ┌─────────┼─────────┐
//!      ▼         ▼         ▼
//!  TabReplica TabReplica  (engine publishes as "engine")
//! ```
//!
//! The engine is the single authoritative store; replicas are pure clients.
//! Each update carries the id of the peer that produced it, so a replica
//! drops its own reflections instead of juggling an "ignore the next
//! publish" flag. Applying a received update never republishes it - that is
//! what makes echo suppression idempotent. Ordering is last-write-wins per
//! key via a monotonic revision.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

/// One committed state slice, pushed to every subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateUpdate {
    /// State slice key ("floor", "ledger", ...)
    pub key: String,
    /// Monotonic per-key revision; highest revision wins
    pub revision: u64,
    pub value: Value,
    /// Peer that produced the update
    pub origin: String,
}

/// Broadcast fan-out for state updates.
#[derive(Debug, Clone)]
pub struct SyncBus {
    tx: broadcast::Sender<StateUpdate>,
}

impl SyncBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an update to all subscribers. Returns the receiver count;
    /// zero subscribers is not an error.
    pub fn publish(&self, update: StateUpdate) -> usize {
        match self.tx.send(update) {
            Ok(n) => n,
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateUpdate> {
        self.tx.subscribe()
    }
}

/// A floor tab's local copy of the published state slices.
pub struct TabReplica {
    id: String,
    bus: SyncBus,
    state: RwLock<HashMap<String, (u64, Value)>>,
}

impl std::fmt::Debug for TabReplica {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabReplica")
            .field("id", &self.id)
            .field("keys", &self.state.read().len())
            .finish()
    }
}

impl TabReplica {
    pub fn new(id: impl Into<String>, bus: SyncBus) -> Self {
        Self {
            id: id.into(),
            bus,
            state: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Local edit: store the value and publish it to peers.
    pub fn set(&self, key: &str, value: Value) -> StateUpdate {
        let revision = {
            let mut state = self.state.write();
            let next = state.get(key).map(|(r, _)| r + 1).unwrap_or(1);
            state.insert(key.to_string(), (next, value.clone()));
            next
        };
        let update = StateUpdate {
            key: key.to_string(),
            revision,
            value,
            origin: self.id.clone(),
        };
        self.bus.publish(update.clone());
        update
    }

    /// Apply a received update to local state.
    ///
    /// Returns `true` if the update changed local state. Own reflections
    /// and stale revisions are dropped. Never publishes - a replica only
    /// publishes on local edits, so an applied update cannot echo.
    pub fn apply(&self, update: &StateUpdate) -> bool {
        if update.origin == self.id {
            tracing::trace!(tab = %self.id, key = %update.key, "Dropping own reflection");
            return false;
        }
        let mut state = self.state.write();
        match state.get(&update.key) {
            Some((current, _)) if *current >= update.revision => {
                tracing::debug!(
                    tab = %self.id,
                    key = %update.key,
                    have = current,
                    got = update.revision,
                    "Dropping stale update"
                );
                false
            }
            _ => {
                state.insert(update.key.clone(), (update.revision, update.value.clone()));
                true
            }
        }
    }

    /// Current local value for a key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.read().get(key).map(|(_, v)| v.clone())
    }

    /// Current local revision for a key.
    pub fn revision(&self, key: &str) -> Option<u64> {
        self.state.read().get(key).map(|(r, _)| *r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_publish_reaches_subscribers() {
        let bus = SyncBus::new(16);
        let mut rx = bus.subscribe();
        let tab = TabReplica::new("tab-1", bus.clone());
        tab.set("floor", json!({"occupied": 2}));
        let update = rx.try_recv().unwrap();
        assert_eq!(update.key, "floor");
        assert_eq!(update.origin, "tab-1");
    }

    #[test]
    fn test_replica_drops_own_reflection() {
        let bus = SyncBus::new(16);
        let tab = TabReplica::new("tab-1", bus.clone());
        let update = tab.set("floor", json!(1));
        // The bus echoes everything back, including our own update
        assert!(!tab.apply(&update));
        assert_eq!(tab.revision("floor"), Some(1));
    }

    #[test]
    fn test_apply_never_republishes() {
        let bus = SyncBus::new(16);
        let a = TabReplica::new("tab-a", bus.clone());
        let b = TabReplica::new("tab-b", bus.clone());
        let mut rx = bus.subscribe();

        let update = a.set("floor", json!({"occupied": 1}));
        assert!(b.apply(&update));

        // Exactly one message crossed the bus: a's publish. b applying it
        // produced no outbound traffic, so no echo loop is possible.
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_two_replica_round_does_not_loop() {
        let bus = SyncBus::new(64);
        let a = TabReplica::new("tab-a", bus.clone());
        let b = TabReplica::new("tab-b", bus.clone());
        let mut rx_a = bus.subscribe();
        let mut rx_b = bus.subscribe();

        a.set("ledger", json!({"rice": 6}));

        // Pump both receivers until quiescent; a bounded loop proves there
        // is no infinite echo between the two peers.
        let mut hops = 0;
        loop {
            let mut progressed = false;
            if let Ok(u) = rx_a.try_recv() {
                a.apply(&u);
                progressed = true;
            }
            if let Ok(u) = rx_b.try_recv() {
                b.apply(&u);
                progressed = true;
            }
            if !progressed {
                break;
            }
            hops += 1;
            assert!(hops < 10, "echo loop detected");
        }

        assert_eq!(a.get("ledger"), b.get("ledger"));
    }

    #[test]
    fn test_last_write_wins_per_key() {
        let bus = SyncBus::new(16);
        let tab = TabReplica::new("tab-1", bus.clone());

        let newer = StateUpdate {
            key: "floor".to_string(),
            revision: 5,
            value: json!("newer"),
            origin: "engine".to_string(),
        };
        let older = StateUpdate {
            key: "floor".to_string(),
            revision: 3,
            value: json!("older"),
            origin: "engine".to_string(),
        };

        assert!(tab.apply(&newer));
        assert!(!tab.apply(&older)); // stale, dropped
        assert_eq!(tab.get("floor"), Some(json!("newer")));
    }

    #[test]
    fn test_idempotent_apply() {
        let bus = SyncBus::new(16);
        let tab = TabReplica::new("tab-1", bus.clone());
        let update = StateUpdate {
            key: "floor".to_string(),
            revision: 1,
            value: json!(1),
            origin: "engine".to_string(),
        };
        assert!(tab.apply(&update));
        assert!(!tab.apply(&update)); // same revision, no-op
    }
}
