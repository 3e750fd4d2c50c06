//! The inventory ledger: current level plus bounded history per item.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::inventory::{SeedItem, StockDelta, StockLevel, StockMovement};
use shared::types::{Actor, Unit};

use crate::audit::AuditRecorder;
use crate::config::StockPolicy;
use crate::store::SnapshotStore;

/// Persistence key for the ledger slice.
const STORE_KEY: &str = "ledger";

/// Ledger errors. Only the reject policy produces one.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient stock for {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: String,
        requested: f64,
        available: f64,
    },
}

/// Result of one applied adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub before: f64,
    pub after: f64,
}

/// Attribution and correlation for one adjustment.
#[derive(Debug, Clone, Copy)]
pub struct AdjustContext<'a> {
    pub actor: &'a Actor,
    pub group_id: Option<&'a str>,
    pub image: Option<&'a str>,
}

impl<'a> AdjustContext<'a> {
    pub fn new(actor: &'a Actor) -> Self {
        Self {
            actor,
            group_id: None,
            image: None,
        }
    }

    pub fn with_group(mut self, group_id: &'a str) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_image(mut self, image: &'a str) -> Self {
        self.image = Some(image);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemState {
    name: String,
    category: String,
    unit: Unit,
    quantity: f64,
    history: VecDeque<StockMovement>,
}

/// Current quantities and movement history for every trackable item,
/// keyed by the fine-grained pool / item id. Any coarser "total stock"
/// view is derived by [`InventoryLedger::rollup`] - the same fact is never
/// stored twice.
pub struct InventoryLedger {
    items: RwLock<HashMap<String, ItemState>>,
    policy: StockPolicy,
    history_cap: usize,
    audit: Arc<AuditRecorder>,
    store: RwLock<Option<Arc<dyn SnapshotStore>>>,
}

impl std::fmt::Debug for InventoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryLedger")
            .field("items", &self.items.read().len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl InventoryLedger {
    pub fn new(policy: StockPolicy, history_cap: usize, audit: Arc<AuditRecorder>) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            policy,
            history_cap,
            audit,
            store: RwLock::new(None),
        }
    }

    /// Seed initial items. Re-seeding an existing id only updates the
    /// descriptive fields, never the quantity or history.
    pub fn seed(&self, seeds: Vec<SeedItem>) {
        let mut items = self.items.write();
        for seed in seeds {
            items
                .entry(seed.item_id)
                .and_modify(|item| {
                    item.name = seed.name.clone();
                    item.category = seed.category.clone();
                    item.unit = seed.unit;
                })
                .or_insert(ItemState {
                    name: seed.name,
                    category: seed.category,
                    unit: seed.unit,
                    quantity: seed.quantity,
                    history: VecDeque::new(),
                });
        }
    }

    /// Attach a snapshot store; the ledger slice is saved after every
    /// adjustment.
    pub fn set_store(&self, store: Arc<dyn SnapshotStore>) {
        *self.store.write() = Some(store);
    }

    /// Restore levels and history from the store, if a snapshot exists.
    pub fn restore(&self, store: &dyn SnapshotStore) {
        let Some(value) = store.load(STORE_KEY) else {
            return;
        };
        match serde_json::from_value::<HashMap<String, ItemState>>(value) {
            Ok(saved) => *self.items.write() = saved,
            Err(e) => tracing::warn!(error = %e, "Discarding unreadable ledger snapshot"),
        }
    }

    /// Apply a signed adjustment to one item.
    ///
    /// Unseen ids are created with quantity 0. Under the clamp policy the
    /// result floors at zero and the call always succeeds; under the reject
    /// policy a deduction past zero returns `InsufficientStock` and nothing
    /// changes. Exactly one audit entry is emitted per successful call.
    pub fn adjust(
        &self,
        item_id: &str,
        delta: f64,
        note: &str,
        ctx: AdjustContext<'_>,
    ) -> Result<Adjustment, LedgerError> {
        let (adjustment, name, category, unit) = {
            let mut items = self.items.write();
            let item = items.entry(item_id.to_string()).or_insert_with(|| {
                tracing::debug!(item_id, "Creating ledger entry for unseen item");
                ItemState {
                    name: item_id.to_string(),
                    category: "uncatalogued".to_string(),
                    unit: Unit::Pieces,
                    quantity: 0.0,
                    history: VecDeque::new(),
                }
            });

            let before = item.quantity;
            let raw_after = before + delta;
            if raw_after < 0.0 {
                match self.policy {
                    StockPolicy::Reject => {
                        return Err(LedgerError::InsufficientStock {
                            item_id: item_id.to_string(),
                            requested: -delta,
                            available: before,
                        });
                    }
                    StockPolicy::Clamp => {
                        tracing::warn!(
                            item_id,
                            before,
                            delta,
                            "Stock underflow clamped to zero"
                        );
                    }
                }
            }
            let after = raw_after.max(0.0);
            item.quantity = after;

            item.history.push_front(StockMovement {
                delta,
                note: note.to_string(),
                at: shared::util::now_millis(),
                before,
                after,
                actor_name: ctx.actor.name.clone(),
                group_id: ctx.group_id.map(str::to_string),
                image: ctx.image.map(str::to_string),
            });
            item.history.truncate(self.history_cap);

            (
                Adjustment { before, after },
                item.name.clone(),
                item.category.clone(),
                item.unit,
            )
        };

        self.audit.log(
            &name,
            &category,
            delta,
            unit,
            note,
            ctx.actor,
            ctx.group_id,
            ctx.image,
        );

        self.persist();
        Ok(adjustment)
    }

    /// Pre-flight a batch of deltas against current levels. Used by the
    /// session manager under the reject policy so a command fails before
    /// any state mutates. Deltas hitting the same item are summed.
    pub fn validate(&self, deltas: &[StockDelta]) -> Result<(), LedgerError> {
        let items = self.items.read();
        let mut net: HashMap<&str, f64> = HashMap::new();
        for d in deltas {
            *net.entry(d.item_id.as_str()).or_insert(0.0) += d.delta;
        }
        for (item_id, delta) in net {
            let available = items.get(item_id).map(|i| i.quantity).unwrap_or(0.0);
            if available + delta < 0.0 {
                return Err(LedgerError::InsufficientStock {
                    item_id: item_id.to_string(),
                    requested: -delta,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Current quantity; 0 for unseen ids.
    pub fn level(&self, item_id: &str) -> f64 {
        self.items
            .read()
            .get(item_id)
            .map(|i| i.quantity)
            .unwrap_or(0.0)
    }

    /// Read view of one item.
    pub fn stock(&self, item_id: &str) -> Option<StockLevel> {
        self.items.read().get(item_id).map(|i| StockLevel {
            item_id: item_id.to_string(),
            name: i.name.clone(),
            category: i.category.clone(),
            unit: i.unit,
            quantity: i.quantity,
        })
    }

    /// All items, sorted by id.
    pub fn levels(&self) -> Vec<StockLevel> {
        let items = self.items.read();
        let mut out: Vec<StockLevel> = items
            .iter()
            .map(|(id, i)| StockLevel {
                item_id: id.clone(),
                name: i.name.clone(),
                category: i.category.clone(),
                unit: i.unit,
                quantity: i.quantity,
            })
            .collect();
        out.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        out
    }

    /// Derived total across a set of pool ids (the "basic" stock view).
    pub fn rollup(&self, item_ids: &[&str]) -> f64 {
        let items = self.items.read();
        item_ids
            .iter()
            .map(|id| items.get(*id).map(|i| i.quantity).unwrap_or(0.0))
            .sum()
    }

    /// Movement history for one item, most recent first.
    pub fn history(&self, item_id: &str) -> Vec<StockMovement> {
        self.items
            .read()
            .get(item_id)
            .map(|i| i.history.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn persist(&self) {
        let Some(store) = self.store.read().clone() else {
            return;
        };
        let items = self.items.read();
        match serde_json::to_value(&*items) {
            Ok(value) => store.save(STORE_KEY, value),
            Err(e) => tracing::error!(error = %e, "Failed to serialize ledger"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StockPolicy;

    fn ledger(policy: StockPolicy) -> InventoryLedger {
        let audit = Arc::new(AuditRecorder::new(200, 16));
        let ledger = InventoryLedger::new(policy, 5, audit);
        ledger.seed(vec![SeedItem {
            item_id: "rice".to_string(),
            name: "Rice".to_string(),
            category: "side".to_string(),
            unit: Unit::Pieces,
            quantity: 10.0,
        }]);
        ledger
    }

    fn ana() -> Actor {
        Actor::staff("Ana")
    }

    #[test]
    fn test_adjust_reports_before_after() {
        let ledger = ledger(StockPolicy::Clamp);
        let actor = ana();
        let adj = ledger
            .adjust("rice", -4.0, "T1 order", AdjustContext::new(&actor))
            .unwrap();
        assert_eq!(adj.before, 10.0);
        assert_eq!(adj.after, 6.0);
        assert_eq!(ledger.level("rice"), 6.0);
    }

    #[test]
    fn test_clamp_floors_at_zero() {
        let ledger = ledger(StockPolicy::Clamp);
        let actor = ana();
        let adj = ledger
            .adjust("rice", -25.0, "rush", AdjustContext::new(&actor))
            .unwrap();
        assert_eq!(adj.after, 0.0);
        assert_eq!(ledger.level("rice"), 0.0);
    }

    #[test]
    fn test_reject_policy_refuses_underflow() {
        let ledger = ledger(StockPolicy::Reject);
        let actor = ana();
        let err = ledger
            .adjust("rice", -25.0, "rush", AdjustContext::new(&actor))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock { .. }));
        // Nothing changed, nothing audited
        assert_eq!(ledger.level("rice"), 10.0);
        assert!(ledger.history("rice").is_empty());
    }

    #[test]
    fn test_unseen_item_defaults_to_zero() {
        let ledger = ledger(StockPolicy::Clamp);
        let actor = ana();
        assert_eq!(ledger.level("mystery"), 0.0);
        let adj = ledger
            .adjust("mystery", 3.0, "found a box", AdjustContext::new(&actor))
            .unwrap();
        assert_eq!(adj.before, 0.0);
        assert_eq!(adj.after, 3.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let ledger = ledger(StockPolicy::Clamp);
        let actor = ana();
        for i in 0..9 {
            ledger
                .adjust("rice", 1.0, &format!("top-up {i}"), AdjustContext::new(&actor))
                .unwrap();
        }
        let history = ledger.history("rice");
        assert_eq!(history.len(), 5); // cap
        assert_eq!(history[0].note, "top-up 8"); // newest first
    }

    #[test]
    fn test_every_adjust_is_audited() {
        let audit = Arc::new(AuditRecorder::new(200, 16));
        let ledger = InventoryLedger::new(StockPolicy::Clamp, 5, audit.clone());
        let actor = ana();
        ledger
            .adjust("rice", -2.0, "T3 order", AdjustContext::new(&actor).with_group("g1"))
            .unwrap();

        let entries = audit.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].delta, -2.0);
        assert_eq!(entries[0].note, "T3 order");
        assert_eq!(entries[0].group_id.as_deref(), Some("g1"));
        assert_eq!(entries[0].actor.name, "Ana");
    }

    #[test]
    fn test_stock_never_negative_under_random_walk() {
        let ledger = ledger(StockPolicy::Clamp);
        let actor = ana();
        let deltas = [-3.0, -8.0, 2.0, -1.5, -100.0, 7.0, -7.5, 0.0, -0.1];
        for (i, d) in deltas.iter().enumerate() {
            ledger
                .adjust("rice", *d, &format!("step {i}"), AdjustContext::new(&actor))
                .unwrap();
            assert!(ledger.level("rice") >= 0.0);
        }
    }

    #[test]
    fn test_validate_sums_deltas_per_item() {
        let ledger = ledger(StockPolicy::Reject);
        let mk = |delta: f64| StockDelta {
            item_id: "rice".to_string(),
            item_name: "Rice".to_string(),
            category: "side".to_string(),
            delta,
            unit: Unit::Pieces,
            note: String::new(),
        };
        assert!(ledger.validate(&[mk(-6.0), mk(-4.0)]).is_ok());
        assert!(ledger.validate(&[mk(-6.0), mk(-5.0)]).is_err());
    }

    #[test]
    fn test_rollup_sums_pools() {
        let ledger = ledger(StockPolicy::Clamp);
        let actor = ana();
        ledger
            .adjust("pork_raw", 1000.0, "delivery", AdjustContext::new(&actor))
            .unwrap();
        ledger
            .adjust("pork_sliced", 500.0, "conversion", AdjustContext::new(&actor))
            .unwrap();
        assert_eq!(ledger.rollup(&["pork_raw", "pork_sliced", "pork_waste"]), 1500.0);
    }

    #[test]
    fn test_restore_round_trip() {
        let store = Arc::new(crate::store::MemoryStore::new());
        let ledger = ledger(StockPolicy::Clamp);
        ledger.set_store(store.clone());
        let actor = ana();
        ledger
            .adjust("rice", -4.0, "order", AdjustContext::new(&actor))
            .unwrap();

        let audit = Arc::new(AuditRecorder::new(200, 16));
        let fresh = InventoryLedger::new(StockPolicy::Clamp, 5, audit);
        fresh.restore(store.as_ref());
        assert_eq!(fresh.level("rice"), 6.0);
        assert_eq!(fresh.history("rice").len(), 1);
    }
}
