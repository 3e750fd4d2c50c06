//! Raw-delivery intake and yield conversion.
//!
//! A delivery credits a meat's raw pool. Converting it debits the raw pool
//! and splits the mass into service, kitchen by-product and waste pool
//! credits; all ledger calls of one conversion share a group id so the
//! audit feed shows the conversion as a single transaction.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::catalog::Catalog;
use shared::types::Actor;
use shared::util::{now_millis, short_id};

use crate::store::SnapshotStore;

use super::ledger::{AdjustContext, InventoryLedger, LedgerError};

/// Persistence key for the pending-deliveries / yield-records slice.
const STORE_KEY: &str = "yields";

#[derive(Debug, thiserror::Error)]
pub enum YieldError {
    #[error("unknown meat: {0}")]
    UnknownMeat(String),
    #[error("unknown or already converted delivery: {0}")]
    UnknownDelivery(String),
    #[error("invalid delivery: {0}")]
    InvalidDelivery(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// A raw delivery awaiting conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryRecord {
    pub delivery_id: String,
    pub meat_id: String,
    pub kilograms: f64,
    pub cost_per_kg: f64,
    pub received_at: i64,
    pub received_by: String,
}

impl DeliveryRecord {
    /// Raw grams this delivery put into the raw pool.
    pub fn raw_grams(&self) -> f64 {
        self.kilograms * 1000.0
    }
}

/// Outcome of one conversion, kept for yield-percentage reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YieldRecord {
    pub meat_id: String,
    pub raw_kg: f64,
    pub sliced_g: f64,
    pub scrap_g: f64,
    pub byproduct_g: f64,
    pub waste_g: f64,
    /// sliced / raw, in [0, 1]
    pub yield_pct: f64,
    pub converted_at: i64,
    pub converted_by: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct YieldState {
    pending: Vec<DeliveryRecord>,
    records: Vec<YieldRecord>,
}

/// Turns raw deliveries into pool credits through the ledger.
pub struct YieldConverter {
    ledger: Arc<InventoryLedger>,
    catalog: Arc<Catalog>,
    inner: RwLock<YieldState>,
    store: RwLock<Option<Arc<dyn SnapshotStore>>>,
}

impl std::fmt::Debug for YieldConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("YieldConverter")
            .field("pending", &inner.pending.len())
            .field("records", &inner.records.len())
            .finish_non_exhaustive()
    }
}

impl YieldConverter {
    pub fn new(ledger: Arc<InventoryLedger>, catalog: Arc<Catalog>) -> Self {
        Self {
            ledger,
            catalog,
            inner: RwLock::new(YieldState::default()),
            store: RwLock::new(None),
        }
    }

    pub fn set_store(&self, store: Arc<dyn SnapshotStore>) {
        *self.store.write() = Some(store);
    }

    pub fn restore(&self, store: &dyn SnapshotStore) {
        let Some(value) = store.load(STORE_KEY) else {
            return;
        };
        match serde_json::from_value::<YieldState>(value) {
            Ok(saved) => *self.inner.write() = saved,
            Err(e) => tracing::warn!(error = %e, "Discarding unreadable yield snapshot"),
        }
    }

    /// Record a raw delivery and credit the meat's raw pool.
    pub fn receive(
        &self,
        meat_id: &str,
        kilograms: f64,
        cost_per_kg: f64,
        actor: &Actor,
    ) -> Result<DeliveryRecord, YieldError> {
        let meat = self
            .catalog
            .meat(meat_id)
            .ok_or_else(|| YieldError::UnknownMeat(meat_id.to_string()))?;
        if !(kilograms.is_finite() && kilograms > 0.0) {
            return Err(YieldError::InvalidDelivery(format!(
                "kilograms must be positive, got {kilograms}"
            )));
        }
        if !(cost_per_kg.is_finite() && cost_per_kg >= 0.0) {
            return Err(YieldError::InvalidDelivery(format!(
                "cost_per_kg must be non-negative, got {cost_per_kg}"
            )));
        }

        let delivery = DeliveryRecord {
            delivery_id: short_id(),
            meat_id: meat_id.to_string(),
            kilograms,
            cost_per_kg,
            received_at: now_millis(),
            received_by: actor.name.clone(),
        };

        self.ledger.adjust(
            &meat.raw_pool,
            delivery.raw_grams(),
            &format!("Delivery {:.1}kg {}", kilograms, meat.name),
            AdjustContext::new(actor),
        )?;

        tracing::info!(
            delivery_id = %delivery.delivery_id,
            meat_id,
            kilograms,
            cost_per_kg,
            "Raw delivery received"
        );

        self.inner.write().pending.push(delivery.clone());
        self.persist();
        Ok(delivery)
    }

    /// Convert one pending delivery into sliced / scrap / by-product pool
    /// credits; the unaccounted remainder goes to waste.
    ///
    /// All four ledger calls share one group id. Unspecified outputs are 0;
    /// an all-zero split is a legal 100%-waste conversion.
    pub fn convert(
        &self,
        delivery_id: &str,
        sliced_g: f64,
        scrap_g: f64,
        byproduct_g: f64,
        actor: &Actor,
    ) -> Result<YieldRecord, YieldError> {
        let delivery = {
            let inner = self.inner.read();
            inner
                .pending
                .iter()
                .find(|d| d.delivery_id == delivery_id)
                .cloned()
                .ok_or_else(|| YieldError::UnknownDelivery(delivery_id.to_string()))?
        };
        let meat = self
            .catalog
            .meat(&delivery.meat_id)
            .ok_or_else(|| YieldError::UnknownMeat(delivery.meat_id.clone()))?;

        for (label, v) in [
            ("sliced_g", sliced_g),
            ("scrap_g", scrap_g),
            ("byproduct_g", byproduct_g),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(YieldError::InvalidDelivery(format!(
                    "{label} must be non-negative, got {v}"
                )));
            }
        }

        let raw_total = delivery.raw_grams();
        let group_id = short_id();
        let note = format!("Yield conversion {:.1}kg {}", delivery.kilograms, meat.name);
        let ctx = AdjustContext::new(actor).with_group(&group_id);

        // 1. Debit the raw pool by the full delivery
        self.ledger.adjust(&meat.raw_pool, -raw_total, &note, ctx)?;

        // 2. Credit service
        if sliced_g > 0.0 {
            self.ledger.adjust(&meat.service_pool, sliced_g, &note, ctx)?;
        }

        // 3. Credit kitchen pools: scraps to the first, by-products to the
        // second. Grams without a pool to land in fall through to waste.
        let mut credited_scrap = 0.0;
        let mut credited_byproduct = 0.0;
        match meat.kitchen_pools.first() {
            Some(pool) if scrap_g > 0.0 => {
                self.ledger.adjust(pool, scrap_g, &note, ctx)?;
                credited_scrap = scrap_g;
            }
            None if scrap_g > 0.0 => {
                tracing::warn!(meat_id = %meat.meat_id, scrap_g, "No kitchen pool; scraps counted as waste");
            }
            _ => {}
        }
        match meat.kitchen_pools.get(1) {
            Some(pool) if byproduct_g > 0.0 => {
                self.ledger.adjust(pool, byproduct_g, &note, ctx)?;
                credited_byproduct = byproduct_g;
            }
            None if byproduct_g > 0.0 => {
                tracing::warn!(meat_id = %meat.meat_id, byproduct_g, "No second kitchen pool; by-products counted as waste");
            }
            _ => {}
        }

        // 4. Waste is the balancing remainder
        let waste_g = (raw_total - sliced_g - credited_scrap - credited_byproduct).max(0.0);
        if waste_g > 0.0 {
            if let Some(pool) = &meat.waste_pool {
                self.ledger.adjust(pool, waste_g, &note, ctx)?;
            } else {
                tracing::warn!(meat_id = %meat.meat_id, waste_g, "No waste pool configured");
            }
        }

        let record = YieldRecord {
            meat_id: delivery.meat_id.clone(),
            raw_kg: delivery.kilograms,
            sliced_g,
            scrap_g: credited_scrap,
            byproduct_g: credited_byproduct,
            waste_g,
            yield_pct: if raw_total > 0.0 { sliced_g / raw_total } else { 0.0 },
            converted_at: now_millis(),
            converted_by: actor.name.clone(),
        };

        tracing::info!(
            delivery_id,
            meat_id = %record.meat_id,
            yield_pct = format!("{:.1}%", record.yield_pct * 100.0),
            waste_g,
            "Delivery converted"
        );

        {
            let mut inner = self.inner.write();
            inner.pending.retain(|d| d.delivery_id != delivery_id);
            inner.records.push(record.clone());
        }
        self.persist();
        Ok(record)
    }

    /// Deliveries awaiting conversion.
    pub fn pending(&self) -> Vec<DeliveryRecord> {
        self.inner.read().pending.clone()
    }

    /// All completed conversions.
    pub fn records(&self) -> Vec<YieldRecord> {
        self.inner.read().records.clone()
    }

    fn persist(&self) {
        let Some(store) = self.store.read().clone() else {
            return;
        };
        let inner = self.inner.read();
        match serde_json::to_value(&*inner) {
            Ok(value) => store.save(STORE_KEY, value),
            Err(e) => tracing::error!(error = %e, "Failed to serialize yield state"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditRecorder;
    use crate::config::StockPolicy;
    use shared::catalog::MeatCatalogEntry;

    fn setup() -> (Arc<InventoryLedger>, Arc<AuditRecorder>, YieldConverter) {
        let audit = Arc::new(AuditRecorder::new(200, 16));
        let ledger = Arc::new(InventoryLedger::new(StockPolicy::Clamp, 50, audit.clone()));
        let catalog = Arc::new(Catalog::new(
            vec![],
            vec![],
            vec![MeatCatalogEntry {
                meat_id: "pork_belly".to_string(),
                name: "Pork Belly".to_string(),
                raw_pool: "pork_belly_raw".to_string(),
                service_pool: "pork_belly_sliced".to_string(),
                kitchen_pools: vec![
                    "pork_belly_scrap".to_string(),
                    "pork_belly_bones".to_string(),
                ],
                waste_pool: Some("pork_belly_waste".to_string()),
                cost_per_100g: 38.0,
            }],
        ));
        let converter = YieldConverter::new(ledger.clone(), catalog);
        (ledger, audit, converter)
    }

    fn ana() -> Actor {
        Actor::staff("Ana")
    }

    #[test]
    fn test_receive_credits_raw_pool() {
        let (ledger, _, converter) = setup();
        let delivery = converter.receive("pork_belly", 10.0, 380.0, &ana()).unwrap();
        assert_eq!(delivery.raw_grams(), 10_000.0);
        assert_eq!(ledger.level("pork_belly_raw"), 10_000.0);
        assert_eq!(converter.pending().len(), 1);
    }

    #[test]
    fn test_receive_unknown_meat() {
        let (_, _, converter) = setup();
        let err = converter.receive("wagyu", 5.0, 900.0, &ana()).unwrap_err();
        assert!(matches!(err, YieldError::UnknownMeat(_)));
    }

    #[test]
    fn test_receive_rejects_non_positive_weight() {
        let (_, _, converter) = setup();
        assert!(matches!(
            converter.receive("pork_belly", 0.0, 380.0, &ana()),
            Err(YieldError::InvalidDelivery(_))
        ));
    }

    #[test]
    fn test_convert_splits_pools_and_balances_mass() {
        let (ledger, _, converter) = setup();
        let d = converter.receive("pork_belly", 10.0, 380.0, &ana()).unwrap();
        let record = converter
            .convert(&d.delivery_id, 6000.0, 1500.0, 0.0, &ana())
            .unwrap();

        assert_eq!(ledger.level("pork_belly_raw"), 0.0);
        assert_eq!(ledger.level("pork_belly_sliced"), 6000.0);
        assert_eq!(ledger.level("pork_belly_scrap"), 1500.0);
        assert_eq!(ledger.level("pork_belly_waste"), 2500.0);
        assert_eq!(record.waste_g, 2500.0);
        assert!((record.yield_pct - 0.6).abs() < 1e-9);

        // Mass balance: outputs sum back to the raw total
        let total = record.sliced_g + record.scrap_g + record.byproduct_g + record.waste_g;
        assert_eq!(total, 10_000.0);

        // Delivery no longer pending
        assert!(converter.pending().is_empty());
        assert_eq!(converter.records().len(), 1);
    }

    #[test]
    fn test_convert_all_zero_is_full_waste() {
        let (ledger, _, converter) = setup();
        let d = converter.receive("pork_belly", 2.0, 380.0, &ana()).unwrap();
        let record = converter.convert(&d.delivery_id, 0.0, 0.0, 0.0, &ana()).unwrap();
        assert_eq!(record.waste_g, 2000.0);
        assert_eq!(record.yield_pct, 0.0);
        assert_eq!(ledger.level("pork_belly_waste"), 2000.0);
    }

    #[test]
    fn test_convert_shares_one_group_id() {
        let (_, audit, converter) = setup();
        let d = converter.receive("pork_belly", 10.0, 380.0, &ana()).unwrap();
        converter
            .convert(&d.delivery_id, 6000.0, 1500.0, 200.0, &ana())
            .unwrap();

        // raw debit + sliced + scrap + bones + waste, one group
        let groups: std::collections::HashSet<_> = audit
            .entries()
            .iter()
            .filter_map(|e| e.group_id.clone())
            .collect();
        assert_eq!(groups.len(), 1);
        let gid = groups.into_iter().next().unwrap();
        let in_group = audit
            .entries()
            .iter()
            .filter(|e| e.group_id.as_deref() == Some(gid.as_str()))
            .count();
        assert_eq!(in_group, 5);
    }

    #[test]
    fn test_convert_unknown_delivery() {
        let (_, _, converter) = setup();
        assert!(matches!(
            converter.convert("nope", 0.0, 0.0, 0.0, &ana()),
            Err(YieldError::UnknownDelivery(_))
        ));
    }

    #[test]
    fn test_convert_twice_fails() {
        let (_, _, converter) = setup();
        let d = converter.receive("pork_belly", 1.0, 380.0, &ana()).unwrap();
        converter.convert(&d.delivery_id, 500.0, 0.0, 0.0, &ana()).unwrap();
        assert!(matches!(
            converter.convert(&d.delivery_id, 100.0, 0.0, 0.0, &ana()),
            Err(YieldError::UnknownDelivery(_))
        ));
    }
}
