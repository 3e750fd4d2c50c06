//! Manager test harness: a fully wired engine over the fixture floor and
//! catalog, with seeded stock and one manager credential.

mod test_boundary;

use std::sync::Arc;

use shared::inventory::SeedItem;
use shared::session::{CommandPayload, SessionCommand};
use shared::types::{Actor, Unit};

use crate::approval::{ApprovalGate, ManagerCredential};
use crate::audit::AuditRecorder;
use crate::config::{EngineConfig, StockPolicy};
use crate::inventory::InventoryLedger;
use crate::sessions::manager::SessionManager;
use crate::sessions::testutil;

pub(crate) struct TestEngine {
    pub manager: SessionManager,
    pub ledger: Arc<InventoryLedger>,
    pub audit: Arc<AuditRecorder>,
}

pub(crate) fn seeds() -> Vec<SeedItem> {
    let side = |item_id: &str, name: &str| SeedItem {
        item_id: item_id.to_string(),
        name: name.to_string(),
        category: "side".to_string(),
        unit: Unit::Pieces,
        quantity: 100.0,
    };
    let grams = |item_id: &str, name: &str, category: &str, quantity: f64| SeedItem {
        item_id: item_id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        unit: Unit::Grams,
        quantity,
    };
    vec![
        side("rice", "Rice"),
        side("lettuce", "Lettuce"),
        side("ssamjang", "Ssamjang"),
        side("garlic", "Garlic"),
        side("kimchi", "Kimchi"),
        grams("pork_samgyup_sliced", "Samgyupsal (sliced)", "meat", 5000.0),
        grams("pork_samgyup_scrap", "Samgyupsal trimmings", "kitchen", 2000.0),
        grams("pantry_rice_cake", "Rice cakes", "pantry", 3000.0),
        grams("pantry_gochujang", "Gochujang", "pantry", 1000.0),
    ]
}

pub(crate) fn engine_with_policy(policy: StockPolicy) -> TestEngine {
    let config = EngineConfig {
        stock_policy: policy,
        ..EngineConfig::default()
    };
    let audit = Arc::new(AuditRecorder::new(config.audit_cap, config.channel_capacity));
    let ledger = Arc::new(InventoryLedger::new(policy, config.history_cap, audit.clone()));
    ledger.seed(seeds());
    let gate = Arc::new(ApprovalGate::new(vec![ManagerCredential::new(
        "Marco", "4417",
    )]));
    let manager = SessionManager::new(
        testutil::test_floor(),
        Arc::new(testutil::test_catalog()),
        ledger.clone(),
        gate,
        config,
    );
    TestEngine {
        manager,
        ledger,
        audit,
    }
}

pub(crate) fn engine() -> TestEngine {
    engine_with_policy(StockPolicy::Clamp)
}

pub(crate) fn staff() -> Actor {
    Actor::staff("Ana")
}

pub(crate) fn boss() -> Actor {
    Actor::manager("Marco")
}

pub(crate) fn cmd(payload: CommandPayload) -> SessionCommand {
    SessionCommand::new(staff(), payload)
}

pub(crate) fn boss_cmd(payload: CommandPayload) -> SessionCommand {
    SessionCommand::new(boss(), payload)
}

/// Open a table and assert success.
pub(crate) fn open(engine: &TestEngine, table_id: &str, persons: i32) {
    let response = engine.manager.execute_command(cmd(CommandPayload::OpenTable {
        table_id: table_id.to_string(),
        persons,
    }));
    assert!(response.success, "open {table_id} failed: {:?}", response.error);
}

/// Select a package and assert success.
pub(crate) fn select_package(engine: &TestEngine, table_id: &str, package_id: &str) {
    let response = engine
        .manager
        .execute_command(cmd(CommandPayload::SelectPackage {
            table_id: table_id.to_string(),
            package_id: package_id.to_string(),
        }));
    assert!(response.success, "select failed: {:?}", response.error);
}
