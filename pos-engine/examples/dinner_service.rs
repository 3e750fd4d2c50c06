//! A full dinner service against the engine: delivery, conversion, two
//! tables, a void, a merge, checkout, and the resulting reports.
//!
//! ```bash
//! cargo run -p pos-engine --example dinner_service
//! ```

use std::sync::Arc;

use anyhow::Result;

use pos_engine::approval::ManagerCredential;
use pos_engine::reports::{sales_summary, yield_report};
use pos_engine::{
    ApprovalGate, AuditRecorder, CommandPayload, EngineConfig, InventoryLedger, MemoryStore,
    SessionCommand, SessionManager, TabReplica, YieldConverter,
};
use shared::catalog::{
    Catalog, IngredientSource, MeatCatalogEntry, PackageDef, PackageSide, RecipeDef,
    RecipeIngredient,
};
use shared::inventory::SeedItem;
use shared::session::{FloorPlan, PaymentMethod, Table};
use shared::types::{Actor, Unit};

fn catalog() -> Catalog {
    let side = |item_id: &str, name: &str| PackageSide {
        item_id: item_id.to_string(),
        name: name.to_string(),
        qty_per_pax: 1,
        unit: Unit::Pieces,
    };
    Catalog::new(
        vec![PackageDef {
            package_id: "unli_pork".to_string(),
            name: "Unli Pork".to_string(),
            price_per_pax: 349.0,
            eligible_meats: vec!["pork_samgyup".to_string()],
            sides: vec![
                side("rice", "Rice"),
                side("lettuce", "Lettuce"),
                side("ssamjang", "Ssamjang"),
                side("garlic", "Garlic"),
                side("kimchi", "Kimchi"),
            ],
        }],
        vec![RecipeDef {
            dish_id: "tteokbokki".to_string(),
            ingredients: vec![
                RecipeIngredient {
                    label: "Rice cakes".to_string(),
                    qty: 150.0,
                    unit: Unit::Grams,
                    source: IngredientSource::Pantry,
                    inventory_item_id: Some("pantry_rice_cake".to_string()),
                },
                RecipeIngredient {
                    label: "Pork trimmings".to_string(),
                    qty: 50.0,
                    unit: Unit::Grams,
                    source: IngredientSource::MeatScrap,
                    inventory_item_id: Some("pork_samgyup_scrap".to_string()),
                },
            ],
        }],
        vec![MeatCatalogEntry {
            meat_id: "pork_samgyup".to_string(),
            name: "Samgyupsal".to_string(),
            raw_pool: "pork_samgyup_raw".to_string(),
            service_pool: "pork_samgyup_sliced".to_string(),
            kitchen_pools: vec!["pork_samgyup_scrap".to_string()],
            waste_pool: Some("pork_samgyup_waste".to_string()),
            cost_per_100g: 38.0,
        }],
    )
}

fn seeds() -> Vec<SeedItem> {
    ["rice", "lettuce", "ssamjang", "garlic", "kimchi"]
        .into_iter()
        .map(|item_id| SeedItem {
            item_id: item_id.to_string(),
            name: item_id.to_string(),
            category: "side".to_string(),
            unit: Unit::Pieces,
            quantity: 80.0,
        })
        .chain([SeedItem {
            item_id: "pantry_rice_cake".to_string(),
            name: "Rice cakes".to_string(),
            category: "pantry".to_string(),
            unit: Unit::Grams,
            quantity: 2000.0,
        }])
        .collect()
}

fn main() -> Result<()> {
    pos_engine::logging::init_logger();

    let config = EngineConfig::from_env();
    let store = Arc::new(MemoryStore::new());
    let catalog = Arc::new(catalog());

    let audit = Arc::new(AuditRecorder::new(config.audit_cap, config.channel_capacity));
    audit.set_store(store.clone());
    let ledger = Arc::new(InventoryLedger::new(
        config.stock_policy,
        config.history_cap,
        audit.clone(),
    ));
    ledger.seed(seeds());
    ledger.set_store(store.clone());

    let converter = YieldConverter::new(ledger.clone(), catalog.clone());
    let gate = Arc::new(ApprovalGate::new(vec![ManagerCredential::new(
        "Marco", "4417",
    )]));
    let manager = SessionManager::new(
        FloorPlan::new(vec![
            Table::new("t1", "T1", 4),
            Table::new("t2", "T2", 2),
            Table::new("t3", "T3", 6),
        ]),
        catalog,
        ledger.clone(),
        gate.clone(),
        config,
    );
    manager.set_store(store);

    let ana = Actor::staff("Ana");
    let marco = Actor::manager("Marco");

    // A tab mirrors the engine's published state
    let tab = TabReplica::new("front-tab", manager.sync_bus().clone());
    let mut updates = manager.sync_bus().subscribe();

    // Morning: 10kg pork belly arrives and gets broken down
    let delivery = converter.receive("pork_samgyup", 10.0, 380.0, &ana)?;
    let record = converter.convert(&delivery.delivery_id, 6000.0, 1500.0, 0.0, &ana)?;
    println!(
        "delivery converted: {:.0}g sliced, {:.0}g waste, yield {:.0}%",
        record.sliced_g,
        record.waste_g,
        record.yield_pct * 100.0
    );

    // Service
    let run = |cmd: SessionCommand| {
        let response = manager.execute_command(cmd);
        assert!(response.success, "command failed: {:?}", response.error);
        response
    };

    run(SessionCommand::new(
        ana.clone(),
        CommandPayload::OpenTable {
            table_id: "t1".to_string(),
            persons: 4,
        },
    ));
    run(SessionCommand::new(
        ana.clone(),
        CommandPayload::SelectPackage {
            table_id: "t1".to_string(),
            package_id: "unli_pork".to_string(),
        },
    ));
    run(SessionCommand::new(
        ana.clone(),
        CommandPayload::AddMeat {
            table_id: "t1".to_string(),
            meat_id: "pork_samgyup".to_string(),
            grams: 300.0,
        },
    ));
    run(SessionCommand::new(
        ana.clone(),
        CommandPayload::AddPaidItem {
            table_id: "t1".to_string(),
            item_id: "tteokbokki".to_string(),
            name: "Tteokbokki".to_string(),
            kind: shared::session::OrderKind::Dish,
            quantity: 1,
            unit_price: 149.0,
        },
    ));

    // Staff needs the manager's PIN to void the dish
    let line_id = manager
        .session("t1")
        .expect("t1 occupied")
        .lines
        .iter()
        .find(|l| l.name == "Tteokbokki")
        .expect("dish on the bill")
        .line_id
        .clone();
    let token = gate
        .request("void order", &ana, Some("4417"))
        .token()
        .expect("manager PIN accepted");
    run(SessionCommand::new(
        ana.clone(),
        CommandPayload::VoidOrder {
            table_id: "t1".to_string(),
            line_id,
            reason: Some("sent to wrong table".to_string()),
        },
    )
    .with_approval(token.token_id));

    // T2 joins T1
    run(SessionCommand::new(
        ana.clone(),
        CommandPayload::OpenTable {
            table_id: "t2".to_string(),
            persons: 2,
        },
    ));
    run(SessionCommand::new(
        marco.clone(),
        CommandPayload::MergeTable {
            source_table_id: "t2".to_string(),
            target_table_id: "t1".to_string(),
        },
    ));

    run(SessionCommand::new(
        ana,
        CommandPayload::CloseSession {
            table_id: "t1".to_string(),
            method: PaymentMethod::Cash,
            discount_pct: 0.0,
            leftover_penalty: 0.0,
        },
    ));

    // Drain published updates into the tab replica
    while let Ok(update) = updates.try_recv() {
        tab.apply(&update);
    }
    println!(
        "tab replica floor revision: {:?}",
        tab.revision("floor").unwrap_or(0)
    );

    // Reports
    let sales = sales_summary(&manager.closed_transactions());
    println!(
        "sales: {} transactions, {} covers, gross {:.2}",
        sales.transactions, sales.covers, sales.gross
    );
    for meat in yield_report(&converter.records()) {
        println!(
            "yield {}: {:.1}kg raw → {:.0}g service ({:.0}%)",
            meat.meat_id,
            meat.raw_kg,
            meat.sliced_g,
            meat.avg_yield_pct * 100.0
        );
    }
    println!("audit transactions: {}", audit.grouped().len());

    Ok(())
}
