//! Shared fixtures for session tests: a small floor, the grill catalog the
//! worked examples use, and metadata builders.

use shared::catalog::{
    Catalog, IngredientSource, MeatCatalogEntry, PackageDef, PackageSide, RecipeDef,
    RecipeIngredient,
};
use shared::session::{FloorPlan, Session, Table, TableState};
use shared::types::{Actor, Unit};

use crate::config::EngineConfig;

use super::traits::CommandMetadata;

pub(crate) fn test_floor() -> FloorPlan {
    FloorPlan::new(vec![
        Table::new("t1", "T1", 4),
        Table::new("t2", "T2", 2),
        Table::new("t3", "T3", 6),
    ])
}

pub(crate) fn test_catalog() -> Catalog {
    let side = |item_id: &str, name: &str| PackageSide {
        item_id: item_id.to_string(),
        name: name.to_string(),
        qty_per_pax: 1,
        unit: Unit::Pieces,
    };

    Catalog::new(
        vec![
            PackageDef {
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
            },
            PackageDef {
                package_id: "unli_premium".to_string(),
                name: "Unli Premium".to_string(),
                price_per_pax: 499.0,
                eligible_meats: vec!["pork_samgyup".to_string(), "beef_chadol".to_string()],
                sides: vec![
                    side("rice", "Rice"),
                    side("lettuce", "Lettuce"),
                    side("kimchi", "Kimchi"),
                ],
            },
        ],
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
                    label: "Gochujang".to_string(),
                    qty: 30.0,
                    unit: Unit::Grams,
                    source: IngredientSource::Pantry,
                    inventory_item_id: Some("pantry_gochujang".to_string()),
                },
                RecipeIngredient {
                    label: "Pork trimmings".to_string(),
                    qty: 50.0,
                    unit: Unit::Grams,
                    source: IngredientSource::MeatScrap,
                    inventory_item_id: Some("pork_samgyup_scrap".to_string()),
                },
                RecipeIngredient {
                    label: "Water".to_string(),
                    qty: 200.0,
                    unit: Unit::Milliliters,
                    source: IngredientSource::Free,
                    inventory_item_id: None,
                },
            ],
        }],
        vec![
            MeatCatalogEntry {
                meat_id: "pork_samgyup".to_string(),
                name: "Samgyupsal".to_string(),
                raw_pool: "pork_samgyup_raw".to_string(),
                service_pool: "pork_samgyup_sliced".to_string(),
                kitchen_pools: vec!["pork_samgyup_scrap".to_string()],
                waste_pool: Some("pork_samgyup_waste".to_string()),
                cost_per_100g: 38.0,
            },
            MeatCatalogEntry {
                meat_id: "beef_chadol".to_string(),
                name: "Chadolbaegi".to_string(),
                raw_pool: "beef_chadol_raw".to_string(),
                service_pool: "beef_chadol_sliced".to_string(),
                kitchen_pools: vec![],
                waste_pool: Some("beef_chadol_waste".to_string()),
                cost_per_100g: 72.0,
            },
        ],
    )
}

pub(crate) fn test_config() -> EngineConfig {
    EngineConfig::default()
}

pub(crate) fn metadata() -> CommandMetadata {
    CommandMetadata {
        command_id: "cmd-1".to_string(),
        operator: Actor::staff("Ana"),
        timestamp: 1_234_567_890,
        authorized_by: None,
    }
}

pub(crate) fn metadata_authorized(approver: &str) -> CommandMetadata {
    CommandMetadata {
        authorized_by: Some(approver.to_string()),
        ..metadata()
    }
}

/// Seat a session directly, bypassing the open action.
pub(crate) fn seat(floor: &mut FloorPlan, table_id: &str, session_id: &str, persons: i32) {
    let table = floor.table_mut(table_id).expect("fixture table");
    table.state = TableState::Occupied {
        session: Session::new(session_id.to_string(), persons, 1_000),
    };
}
