//! Read-only reference catalogs.
//!
//! The engine never mutates these; they are loaded at startup from whatever
//! the host persists them in and handed to the session manager as `Arc`s.
//! Lookup misses surface as typed errors at the command layer, not here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::Unit;

/// Where a recipe ingredient is drawn from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngredientSource {
    /// Kitchen by-product pool of a meat (trimmings, bones)
    MeatScrap,
    /// Side-dish stock
    Side,
    /// Dry/pantry goods
    Pantry,
    /// Not tracked (water, labor); no deduction
    Free,
}

/// One ingredient of a recipe-based dish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub label: String,
    /// Quantity consumed per dish ordered
    pub qty: f64,
    pub unit: Unit,
    pub source: IngredientSource,
    /// Ledger item the deduction hits. `None` only for `Free` ingredients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_item_id: Option<String>,
}

/// Recipe for a paid dish: the ingredient deductions one order triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDef {
    pub dish_id: String,
    pub ingredients: Vec<RecipeIngredient>,
}

/// A side auto-included with a package, at a fixed per-pax quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSide {
    pub item_id: String,
    pub name: String,
    pub qty_per_pax: i32,
    pub unit: Unit,
}

/// An unlimited-grill package: per-pax price, the meats it covers and the
/// sides it auto-generates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDef {
    pub package_id: String,
    pub name: String,
    pub price_per_pax: f64,
    pub eligible_meats: Vec<String>,
    pub sides: Vec<PackageSide>,
}

/// A meat type decomposed into its inventory pools.
///
/// Exactly one raw and one service pool; zero or more kitchen by-product
/// pools; at most one waste pool. Each pool id is a ledger item id — the
/// ledger is the single store, keyed by pool id, and any "total stock for
/// this meat" view is derived by summing `pools()` at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeatCatalogEntry {
    pub meat_id: String,
    pub name: String,
    pub raw_pool: String,
    pub service_pool: String,
    #[serde(default)]
    pub kitchen_pools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_pool: Option<String>,
    /// Estimated cost basis for free/included meat orders
    pub cost_per_100g: f64,
}

impl MeatCatalogEntry {
    /// All pool ids of this meat, for rollup views.
    pub fn pools(&self) -> Vec<&str> {
        let mut out = vec![self.raw_pool.as_str(), self.service_pool.as_str()];
        out.extend(self.kitchen_pools.iter().map(String::as_str));
        if let Some(w) = &self.waste_pool {
            out.push(w.as_str());
        }
        out
    }
}

/// The three read-only catalogs bundled for the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    packages: HashMap<String, PackageDef>,
    recipes: HashMap<String, RecipeDef>,
    meats: HashMap<String, MeatCatalogEntry>,
}

impl Catalog {
    pub fn new(
        packages: Vec<PackageDef>,
        recipes: Vec<RecipeDef>,
        meats: Vec<MeatCatalogEntry>,
    ) -> Self {
        Self {
            packages: packages
                .into_iter()
                .map(|p| (p.package_id.clone(), p))
                .collect(),
            recipes: recipes.into_iter().map(|r| (r.dish_id.clone(), r)).collect(),
            meats: meats.into_iter().map(|m| (m.meat_id.clone(), m)).collect(),
        }
    }

    pub fn package(&self, package_id: &str) -> Option<&PackageDef> {
        self.packages.get(package_id)
    }

    /// Recipe for a dish, if one is defined. Dishes without recipes deduct
    /// nothing.
    pub fn recipe(&self, dish_id: &str) -> Option<&RecipeDef> {
        self.recipes.get(dish_id)
    }

    pub fn meat(&self, meat_id: &str) -> Option<&MeatCatalogEntry> {
        self.meats.get(meat_id)
    }

    pub fn meats(&self) -> impl Iterator<Item = &MeatCatalogEntry> {
        self.meats.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meat_pools_enumeration() {
        let entry = MeatCatalogEntry {
            meat_id: "pork_belly".to_string(),
            name: "Pork Belly".to_string(),
            raw_pool: "pork_belly_raw".to_string(),
            service_pool: "pork_belly_sliced".to_string(),
            kitchen_pools: vec!["pork_belly_scrap".to_string()],
            waste_pool: Some("pork_belly_waste".to_string()),
            cost_per_100g: 38.0,
        };
        let pools = entry.pools();
        assert_eq!(
            pools,
            vec![
                "pork_belly_raw",
                "pork_belly_sliced",
                "pork_belly_scrap",
                "pork_belly_waste"
            ]
        );
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(
            vec![PackageDef {
                package_id: "unli_pork".to_string(),
                name: "Unli Pork".to_string(),
                price_per_pax: 349.0,
                eligible_meats: vec!["pork_belly".to_string()],
                sides: vec![],
            }],
            vec![],
            vec![],
        );
        assert!(catalog.package("unli_pork").is_some());
        assert!(catalog.package("unli_beef").is_none());
        assert!(catalog.recipe("tteokbokki").is_none());
    }
}
