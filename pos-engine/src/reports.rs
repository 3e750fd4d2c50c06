//! Read models for reporting: sales over closed transactions and yield
//! over conversion records. Pure aggregation; nothing here mutates state.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::session::ClosedTransaction;

use crate::inventory::YieldRecord;
use crate::sessions::money::{round_money, to_decimal};

/// Totals over a set of closed transactions.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SalesSummary {
    pub transactions: usize,
    /// Total covers served
    pub covers: i32,
    pub gross: f64,
    pub discounts: f64,
    pub penalties: f64,
    /// Gross per payment method
    pub by_method: BTreeMap<String, f64>,
}

pub fn sales_summary(closed: &[ClosedTransaction]) -> SalesSummary {
    let mut covers = 0;
    let mut gross = Decimal::ZERO;
    let mut discounts = Decimal::ZERO;
    let mut penalties = Decimal::ZERO;
    let mut by_method: BTreeMap<String, Decimal> = BTreeMap::new();

    for tx in closed {
        covers += tx.persons;
        gross += to_decimal(tx.total);
        discounts += to_decimal(tx.discount_amount);
        penalties += to_decimal(tx.leftover_penalty);
        *by_method.entry(tx.method.to_string()).or_default() += to_decimal(tx.total);
    }

    SalesSummary {
        transactions: closed.len(),
        covers,
        gross: round_money(gross),
        discounts: round_money(discounts),
        penalties: round_money(penalties),
        by_method: by_method
            .into_iter()
            .map(|(k, v)| (k, round_money(v)))
            .collect(),
    }
}

/// Per-meat aggregation of conversion outcomes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeatYieldSummary {
    pub meat_id: String,
    pub deliveries: usize,
    pub raw_kg: f64,
    pub sliced_g: f64,
    pub waste_g: f64,
    /// Mass-weighted average yield: total sliced / total raw
    pub avg_yield_pct: f64,
}

pub fn yield_report(records: &[YieldRecord]) -> Vec<MeatYieldSummary> {
    let mut by_meat: BTreeMap<&str, Vec<&YieldRecord>> = BTreeMap::new();
    for r in records {
        by_meat.entry(r.meat_id.as_str()).or_default().push(r);
    }

    by_meat
        .into_iter()
        .map(|(meat_id, records)| {
            let raw_kg: f64 = records.iter().map(|r| r.raw_kg).sum();
            let sliced_g: f64 = records.iter().map(|r| r.sliced_g).sum();
            let waste_g: f64 = records.iter().map(|r| r.waste_g).sum();
            let raw_g = raw_kg * 1000.0;
            MeatYieldSummary {
                meat_id: meat_id.to_string(),
                deliveries: records.len(),
                raw_kg,
                sliced_g,
                waste_g,
                avg_yield_pct: if raw_g > 0.0 { sliced_g / raw_g } else { 0.0 },
            }
        })
        .collect()
}
