//! Money arithmetic using rust_decimal for precision.
//!
//! Prices live as `f64` in the serialized types; every computation routes
//! through `Decimal` and rounds to 2 decimal places half-up before going
//! back to `f64`.

use rust_decimal::prelude::*;
use shared::session::Session;

use super::traits::SessionError;

/// Rounding: 2 decimal places, half-up
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per line (₱1,000,000)
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i32 = 9999;
/// Maximum weight per meat order (50kg in grams)
const MAX_WEIGHT_G: f64 = 50_000.0;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or_default()
}

pub fn round_money(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

#[inline]
fn require_finite(value: f64, field: &str) -> Result<(), SessionError> {
    if !value.is_finite() {
        return Err(SessionError::InvalidOperation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), SessionError> {
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(SessionError::InvalidOperation(format!(
            "price must be non-negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(SessionError::InvalidOperation(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), SessionError> {
    if quantity <= 0 {
        return Err(SessionError::InvalidOperation(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(SessionError::InvalidOperation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

pub fn validate_weight(grams: f64) -> Result<(), SessionError> {
    require_finite(grams, "grams")?;
    if grams <= 0.0 {
        return Err(SessionError::InvalidOperation(format!(
            "weight must be positive, got {grams}"
        )));
    }
    if grams > MAX_WEIGHT_G {
        return Err(SessionError::InvalidOperation(format!(
            "weight exceeds maximum allowed ({MAX_WEIGHT_G}g), got {grams}"
        )));
    }
    Ok(())
}

pub fn validate_pct(pct: f64, field: &str) -> Result<(), SessionError> {
    require_finite(pct, field)?;
    if !(0.0..=100.0).contains(&pct) {
        return Err(SessionError::InvalidOperation(format!(
            "{field} must be between 0 and 100, got {pct}"
        )));
    }
    Ok(())
}

/// Estimated cost of a weight-based meat line.
pub fn meat_cost(grams: f64, cost_per_100g: f64) -> f64 {
    round_money(to_decimal(grams) / Decimal::from(100) * to_decimal(cost_per_100g))
}

/// Recompute a session's billable subtotal from its non-voided lines.
pub fn recalculate(session: &mut Session) {
    let subtotal: Decimal = session
        .lines
        .iter()
        .filter(|l| !l.voided)
        .map(|l| to_decimal(l.unit_price) * Decimal::from(l.quantity))
        .sum();
    session.subtotal = round_money(subtotal);
}

/// Final bill at close: subtotal − discount% + leftover penalty, floored
/// at zero.
pub fn settle(subtotal: f64, discount_pct: f64, leftover_penalty: f64) -> (f64, f64) {
    let subtotal_d = to_decimal(subtotal);
    let discount = subtotal_d * to_decimal(discount_pct) / Decimal::from(100);
    let total = (subtotal_d - discount + to_decimal(leftover_penalty)).max(Decimal::ZERO);
    (round_money(discount), round_money(total))
}
