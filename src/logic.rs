//! Progression ledger operations — free functions over `&mut Ledger`.
//!
//! All mutation goes through these; callers never assign ledger fields
//! directly. Each operation runs start-to-finish on one execution context
//! with no suspension point, so `buy`'s check-then-deduct is atomic and a
//! stale-balance double spend cannot occur.

use crate::pricing;
use crate::state::{Building, Ledger};

/// Purchase failure. Recovered locally; the session facade surfaces it as a
/// silent no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuyError {
    /// Balance is below the building's current cost. No mutation occurred.
    InsufficientFunds,
}

/// Result of a successful purchase, for host-side feedback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Purchase {
    /// Minerals deducted (the pre-purchase cost).
    pub spent: f64,
    /// Units owned after the purchase.
    pub new_count: u32,
    /// Price of the unit after this one.
    pub next_cost: f64,
}

/// Result of one tap, for host-side feedback ("+1" floaters etc.).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tap {
    /// Minerals earned, after the critical multiplier and truncation.
    pub earned: f64,
    pub critical: bool,
}

/// Manual mining tap. Adds the configured tap amount to the balance,
/// optionally multiplied by the critical bonus. The earned amount is
/// truncated to a whole number after the multiplier is applied.
pub fn tap(ledger: &mut Ledger) -> Tap {
    let config = ledger.tap_config;
    let critical = config.crit_chance > 0.0 && {
        // 1/10000 resolution is plenty for a tuning knob expressed in percent.
        let roll = (ledger.next_random() % 10_000) as f64 / 10_000.0;
        roll < config.crit_chance
    };
    let multiplier = if critical { config.crit_multiplier } else { 1.0 };
    let earned = (config.base_amount * multiplier).trunc();
    ledger.minerals += earned;
    ledger.debug_check();
    Tap { earned, critical }
}

/// Passive accrual for `elapsed_seconds` of real time. Used both for the
/// per-second host tick and, once at session start, for the offline
/// catch-up lump sum. Returns the income added (not truncated; fractional
/// minerals accumulate and only display truncates).
pub fn tick(ledger: &mut Ledger, elapsed_seconds: f64) -> f64 {
    let income = ledger.total_income_per_second() * elapsed_seconds;
    ledger.minerals += income;
    ledger.debug_check();
    income
}

/// Buy one unit of `building`. Deducts the current cost, increments the
/// owned count, and steps the cost to the next price.
pub fn buy(ledger: &mut Ledger, building: &Building) -> Result<Purchase, BuyError> {
    let idx = ledger
        .buildings
        .iter()
        .position(|b| b.building == *building)
        .expect("catalog building always present in ledger");
    let cost = ledger.buildings[idx].cost;
    if ledger.minerals < cost {
        return Err(BuyError::InsufficientFunds);
    }
    ledger.minerals -= cost;
    let state = &mut ledger.buildings[idx];
    state.count += 1;
    state.cost = pricing::next_cost(state.cost);
    let purchase = Purchase {
        spent: cost,
        new_count: state.count,
        next_cost: state.cost,
    };
    ledger.debug_check();
    Ok(purchase)
}
