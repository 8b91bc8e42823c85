//! Purchase cost model — pure functions, fully testable.
//!
//! Costs grow by ×1.5 per unit owned, floored to a whole number after each
//! step. `cost_for` is defined as `count` applications of [`next_cost`]
//! rather than the closed form `floor(base * 1.5^count)`: the two disagree
//! once an intermediate floor drops a fraction (e.g. drone cost at count 3
//! is 49, not 50), and the step function is what the save formats that track
//! cost directly have always produced.

use crate::state::Building;

/// Cost growth factor per unit owned.
pub const GROWTH: f64 = 1.5;

/// Price of the next unit after buying one at `current_cost`.
pub fn next_cost(current_cost: f64) -> f64 {
    (current_cost * GROWTH).floor()
}

/// Price of the next unit when `count` units are owned.
pub fn cost_for(building: &Building, count: u32) -> f64 {
    (0..count).fold(building.base_cost(), |cost, _| next_cost(cost))
}
