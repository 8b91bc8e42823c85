//! Offline catch-up accrual.
//!
//! Computed as one multiplication rather than replaying per-second ticks:
//! O(1) for arbitrarily long absences, and exactly what continuous ticking
//! would have produced since buildings cannot be bought while the process
//! is not running.

use crate::logic;
use crate::state::Ledger;

/// Gaps at or below this many seconds are treated as "online" (a quick tab
/// switch should not trigger an offline-earnings report on every reload).
pub const OFFLINE_THRESHOLD_SECS: f64 = 10.0;

/// Lump-sum income for the time between `last_save_ms` and `now_ms`.
/// Zero at or below the threshold. The result is deliberately not truncated
/// to a whole number; only display truncates.
pub fn offline_earnings(last_save_ms: i64, now_ms: i64, income_per_second: f64) -> f64 {
    let elapsed = (now_ms - last_save_ms) as f64 / 1000.0;
    if elapsed <= OFFLINE_THRESHOLD_SECS {
        return 0.0;
    }
    income_per_second * elapsed
}

/// One-shot offline report for the host to render at session start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OfflineReport {
    pub elapsed_seconds: f64,
    pub earned: f64,
}

/// Apply the offline catch-up to a freshly loaded ledger. Call exactly once
/// per session, before the first regular tick.
pub fn apply_offline_earnings(ledger: &mut Ledger, now_ms: i64) -> OfflineReport {
    let elapsed_seconds = (now_ms - ledger.last_save_time) as f64 / 1000.0;
    let earned = offline_earnings(
        ledger.last_save_time,
        now_ms,
        ledger.total_income_per_second(),
    );
    if earned > 0.0 {
        // tick() with the full gap adds exactly income * elapsed.
        logic::tick(ledger, elapsed_seconds);
    }
    OfflineReport {
        elapsed_seconds,
        earned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_at_threshold() {
        assert_eq!(offline_earnings(0, 10_000, 5.0), 0.0);
    }

    #[test]
    fn zero_below_threshold() {
        assert_eq!(offline_earnings(0, 3_000, 5.0), 0.0);
    }

    #[test]
    fn exact_product_above_threshold() {
        // 11 seconds at 5/s
        assert_eq!(offline_earnings(0, 11_000, 5.0), 55.0);
    }

    #[test]
    fn fractional_earnings_not_truncated() {
        // 10.5 seconds at 3/s = 31.5
        let earned = offline_earnings(0, 10_500, 3.0);
        assert!((earned - 31.5).abs() < 1e-9);
    }

    #[test]
    fn clock_running_backwards_earns_nothing() {
        assert_eq!(offline_earnings(20_000, 5_000, 5.0), 0.0);
    }

    #[test]
    fn long_absence_is_one_multiplication() {
        // A year offline at 1000/s.
        let year_ms = 365 * 24 * 3600 * 1000i64;
        let earned = offline_earnings(0, year_ms, 1000.0);
        assert_eq!(earned, 1000.0 * (year_ms as f64 / 1000.0));
    }

    #[test]
    fn apply_adds_to_balance_once() {
        let mut ledger = Ledger::new(0);
        ledger.buildings[0].count = 2; // 2/s
        ledger.last_save_time = 0;
        let report = apply_offline_earnings(&mut ledger, 60_000);
        assert!((report.earned - 120.0).abs() < 1e-9);
        assert!((report.elapsed_seconds - 60.0).abs() < 1e-9);
        assert!((ledger.minerals - 120.0).abs() < 1e-9);
    }

    #[test]
    fn apply_below_threshold_leaves_balance() {
        let mut ledger = Ledger::new(0);
        ledger.buildings[0].count = 2;
        ledger.last_save_time = 0;
        let report = apply_offline_earnings(&mut ledger, 4_000);
        assert_eq!(report.earned, 0.0);
        assert_eq!(ledger.minerals, 0.0);
    }

    #[test]
    fn apply_with_no_income_reports_zero() {
        let mut ledger = Ledger::new(0);
        ledger.last_save_time = 0;
        let report = apply_offline_earnings(&mut ledger, 100_000);
        assert_eq!(report.earned, 0.0);
        assert_eq!(ledger.minerals, 0.0);
    }
}
