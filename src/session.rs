//! Host-facing session facade.
//!
//! The rendering/input layer drives the game exclusively through this
//! narrow surface: tap, buy, one-second tick, two queries, save. Schema
//! revisions stay inside [`crate::save`]; a host never sees a partially
//! initialized ledger.

use crate::logic::{self, BuyError, Purchase, Tap};
use crate::offline::{self, OfflineReport};
use crate::save::{self, LoadOutcome};
use crate::state::{Building, Ledger, TapConfig};
use crate::store::KeyValueStore;

pub struct MiningSession<S: KeyValueStore> {
    ledger: Ledger,
    store: S,
}

/// Everything a host needs to open a session: the session itself, the
/// offline catch-up to report, and whether a lossy legacy import happened
/// (worth a "building progress could not be carried over" notice).
pub struct SessionStart<S: KeyValueStore> {
    pub session: MiningSession<S>,
    pub offline: OfflineReport,
    pub was_legacy_import: bool,
}

impl<S: KeyValueStore> MiningSession<S> {
    /// Open a session: load the most recent readable save (or a fresh
    /// ledger), then apply the offline catch-up exactly once.
    pub fn start(store: S, now_ms: i64) -> SessionStart<S> {
        Self::start_with_config(store, now_ms, TapConfig::default())
    }

    pub fn start_with_config(store: S, now_ms: i64, tap_config: TapConfig) -> SessionStart<S> {
        let LoadOutcome {
            mut ledger,
            was_legacy_import,
        } = save::load(&store, now_ms);
        ledger.tap_config = tap_config;
        let offline = offline::apply_offline_earnings(&mut ledger, now_ms);
        SessionStart {
            session: MiningSession { ledger, store },
            offline,
            was_legacy_import,
        }
    }

    /// Manual mining tap. Returns the earn for feedback rendering.
    pub fn tap(&mut self) -> Tap {
        logic::tap(&mut self.ledger)
    }

    /// One second of passive income. Returns the income for feedback.
    pub fn tick_one_second(&mut self) -> f64 {
        logic::tick(&mut self.ledger, 1.0)
    }

    /// Buy one unit of the building with this id. Unknown ids and
    /// insufficient funds are silent no-ops (reference behavior); the
    /// purchase details are returned when it went through so the host can
    /// render feedback and schedule a save.
    pub fn buy(&mut self, id: &str) -> Option<Purchase> {
        let building = Building::from_id(id)?;
        match logic::buy(&mut self.ledger, &building) {
            Ok(purchase) => Some(purchase),
            Err(BuyError::InsufficientFunds) => None,
        }
    }

    pub fn current_balance(&self) -> f64 {
        self.ledger.minerals
    }

    pub fn current_income_per_second(&self) -> f64 {
        self.ledger.total_income_per_second()
    }

    /// Persist under the current schema key. Best-effort; returns whether
    /// the write succeeded.
    pub fn save(&mut self, now_ms: i64) -> bool {
        save::save(&mut self.ledger, &mut self.store, now_ms)
    }

    /// Read access for shop rendering and tests.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn fresh_session_starts_at_zero() {
        let start = MiningSession::start(MemoryStore::new(), 0);
        assert_eq!(start.session.current_balance(), 0.0);
        assert_eq!(start.session.current_income_per_second(), 0.0);
        assert_eq!(start.offline.earned, 0.0);
        assert!(!start.was_legacy_import);
    }

    #[test]
    fn tap_buy_tick_flow() {
        let mut session = MiningSession::start(MemoryStore::new(), 0).session;

        // Not affordable: silent no-op.
        assert!(session.buy("mining_drone").is_none());

        for _ in 0..15 {
            session.tap();
        }
        let purchase = session.buy("mining_drone").expect("15 covers the drone");
        assert_eq!(purchase.spent, 15.0);
        assert_eq!(session.current_balance(), 0.0);
        assert_eq!(session.current_income_per_second(), 1.0);

        let income = session.tick_one_second();
        assert_eq!(income, 1.0);
        assert_eq!(session.current_balance(), 1.0);
    }

    #[test]
    fn unknown_building_id_is_silent_noop() {
        let mut session = MiningSession::start(MemoryStore::new(), 0).session;
        session.ledger.minerals = 1e9;
        assert!(session.buy("warp_gate").is_none());
        assert_eq!(session.current_balance(), 1e9);
    }

    #[test]
    fn save_and_reopen_preserves_progress() {
        let mut store = MemoryStore::new();
        {
            let mut session = MiningSession::start(&mut store, 0).session;
            session.ledger.minerals = 200.0;
            session.buy("rover_unit");
            assert!(session.save(1_000));
        }
        let start = MiningSession::start(&mut store, 2_000);
        assert_eq!(start.session.current_balance(), 100.0);
        assert_eq!(start.session.current_income_per_second(), 5.0);
        assert!(!start.was_legacy_import);
        // 2 seconds gap is under the offline threshold.
        assert_eq!(start.offline.earned, 0.0);
    }

    #[test]
    fn offline_catchup_applied_once_at_start() {
        let mut store = MemoryStore::new();
        {
            let mut session = MiningSession::start(&mut store, 0).session;
            session.ledger.minerals = 200.0;
            session.buy("rover_unit"); // 5/s
            session.save(1_000);
        }
        // Reopen one minute later: 59 seconds offline at 5/s.
        let start = MiningSession::start(&mut store, 60_000);
        assert!((start.offline.earned - 295.0).abs() < 1e-9);
        assert!((start.session.current_balance() - (100.0 + 295.0)).abs() < 1e-9);
    }
}
