//! Cosmic Mining — progression & persistence core.
//!
//! The engine behind an incremental mining game: a tap-to-earn mineral
//! balance, a catalog of buildings that generate passive income, tick-based
//! accrual with a one-shot offline catch-up, and a versioned save codec
//! that migrates forward from six historical record formats.
//!
//! Rendering, input, animation, and layout live in the host; the host also
//! injects the wall clock (millisecond timestamps passed into the APIs) and
//! the durable store ([`store::KeyValueStore`]). A typical host loop:
//!
//! ```
//! use cosmic_mining_core::session::MiningSession;
//! use cosmic_mining_core::store::MemoryStore;
//!
//! let start = MiningSession::start(MemoryStore::new(), 0);
//! let mut session = start.session;
//! // render start.offline / start.was_legacy_import if applicable...
//!
//! session.tap();                       // on pointer down
//! session.buy("mining_drone");         // on shop click, then save
//! session.tick_one_second();           // every second
//! session.save(1_000);                 // every 10 s and on purchase
//! # assert!(session.current_balance() >= 0.0);
//! ```

pub mod format;
pub mod logic;
pub mod offline;
pub mod pricing;
pub mod save;
pub mod session;
pub mod state;
pub mod store;

pub use format::format_for_display;
pub use logic::{BuyError, Purchase, Tap};
pub use offline::OfflineReport;
pub use save::{LoadOutcome, AUTOSAVE_INTERVAL_SECS};
pub use session::{MiningSession, SessionStart};
pub use state::{Building, BuildingState, Ledger, TapConfig};
pub use store::{KeyValueStore, MemoryStore, StoreError};
