//! Cosmic Mining game state definitions.

/// Kinds of purchasable buildings (passive income generators).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Building {
    MiningDrone,
    RoverUnit,
    SpaceStation,
    MoonBase,
    DysonSphere,
}

impl Building {
    /// All buildings in catalog (and display) order.
    ///
    /// The order is load-bearing: legacy saves address buildings by array
    /// position, current saves by `id()`.
    pub fn all() -> &'static [Building] {
        &[
            Building::MiningDrone,
            Building::RoverUnit,
            Building::SpaceStation,
            Building::MoonBase,
            Building::DysonSphere,
        ]
    }

    /// Stable string identity, unique within the catalog.
    /// Used as the join key when restoring id-addressed saves.
    pub fn id(&self) -> &'static str {
        match self {
            Building::MiningDrone => "mining_drone",
            Building::RoverUnit => "rover_unit",
            Building::SpaceStation => "space_station",
            Building::MoonBase => "moon_base",
            Building::DysonSphere => "dyson_sphere",
        }
    }

    /// Look up a building by its stable id.
    pub fn from_id(id: &str) -> Option<Building> {
        Building::all().iter().find(|b| b.id() == id).cloned()
    }

    /// Look up a building by catalog position (legacy save addressing).
    pub fn at(index: usize) -> Option<Building> {
        Building::all().get(index).cloned()
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Building::MiningDrone => "Mining Drone",
            Building::RoverUnit => "Rover Unit",
            Building::SpaceStation => "Space Station",
            Building::MoonBase => "Moon Base",
            Building::DysonSphere => "Dyson Sphere",
        }
    }

    /// Cost of the first unit.
    pub fn base_cost(&self) -> f64 {
        match self {
            Building::MiningDrone => 15.0,
            Building::RoverUnit => 100.0,
            Building::SpaceStation => 1_100.0,
            Building::MoonBase => 12_000.0,
            Building::DysonSphere => 100_000.0,
        }
    }

    /// Minerals per second per unit owned.
    pub fn base_income(&self) -> f64 {
        match self {
            Building::MiningDrone => 1.0,
            Building::RoverUnit => 5.0,
            Building::SpaceStation => 32.0,
            Building::MoonBase => 150.0,
            Building::DysonSphere => 1_000.0,
        }
    }

    /// Accent color for shop buttons (0xRRGGBB). Presentation only.
    pub fn accent_color(&self) -> u32 {
        match self {
            Building::MiningDrone => 0x00ff00,
            Building::RoverUnit => 0x00ccff,
            Building::SpaceStation => 0xffaa00,
            Building::MoonBase => 0xff4444,
            Building::DysonSphere => 0xaa00ff,
        }
    }

    /// Shop icon glyph. Presentation only.
    pub fn icon(&self) -> &str {
        match self {
            Building::MiningDrone => "▲",
            Building::RoverUnit => "◆",
            Building::SpaceStation => "◈",
            Building::MoonBase => "●",
            Building::DysonSphere => "✦",
        }
    }
}

/// Owned state for a single building type.
#[derive(Clone, Debug)]
pub struct BuildingState {
    pub building: Building,
    /// Units owned. Never decreases within a session.
    pub count: u32,
    /// Price of the *next* unit. Tracked directly (not recomputed from
    /// `count` each time) because the historical save formats record it;
    /// outside of a purchase it always equals
    /// `pricing::cost_for(&self.building, self.count)`.
    pub cost: f64,
}

impl BuildingState {
    pub fn new(building: Building) -> Self {
        let cost = building.base_cost();
        Self {
            building,
            count: 0,
            cost,
        }
    }

    /// Minerals per second from this building type.
    pub fn income_per_second(&self) -> f64 {
        self.count as f64 * self.building.base_income()
    }
}

/// Critical-tap configuration. Off by default; the reference tuning is a
/// 5% chance of a ×10 tap.
#[derive(Clone, Copy, Debug)]
pub struct TapConfig {
    /// Minerals earned by one ordinary tap.
    pub base_amount: f64,
    /// Probability of a critical tap in [0, 1].
    pub crit_chance: f64,
    /// Multiplier applied to the tap amount on a critical.
    pub crit_multiplier: f64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            base_amount: 1.0,
            crit_chance: 0.0,
            crit_multiplier: 10.0,
        }
    }
}

impl TapConfig {
    /// Reference tuning from the later game revisions: 5% chance of ×10.
    pub fn with_criticals() -> Self {
        Self {
            crit_chance: 0.05,
            ..Self::default()
        }
    }
}

/// The mutable progression core for one game session.
///
/// Constructed fresh (all zero) or restored by the save codec; mutated only
/// through the operations in [`crate::logic`].
pub struct Ledger {
    /// Current mineral balance. Fractional amounts are allowed to
    /// accumulate; only display truncates.
    pub minerals: f64,
    /// Per-building state, in catalog order.
    pub buildings: Vec<BuildingState>,
    /// Timestamp (ms) of the last successful save. Read only by the
    /// offline catch-up calculation.
    pub last_save_time: i64,
    /// Critical-tap tuning.
    pub tap_config: TapConfig,
    /// Simple RNG state for the critical-tap roll.
    pub rng_state: u32,
}

impl Ledger {
    /// Fresh ledger: zero balance, zero counts, base costs.
    pub fn new(now_ms: i64) -> Self {
        let buildings = Building::all()
            .iter()
            .map(|b| BuildingState::new(b.clone()))
            .collect();
        Self {
            minerals: 0.0,
            buildings,
            last_save_time: now_ms,
            tap_config: TapConfig::default(),
            rng_state: 42,
        }
    }

    /// Total passive income in minerals per second.
    pub fn total_income_per_second(&self) -> f64 {
        self.buildings.iter().map(|b| b.income_per_second()).sum()
    }

    /// State for a building, addressed by stable id.
    pub fn building_by_id(&self, id: &str) -> Option<&BuildingState> {
        self.buildings.iter().find(|b| b.building.id() == id)
    }

    pub(crate) fn building_by_id_mut(&mut self, id: &str) -> Option<&mut BuildingState> {
        self.buildings.iter_mut().find(|b| b.building.id() == id)
    }

    /// xorshift32. Deterministic given `rng_state`, which makes critical-tap
    /// sequences reproducible in tests.
    pub(crate) fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    /// Operation postconditions. Balance never goes negative and every
    /// tracked cost stays positive.
    pub(crate) fn debug_check(&self) {
        debug_assert!(self.minerals >= 0.0, "negative balance: {}", self.minerals);
        debug_assert!(self.buildings.iter().all(|b| b.cost > 0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_unique() {
        let mut ids: Vec<&str> = Building::all().iter().map(|b| b.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), Building::all().len());
    }

    #[test]
    fn from_id_roundtrip() {
        for b in Building::all() {
            assert_eq!(Building::from_id(b.id()).as_ref(), Some(b));
        }
        assert_eq!(Building::from_id("warp_gate"), None);
    }

    #[test]
    fn at_matches_catalog_order() {
        assert_eq!(Building::at(0), Some(Building::MiningDrone));
        assert_eq!(Building::at(4), Some(Building::DysonSphere));
        assert_eq!(Building::at(5), None);
    }

    #[test]
    fn fresh_ledger_is_zeroed() {
        let ledger = Ledger::new(0);
        assert_eq!(ledger.minerals, 0.0);
        assert_eq!(ledger.buildings.len(), Building::all().len());
        for b in &ledger.buildings {
            assert_eq!(b.count, 0);
            assert_eq!(b.cost, b.building.base_cost());
        }
    }

    #[test]
    fn income_sums_over_buildings() {
        let mut ledger = Ledger::new(0);
        ledger.buildings[0].count = 10; // 10 drones = 10/s
        ledger.buildings[1].count = 3; // 3 rovers = 15/s
        assert!((ledger.total_income_per_second() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn income_zero_with_no_buildings() {
        let ledger = Ledger::new(0);
        assert_eq!(ledger.total_income_per_second(), 0.0);
    }

    #[test]
    fn building_by_id_finds_state() {
        let ledger = Ledger::new(0);
        let drone = ledger.building_by_id("mining_drone").unwrap();
        assert_eq!(drone.building, Building::MiningDrone);
        assert!(ledger.building_by_id("nonexistent").is_none());
    }

    #[test]
    fn next_random_is_deterministic() {
        let mut a = Ledger::new(0);
        let mut b = Ledger::new(0);
        for _ in 0..10 {
            assert_eq!(a.next_random(), b.next_random());
        }
    }
}
