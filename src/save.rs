//! Cosmic Mining セーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - 保存は常に最新形式 (`cosmic_mining_v6`) のキーにのみ書き込む。
//!   旧キーには二度と書き込まない。
//! - ロードは [`Schema::all()`] を新しい順に走査し、最初に読めたレコードを
//!   ゼロ状態の Ledger にマージする。旧形式が記録していないフィールドは
//!   新規 Ledger 側のデフォルト値で補完される。
//! - パース失敗や負値などの壊れたレコードは「キーが無かった」ものとして
//!   扱い、さらに古い形式へフォールバックする。永続化の破損が起動を
//!   妨げることは無い（最悪ケースは進捗ゼロの新規 Ledger）。
//!
//! ## 形式の歴史
//!
//! - `cosmic_save` — 最初期。建物は Mining Drone 一種のみ
//!   (`droneCount` / `droneCost`)。カタログ先頭へ位置対応で引き継ぐ。
//! - `cosmic_mining_v2` — 複数建物を配列位置で記録。id が無いため現行
//!   モデルへは残高のみ引き継ぎ（構造化データは失われる）。
//! - `cosmic_mining_v3` 〜 `v6` — 建物を安定 id で記録。形状互換で、
//!   キーのみ異なる。

use serde::{Deserialize, Serialize};

use crate::state::{Building, Ledger};
use crate::store::KeyValueStore;

/// 現行形式のストレージキー。
pub const CURRENT_KEY: &str = "cosmic_mining_v6";

/// Autosave cadence the reference host uses, exported for hosts.
pub const AUTOSAVE_INTERVAL_SECS: u64 = 10;

/// One save-format generation: a storage key plus a decoder into a partial
/// ledger. Listed newest first in [`Schema::all()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
    V6,
    V5,
    V4,
    V3,
    V2,
    Legacy,
}

impl Schema {
    /// All known formats, newest first. Load walks this order and stops at
    /// the first readable record; later (older) entries are not merged on
    /// top of it.
    pub fn all() -> &'static [Schema] {
        &[
            Schema::V6,
            Schema::V5,
            Schema::V4,
            Schema::V3,
            Schema::V2,
            Schema::Legacy,
        ]
    }

    /// Storage key this generation wrote to.
    pub fn key(&self) -> &'static str {
        match self {
            Schema::V6 => "cosmic_mining_v6",
            Schema::V5 => "cosmic_mining_v5",
            Schema::V4 => "cosmic_mining_v4",
            Schema::V3 => "cosmic_mining_v3",
            Schema::V2 => "cosmic_mining_v2",
            Schema::Legacy => "cosmic_save",
        }
    }

    /// Decode a raw record into a partial ledger, or None when the record
    /// is malformed (treated exactly like an absent key).
    fn decode(&self, json: &str) -> Option<PartialLedger> {
        match self {
            // v3 〜 v6 は形状互換（id アドレッシング）。
            Schema::V6 | Schema::V5 | Schema::V4 | Schema::V3 => decode_id_record(json),
            Schema::V2 => decode_positional_record(json),
            Schema::Legacy => decode_legacy_record(json),
        }
    }
}

/// What one record could carry into the current model. Merged onto a fresh
/// zero-state ledger.
struct PartialLedger {
    minerals: f64,
    /// (id, count, cost) per building actually recorded.
    buildings: Vec<(String, u32, f64)>,
    last_save_time: Option<i64>,
    /// True when structured building progress could not be carried and
    /// (at most) the balance plus positional remnants survived. Drives the
    /// user-facing "some progress could not be imported" notice.
    lossy: bool,
}

// ── Wire formats ────────────────────────────────────────────────

/// v3〜v6: 建物を安定 id で記録する現行形状。
#[derive(Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct IdRecord {
    minerals: f64,
    buildings: Vec<IdBuildingRecord>,
    last_save_time: Option<i64>,
}

#[derive(Serialize, Deserialize, Default)]
struct IdBuildingRecord {
    id: String,
    count: u32,
    cost: f64,
}

/// v2: 建物を配列位置で記録していた形状。
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct PositionalRecord {
    minerals: f64,
    buildings: Vec<PositionalBuildingRecord>,
    last_save_time: Option<i64>,
}

#[derive(Deserialize, Default)]
struct PositionalBuildingRecord {
    /// 位置対応でしか解釈できないため現行モデルへは取り込まない。
    #[allow(dead_code)]
    count: u32,
    cost: f64,
}

/// 最初期: Mining Drone 一種のみ。
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct LegacyRecord {
    minerals: f64,
    drone_count: u32,
    drone_cost: f64,
    last_save_time: Option<i64>,
}

// ── Decoders ────────────────────────────────────────────────────

fn valid_balance(minerals: f64) -> bool {
    minerals.is_finite() && minerals >= 0.0
}

fn valid_cost(cost: f64) -> bool {
    cost.is_finite() && cost > 0.0
}

fn valid_timestamp(ts: Option<i64>) -> bool {
    ts.map_or(true, |t| t >= 0)
}

fn decode_id_record(json: &str) -> Option<PartialLedger> {
    let record: IdRecord = serde_json::from_str(json).ok()?;
    if !valid_balance(record.minerals) || !valid_timestamp(record.last_save_time) {
        return None;
    }
    if record.buildings.iter().any(|b| !valid_cost(b.cost)) {
        return None;
    }
    Some(PartialLedger {
        minerals: record.minerals,
        buildings: record
            .buildings
            .into_iter()
            .map(|b| (b.id, b.count, b.cost))
            .collect(),
        last_save_time: record.last_save_time,
        lossy: false,
    })
}

/// v2 の配列位置は現行カタログと照合できない（v3 で id 導入時に非互換と
/// なった）。残高のみ引き継ぎ、建物は失われる。
fn decode_positional_record(json: &str) -> Option<PartialLedger> {
    let record: PositionalRecord = serde_json::from_str(json).ok()?;
    if !valid_balance(record.minerals) || !valid_timestamp(record.last_save_time) {
        return None;
    }
    if record.buildings.iter().any(|b| !valid_cost(b.cost)) {
        return None;
    }
    Some(PartialLedger {
        minerals: record.minerals,
        buildings: Vec::new(),
        last_save_time: record.last_save_time,
        lossy: true,
    })
}

/// 最初期形式はドローン一種のみ。カタログ先頭（位置 0）へ引き継ぐ。
fn decode_legacy_record(json: &str) -> Option<PartialLedger> {
    let record: LegacyRecord = serde_json::from_str(json).ok()?;
    if !valid_balance(record.minerals) || !valid_timestamp(record.last_save_time) {
        return None;
    }
    let mut buildings = Vec::new();
    if record.drone_count > 0 {
        let first = Building::at(0).expect("catalog is never empty");
        // 極初期のレコードは droneCost を持たないことがある。
        let cost = if valid_cost(record.drone_cost) {
            record.drone_cost
        } else if record.drone_cost == 0.0 {
            first.base_cost()
        } else {
            return None;
        };
        buildings.push((first.id().to_string(), record.drone_count, cost));
    }
    Some(PartialLedger {
        minerals: record.minerals,
        buildings,
        last_save_time: record.last_save_time,
        lossy: true,
    })
}

// ── Save ────────────────────────────────────────────────────────

fn extract_record(ledger: &Ledger, now_ms: i64) -> IdRecord {
    IdRecord {
        minerals: ledger.minerals,
        buildings: ledger
            .buildings
            .iter()
            .map(|b| IdBuildingRecord {
                id: b.building.id().to_string(),
                count: b.count,
                cost: b.cost,
            })
            .collect(),
        last_save_time: Some(now_ms),
    }
}

/// Persist the ledger under the current key. Returns whether the write
/// succeeded; on success `last_save_time` is updated. Failures are logged
/// and otherwise swallowed — the session keeps running on in-memory state.
pub fn save(ledger: &mut Ledger, store: &mut dyn KeyValueStore, now_ms: i64) -> bool {
    let record = extract_record(ledger, now_ms);
    let json = match serde_json::to_string(&record) {
        Ok(j) => j,
        Err(e) => {
            log::warn!("cosmic mining: セーブのシリアライズに失敗: {e}");
            return false;
        }
    };
    match store.set(CURRENT_KEY, &json) {
        Ok(()) => {
            ledger.last_save_time = now_ms;
            true
        }
        Err(e) => {
            log::warn!("cosmic mining: ストアへの保存に失敗: {e}");
            false
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Result of a load: always a usable ledger, plus whether a lossy legacy
/// import happened (host decides whether to tell the user that building
/// progress could not be carried forward).
pub struct LoadOutcome {
    pub ledger: Ledger,
    pub was_legacy_import: bool,
}

/// Reconstruct a ledger from the most recent readable record, walking the
/// schema chain newest-first. Nothing readable at any key yields a fresh
/// ledger. Never fails.
pub fn load(store: &dyn KeyValueStore, now_ms: i64) -> LoadOutcome {
    for schema in Schema::all() {
        let json = match store.get(schema.key()) {
            Some(j) => j,
            None => continue,
        };
        match schema.decode(&json) {
            Some(partial) => {
                if *schema != Schema::V6 {
                    log::info!(
                        "cosmic mining: 旧形式 {} からマイグレーション",
                        schema.key()
                    );
                }
                let was_legacy_import = partial.lossy;
                return LoadOutcome {
                    ledger: merge(partial, now_ms),
                    was_legacy_import,
                };
            }
            None => {
                // 壊れたレコードはキーが無かったものとして扱い、
                // さらに古い形式を探す。
                log::warn!(
                    "cosmic mining: {} のレコードが壊れています（無視）",
                    schema.key()
                );
            }
        }
    }
    LoadOutcome {
        ledger: Ledger::new(now_ms),
        was_legacy_import: false,
    }
}

/// Merge a decoded record onto a fresh zero-state ledger. Buildings the
/// record never mentioned keep count 0 at base cost; ids the current
/// catalog no longer carries are dropped.
fn merge(partial: PartialLedger, now_ms: i64) -> Ledger {
    let mut ledger = Ledger::new(now_ms);
    ledger.minerals = partial.minerals;
    ledger.last_save_time = partial.last_save_time.unwrap_or(now_ms);
    for (id, count, cost) in partial.buildings {
        if let Some(state) = ledger.building_by_id_mut(&id) {
            state.count = count;
            state.cost = cost;
        }
    }
    ledger
}
