//! Gem Clicker save/load.
//!
//! ## Record format
//!
//! One JSON object under a single key:
//!
//! ```json
//! { "money": 12.5, "health": 40, "gemLevel": 0,
//!   "generators": [{ "id": "miner", "quantity": 2 }],
//!   "upgrades": [{ "id": "finger-1", "quantity": 1 }],
//!   "auto": false }
//! ```
//!
//! ## Loading policy
//!
//! Every field is validated on its own. A missing or mistyped field keeps
//! its default instead of failing the whole load. Quantities are matched to
//! the catalog by id; unknown ids are dropped and prices are always
//! recomputed from quantity, never read from the record.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use thiserror::Error;

use super::catalog::Priced;
use super::state::{GameState, Owned};
use crate::storage::{KeyValueStore, StoreError};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not encode save: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Serialized form; mirrors the record format above.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveRecord<'a> {
    money: f64,
    health: f64,
    gem_level: usize,
    generators: Vec<SavedEntry<'a>>,
    upgrades: Vec<SavedEntry<'a>>,
    auto: bool,
}

#[derive(Serialize)]
struct SavedEntry<'a> {
    id: &'a str,
    quantity: u32,
}

/// Read side. Each field is `None` when absent or of the wrong type.
#[derive(Deserialize, Default, Debug)]
#[serde(default, rename_all = "camelCase")]
struct LoadedRecord {
    #[serde(deserialize_with = "lenient")]
    money: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    health: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    gem_level: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    generators: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient")]
    upgrades: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient")]
    auto: Option<bool>,
}

#[derive(Deserialize)]
struct LoadedEntry {
    id: String,
    #[serde(default, deserialize_with = "lenient")]
    quantity: Option<f64>,
}

/// Accept any JSON value; keep it only if it has the expected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn extract_save(state: &GameState) -> SaveRecord<'_> {
    SaveRecord {
        money: state.money,
        health: state.health,
        gem_level: state.gem_level,
        generators: state
            .generators
            .iter()
            .map(|g| SavedEntry {
                id: g.def.id,
                quantity: g.quantity,
            })
            .collect(),
        upgrades: state
            .upgrades
            .iter()
            .map(|u| SavedEntry {
                id: u.def.id,
                quantity: u.quantity,
            })
            .collect(),
        auto: state.auto_clicker_unlocked,
    }
}

/// Encode the persistent part of the state.
pub fn to_json(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&extract_save(state))
}

/// Parse a record. `None` means the payload is not a JSON object at all.
///
/// Each top-level field is parsed on its own, so a value `serde_json` cannot
/// represent (e.g. `1e400`) only costs that field, or that array entry.
fn parse_record(json: &str) -> Option<LoadedRecord> {
    let fields: HashMap<String, Box<RawValue>> = serde_json::from_str(json).ok()?;
    let mut object = Map::new();
    for (key, raw) in fields {
        match parse_field(&raw) {
            Some(value) => {
                object.insert(key, value);
            }
            None => log::warn!("save field `{key}` is unreadable, using its default"),
        }
    }
    serde_json::from_value(Value::Object(object)).ok()
}

fn parse_field(raw: &RawValue) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(raw.get()) {
        return Some(value);
    }
    // Arrays keep whichever entries still parse.
    let entries: Vec<Box<RawValue>> = serde_json::from_str(raw.get()).ok()?;
    Some(Value::Array(
        entries
            .iter()
            .filter_map(|e| serde_json::from_str(e.get()).ok())
            .collect(),
    ))
}

/// Whole, non-negative count from a JSON number.
fn to_quantity(raw: f64) -> Option<u32> {
    (raw.is_finite() && raw >= 0.0).then(|| raw.floor().min(u32::MAX as f64) as u32)
}

/// Map id → quantity; later duplicates win, malformed entries are skipped.
fn quantities(entries: &[Value]) -> HashMap<String, u32> {
    entries
        .iter()
        .filter_map(|v| LoadedEntry::deserialize(v).ok())
        .filter_map(|e| Some((e.id, to_quantity(e.quantity?)?)))
        .collect()
}

fn rebuild<T: Priced + Clone>(owned: &[Owned<T>], saved: &HashMap<String, u32>) -> Vec<Owned<T>> {
    owned
        .iter()
        .map(|o| {
            let quantity = saved.get(o.def.id()).copied().unwrap_or(0);
            Owned::with_quantity(o.def.clone(), quantity)
        })
        .collect()
}

fn apply_save(state: &mut GameState, save: &LoadedRecord) {
    if let Some(level) = save.gem_level.filter(|l| l.is_finite()) {
        state.gem_level = (level.max(0.0).floor() as usize).min(state.catalog.last_gem());
    }

    if let Some(money) = save.money.filter(|m| m.is_finite() && *m >= 0.0) {
        state.money = money;
    }

    let max = state.max_health();
    state.health = match save.health.filter(|h| h.is_finite()) {
        Some(h) => h.clamp(0.0, max),
        None => max,
    };

    if let Some(entries) = &save.generators {
        state.generators = rebuild(&state.generators, &quantities(entries));
    }
    if let Some(entries) = &save.upgrades {
        state.upgrades = rebuild(&state.upgrades, &quantities(entries));
    }

    if let Some(auto) = save.auto {
        state.auto_clicker_unlocked = auto;
    }
}

/// Write the state under `key`. The caller decides whether a failure
/// matters; gameplay code logs and carries on.
pub fn save_game<S: KeyValueStore>(
    store: &mut S,
    key: &str,
    state: &GameState,
) -> Result<(), SaveError> {
    let json = to_json(state)?;
    store.set(key, &json)?;
    Ok(())
}

/// Restore `state` from `key`. Returns false (state untouched) when there is
/// no usable record. A corrupt record is removed so the next start is clean.
pub fn load_game<S: KeyValueStore>(store: &mut S, key: &str, state: &mut GameState) -> bool {
    let json = match store.get(key) {
        Ok(Some(j)) if !j.is_empty() => j,
        Ok(_) => return false,
        Err(e) => {
            log::warn!("save read failed, starting fresh: {e}");
            return false;
        }
    };

    let Some(record) = parse_record(&json) else {
        log::warn!("save record is corrupt, discarding it");
        if let Err(e) = store.remove(key) {
            log::warn!("could not remove corrupt save: {e}");
        }
        return false;
    };

    apply_save(state, &record);
    true
}
