use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::data::catalog::{pool_def, ENERGY_POOLS, RESOURCES, STARTING_BIOME};
use crate::simulation::biomes::BiomeState;
use crate::simulation::energy::EnergyState;
use crate::simulation::journal::{Journal, JournalEntry, JournalKind, JOURNAL_LIMIT};
use crate::simulation::stockpile::{Inventory, Stockpile};
use crate::simulation::vitals::Vitals;
use crate::systems::actions::ActiveActions;

/// Full snapshot of the mutable game state, as stored in the save slot.
/// Running action trackers are deliberately absent: an interrupted action is
/// cancelled, never resumed with partial credit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub health: Vitals,
    pub energy: EnergyState,
    pub resources: BTreeMap<String, f64>,
    pub crafted_items: BTreeMap<String, u32>,
    pub current_biome: String,
    pub discovered_biomes: Vec<String>,
    pub journal: Vec<JournalEntry>,
}

/// Fresh-start state: full pools, empty stockpile, home biome discovered.
pub fn default_state() -> SaveState {
    SaveState {
        health: Vitals::default(),
        energy: EnergyState::full(),
        resources: Stockpile::empty().amounts,
        crafted_items: BTreeMap::new(),
        current_biome: STARTING_BIOME.to_string(),
        discovered_biomes: vec![STARTING_BIOME.to_string()],
        journal: Vec::new(),
    }
}

/// Serialize the whole state for the save slot.
pub fn encode_state(state: &SaveState) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

/// Rebuild a complete, invariant-respecting state from an untrusted payload.
///
/// The store may be absent, truncated, hand-edited, or written by an older
/// schema. Decoding therefore starts from defaults and overlays only fields
/// that are well-typed and in range; a broken field never prevents the rest
/// of the record from loading, and this function never fails. `now_ms`
/// stamps journal entries whose timestamp cannot be recovered.
pub fn decode_state(raw: Option<&str>, now_ms: f64) -> SaveState {
    let mut state = default_state();

    let Some(raw) = raw else {
        return state;
    };
    let Ok(parsed) = serde_json::from_str::<Value>(raw) else {
        return state;
    };
    let Some(root) = parsed.as_object() else {
        return state;
    };

    if let Some(health) = root.get("health").and_then(Value::as_object) {
        let current = coerce_number(health.get("current")).unwrap_or(0.0);
        state.health.current = current.clamp(0.0, state.health.max);
    }

    if let Some(energy) = root.get("energy").and_then(Value::as_object) {
        for def in ENERGY_POOLS.iter() {
            let value = match energy.get(def.id.as_str()) {
                None | Some(Value::Null) => def.max,
                Some(value) => coerce_number(Some(value)).unwrap_or(0.0),
            };
            state.energy.set(def.id, value.clamp(0.0, pool_def(def.id).max));
        }
    }

    if let Some(resources) = root.get("resources").and_then(Value::as_object) {
        for resource in RESOURCES.iter() {
            let amount = coerce_number(resources.get(*resource)).unwrap_or(0.0);
            state.resources.insert(resource.to_string(), amount.max(0.0));
        }
    }

    if let Some(crafted) = root.get("craftedItems").and_then(Value::as_object) {
        state.crafted_items = crafted
            .iter()
            .map(|(id, value)| {
                let count = coerce_number(Some(value)).unwrap_or(0.0).max(0.0);
                (id.clone(), count.floor().min(u32::MAX as f64) as u32)
            })
            .collect();
    }

    if let Some(Value::String(biome)) = root.get("currentBiome") {
        state.current_biome = biome.clone();
    }

    if let Some(Value::Array(biomes)) = root.get("discoveredBiomes") {
        let mut discovered: Vec<String> = Vec::new();
        for value in biomes.iter() {
            if let Value::String(id) = value {
                if !discovered.iter().any(|known| known == id) {
                    discovered.push(id.clone());
                }
            }
        }
        state.discovered_biomes = discovered;
    }

    if let Some(Value::Array(entries)) = root.get("journal") {
        state.journal = entries
            .iter()
            .filter_map(|entry| normalize_journal_entry(entry, now_ms))
            .take(JOURNAL_LIMIT)
            .collect();
    }

    // Membership invariants hold regardless of what the payload claimed.
    if !state
        .discovered_biomes
        .iter()
        .any(|id| id == STARTING_BIOME)
    {
        state
            .discovered_biomes
            .insert(0, STARTING_BIOME.to_string());
    }
    if !state
        .discovered_biomes
        .iter()
        .any(|id| *id == state.current_biome)
    {
        state.discovered_biomes.push(state.current_biome.clone());
    }

    state
}

/// Entries without a textual message are dropped; a missing or non-textual
/// type falls back to info; an unrecoverable timestamp becomes "now".
fn normalize_journal_entry(value: &Value, now_ms: f64) -> Option<JournalEntry> {
    let entry = value.as_object()?;
    let message = entry.get("message")?.as_str()?.to_string();
    let kind = entry
        .get("type")
        .and_then(Value::as_str)
        .map(JournalKind::from_label)
        .unwrap_or(JournalKind::Info);
    let timestamp_ms = entry
        .get("timestamp")
        .and_then(|raw| coerce_number(Some(raw)).or_else(|| raw.as_str().and_then(parse_iso_like)))
        .unwrap_or(now_ms);
    Some(JournalEntry {
        message,
        kind,
        timestamp_ms,
    })
}

/// Accepts JSON numbers and numeric strings; anything else is None.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(number)) => number.as_f64().filter(|n| n.is_finite()),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Minimal `YYYY-MM-DD[Thh:mm[:ss[.fff]]][Z]` parser, returning epoch
/// milliseconds. Anything that does not fit the shape is None.
fn parse_iso_like(text: &str) -> Option<f64> {
    let trimmed = text.trim().trim_end_matches('Z');
    let (date_part, time_part) = match trimmed.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (trimmed, None),
    };

    let mut fields = date_part.splitn(3, '-');
    let year: i64 = fields.next()?.parse().ok()?;
    let month: u32 = fields.next()?.parse().ok()?;
    let day: u32 = fields.next()?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let mut ms = days_from_civil(year, month, day) as f64 * 86_400_000.0;

    if let Some(time) = time_part {
        let mut fields = time.splitn(3, ':');
        let hour: f64 = fields.next()?.parse().ok()?;
        let minute: f64 = fields.next()?.parse().ok()?;
        let second: f64 = match fields.next() {
            Some(seconds) => seconds.parse().ok()?,
            None => 0.0,
        };
        if !(0.0..24.0).contains(&hour)
            || !(0.0..60.0).contains(&minute)
            || !(0.0..61.0).contains(&second)
        {
            return None;
        }
        ms += hour * 3_600_000.0 + minute * 60_000.0 + second * 1_000.0;
    }

    Some(ms)
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = if year >= 0 { year } else { year - 399 } / 400;
    let year_of_era = year - era * 400;
    let month = month as i64;
    let day_of_year =
        (153 * (if month > 2 { month - 3 } else { month + 9 }) + 2) / 5 + day as i64 - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

/// Extract a serializable snapshot of the world.
pub fn extract_state_from_world(world: &World) -> SaveState {
    let biomes = world.resource::<BiomeState>();
    SaveState {
        health: world.resource::<Vitals>().clone(),
        energy: world.resource::<EnergyState>().clone(),
        resources: world.resource::<Stockpile>().amounts.clone(),
        crafted_items: world.resource::<Inventory>().items.clone(),
        current_biome: biomes.current.clone(),
        discovered_biomes: biomes.discovered.clone(),
        journal: world.resource::<Journal>().entries.clone(),
    }
}

/// Apply a saved snapshot back into the world. In-flight action trackers are
/// discarded; an interrupted action never completes.
pub fn apply_state_to_world(state: SaveState, world: &mut World) {
    *world.resource_mut::<Vitals>() = state.health;
    *world.resource_mut::<EnergyState>() = state.energy;
    world.resource_mut::<Stockpile>().amounts = state.resources;
    world.resource_mut::<Inventory>().items = state.crafted_items;
    {
        let mut biomes = world.resource_mut::<BiomeState>();
        biomes.current = state.current_biome;
        biomes.discovered = state.discovered_biomes;
    }
    world.resource_mut::<Journal>().entries = state.journal;
    world.resource_mut::<ActiveActions>().cancel_all();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_absent_or_garbage_input_yields_defaults() {
        assert_eq!(decode_state(None, 0.0), default_state());
        assert_eq!(decode_state(Some("not json {"), 0.0), default_state());
        assert_eq!(decode_state(Some("[1,2,3]"), 0.0), default_state());
        assert_eq!(decode_state(Some("42"), 0.0), default_state());
    }

    #[test]
    fn decode_overlays_only_well_typed_fields() {
        let raw = r#"{
            "health": {"current": 350, "max": 9000},
            "energy": {"slow": -10, "fast": "25"},
            "resources": {"wood": "14.5", "stone": -3, "fiber": {}, "gold": 99},
            "craftedItems": {"woodenClub": 2.9, "campfireStation": "bad"},
            "currentBiome": 12,
            "discoveredBiomes": "forest"
        }"#;
        let state = decode_state(Some(raw), 0.0);

        // Health clamps to the default max; the stored max is not trusted.
        assert_eq!(state.health.current, 100.0);
        assert_eq!(state.health.max, 100.0);
        // Out-of-range pools clamp, absent pools refill to their max,
        // numeric strings coerce.
        assert_eq!(state.energy.slow, 0.0);
        assert_eq!(state.energy.medium, 80.0);
        assert_eq!(state.energy.fast, 25.0);
        // Resources coerce non-negative, invalid entries become zero, and
        // unknown resource keys are not adopted.
        assert_eq!(state.resources["wood"], 14.5);
        assert_eq!(state.resources["stone"], 0.0);
        assert_eq!(state.resources["fiber"], 0.0);
        assert!(!state.resources.contains_key("gold"));
        // Crafted counts floor to non-negative integers.
        assert_eq!(state.crafted_items["woodenClub"], 2);
        assert_eq!(state.crafted_items["campfireStation"], 0);
        // Non-textual biome and non-sequence discovery list keep defaults.
        assert_eq!(state.current_biome, "base");
        assert_eq!(state.discovered_biomes, vec!["base"]);
    }

    #[test]
    fn decode_repairs_biome_membership_invariants() {
        let raw = r#"{"currentBiome": "cliffs", "discoveredBiomes": ["forest", 7, "forest"]}"#;
        let state = decode_state(Some(raw), 0.0);
        assert_eq!(state.current_biome, "cliffs");
        assert_eq!(state.discovered_biomes, vec!["base", "forest", "cliffs"]);
    }

    #[test]
    fn decode_normalizes_journal_entries() {
        let raw = r#"{"journal": [
            {"message": "ok entry", "type": "danger", "timestamp": 1500},
            {"message": 7, "type": "info"},
            {"message": "typeless", "type": 3, "timestamp": "2024-03-05T12:30:15.250Z"},
            {"message": "stampless", "timestamp": "around noon"}
        ]}"#;
        let state = decode_state(Some(raw), 99.0);

        assert_eq!(state.journal.len(), 3);
        assert_eq!(state.journal[0].message, "ok entry");
        assert_eq!(state.journal[0].kind, JournalKind::Danger);
        assert_eq!(state.journal[0].timestamp_ms, 1500.0);
        assert_eq!(state.journal[1].kind, JournalKind::Info);
        assert_eq!(state.journal[1].timestamp_ms, 1_709_641_815_250.0);
        assert_eq!(state.journal[2].timestamp_ms, 99.0);
    }

    #[test]
    fn decode_truncates_journal_to_bound() {
        let entries: Vec<String> = (0..60)
            .map(|i| {
                format!(
                    r#"{{"message": "entry {}", "type": "info", "timestamp": {}}}"#,
                    i, i
                )
            })
            .collect();
        let raw = format!(r#"{{"journal": [{}]}}"#, entries.join(","));
        let state = decode_state(Some(&raw), 0.0);
        assert_eq!(state.journal.len(), JOURNAL_LIMIT);
        assert_eq!(state.journal[0].message, "entry 0");
    }

    #[test]
    fn encode_then_decode_round_trips() {
        let mut state = default_state();
        state.health.current = 63.5;
        state.energy.spend(57.0);
        state.resources.insert("wood".to_string(), 18.25);
        state.crafted_items.insert("fiberSling".to_string(), 2);
        state.current_biome = "forest".to_string();
        state.discovered_biomes = vec!["base".to_string(), "forest".to_string()];
        state.journal.push(JournalEntry {
            message: "You arrive at Mist Forest.".to_string(),
            kind: JournalKind::Info,
            timestamp_ms: 123_456.0,
        });

        let encoded = encode_state(&state).expect("state should serialize");
        assert_eq!(decode_state(Some(&encoded), 0.0), state);
    }

    #[test]
    fn iso_like_timestamps_parse_to_epoch_ms() {
        assert_eq!(
            parse_iso_like("2024-03-05T12:30:15.250Z"),
            Some(1_709_641_815_250.0)
        );
        assert_eq!(parse_iso_like("1970-01-01"), Some(0.0));
        assert_eq!(parse_iso_like("1969-12-31T23:59:59"), Some(-1_000.0));
        assert_eq!(parse_iso_like("noon-ish"), None);
        assert_eq!(parse_iso_like("2024-13-01"), None);
    }
}
