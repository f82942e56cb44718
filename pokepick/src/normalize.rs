//! Raw catalog detail records into [`CreatureDetail`] / [`ExtendedDetail`].
//!
//! Only `id` and `name` are required; every other field falls back to a
//! default so a sparse record still shows up in the list.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{CreatureDetail, ExtendedDetail, StatKey, StatSet};

pub fn normalize(raw: &Value) -> Result<CreatureDetail> {
    let id = raw
        .get("id")
        .and_then(Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())
        .ok_or_else(|| Error::MalformedRecord("missing id".to_string()))?;
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::MalformedRecord(format!("record {id} is missing a name")))?
        .to_string();

    let image_url = pointer_string(raw, "/sprites/other/official-artwork/front_default")
        .or_else(|| pointer_string(raw, "/sprites/front_default"))
        .unwrap_or_default();

    Ok(CreatureDetail {
        id,
        name,
        image_url,
        types: named_list(raw, "types", "type"),
        stats: stat_set(raw),
    })
}

pub fn normalize_extended(raw: &Value) -> Result<ExtendedDetail> {
    let detail = normalize(raw)?;
    Ok(ExtendedDetail {
        detail,
        moves: named_list(raw, "moves", "move"),
        abilities: named_list(raw, "abilities", "ability"),
        height: pointer_u32(raw, "/height"),
        weight: pointer_u32(raw, "/weight"),
        species_url: pointer_string(raw, "/species/url"),
        sprite_default: pointer_string(raw, "/sprites/front_default"),
        sprite_shiny: pointer_string(raw, "/sprites/front_shiny"),
    })
}

/// `generation-iv` -> `GEN IV`
pub fn generation_label(name: &str) -> String {
    name.replace("generation-", "Gen ").to_ascii_uppercase()
}

fn stat_set(raw: &Value) -> StatSet {
    let mut stats = StatSet::default();
    let Some(slots) = raw.get("stats").and_then(Value::as_array) else {
        return stats;
    };
    for slot in slots {
        let key = slot
            .pointer("/stat/name")
            .and_then(Value::as_str)
            .and_then(StatKey::from_name);
        let Some(key) = key else {
            continue;
        };
        let value = slot
            .get("base_stat")
            .and_then(Value::as_u64)
            .unwrap_or(0)
            .min(u64::from(u8::MAX));
        stats.set(key, value as u8);
    }
    stats
}

// `[{ "<inner>": { "name": .. } }, ..]` under `field`, in listed order.
fn named_list(raw: &Value, field: &str, inner: &str) -> Vec<String> {
    raw.get(field)
        .and_then(Value::as_array)
        .map(|slots| {
            slots
                .iter()
                .filter_map(|slot| slot.get(inner)?.get("name")?.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn pointer_string(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn pointer_u32(value: &Value, pointer: &str) -> u32 {
    value
        .pointer(pointer)
        .and_then(Value::as_u64)
        .and_then(|val| u32::try_from(val).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pikachu() -> Value {
        json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "sprites": {
                "front_default": "front.png",
                "front_shiny": "shiny.png",
                "other": { "official-artwork": { "front_default": "art.png" } }
            },
            "types": [
                { "slot": 1, "type": { "name": "electric", "url": "" } }
            ],
            "stats": [
                { "base_stat": 35, "stat": { "name": "hp" } },
                { "base_stat": 55, "stat": { "name": "attack" } },
                { "base_stat": 40, "stat": { "name": "defense" } },
                { "base_stat": 50, "stat": { "name": "special-attack" } },
                { "base_stat": 50, "stat": { "name": "special-defense" } },
                { "base_stat": 90, "stat": { "name": "speed" } }
            ],
            "moves": [
                { "move": { "name": "thunder-shock" } },
                { "move": { "name": "quick-attack" } }
            ],
            "abilities": [ { "ability": { "name": "static" } } ],
            "species": { "url": "https://pokeapi.co/api/v2/pokemon-species/25/" }
        })
    }

    #[test]
    fn normalizes_full_record() {
        let detail = normalize(&pikachu()).unwrap();
        assert_eq!(detail.id, 25);
        assert_eq!(detail.name, "pikachu");
        assert_eq!(detail.image_url, "art.png");
        assert_eq!(detail.types, vec!["electric".to_string()]);
        assert_eq!(detail.stats.speed, 90);
        assert_eq!(detail.stats.special_attack, 50);
    }

    #[test]
    fn falls_back_to_default_sprite() {
        let mut raw = pikachu();
        raw["sprites"]["other"]["official-artwork"]["front_default"] = Value::Null;
        assert_eq!(normalize(&raw).unwrap().image_url, "front.png");

        raw["sprites"] = json!({});
        assert_eq!(normalize(&raw).unwrap().image_url, "");
    }

    #[test]
    fn missing_stats_default_to_zero() {
        let raw = json!({
            "id": 7,
            "name": "squirtle",
            "stats": [ { "base_stat": 44, "stat": { "name": "hp" } } ]
        });
        let detail = normalize(&raw).unwrap();
        assert_eq!(detail.stats.hp, 44);
        assert_eq!(detail.stats.attack, 0);
        assert!(detail.types.is_empty());
    }

    #[test]
    fn stat_values_are_clamped() {
        let raw = json!({
            "id": 1,
            "name": "glitch",
            "stats": [ { "base_stat": 999, "stat": { "name": "defense" } } ]
        });
        assert_eq!(normalize(&raw).unwrap().stats.defense, 255);
    }

    #[test]
    fn missing_identity_is_malformed() {
        assert!(matches!(
            normalize(&json!({ "name": "missingno" })),
            Err(Error::MalformedRecord(_))
        ));
        assert!(matches!(
            normalize(&json!({ "id": 0 })),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn extended_keeps_move_order() {
        let extended = normalize_extended(&pikachu()).unwrap();
        assert_eq!(extended.moves, vec!["thunder-shock", "quick-attack"]);
        assert_eq!(extended.abilities, vec!["static"]);
        assert_eq!(extended.height, 4);
        assert_eq!(extended.weight, 60);
        assert_eq!(extended.sprite_shiny.as_deref(), Some("shiny.png"));
        assert!(extended.species_url.is_some());
    }

    #[test]
    fn generation_labels() {
        assert_eq!(generation_label("generation-iv"), "GEN IV");
        assert_eq!(generation_label("generation-i"), "GEN I");
    }
}
