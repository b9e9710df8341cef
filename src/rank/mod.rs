//! Ranking engine.
//!
//! Sorts filtered records for the ranking tables. The sort is stable so
//! that ties keep their input order and pagination pages are reproducible
//! across repeated calls with identical input. Descending order reverses
//! the comparator result, never the final list.
//!
//! Card-usage views also run a curation pass here (after filtering, before
//! ranking): known auto-include staples and generic lands are dropped so the
//! table shows actual deck-building choices.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{CardUsageEntry, CommanderEntry};

/// Sort dimension for the ranking tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Winrate,
    Wins,
    Entries,
    Name,
    Champion,
    Percentage,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winrate" => Ok(SortKey::Winrate),
            "wins" => Ok(SortKey::Wins),
            "entries" => Ok(SortKey::Entries),
            "name" => Ok(SortKey::Name),
            "champion" => Ok(SortKey::Champion),
            "percentage" => Ok(SortKey::Percentage),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

/// A comparable key value. Keys a row kind does not carry compare as zero.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    Number(f64),
    Text(String),
}

/// Per-kind sort-key access.
pub trait Rankable {
    fn key_value(&self, key: SortKey) -> KeyValue;
}

impl Rankable for CommanderEntry {
    fn key_value(&self, key: SortKey) -> KeyValue {
        match key {
            SortKey::Winrate => KeyValue::Number(self.winrate_percent()),
            SortKey::Wins => KeyValue::Number(self.wins as f64),
            SortKey::Entries => KeyValue::Number(self.entries as f64),
            SortKey::Name => KeyValue::Text(fold_name(&self.commander)),
            SortKey::Champion => KeyValue::Number(self.champion as f64),
            // Commander rows have no usage percentage.
            SortKey::Percentage => KeyValue::Number(0.0),
        }
    }
}

impl Rankable for CardUsageEntry {
    fn key_value(&self, key: SortKey) -> KeyValue {
        match key {
            SortKey::Name => KeyValue::Text(fold_name(&self.name)),
            SortKey::Entries => KeyValue::Number(self.quantity as f64),
            SortKey::Percentage => KeyValue::Number(self.percentage),
            // Card rows track usage, not game results.
            SortKey::Winrate | SortKey::Wins | SortKey::Champion => KeyValue::Number(0.0),
        }
    }
}

/// Stable sort by `key`. `Desc` negates the comparator so that equal keys
/// keep their input order either way.
pub fn rank<T: Rankable>(mut rows: Vec<T>, key: SortKey, direction: Direction) -> Vec<T> {
    rows.sort_by(|a, b| {
        let ord = compare_values(&a.key_value(key), &b.key_value(key));
        match direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });
    rows
}

fn compare_values(a: &KeyValue, b: &KeyValue) -> Ordering {
    match (a, b) {
        (KeyValue::Number(a), KeyValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (KeyValue::Text(a), KeyValue::Text(b)) => a.cmp(b),
        // Mixed kinds never happen for a single key; treat as a tie.
        _ => Ordering::Equal,
    }
}

fn fold_name(name: &str) -> String {
    name.chars().flat_map(char::to_lowercase).collect()
}

// ── Card curation ───────────────────────────────────────────────

/// Cards that go in nearly every list they are legal in. Their usage numbers
/// say nothing about the meta, so the dashboard hides them.
const AUTO_INCLUDE_STAPLES: &[&str] = &[
    "Sol Ring",
    "Arcane Signet",
    "Command Tower",
    "Swiftfoot Boots",
    "Lightning Greaves",
];

/// The one land worth reporting: a real deck-building choice, not mana base
/// filler.
const LAND_EXCEPTION: &str = "Bojuka Bog";

/// Curation rule for card-usage views. Runs after filtering and before
/// ranking; it is not a filter predicate the user controls.
pub fn is_reportable(card: &CardUsageEntry) -> bool {
    if AUTO_INCLUDE_STAPLES
        .iter()
        .any(|staple| card.name.eq_ignore_ascii_case(staple))
    {
        return false;
    }
    if card.is_land() && !card.name.eq_ignore_ascii_case(LAND_EXCEPTION) {
        return false;
    }
    true
}

/// Apply [`is_reportable`] to a filtered card collection.
pub fn curate_cards(cards: Vec<CardUsageEntry>) -> Vec<CardUsageEntry> {
    cards.into_iter().filter(is_reportable).collect()
}
