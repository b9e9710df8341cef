//! Card usage model.

use serde::{Deserialize, Serialize};

use super::{ColorIdentity, RawDate};

/// One card's aggregate usage across the decks in scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardUsageEntry {
    /// Backend row id
    pub id: u64,

    /// Card name
    pub name: String,

    /// Exact color identity of the card
    pub colors: ColorIdentity,

    /// Mana value
    pub mana_value: f64,

    /// Full type line, e.g. "Artifact — Equipment"
    pub type_line: String,

    /// Number of decks in scope containing the card
    pub quantity: u32,

    /// Share of decks containing the card, whole percent
    pub percentage: f64,

    /// Most recent appearance date (`dd/mm/yyyy`)
    pub date: RawDate,
}

impl CardUsageEntry {
    pub fn new(id: u64, name: impl Into<String>, colors: ColorIdentity) -> Self {
        Self {
            id,
            name: name.into(),
            colors,
            mana_value: 0.0,
            type_line: String::new(),
            quantity: 0,
            percentage: 0.0,
            date: RawDate::from(""),
        }
    }

    /// Builder method to set mana value.
    pub fn with_mana_value(mut self, mana_value: f64) -> Self {
        self.mana_value = mana_value;
        self
    }

    /// Builder method to set the type line.
    pub fn with_type_line(mut self, type_line: impl Into<String>) -> Self {
        self.type_line = type_line.into();
        self
    }

    /// Builder method to set usage numbers.
    pub fn with_usage(mut self, quantity: u32, percentage: f64) -> Self {
        self.quantity = quantity;
        self.percentage = percentage;
        self
    }

    /// Builder method to set the appearance date.
    pub fn with_date(mut self, date: impl Into<RawDate>) -> Self {
        self.date = date.into();
        self
    }

    /// Whether the type line names a land type.
    pub fn is_land(&self) -> bool {
        self.type_line
            .split_whitespace()
            .any(|word| word.eq_ignore_ascii_case("Land"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_land() {
        let land = CardUsageEntry::new(1, "Evolving Wilds", ColorIdentity::COLORLESS)
            .with_type_line("Land");
        assert!(land.is_land());

        let artifact_land = CardUsageEntry::new(2, "Seat of the Synod", ColorIdentity::COLORLESS)
            .with_type_line("Artifact Land");
        assert!(artifact_land.is_land());

        let creature = CardUsageEntry::new(3, "Llanowar Elves", ColorIdentity::COLORLESS)
            .with_type_line("Creature — Elf Druid");
        assert!(!creature.is_land());
    }

    #[test]
    fn test_is_land_does_not_match_substrings() {
        // "Landfall" in rules text never reaches the type line, but a type
        // word containing "land" must not match either.
        let card = CardUsageEntry::new(4, "Some Card", ColorIdentity::COLORLESS)
            .with_type_line("Enchantment — Landmark");
        assert!(!card.is_land());
    }

    #[test]
    fn test_serialization() {
        let card = CardUsageEntry::new(9, "Bojuka Bog", ColorIdentity::COLORLESS)
            .with_type_line("Land")
            .with_usage(42, 61.0)
            .with_date("01/02/2024");

        let json = serde_json::to_string(&card).unwrap();
        let parsed: CardUsageEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.name, card.name);
        assert_eq!(parsed.quantity, 42);
        assert_eq!(parsed.percentage, 61.0);
    }
}
