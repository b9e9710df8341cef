//! Commander performance model.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{round_percent, ColorIdentity, RawDate};

/// One commander's (optionally paired with a partner) aggregate record for a
/// scope of tournaments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommanderEntry {
    /// Commander name
    pub commander: String,

    /// Partner commander, if the deck runs one
    pub partner: Option<String>,

    /// Exact color identity of the commander(s), never a subset
    pub colors: ColorIdentity,

    /// Mana value, attached by the backend from card metadata
    pub mana_value: f64,

    /// Tournaments the contributing entries came from
    pub tournament_ids: HashSet<u64>,

    /// Tournament entries contributing to this row
    pub entries: u32,

    /// Game record. `wins + losses + draws <= entries` is not guaranteed;
    /// source data may be incomplete.
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,

    /// Title counts. Each is `<= entries`.
    pub top4: u32,
    pub top8: u32,
    pub champion: u32,

    /// Most recent contributing entry date (`dd/mm/yyyy`)
    pub date: RawDate,

    /// Backend-supplied win rate percent, authoritative when present
    pub winrate: Option<f64>,

    /// Backend-supplied top-4 percent
    pub top4_rate: Option<f64>,

    /// Backend-supplied top-8 percent
    pub top8_rate: Option<f64>,
}

impl CommanderEntry {
    pub fn new(commander: impl Into<String>, colors: ColorIdentity) -> Self {
        Self {
            commander: commander.into(),
            partner: None,
            colors,
            mana_value: 0.0,
            tournament_ids: HashSet::new(),
            entries: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            top4: 0,
            top8: 0,
            champion: 0,
            date: RawDate::from(""),
            winrate: None,
            top4_rate: None,
            top8_rate: None,
        }
    }

    /// Builder method to set the partner commander.
    pub fn with_partner(mut self, partner: impl Into<String>) -> Self {
        self.partner = Some(partner.into());
        self
    }

    /// Builder method to set mana value.
    pub fn with_mana_value(mut self, mana_value: f64) -> Self {
        self.mana_value = mana_value;
        self
    }

    /// Builder method to set entry count.
    pub fn with_entries(mut self, entries: u32) -> Self {
        self.entries = entries;
        self
    }

    /// Builder method to set the game record.
    pub fn with_record(mut self, wins: u32, losses: u32, draws: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self.draws = draws;
        self
    }

    /// Builder method to set title counts.
    pub fn with_titles(mut self, top4: u32, top8: u32, champion: u32) -> Self {
        self.top4 = top4;
        self.top8 = top8;
        self.champion = champion;
        self
    }

    /// Builder method to set contributing tournaments.
    pub fn with_tournaments(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.tournament_ids = ids.into_iter().collect();
        self
    }

    /// Builder method to set the entry date.
    pub fn with_date(mut self, date: impl Into<RawDate>) -> Self {
        self.date = date.into();
        self
    }

    /// Builder method to set the backend-supplied win rate.
    pub fn with_winrate(mut self, winrate: f64) -> Self {
        self.winrate = Some(winrate);
        self
    }

    /// Win rate percent. Backend-supplied when present, otherwise computed
    /// from wins over entries. Zero entries means the percent is undefined
    /// and reported as 0.
    pub fn winrate_percent(&self) -> f64 {
        self.winrate
            .unwrap_or_else(|| round_percent(self.wins, self.entries))
    }

    /// Top-4 percent, same supply-or-compute rule as [`winrate_percent`].
    ///
    /// [`winrate_percent`]: CommanderEntry::winrate_percent
    pub fn top4_percent(&self) -> f64 {
        self.top4_rate
            .unwrap_or_else(|| round_percent(self.top4, self.entries))
    }

    /// Top-8 percent, same supply-or-compute rule as [`winrate_percent`].
    ///
    /// [`winrate_percent`]: CommanderEntry::winrate_percent
    pub fn top8_percent(&self) -> f64 {
        self.top8_rate
            .unwrap_or_else(|| round_percent(self.top8, self.entries))
    }

    /// Display name: commander, or "commander / partner" for pairs.
    pub fn display_name(&self) -> String {
        match &self.partner {
            Some(partner) => format!("{} / {}", self.commander, partner),
            None => self.commander.clone(),
        }
    }
}
