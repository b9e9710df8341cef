//! Filter specification.
//!
//! An immutable description of the active filter criteria for one view.
//! A spec is created with defaults and replaced wholesale whenever a control
//! changes; it is never mutated in place. Each replacement triggers a fresh
//! filter pass over the raw in-memory records.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use super::{ColorIdentity, RawDate};

/// Classification of a tournament result used as a filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleTier {
    #[default]
    All,
    Top4,
    Top8,
    Champion,
}

impl FromStr for TitleTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TitleTier::All),
            "top4" => Ok(TitleTier::Top4),
            "top8" => Ok(TitleTier::Top8),
            "champion" => Ok(TitleTier::Champion),
            other => Err(format!("unknown title tier: {other}")),
        }
    }
}

/// Inclusive date window over backend `dd/mm/yyyy` text.
///
/// The bounds are kept as raw text: a window with an unparseable bound
/// excludes every record (fail-closed), the same rule applied to record
/// dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: RawDate,
    pub end: RawDate,
}

impl DateWindow {
    pub fn new(start: impl Into<RawDate>, end: impl Into<RawDate>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Inclusive mana-value range. Defaults to unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManaValueRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ManaValueRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::MAX,
        }
    }
}

impl ManaValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The active filter criteria for one view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// `None` = no color constraint. `Some(identity)` = exact-match
    /// constraint; `Some(colorless)` keeps only colorless records.
    pub colors: Option<ColorIdentity>,

    /// Inclusive mana-value bounds
    pub mana_value: ManaValueRange,

    /// Inclusive date window, `None` = no date constraint
    pub date_range: Option<DateWindow>,

    /// Tournaments to keep (any-overlap semantics); empty = all tournaments
    pub tournament_ids: HashSet<u64>,

    /// Title tier constraint
    pub tier: TitleTier,

    /// Case-insensitive substring over the display name; empty = no
    /// constraint
    pub name_query: String,

    /// Pinned commander name (exact, not a substring)
    pub exact_commander: Option<String>,

    /// Pinned partner name (exact)
    pub exact_partner: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy with an exact color-identity constraint.
    pub fn with_colors(mut self, colors: ColorIdentity) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Copy with inclusive mana-value bounds.
    pub fn with_mana_value(mut self, min: f64, max: f64) -> Self {
        self.mana_value = ManaValueRange::new(min, max);
        self
    }

    /// Copy with an inclusive date window.
    pub fn with_date_range(
        mut self,
        start: impl Into<RawDate>,
        end: impl Into<RawDate>,
    ) -> Self {
        self.date_range = Some(DateWindow::new(start, end));
        self
    }

    /// Copy constrained to the given tournaments.
    pub fn with_tournaments(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.tournament_ids = ids.into_iter().collect();
        self
    }

    /// Copy with a title-tier constraint.
    pub fn with_tier(mut self, tier: TitleTier) -> Self {
        self.tier = tier;
        self
    }

    /// Copy with a name substring query.
    pub fn with_name_query(mut self, query: impl Into<String>) -> Self {
        self.name_query = query.into();
        self
    }

    /// Copy pinned to an exact commander name.
    pub fn with_commander(mut self, name: impl Into<String>) -> Self {
        self.exact_commander = Some(name.into());
        self
    }

    /// Copy pinned to an exact partner name.
    pub fn with_partner(mut self, name: impl Into<String>) -> Self {
        self.exact_partner = Some(name.into());
        self
    }
}
