//! Filter engine.
//!
//! One parameterized predicate evaluator shared by every dashboard view.
//! Each entry kind exposes its filterable fields through [`FilterTarget`];
//! constraints whose data a kind does not carry are vacuously satisfied, so
//! view-specific behavior is configuration rather than duplicated logic.
//!
//! [`filter`] is pure: no side effects beyond diagnostics, input order
//! preserved, inputs treated as read-only.

use std::collections::HashSet;

use tracing::warn;

use crate::models::{
    CardUsageEntry, ColorIdentity, CommanderEntry, DateWindow, FilterSpec, RawDate, TitleTier,
};

/// Per-kind field access for the shared filter pass.
pub trait FilterTarget {
    /// Name shown in the ranking table; the substring query runs over this.
    fn display_name(&self) -> &str;

    /// Exact color identity.
    fn colors(&self) -> ColorIdentity;

    fn mana_value(&self) -> f64;

    /// Entry date as backend text.
    fn date(&self) -> &RawDate;

    /// `(top4, top8, champion)` counts, for kinds that track titles.
    fn title_counts(&self) -> Option<(u32, u32, u32)> {
        None
    }

    /// Contributing tournament ids, for kinds that track them.
    fn tournament_ids(&self) -> Option<&HashSet<u64>> {
        None
    }

    /// `(commander, partner)` names, for kinds that can be pinned to exact
    /// commander names.
    fn commander_names(&self) -> Option<(&str, Option<&str>)> {
        None
    }
}

impl FilterTarget for CommanderEntry {
    fn display_name(&self) -> &str {
        &self.commander
    }

    fn colors(&self) -> ColorIdentity {
        self.colors
    }

    fn mana_value(&self) -> f64 {
        self.mana_value
    }

    fn date(&self) -> &RawDate {
        &self.date
    }

    fn title_counts(&self) -> Option<(u32, u32, u32)> {
        Some((self.top4, self.top8, self.champion))
    }

    fn tournament_ids(&self) -> Option<&HashSet<u64>> {
        Some(&self.tournament_ids)
    }

    fn commander_names(&self) -> Option<(&str, Option<&str>)> {
        Some((&self.commander, self.partner.as_deref()))
    }
}

impl FilterTarget for CardUsageEntry {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn colors(&self) -> ColorIdentity {
        self.colors
    }

    fn mana_value(&self) -> f64 {
        self.mana_value
    }

    fn date(&self) -> &RawDate {
        &self.date
    }
}

/// Apply `spec` to `rows`, keeping order. Returns a new collection; the
/// input is never mutated.
pub fn filter<T: FilterTarget + Clone>(rows: &[T], spec: &FilterSpec) -> Vec<T> {
    rows.iter()
        .filter(|row| matches_spec(*row, spec))
        .cloned()
        .collect()
}

/// Evaluate every predicate for one row. All must pass.
pub fn matches_spec<T: FilterTarget>(row: &T, spec: &FilterSpec) -> bool {
    if is_placeholder_name(row.display_name()) {
        return false;
    }

    if !spec.name_query.is_empty()
        && !case_fold(row.display_name()).contains(&case_fold(&spec.name_query))
    {
        return false;
    }

    // Exact set equality. A colorless row matches only an empty constraint.
    if let Some(wanted) = spec.colors {
        if row.colors() != wanted {
            return false;
        }
    }

    if !spec.mana_value.contains(row.mana_value()) {
        return false;
    }

    if !matches_pinned_names(row, spec) {
        return false;
    }

    if !matches_tier(row, spec.tier) {
        return false;
    }

    if !matches_tournaments(row, &spec.tournament_ids) {
        return false;
    }

    if let Some(window) = &spec.date_range {
        if !within_date_window(row, window) {
            return false;
        }
    }

    true
}

/// The data source marks rows it could not attribute with a dash (or a
/// dash combination for commander pairs) instead of a name. Those rows are
/// never shown.
fn is_placeholder_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '-' || c.is_whitespace())
}

fn case_fold(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Pinned commander/partner names: exact match, unlike the substring query.
/// Kinds without commander names pass vacuously.
fn matches_pinned_names<T: FilterTarget>(row: &T, spec: &FilterSpec) -> bool {
    if spec.exact_commander.is_none() && spec.exact_partner.is_none() {
        return true;
    }
    let Some((commander, partner)) = row.commander_names() else {
        return true;
    };

    if let Some(wanted) = &spec.exact_commander {
        if !case_fold(commander).eq(&case_fold(wanted)) {
            return false;
        }
    }
    if let Some(wanted) = &spec.exact_partner {
        match partner {
            Some(partner) => {
                if !case_fold(partner).eq(&case_fold(wanted)) {
                    return false;
                }
            }
            None => return false,
        }
    }
    true
}

fn matches_tier<T: FilterTarget>(row: &T, tier: TitleTier) -> bool {
    if tier == TitleTier::All {
        return true;
    }
    let Some((top4, top8, champion)) = row.title_counts() else {
        return true;
    };
    match tier {
        TitleTier::All => true,
        TitleTier::Top4 => top4 > 0,
        TitleTier::Top8 => top8 > 0,
        TitleTier::Champion => champion > 0,
    }
}

/// Any common tournament id keeps the row (OR semantics, unlike the exact
/// color match). An empty constraint keeps everything.
fn matches_tournaments<T: FilterTarget>(row: &T, wanted: &HashSet<u64>) -> bool {
    if wanted.is_empty() {
        return true;
    }
    let Some(own) = row.tournament_ids() else {
        return true;
    };
    own.iter().any(|id| wanted.contains(id))
}

/// Inclusive date window check. Any parse failure (record date or either
/// bound) excludes the row rather than silently including it, with a
/// diagnostic so data-quality problems stay visible.
fn within_date_window<T: FilterTarget>(row: &T, window: &DateWindow) -> bool {
    let Some(date) = row.date().parse() else {
        warn!(
            row = row.display_name(),
            date = row.date().as_str(),
            "unparseable record date, excluding row"
        );
        return false;
    };
    let (Some(start), Some(end)) = (window.start.parse(), window.end.parse()) else {
        warn!(
            start = window.start.as_str(),
            end = window.end.as_str(),
            "unparseable date window bound, excluding rows"
        );
        return false;
    };
    date >= start && date <= end
}
