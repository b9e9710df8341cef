//! Dashboard view state.
//!
//! One `MetricsView` per ranking table. It owns the raw rows (fetched once,
//! read-only thereafter), the active filter specification, and the sort and
//! page state, and re-runs the synchronous
//! filter → curate → rank → paginate pipeline on every change. The data
//! sizes involved are hundreds of rows, so the full pipeline runs on every
//! keystroke-triggered re-filter.
//!
//! Policy owned here, not by the pipeline functions: replacing the filter
//! specification or the page size resets the page to 1.

use crate::filter::{filter, FilterTarget};
use crate::models::{CardUsageEntry, CommanderEntry, FilterSpec};
use crate::paginate::{paginate, Page};
use crate::rank::{is_reportable, rank, Direction, Rankable, SortKey};

/// State for one ranking table.
#[derive(Debug, Clone)]
pub struct MetricsView<T> {
    rows: Vec<T>,
    spec: FilterSpec,
    sort_key: SortKey,
    direction: Direction,
    page: u32,
    page_size: u32,
    /// Curation pass between filtering and ranking (card views).
    curation: Option<fn(&T) -> bool>,
    suggestions_open: bool,
}

impl<T> MetricsView<T>
where
    T: FilterTarget + Rankable + Clone,
{
    pub fn new(rows: Vec<T>, sort_key: SortKey, page_size: u32) -> Self {
        Self {
            rows,
            spec: FilterSpec::default(),
            sort_key,
            direction: Direction::Desc,
            page: 1,
            page_size: page_size.max(1),
            curation: None,
            suggestions_open: false,
        }
    }

    /// Attach a curation predicate applied after filtering, before ranking.
    pub fn with_curation(mut self, keep: fn(&T) -> bool) -> Self {
        self.curation = Some(keep);
        self
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Replace the raw rows after a committed fetch. The view never mutates
    /// rows in place; a fresh collection arrives wholesale.
    pub fn replace_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.page = 1;
    }

    /// Replace the filter specification wholesale. Resets the page.
    pub fn set_spec(&mut self, spec: FilterSpec) {
        self.spec = spec;
        self.page = 1;
    }

    /// Change the sort order. Keeps the current page: only filter criteria
    /// and page size reset it.
    pub fn set_sort(&mut self, key: SortKey, direction: Direction) {
        self.sort_key = key;
        self.direction = direction;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Change the page size. Resets the page.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Run the pipeline against the current state.
    pub fn current(&self) -> Page<T> {
        let mut kept = filter(&self.rows, &self.spec);
        if let Some(keep) = self.curation {
            kept.retain(|row| keep(row));
        }
        let ranked = rank(kept, self.sort_key, self.direction);
        paginate(&ranked, self.page, self.page_size)
    }

    // ── Suggestion surface ──────────────────────────────────────

    pub fn open_suggestions(&mut self) {
        self.suggestions_open = true;
    }

    /// Close the suggestion surface (outside click or focus change). This
    /// is pure view state; any in-flight lookup keeps running and is gated
    /// by the coordinator, not by us.
    pub fn close_suggestions(&mut self) {
        self.suggestions_open = false;
    }

    pub fn suggestions_open(&self) -> bool {
        self.suggestions_open
    }
}

/// View over commander performance rows.
pub fn commander_view(rows: Vec<CommanderEntry>, page_size: u32) -> MetricsView<CommanderEntry> {
    MetricsView::new(rows, SortKey::Winrate, page_size)
}

/// View over card usage rows, with the staple/land curation attached.
pub fn card_view(rows: Vec<CardUsageEntry>, page_size: u32) -> MetricsView<CardUsageEntry> {
    MetricsView::new(rows, SortKey::Percentage, page_size).with_curation(is_reportable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, ColorIdentity, TitleTier};
    use pretty_assertions::assert_eq;

    fn commanders() -> Vec<CommanderEntry> {
        (0..25)
            .map(|i| {
                CommanderEntry::new(
                    format!("Commander {i:02}"),
                    ColorIdentity::of(&[Color::Red]),
                )
                .with_entries(10)
                .with_record(i, 10 - i.min(10), 0)
                .with_titles(1, 1, u32::from(i % 2 == 0))
                .with_date("15/06/2024")
            })
            .collect()
    }

    #[test]
    fn test_pipeline_filters_ranks_and_pages() {
        let mut view = commander_view(commanders(), 10);
        view.set_sort(SortKey::Wins, Direction::Desc);

        let page = view.current();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].commander, "Commander 24");
    }

    #[test]
    fn test_spec_replacement_resets_page() {
        let mut view = commander_view(commanders(), 10);
        view.set_page(3);
        assert_eq!(view.page(), 3);

        view.set_spec(FilterSpec::new().with_tier(TitleTier::Champion));
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut view = commander_view(commanders(), 10);
        view.set_page(2);
        view.set_page_size(5);
        assert_eq!(view.page(), 1);
        assert_eq!(view.current().total_pages, 5);
    }

    #[test]
    fn test_sort_change_keeps_page() {
        let mut view = commander_view(commanders(), 10);
        view.set_page(2);
        view.set_sort(SortKey::Name, Direction::Asc);
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn test_replace_rows_resets_page() {
        let mut view = commander_view(commanders(), 10);
        view.set_page(3);
        view.replace_rows(commanders());
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_filtered_pages_are_reproducible() {
        let mut view = commander_view(commanders(), 10);
        view.set_spec(FilterSpec::new().with_tier(TitleTier::Champion));
        view.set_sort(SortKey::Entries, Direction::Desc); // all tie on entries

        let first = view.current();
        let second = view.current();
        let names =
            |page: &Page<CommanderEntry>| -> Vec<String> {
                page.items.iter().map(|c| c.commander.clone()).collect()
            };
        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn test_card_view_applies_curation() {
        let cards = vec![
            CardUsageEntry::new(1, "Sol Ring", ColorIdentity::COLORLESS)
                .with_type_line("Artifact")
                .with_usage(50, 98.0)
                .with_date("01/01/2024"),
            CardUsageEntry::new(2, "Counterspell", ColorIdentity::of(&[Color::Blue]))
                .with_type_line("Instant")
                .with_usage(30, 59.0)
                .with_date("01/01/2024"),
        ];

        let view = card_view(cards, 10);
        let page = view.current();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Counterspell");
    }

    #[test]
    fn test_closing_suggestions_is_pure_view_state() {
        let mut view = commander_view(Vec::new(), 10);
        view.open_suggestions();
        assert!(view.suggestions_open());
        view.close_suggestions();
        assert!(!view.suggestions_open());
    }
}
