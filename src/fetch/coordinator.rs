//! Fetch coordination.
//!
//! Each logical query source keeps a monotonically increasing generation
//! counter. Every fetch captures a ticket at issue time; a response is
//! committed only while its ticket is still current, so a slow early
//! response can never overwrite the result of a later request. Discarding is
//! silent; staleness is not an error.
//!
//! There is no cancellation of in-flight HTTP requests; only the
//! response-application step is gated.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use super::debounce::Debouncer;
use super::remote::{StatsBackend, StatsRequest};
use crate::models::{CardUsageEntry, CommanderEntry, Tournament};

/// Generation captured when a fetch was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic generation counter for one query source.
#[derive(Debug, Default)]
pub struct GenerationGate {
    counter: AtomicU64,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and capture it.
    pub fn issue(&self) -> Ticket {
        Ticket(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a response carrying `ticket` is still the newest request.
    pub fn admits(&self, ticket: Ticket) -> bool {
        ticket.0 == self.counter.load(Ordering::SeqCst)
    }
}

/// In-memory rows for one query source, replaced wholesale on each
/// committed response and never mutated in place.
#[derive(Debug, Default)]
pub struct SourceState<T> {
    gate: GenerationGate,
    rows: RwLock<Vec<T>>,
}

impl<T: Clone> SourceState<T> {
    pub fn new() -> Self {
        Self {
            gate: GenerationGate::new(),
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Capture a ticket for a fetch that is about to start.
    pub fn issue(&self) -> Ticket {
        self.gate.issue()
    }

    /// Apply a response if its ticket is still current. Returns whether the
    /// rows were accepted; a stale response is dropped silently.
    pub fn commit(&self, ticket: Ticket, rows: Vec<T>) -> bool {
        if !self.gate.admits(ticket) {
            debug!("discarding stale response");
            return false;
        }
        *self.rows.write().expect("source state poisoned") = rows;
        true
    }

    /// Current rows, cloned. Callers filter the clone; the source copy is
    /// read-only for them.
    pub fn snapshot(&self) -> Vec<T> {
        self.rows.read().expect("source state poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.rows.read().expect("source state poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Issues the one outstanding request per data source and applies only
/// non-stale responses. Network failures degrade to an empty committed
/// result; the caller sees "no data", never an exception.
pub struct Coordinator {
    backend: Arc<dyn StatsBackend>,
    pub commanders: SourceState<CommanderEntry>,
    pub winrates: SourceState<CommanderEntry>,
    pub cards: SourceState<CardUsageEntry>,
    pub tournaments: SourceState<Tournament>,
    suggest_gate: GenerationGate,
    debouncer: Debouncer,
}

impl Coordinator {
    pub fn new(backend: Arc<dyn StatsBackend>, debouncer: Debouncer) -> Self {
        Self {
            backend,
            commanders: SourceState::new(),
            winrates: SourceState::new(),
            cards: SourceState::new(),
            tournaments: SourceState::new(),
            suggest_gate: GenerationGate::new(),
            debouncer,
        }
    }

    /// Refresh the per-deck statistics source. Returns whether the response
    /// was applied (false = superseded by a newer request).
    pub async fn refresh_commanders(&self, scope: &StatsRequest) -> bool {
        let ticket = self.commanders.issue();
        let rows = match self.backend.deck_statistics(scope).await {
            Ok(rows) => rows.into_iter().map(CommanderEntry::from).collect(),
            Err(err) => {
                warn!(error = %err, "deck statistics fetch failed");
                Vec::new()
            }
        };
        self.commanders.commit(ticket, rows)
    }

    /// Refresh the commander win-rate source.
    pub async fn refresh_winrates(&self, scope: &StatsRequest) -> bool {
        let ticket = self.winrates.issue();
        let rows = match self.backend.commander_winrates(scope).await {
            Ok(rows) => rows.into_iter().map(CommanderEntry::from).collect(),
            Err(err) => {
                warn!(error = %err, "commander winrate fetch failed");
                Vec::new()
            }
        };
        self.winrates.commit(ticket, rows)
    }

    /// Refresh the card metrics source. The scope's deck count feeds the
    /// percentage fallback for rows the backend left uncomputed.
    pub async fn refresh_cards(&self, scope: &StatsRequest, total_decks_in_scope: u32) -> bool {
        let ticket = self.cards.issue();
        let rows = match self.backend.card_metrics(scope).await {
            Ok(rows) => rows
                .into_iter()
                .map(|row| row.into_entry(total_decks_in_scope))
                .collect(),
            Err(err) => {
                warn!(error = %err, "card metrics fetch failed");
                Vec::new()
            }
        };
        self.cards.commit(ticket, rows)
    }

    /// Refresh the tournament list source.
    pub async fn refresh_tournaments(&self) -> bool {
        let ticket = self.tournaments.issue();
        let rows = match self.backend.tournaments().await {
            Ok(rows) => rows.into_iter().map(Tournament::from).collect(),
            Err(err) => {
                warn!(error = %err, "tournament list fetch failed");
                Vec::new()
            }
        };
        self.tournaments.commit(ticket, rows)
    }

    /// Commander-name suggestions for the autocomplete surface.
    ///
    /// Debounced: the lookup fires only once the input has been stable for
    /// the configured quiet period and meets the minimum length. Returns
    /// `None` when this keystroke was superseded or its response arrived
    /// stale.
    pub async fn suggest_commanders(&self, query: &str) -> Option<Vec<String>> {
        self.debouncer.settle(query).await?;

        let ticket = self.suggest_gate.issue();
        let names = match self.backend.commander_names(query).await {
            Ok(names) => names,
            Err(err) => {
                warn!(error = %err, "commander name lookup failed");
                Vec::new()
            }
        };
        self.suggest_gate.admits(ticket).then_some(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::remote::{
        CardMetricsRow, CommanderWinrateRow, DeckStatisticsRow, TournamentRow,
    };
    use crate::fetch::FetchError;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[test]
    fn test_gate_admits_only_latest() {
        let gate = GenerationGate::new();
        let first = gate.issue();
        assert!(gate.admits(first));

        let second = gate.issue();
        assert!(!gate.admits(first));
        assert!(gate.admits(second));
    }

    #[test]
    fn test_source_state_commit_and_snapshot() {
        let state: SourceState<u32> = SourceState::new();
        let ticket = state.issue();
        assert!(state.commit(ticket, vec![1, 2, 3]));
        assert_eq!(state.snapshot(), vec![1, 2, 3]);
    }

    #[test]
    fn test_stale_commit_is_dropped() {
        let state: SourceState<u32> = SourceState::new();
        let old = state.issue();
        let new = state.issue();

        // Old response arrives after the newer request was issued.
        assert!(!state.commit(old, vec![1]));
        assert!(state.snapshot().is_empty());

        assert!(state.commit(new, vec![2]));
        assert_eq!(state.snapshot(), vec![2]);
    }

    #[test]
    fn test_slow_early_response_cannot_overwrite_later_one() {
        let state: SourceState<u32> = SourceState::new();
        let gen1 = state.issue();
        let gen2 = state.issue();

        // Generation 2 resolves first, generation 1 trails in afterwards.
        assert!(state.commit(gen2, vec![22]));
        assert!(!state.commit(gen1, vec![11]));
        assert_eq!(state.snapshot(), vec![22]);
    }

    /// Backend whose deck-statistics responses block until the gate for
    /// their scope id is released, so overlap orderings are deterministic.
    struct BlockingBackend {
        gates: Vec<Arc<Notify>>,
    }

    fn stats_row(commander: &str, entries: u32) -> DeckStatisticsRow {
        serde_json::from_value(serde_json::json!({
            "commander": commander,
            "partner": null,
            "colors": ["R"],
            "cmc": 4,
            "date": "01/01/2024",
            "tournament_ids": [],
            "entries": entries,
            "top8": 0,
            "top4": 0,
            "champion": 0
        }))
        .unwrap()
    }

    #[async_trait]
    impl StatsBackend for BlockingBackend {
        async fn deck_statistics(
            &self,
            scope: &StatsRequest,
        ) -> Result<Vec<DeckStatisticsRow>, FetchError> {
            let call = scope.tournament_ids[0] as usize;
            self.gates[call].notified().await;
            Ok(vec![stats_row(&format!("Response {call}"), call as u32 + 1)])
        }

        async fn commander_winrates(
            &self,
            _scope: &StatsRequest,
        ) -> Result<Vec<CommanderWinrateRow>, FetchError> {
            Ok(Vec::new())
        }

        async fn card_metrics(
            &self,
            _scope: &StatsRequest,
        ) -> Result<Vec<CardMetricsRow>, FetchError> {
            Ok(Vec::new())
        }

        async fn tournaments(&self) -> Result<Vec<TournamentRow>, FetchError> {
            Ok(Vec::new())
        }

        async fn commander_names(&self, _query: &str) -> Result<Vec<String>, FetchError> {
            Ok(Vec::new())
        }
    }

    /// Backend that always fails.
    struct FailingBackend;

    #[async_trait]
    impl StatsBackend for FailingBackend {
        async fn deck_statistics(
            &self,
            _scope: &StatsRequest,
        ) -> Result<Vec<DeckStatisticsRow>, FetchError> {
            Err(FetchError::HttpStatus {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        }

        async fn commander_winrates(
            &self,
            _scope: &StatsRequest,
        ) -> Result<Vec<CommanderWinrateRow>, FetchError> {
            Err(FetchError::HttpStatus {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        }

        async fn card_metrics(
            &self,
            _scope: &StatsRequest,
        ) -> Result<Vec<CardMetricsRow>, FetchError> {
            Err(FetchError::HttpStatus {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        }

        async fn tournaments(&self) -> Result<Vec<TournamentRow>, FetchError> {
            Err(FetchError::HttpStatus {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        }

        async fn commander_names(&self, _query: &str) -> Result<Vec<String>, FetchError> {
            Err(FetchError::HttpStatus {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        }
    }

    fn test_debouncer() -> Debouncer {
        Debouncer::new(Duration::from_millis(0), 2)
    }

    #[tokio::test]
    async fn test_overlapping_fetches_latest_wins() {
        let gates = vec![Arc::new(Notify::new()), Arc::new(Notify::new())];
        let backend = Arc::new(BlockingBackend {
            gates: gates.clone(),
        });
        let coordinator = Arc::new(Coordinator::new(backend, test_debouncer()));

        let scope = |call: u64| StatsRequest {
            tournament_ids: vec![call],
        };

        let c1 = coordinator.clone();
        let fetch1 = tokio::spawn(async move { c1.refresh_commanders(&scope(0)).await });
        // Make sure fetch 1 issued its ticket before fetch 2 starts.
        tokio::task::yield_now().await;

        let c2 = coordinator.clone();
        let fetch2 = tokio::spawn(async move { c2.refresh_commanders(&scope(1)).await });
        tokio::task::yield_now().await;

        // Generation 2 resolves first; generation 1 trails in afterwards
        // and must be discarded.
        gates[1].notify_one();
        let applied2 = fetch2.await.unwrap();
        gates[0].notify_one();
        let applied1 = fetch1.await.unwrap();

        assert!(applied2);
        assert!(!applied1);
        let rows = coordinator.commanders.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].commander, "Response 1");
    }

    #[tokio::test]
    async fn test_failed_fetch_degrades_to_empty() {
        let coordinator = Coordinator::new(Arc::new(FailingBackend), test_debouncer());

        assert!(coordinator.refresh_commanders(&StatsRequest::default()).await);
        assert!(coordinator.commanders.is_empty());

        assert!(coordinator.refresh_tournaments().await);
        assert!(coordinator.tournaments.is_empty());
    }

    #[test]
    fn test_suggest_rejects_short_query() {
        let coordinator = Coordinator::new(Arc::new(FailingBackend), test_debouncer());
        let result = tokio_test::block_on(coordinator.suggest_commanders("a"));
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_suggest_failure_degrades_to_empty_list() {
        let coordinator = Coordinator::new(Arc::new(FailingBackend), test_debouncer());
        assert_eq!(coordinator.suggest_commanders("kren").await, Some(Vec::new()));
    }
}
