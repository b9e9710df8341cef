//! Backend wire types and HTTP client.
//!
//! The statistics backend speaks JSON over a handful of POST/GET endpoints.
//! [`StatsBackend`] is the seam the coordinator works against; tests and
//! offline tooling substitute their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::FetchError;
use crate::models::{CardUsageEntry, ColorIdentity, CommanderEntry, RawDate, Tournament};

/// Scope selector sent with the statistics queries. Empty means the
/// backend's full data set; filtering happens client-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsRequest {
    pub tournament_ids: Vec<u64>,
}

/// Row from `POST /decks/statistics`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeckStatisticsRow {
    pub commander: String,
    pub partner: Option<String>,
    pub colors: ColorIdentity,
    pub cmc: f64,
    pub date: RawDate,
    #[serde(default)]
    pub tournament_ids: Vec<u64>,
    pub entries: u32,
    pub top8: u32,
    pub top4: u32,
    pub champion: u32,
}

impl From<DeckStatisticsRow> for CommanderEntry {
    fn from(row: DeckStatisticsRow) -> Self {
        let mut entry = CommanderEntry::new(row.commander, row.colors)
            .with_mana_value(row.cmc)
            .with_entries(row.entries)
            .with_titles(row.top4, row.top8, row.champion)
            .with_tournaments(row.tournament_ids)
            .with_date(row.date);
        if let Some(partner) = row.partner {
            entry = entry.with_partner(partner);
        }
        entry
    }
}

/// Row from `POST /decks/statistics/commander-winrate`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommanderWinrateRow {
    pub id: u64,
    pub commander: String,
    pub partner: Option<String>,
    pub colors: ColorIdentity,
    pub winrate: Option<f64>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub entries: u32,
    pub champion: u32,
}

impl From<CommanderWinrateRow> for CommanderEntry {
    fn from(row: CommanderWinrateRow) -> Self {
        let mut entry = CommanderEntry::new(row.commander, row.colors)
            .with_entries(row.entries)
            .with_record(row.wins, row.losses, row.draws)
            .with_titles(0, 0, row.champion);
        entry.winrate = row.winrate;
        if let Some(partner) = row.partner {
            entry = entry.with_partner(partner);
        }
        entry
    }
}

/// Row from `POST /cards/metrics/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct CardMetricsRow {
    pub id: u64,
    pub name: String,
    pub colors: ColorIdentity,
    pub cmc: f64,
    #[serde(rename = "type")]
    pub type_line: String,
    pub quantity: u32,
    /// Backend-supplied percent; computed client-side when absent.
    pub percentage: Option<f64>,
    pub date: RawDate,
}

impl CardMetricsRow {
    /// Map into the model, computing the usage percent from
    /// `total_decks_in_scope` only when the backend did not supply one.
    pub fn into_entry(self, total_decks_in_scope: u32) -> CardUsageEntry {
        let percentage = self
            .percentage
            .unwrap_or_else(|| crate::models::round_percent(self.quantity, total_decks_in_scope));
        CardUsageEntry::new(self.id, self.name, self.colors)
            .with_mana_value(self.cmc)
            .with_type_line(self.type_line)
            .with_usage(self.quantity, percentage)
            .with_date(self.date)
    }
}

/// Row from `GET /tournaments/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct TournamentRow {
    pub id: u64,
    pub name: String,
    pub end_date: RawDate,
}

impl From<TournamentRow> for Tournament {
    fn from(row: TournamentRow) -> Self {
        Tournament::new(row.id, row.name, row.end_date)
    }
}

/// Body for the commander-name autocomplete lookup.
#[derive(Debug, Clone, Serialize)]
pub struct NameLookupRequest {
    pub name: String,
}

/// The statistics backend surface consumed by the coordinator.
#[async_trait]
pub trait StatsBackend: Send + Sync {
    async fn deck_statistics(
        &self,
        scope: &StatsRequest,
    ) -> Result<Vec<DeckStatisticsRow>, FetchError>;

    async fn commander_winrates(
        &self,
        scope: &StatsRequest,
    ) -> Result<Vec<CommanderWinrateRow>, FetchError>;

    async fn card_metrics(&self, scope: &StatsRequest)
        -> Result<Vec<CardMetricsRow>, FetchError>;

    async fn tournaments(&self) -> Result<Vec<TournamentRow>, FetchError>;

    /// Commander names matching a partial query, for the suggestion surface.
    async fn commander_names(&self, query: &str) -> Result<Vec<String>, FetchError>;
}

/// reqwest-backed implementation against the live backend.
pub struct HttpStatsBackend {
    client: Client,
    base_url: Url,
}

impl HttpStatsBackend {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|_| FetchError::InvalidUrl(format!("{}{}", self.base_url, path)))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl StatsBackend for HttpStatsBackend {
    async fn deck_statistics(
        &self,
        scope: &StatsRequest,
    ) -> Result<Vec<DeckStatisticsRow>, FetchError> {
        self.post_json("decks/statistics", scope).await
    }

    async fn commander_winrates(
        &self,
        scope: &StatsRequest,
    ) -> Result<Vec<CommanderWinrateRow>, FetchError> {
        self.post_json("decks/statistics/commander-winrate", scope)
            .await
    }

    async fn card_metrics(
        &self,
        scope: &StatsRequest,
    ) -> Result<Vec<CardMetricsRow>, FetchError> {
        self.post_json("cards/metrics/list", scope).await
    }

    async fn tournaments(&self) -> Result<Vec<TournamentRow>, FetchError> {
        self.get_json("tournaments/list").await
    }

    async fn commander_names(&self, query: &str) -> Result<Vec<String>, FetchError> {
        let body = NameLookupRequest {
            name: query.to_string(),
        };
        self.post_json("decks/statistics/commanders", &body).await
    }
}
