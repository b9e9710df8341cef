//! Backend fetching and response coordination.
//!
//! Raw record sets arrive once per data source from the statistics backend.
//! The coordinator keeps a generation counter per source so that responses
//! arriving out of order can never clobber newer data, and debounces
//! text-driven lookups so autocomplete traffic follows typing pauses rather
//! than keystrokes.

mod coordinator;
mod debounce;
mod remote;

pub use coordinator::{Coordinator, GenerationGate, SourceState, Ticket};
pub use debounce::Debouncer;
pub use remote::{
    CardMetricsRow, CommanderWinrateRow, DeckStatisticsRow, HttpStatsBackend, NameLookupRequest,
    StatsBackend, StatsRequest, TournamentRow,
};

use thiserror::Error;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
