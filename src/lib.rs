//! # Commander Metrics
//!
//! Tournament metrics engine for budget Commander formats: the filtering,
//! ranking, pagination, and fetch-coordination core behind a metrics
//! dashboard that ranks commanders and cards by tournament performance.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (entries, color identity, filter
//!   specifications)
//! - **filter**: Pure predicate evaluator over in-memory record sets
//! - **rank**: Stable sorting and card curation for the ranking tables
//! - **paginate**: Fixed-size page slicing
//! - **fetch**: Backend client, generation-gated response application,
//!   debounced lookups
//! - **view**: Per-dashboard state wiring the pipeline together
//! - **config**: Configuration loading and validation

pub mod config;
pub mod fetch;
pub mod filter;
pub mod models;
pub mod paginate;
pub mod rank;
pub mod view;

pub use models::*;
