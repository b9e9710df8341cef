//! Tournament summary model.

use serde::{Deserialize, Serialize};

use super::RawDate;

/// A tournament as listed by the backend, used to populate the
/// tournament-membership filter control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: u64,
    pub name: String,
    pub end_date: RawDate,
}

impl Tournament {
    pub fn new(id: u64, name: impl Into<String>, end_date: impl Into<RawDate>) -> Self {
        Self {
            id,
            name: name.into(),
            end_date: end_date.into(),
        }
    }
}
