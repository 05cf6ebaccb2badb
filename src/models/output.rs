//! Output returned to callers of the ingestion entry points.

use super::scraped::MatchCandidate;
use crate::cli::types::SourcePlayerId;
use crate::storage::models::TeamKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupSlot {
    pub name: String,
    pub position: Option<String>,
    pub shirt_number: Option<u32>,
    pub substitute: bool,
}

/// Announced (or predicted) lineup for an upcoming fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineup {
    pub confirmed: bool,
    pub home_formation: Option<String>,
    pub away_formation: Option<String>,
    pub home: Vec<LineupSlot>,
    pub away: Vec<LineupSlot>,
}

/// A discovered fixture with whatever lineup data was available at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchWithLineup {
    #[serde(flatten)]
    pub candidate: MatchCandidate,
    pub lineup: Option<Lineup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub source_id: SourcePlayerId,
    pub name: String,
    pub team: Option<TeamKey>,
    pub country: String,
    pub birth_date: NaiveDate,
}
