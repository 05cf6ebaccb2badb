//! Records produced by discovery, backfill and aggregation.
//!
//! These are what gets dumped to the side file and what the resolver and
//! writer consume. Dates serialize as ISO-8601 strings.

use crate::cli::types::{EventId, SourcePlayerId, SourceTeamId};
use crate::storage::models::{PlayerKey, TeamKey};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a fixture a team or player belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

/// A team as it appears on a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamRef {
    pub source_id: SourceTeamId,
    pub name: String,
    pub country: String,
}

impl TeamRef {
    pub fn key(&self) -> TeamKey {
        TeamKey::new(&self.name, &self.country)
    }
}

/// A fixture worth fetching full statistics for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub event_id: EventId,
    pub custom_id: String,
    pub slug: String,
    pub home: TeamRef,
    pub away: TeamRef,
    pub league: String,
    pub start_time: DateTime<Utc>,
}

impl MatchCandidate {
    /// `{customId}_{id}_{slug}`
    pub fn composite_id(&self) -> String {
        format!("{}_{}_{}", self.custom_id, self.event_id, self.slug)
    }

    pub fn team(&self, side: Side) -> &TeamRef {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

/// One player's line for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLine {
    pub source_id: SourcePlayerId,
    pub name: String,
    pub country: String,
    pub birth_date: NaiveDate,
    pub is_starting: bool,
    pub minutes_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub fouls_committed: u32,
    pub fouls_drawn: u32,
    pub saves: u32,
}

impl PlayerLine {
    pub fn key(&self) -> PlayerKey {
        PlayerKey::new(&self.name, self.birth_date)
    }

    /// National side the player represents, stored as a team named after the country.
    pub fn country_key(&self) -> TeamKey {
        TeamKey::national(&self.country)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatsBySide {
    pub home: Vec<PlayerLine>,
    pub away: Vec<PlayerLine>,
}

impl PlayerStatsBySide {
    pub fn is_empty(&self) -> bool {
        self.home.is_empty() && self.away.is_empty()
    }

    pub fn len(&self) -> usize {
        self.home.len() + self.away.len()
    }

    pub fn side(&self, side: Side) -> &[PlayerLine] {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &PlayerLine)> {
        self.home
            .iter()
            .map(|p| (Side::Home, p))
            .chain(self.away.iter().map(|p| (Side::Away, p)))
    }
}

/// One side's counters for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideTotals {
    pub corners: u32,
    pub fouls: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub total_shots: u32,
    pub shots_on_target: u32,
    pub total_saves: u32,
}

/// Counters for one period. `ALL` is the full match; others are halves or extra time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub period: String,
    pub home: SideTotals,
    pub away: SideTotals,
}

pub const FULL_MATCH_PERIOD: &str = "ALL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub periods: Vec<PeriodStats>,
    /// How many of the required statistic groups were present, across periods.
    pub required_groups: u8,
}

impl MatchStatistics {
    pub fn full_match(&self) -> Option<&PeriodStats> {
        self.periods.iter().find(|p| p.period == FULL_MATCH_PERIOD)
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// A candidate with both match-level and player-level statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteMatchRecord {
    #[serde(rename = "match")]
    pub candidate: MatchCandidate,
    pub statistics: MatchStatistics,
    pub player_stats: PlayerStatsBySide,
}
