//! Data models for the storage layer

use crate::cli::types::{MatchId, PlayerId, TeamId};
use crate::models::SideTotals;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a team: the same name may exist in several countries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamKey {
    pub name: String,
    pub country: String,
}

impl TeamKey {
    pub fn new(name: &str, country: &str) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
        }
    }

    /// National side for `country`; name and country are the same.
    pub fn national(country: &str) -> Self {
        Self::new(country, country)
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.country)
    }
}

/// Identity of a player: name alone collides across different people.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerKey {
    pub name: String,
    pub birth_date: NaiveDate,
}

impl PlayerKey {
    pub fn new(name: &str, birth_date: NaiveDate) -> Self {
        Self {
            name: name.to_string(),
            birth_date,
        }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (born {})", self.name, self.birth_date.format("%Y-%m-%d"))
    }
}

/// The closed set of identity lookups the store supports.
#[derive(Debug, Clone, Copy)]
pub enum EntityLookup<'a> {
    TeamByNameCountry(&'a TeamKey),
    PlayerByNameBirthDate(&'a PlayerKey),
}

/// Result of probing the store for an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome<T> {
    Missing,
    Found(T),
    /// More than one row matched an identity that should be unique.
    Ambiguous(Vec<T>),
}

impl<T> LookupOutcome<T> {
    pub fn map<U, F: Fn(T) -> U>(self, f: F) -> LookupOutcome<U> {
        match self {
            LookupOutcome::Missing => LookupOutcome::Missing,
            LookupOutcome::Found(v) => LookupOutcome::Found(f(v)),
            LookupOutcome::Ambiguous(vs) => LookupOutcome::Ambiguous(vs.into_iter().map(f).collect()),
        }
    }
}

/// Result of an insert that may hit a uniqueness or foreign-key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome<T> {
    Inserted(T),
    /// Nothing was written; `table` names where the constraint fired.
    Conflict { table: &'static str, message: String },
}

impl<T> InsertOutcome<T> {
    pub fn inserted(&self) -> Option<&T> {
        match self {
            InsertOutcome::Inserted(v) => Some(v),
            InsertOutcome::Conflict { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: TeamId,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub key: PlayerKey,
    pub team_id: TeamId,
    pub country_id: TeamId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    pub country_id: TeamId,
    pub birth_date: NaiveDate,
}

/// Match row to insert. `home`/`away` are the full-match counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMatch {
    pub kickoff: DateTime<Utc>,
    pub league: String,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home: SideTotals,
    pub away: SideTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayerStat {
    pub player_id: PlayerId,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub fouls_committed: u32,
    pub fouls_drawn: u32,
    pub saves: u32,
    pub is_starting: bool,
    pub minutes_played: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMatch {
    pub match_id: MatchId,
    pub kickoff: DateTime<Utc>,
    pub league: String,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home: SideTotals,
    pub away: SideTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPlayerStat {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub fouls_committed: u32,
    pub fouls_drawn: u32,
    pub saves: u32,
    pub is_starting: bool,
    pub minutes_played: u32,
}

/// A stored match with team names and its player-stat rows, for read-back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentMatch {
    #[serde(rename = "match")]
    pub match_row: StoredMatch,
    pub home_team: String,
    pub away_team: String,
    pub player_stats: Vec<StoredPlayerStat>,
}
