//! Wire types for the statistics API responses.
//!
//! Only the fields the pipeline reads are modelled. Event listings are kept
//! as raw `Value`s at page level so a single malformed event does not sink
//! the whole page; each event is decoded on its own.

use serde::{Deserialize, Serialize};
use serde_json::Value;


/// One page of events: scheduled listings and team history share this shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsPage {
    #[serde(default)]
    pub events: Vec<Value>,
    #[serde(rename = "hasNextPage", default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Event {
    pub id: u64,
    #[serde(rename = "customId")]
    pub custom_id: String,
    pub slug: String,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(rename = "isAwarded", default)]
    pub is_awarded: Option<bool>,
    #[serde(rename = "hasEventPlayerStatistics", default)]
    pub has_event_player_statistics: Option<bool>,
    #[serde(rename = "startTimestamp")]
    pub start_timestamp: i64,
    pub tournament: Tournament,
    #[serde(rename = "homeTeam")]
    pub home_team: EventTeam,
    #[serde(rename = "awayTeam")]
    pub away_team: EventTeam,
}

impl Event {
    pub fn status_type(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.kind.as_str())
    }

    pub fn is_awarded(&self) -> bool {
        self.is_awarded.unwrap_or(false)
    }

    /// `{customId}_{id}_{slug}`, the identifier used in logs and dumps.
    pub fn composite_id(&self) -> String {
        format!("{}_{}_{}", self.custom_id, self.id, self.slug)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventStatus {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tournament {
    pub name: String,
    #[serde(rename = "uniqueTournament", default)]
    pub unique_tournament: Option<UniqueTournament>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UniqueTournament {
    #[serde(rename = "hasEventPlayerStatistics", default)]
    pub has_event_player_statistics: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventTeam {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub country: Country,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Country {
    #[serde(default)]
    pub name: Option<String>,
}

/// `event/{id}/lineups`
#[derive(Debug, Clone, Deserialize)]
pub struct LineupsResponse {
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub home: Option<LineupSide>,
    #[serde(default)]
    pub away: Option<LineupSide>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupSide {
    #[serde(default)]
    pub players: Vec<LineupEntry>,
    #[serde(default)]
    pub formation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupEntry {
    pub player: LineupPlayer,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub shirt_number: Option<u32>,
    #[serde(default)]
    pub substitute: bool,
    #[serde(default)]
    pub statistics: Option<PlayerStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupPlayer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub country: Country,
    #[serde(default)]
    pub date_of_birth_timestamp: Option<i64>,
}

/// Per-player counters inside a lineup entry. Absent counters mean zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStatistics {
    pub minutes_played: u32,
    pub blocked_scoring_attempt: u32,
    pub shot_off_target: u32,
    pub on_target_scoring_attempt: u32,
    pub goal_assist: u32,
    pub goals: u32,
    pub fouls: u32,
    pub was_fouled: u32,
    pub saves: u32,
}

/// `event/{id}/statistics`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatisticsResponse {
    #[serde(default)]
    pub statistics: Vec<StatisticsPeriod>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsPeriod {
    pub period: String,
    #[serde(default)]
    pub groups: Vec<StatisticsGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsGroup {
    #[serde(rename = "groupName")]
    pub group_name: String,
    #[serde(rename = "statisticsItems", default)]
    pub statistics_items: Vec<StatisticsItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsItem {
    pub name: String,
    #[serde(default)]
    pub home: Option<Value>,
    #[serde(default)]
    pub away: Option<Value>,
    #[serde(rename = "homeValue", default)]
    pub home_value: Option<f64>,
    #[serde(rename = "awayValue", default)]
    pub away_value: Option<f64>,
}

impl StatisticsItem {
    pub fn home_count(&self) -> u32 {
        count_value(self.home_value, self.home.as_ref())
    }

    pub fn away_count(&self) -> u32 {
        count_value(self.away_value, self.away.as_ref())
    }
}

/// Numeric `*Value` wins; otherwise read the display value, which may be a
/// bare number or a string such as `"7"` or `"7 (2)"`.
fn count_value(numeric: Option<f64>, display: Option<&Value>) -> u32 {
    if let Some(n) = numeric {
        return n.max(0.0).round() as u32;
    }
    match display {
        Some(Value::Number(n)) => n.as_f64().map(|f| f.max(0.0).round() as u32).unwrap_or(0),
        Some(Value::String(s)) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// `player/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerResponse {
    pub player: PlayerDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub team: Option<PlayerTeam>,
    #[serde(default)]
    pub country: Country,
    #[serde(default)]
    pub date_of_birth_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerTeam {
    pub name: String,
    #[serde(default)]
    pub country: Country,
}
