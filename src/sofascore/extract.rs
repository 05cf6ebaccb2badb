//! Turning decoded API responses into pipeline records.

use super::types::{
    Event, EventTeam, EventsPage, LineupEntry, LineupSide, LineupsResponse, PlayerResponse,
    StatisticsItem, StatisticsResponse,
};
use crate::cli::types::{EventId, SourcePlayerId, SourceTeamId};
use crate::error::{IngestError, Result};
use crate::models::{
    Lineup, LineupSlot, MatchCandidate, MatchStatistics, PeriodStats, PlayerLine, PlayerProfile,
    PlayerStatsBySide, SideTotals, TeamRef, FULL_MATCH_PERIOD,
};
use crate::storage::models::TeamKey;
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::warn;

#[cfg(test)]
mod tests;

/// Lineup entries before this index are the starting eleven.
pub const MAX_STARTING_PLAYERS: usize = 11;

/// Placeholder for players and countries the API leaves blank.
pub const UNKNOWN_COUNTRY: &str = "NA";

pub const STATUS_NOT_STARTED: &str = "notstarted";
pub const STATUS_FINISHED: &str = "finished";

const OVERVIEW_GROUP: &str = "Match overview";
const SHOTS_GROUP: &str = "Shots";
const GOALKEEPING_GROUP: &str = "Goalkeeping";

/// A match needs at least this many of the groups above to be kept.
pub const REQUIRED_GROUP_COUNT: u8 = 3;

/// Birth date recorded when the API has none: 1900-01-01.
pub fn sentinel_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn birth_date_from_timestamp(timestamp: Option<i64>) -> NaiveDate {
    timestamp
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.date_naive())
        .unwrap_or_else(sentinel_birth_date)
}

/// Calendar date of an event in the local timezone.
pub fn event_local_date(start_timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(start_timestamp, 0).map(|utc| utc.with_timezone(&Local).date_naive())
}

/// Decode each event of a page on its own, skipping malformed entries.
pub fn parse_events(page: &EventsPage) -> Vec<Event> {
    page.events
        .iter()
        .filter_map(|raw| match serde_json::from_value::<Event>(raw.clone()) {
            Ok(event) => Some(event),
            Err(e) => {
                let id = raw.get("id").and_then(|v| v.as_u64()).unwrap_or_default();
                warn!(event_id = id, error = %e, "Skipping malformed event");
                None
            }
        })
        .collect()
}

fn tournament_has_player_statistics(event: &Event) -> bool {
    event
        .tournament
        .unique_tournament
        .as_ref()
        .map(|t| t.has_event_player_statistics)
        .unwrap_or(false)
}

/// Event-level flag when the API sends one, otherwise the tournament's.
pub fn has_player_statistics(event: &Event) -> bool {
    event
        .has_event_player_statistics
        .unwrap_or_else(|| tournament_has_player_statistics(event))
}

/// Upcoming on `date`, not awarded, in a tournament that records player statistics.
pub fn is_scheduled_with_stats(event: &Event, date: NaiveDate) -> bool {
    event_local_date(event.start_timestamp) == Some(date)
        && event.status_type() == Some(STATUS_NOT_STARTED)
        && !event.is_awarded()
        && tournament_has_player_statistics(event)
}

/// Played to completion, not awarded, with player statistics.
pub fn is_finished_with_stats(event: &Event) -> bool {
    event.status_type() == Some(STATUS_FINISHED)
        && !event.is_awarded()
        && has_player_statistics(event)
}

fn team_ref(team: &EventTeam, side: &str, event: &Event, require_country: bool) -> Result<TeamRef> {
    let country = match (&team.country.name, require_country) {
        (Some(name), _) => name.clone(),
        (None, false) => UNKNOWN_COUNTRY.to_string(),
        (None, true) => {
            return Err(IngestError::MissingField {
                field: format!("{side}.country.name"),
                context: event.composite_id(),
            })
        }
    };
    Ok(TeamRef {
        source_id: SourceTeamId::new(team.id),
        name: team.name.clone(),
        country,
    })
}

/// Build a candidate from an event.
///
/// With `require_country` unset, a team without a country is filed under
/// [`UNKNOWN_COUNTRY`]; with it set, the event is rejected instead.
pub fn candidate_from_event(event: &Event, require_country: bool) -> Result<MatchCandidate> {
    let start_time: DateTime<Utc> =
        DateTime::from_timestamp(event.start_timestamp, 0).ok_or_else(|| {
            IngestError::MissingField {
                field: "startTimestamp".to_string(),
                context: event.composite_id(),
            }
        })?;

    Ok(MatchCandidate {
        event_id: EventId::new(event.id),
        custom_id: event.custom_id.clone(),
        slug: event.slug.clone(),
        home: team_ref(&event.home_team, "homeTeam", event, require_country)?,
        away: team_ref(&event.away_team, "awayTeam", event, require_country)?,
        league: event.tournament.name.clone(),
        start_time,
    })
}

fn player_line(entry: &LineupEntry, index: usize, composite_id: &str) -> Result<PlayerLine> {
    let stats = entry
        .statistics
        .as_ref()
        .ok_or_else(|| IngestError::NoPlayerStatistics {
            player: format!("{} in {}", entry.player.name, composite_id),
        })?;

    Ok(PlayerLine {
        source_id: SourcePlayerId::new(entry.player.id),
        name: entry.player.name.clone(),
        country: entry
            .player
            .country
            .name
            .clone()
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        birth_date: birth_date_from_timestamp(entry.player.date_of_birth_timestamp),
        is_starting: index < MAX_STARTING_PLAYERS,
        minutes_played: stats.minutes_played,
        goals: stats.goals,
        assists: stats.goal_assist,
        shots: stats.blocked_scoring_attempt + stats.shot_off_target + stats.on_target_scoring_attempt,
        shots_on_target: stats.on_target_scoring_attempt,
        fouls_committed: stats.fouls,
        fouls_drawn: stats.was_fouled,
        saves: stats.saves,
    })
}

fn side_lines(side: Option<&LineupSide>, composite_id: &str) -> Result<Vec<PlayerLine>> {
    side.map(|s| s.players.as_slice())
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(idx, entry)| player_line(entry, idx, composite_id))
        .collect()
}

/// Per-player lines for both sides. One player without statistics fails the match.
pub fn extract_player_stats(
    lineups: &LineupsResponse,
    composite_id: &str,
) -> Result<PlayerStatsBySide> {
    Ok(PlayerStatsBySide {
        home: side_lines(lineups.home.as_ref(), composite_id)?,
        away: side_lines(lineups.away.as_ref(), composite_id)?,
    })
}

fn assign(item: &StatisticsItem, home: &mut u32, away: &mut u32) {
    *home = item.home_count();
    *away = item.away_count();
}

/// Match-level counters per period.
///
/// Each "Match overview", "Shots" or "Goalkeeping" group seen, in any
/// period, counts toward [`REQUIRED_GROUP_COUNT`]. A response without an
/// `ALL` period has no full-match counters and is rejected.
pub fn extract_match_statistics(response: &StatisticsResponse) -> Result<MatchStatistics> {
    let mut tally: u8 = 0;
    let mut periods = Vec::with_capacity(response.statistics.len());

    for period in &response.statistics {
        let mut home = SideTotals::default();
        let mut away = SideTotals::default();

        for group in &period.groups {
            let known = matches!(
                group.group_name.as_str(),
                OVERVIEW_GROUP | SHOTS_GROUP | GOALKEEPING_GROUP
            );
            if !known {
                continue;
            }
            tally = tally.saturating_add(1);

            for item in &group.statistics_items {
                match (group.group_name.as_str(), item.name.as_str()) {
                    (OVERVIEW_GROUP, "Corner kicks") => assign(item, &mut home.corners, &mut away.corners),
                    (OVERVIEW_GROUP, "Fouls") => assign(item, &mut home.fouls, &mut away.fouls),
                    (OVERVIEW_GROUP, "Yellow cards") => {
                        assign(item, &mut home.yellow_cards, &mut away.yellow_cards)
                    }
                    (OVERVIEW_GROUP, "Red cards") => {
                        assign(item, &mut home.red_cards, &mut away.red_cards)
                    }
                    (SHOTS_GROUP, "Total shots") => {
                        assign(item, &mut home.total_shots, &mut away.total_shots)
                    }
                    (SHOTS_GROUP, "Shots on target") => {
                        assign(item, &mut home.shots_on_target, &mut away.shots_on_target)
                    }
                    (GOALKEEPING_GROUP, "Total saves") => {
                        assign(item, &mut home.total_saves, &mut away.total_saves)
                    }
                    _ => {}
                }
            }
        }

        periods.push(PeriodStats {
            period: period.period.clone(),
            home,
            away,
        });
    }

    if tally < REQUIRED_GROUP_COUNT {
        return Err(IngestError::InsufficientStatistics { groups: tally });
    }

    let statistics = MatchStatistics {
        periods,
        required_groups: tally,
    };
    if statistics.full_match().is_none() {
        warn!(periods = statistics.periods.len(), "No {} period in match statistics", FULL_MATCH_PERIOD);
        return Err(IngestError::InsufficientStatistics { groups: 0 });
    }
    Ok(statistics)
}

fn lineup_slots(side: Option<&LineupSide>) -> Vec<LineupSlot> {
    side.map(|s| {
        s.players
            .iter()
            .map(|entry| LineupSlot {
                name: entry.player.name.clone(),
                position: entry
                    .position
                    .clone()
                    .or_else(|| entry.player.position.clone()),
                shirt_number: entry.shirt_number,
                substitute: entry.substitute,
            })
            .collect()
    })
    .unwrap_or_default()
}

pub fn extract_lineup(lineups: &LineupsResponse) -> Lineup {
    Lineup {
        confirmed: lineups.confirmed,
        home_formation: lineups.home.as_ref().and_then(|s| s.formation.clone()),
        away_formation: lineups.away.as_ref().and_then(|s| s.formation.clone()),
        home: lineup_slots(lineups.home.as_ref()),
        away: lineup_slots(lineups.away.as_ref()),
    }
}

pub fn extract_player_profile(response: &PlayerResponse) -> PlayerProfile {
    let player = &response.player;
    PlayerProfile {
        source_id: SourcePlayerId::new(player.id),
        name: player.name.clone(),
        team: player.team.as_ref().map(|t| {
            TeamKey::new(
                &t.name,
                t.country.name.as_deref().unwrap_or(UNKNOWN_COUNTRY),
            )
        }),
        country: player
            .country
            .name
            .clone()
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        birth_date: birth_date_from_timestamp(player.date_of_birth_timestamp),
    }
}
