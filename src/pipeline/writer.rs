//! Persisting resolved entities and complete match records.

use super::resolve::ResolutionSession;
use crate::cli::types::PlayerId;
use crate::error::Result;
use crate::models::CompleteMatchRecord;
use crate::storage::{InsertOutcome, LookupOutcome, MatchDatabase, NewMatch, NewPlayer, NewPlayerStat};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{error, info, warn};

/// Counts of what one write pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub teams_created: usize,
    pub players_created: usize,
    pub players_skipped: usize,
    pub matches_written: usize,
    pub duplicate_matches: usize,
    pub failed_matches: usize,
    pub player_stats_written: usize,
    pub player_lines_skipped: usize,
}

/// Insert queued teams, then queued players, then one transaction per record.
///
/// Constraint violations never abort the pass; they are logged and counted.
pub fn write(
    db: &mut MatchDatabase,
    session: &mut ResolutionSession,
    records: &[CompleteMatchRecord],
) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();

    write_teams(db, session, &mut summary)?;
    write_players(db, session, &mut summary)?;
    for record in records {
        write_record(db, session, record, &mut summary)?;
    }

    info!(
        teams = summary.teams_created,
        players = summary.players_created,
        matches = summary.matches_written,
        duplicates = summary.duplicate_matches,
        failed = summary.failed_matches,
        player_stats = summary.player_stats_written,
        "Write finished"
    );
    Ok(summary)
}

fn write_teams(
    db: &mut MatchDatabase,
    session: &mut ResolutionSession,
    summary: &mut WriteSummary,
) -> Result<()> {
    let queued: Vec<_> = session.teams_to_create().cloned().collect();
    for key in queued {
        match db.insert_team(&key)? {
            InsertOutcome::Inserted(id) => {
                session.record_team(key, id);
                summary.teams_created += 1;
            }
            InsertOutcome::Conflict { message, .. } => {
                warn!(team = %key, error = %message, "Team insert conflicted");
                if let LookupOutcome::Found(id) = db.lookup_team(&key)? {
                    session.record_team(key, id);
                }
            }
        }
    }
    Ok(())
}

fn write_players(
    db: &mut MatchDatabase,
    session: &mut ResolutionSession,
    summary: &mut WriteSummary,
) -> Result<()> {
    let queued: Vec<_> = session.players_to_create().cloned().collect();
    for pending in queued {
        let ids = (session.team_id(&pending.team), session.team_id(&pending.country));
        let (Some(team_id), Some(country_id)) = ids else {
            error!(
                player = %pending.key,
                team = %pending.team,
                country = %pending.country,
                "Skipping player: team has no ID"
            );
            summary.players_skipped += 1;
            continue;
        };

        let new_player = NewPlayer {
            key: pending.key.clone(),
            team_id,
            country_id,
        };
        match db.insert_player(&new_player)? {
            InsertOutcome::Inserted(id) => {
                session.record_player(pending.key, id);
                summary.players_created += 1;
            }
            InsertOutcome::Conflict { message, .. } => {
                warn!(player = %pending.key, error = %message, "Player insert conflicted");
                summary.players_skipped += 1;
                if let LookupOutcome::Found(id) = db.lookup_player(&pending.key)? {
                    session.record_player(pending.key, id);
                }
            }
        }
    }
    Ok(())
}

fn write_record(
    db: &mut MatchDatabase,
    session: &ResolutionSession,
    record: &CompleteMatchRecord,
    summary: &mut WriteSummary,
) -> Result<()> {
    let candidate = &record.candidate;
    let match_id = candidate.composite_id();

    let ids = (
        session.team_id(&candidate.home.key()),
        session.team_id(&candidate.away.key()),
    );
    let (Some(home_team_id), Some(away_team_id)) = ids else {
        warn!(match_id = %match_id, "Skipping match: team has no ID");
        summary.failed_matches += 1;
        return Ok(());
    };

    let Some(full_match) = record.statistics.full_match() else {
        error!(match_id = %match_id, "Skipping match: no full-match statistics");
        summary.failed_matches += 1;
        return Ok(());
    };

    let new_match = NewMatch {
        kickoff: candidate.start_time,
        league: candidate.league.clone(),
        home_team_id,
        away_team_id,
        home: full_match.home,
        away: full_match.away,
    };

    let mut seen: HashSet<PlayerId> = HashSet::new();
    let mut lines = Vec::with_capacity(record.player_stats.len());
    for (side, line) in record.player_stats.iter() {
        let Some(player_id) = session.player_id(&line.key()) else {
            warn!(
                match_id = %match_id,
                side = side.as_str(),
                player = %line.key(),
                "Skipping player line: player has no ID"
            );
            summary.player_lines_skipped += 1;
            continue;
        };
        if !seen.insert(player_id) {
            warn!(match_id = %match_id, player = %line.key(), "Skipping repeated player line");
            summary.player_lines_skipped += 1;
            continue;
        }
        lines.push(NewPlayerStat {
            player_id,
            goals: line.goals,
            assists: line.assists,
            shots: line.shots,
            shots_on_target: line.shots_on_target,
            fouls_committed: line.fouls_committed,
            fouls_drawn: line.fouls_drawn,
            saves: line.saves,
            is_starting: line.is_starting,
            minutes_played: line.minutes_played,
        });
    }

    match db.insert_match_with_stats(&new_match, &record.statistics.periods, &lines)? {
        InsertOutcome::Inserted(stored_id) => {
            info!(match_id = %match_id, stored_id = %stored_id, player_lines = lines.len(), "Match stored");
            summary.matches_written += 1;
            summary.player_stats_written += lines.len();
        }
        InsertOutcome::Conflict { table: "matches", .. } => {
            info!(match_id = %match_id, "Match already stored");
            summary.duplicate_matches += 1;
        }
        InsertOutcome::Conflict { table, message } => {
            error!(match_id = %match_id, table, error = %message, "Match rolled back");
            summary.failed_matches += 1;
        }
    }
    Ok(())
}
