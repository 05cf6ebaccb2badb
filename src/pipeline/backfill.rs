//! Paging through a team's past matches.

use super::discovery::dedup_candidates;
use crate::cli::types::SourceTeamId;
use crate::models::{MatchCandidate, TeamRef};
use crate::sofascore::extract::{candidate_from_event, is_finished_with_stats, parse_events};
use crate::sofascore::types::EventsPage;
use crate::sofascore::Fetcher;
use futures_util::future::join_all;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

pub use crate::config::DEFAULT_TARGET_COUNT;

/// Hard stop for teams whose history keeps reporting another page.
pub const MAX_BACKFILL_PAGES: u32 = 50;

/// Collect up to `target_count` finished matches with player statistics for one team.
///
/// One permit is held for the whole walk; every page goes through the
/// ungated fetch. Only pages holding at least `target_count` events are
/// scanned, newest first.
pub async fn backfill(
    fetcher: &Fetcher,
    team_id: SourceTeamId,
    team_name: &str,
    target_count: usize,
) -> Vec<MatchCandidate> {
    let mut found: Vec<MatchCandidate> = Vec::new();
    if target_count == 0 {
        return found;
    }

    let _permit = match fetcher.pool().acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            error!(team = team_name, error = %e, "Permit pool closed");
            return found;
        }
    };

    let mut page: u32 = 0;
    loop {
        let url = fetcher.team_events_url(team_id, page);
        let Some(body) = fetcher.get_ungated::<EventsPage>(&url).await else {
            warn!(team = team_name, page, "History page unavailable, stopping");
            break;
        };

        if body.events.len() >= target_count {
            for event in parse_events(&body).iter().rev() {
                if !is_finished_with_stats(event) {
                    continue;
                }
                match candidate_from_event(event, true) {
                    Ok(candidate) => found.push(candidate),
                    Err(e) => {
                        warn!(team = team_name, match_id = %event.composite_id(), error = %e, "Skipping past match");
                        continue;
                    }
                }
                if found.len() >= target_count {
                    break;
                }
            }
        } else {
            debug!(team = team_name, page, events = body.events.len(), "Page too short to scan");
        }

        if found.len() >= target_count || !body.has_next_page {
            break;
        }
        page += 1;
        if page >= MAX_BACKFILL_PAGES {
            warn!(team = team_name, pages = page, "Page limit reached");
            break;
        }
    }

    info!(
        team = team_name,
        team_id = %team_id,
        found = found.len(),
        target = target_count,
        "Backfill finished"
    );
    found
}

/// Distinct teams playing in `candidates`, home before away, in fixture order.
pub fn participating_teams(candidates: &[MatchCandidate]) -> Vec<TeamRef> {
    let mut seen: HashSet<SourceTeamId> = HashSet::new();
    candidates
        .iter()
        .flat_map(|c| [&c.home, &c.away])
        .filter(|team| seen.insert(team.source_id))
        .cloned()
        .collect()
}

/// Backfill every team concurrently; permits bound how many run at once.
pub async fn backfill_teams(
    fetcher: &Fetcher,
    teams: &[TeamRef],
    target_count: usize,
) -> Vec<MatchCandidate> {
    let histories = join_all(
        teams
            .iter()
            .map(|team| backfill(fetcher, team.source_id, &team.name, target_count)),
    )
    .await;

    dedup_candidates(histories.into_iter().flatten().collect())
}
