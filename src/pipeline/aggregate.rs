//! Fetching and merging statistics for candidates.

use crate::error::{IngestError, Result};
use crate::models::{
    CompleteMatchRecord, MatchCandidate, MatchStatistics, MatchWithLineup, PlayerStatsBySide,
};
use crate::sofascore::extract::{extract_lineup, extract_match_statistics, extract_player_stats};
use crate::sofascore::types::{LineupsResponse, StatisticsResponse};
use crate::sofascore::Fetcher;
use futures_util::future::join_all;
use tracing::{info, warn};

async fn fetch_player_stats(fetcher: &Fetcher, candidate: &MatchCandidate) -> Result<PlayerStatsBySide> {
    let url = fetcher.lineups_url(candidate.event_id);
    let lineups: LineupsResponse = fetcher
        .get(&url)
        .await
        .ok_or_else(|| IngestError::NoData { url: url.clone() })?;
    extract_player_stats(&lineups, &candidate.composite_id())
}

async fn fetch_match_statistics(fetcher: &Fetcher, candidate: &MatchCandidate) -> Result<MatchStatistics> {
    let url = fetcher.statistics_url(candidate.event_id);
    let response: StatisticsResponse = fetcher
        .get(&url)
        .await
        .ok_or_else(|| IngestError::NoData { url: url.clone() })?;
    extract_match_statistics(&response)
}

/// Fetch player and match statistics for every candidate.
///
/// Player statistics are fetched for all candidates first; match statistics
/// start only once that phase is done. Both phases share the fetcher's permits.
pub async fn aggregate(fetcher: &Fetcher, candidates: &[MatchCandidate]) -> Vec<CompleteMatchRecord> {
    let player_results = join_all(candidates.iter().map(|c| fetch_player_stats(fetcher, c))).await;
    let match_results = join_all(candidates.iter().map(|c| fetch_match_statistics(fetcher, c))).await;

    let records = merge_results(candidates, player_results, match_results);
    info!(
        candidates = candidates.len(),
        complete = records.len(),
        permits = fetcher.pool().size(),
        "Aggregation finished"
    );
    records
}

/// Pair up the two phases; a record survives only when both sides are
/// present and non-empty.
pub fn merge_results(
    candidates: &[MatchCandidate],
    player_results: Vec<Result<PlayerStatsBySide>>,
    match_results: Vec<Result<MatchStatistics>>,
) -> Vec<CompleteMatchRecord> {
    candidates
        .iter()
        .zip(player_results)
        .zip(match_results)
        .filter_map(|((candidate, players), statistics)| {
            let match_id = candidate.composite_id();
            match (players, statistics) {
                (Ok(players), Ok(statistics)) if !players.is_empty() && !statistics.is_empty() => {
                    Some(CompleteMatchRecord {
                        candidate: candidate.clone(),
                        statistics,
                        player_stats: players,
                    })
                }
                (Err(e), _) => {
                    warn!(match_id = %match_id, error = %e, "Dropping match: player statistics unavailable");
                    None
                }
                (_, Err(e)) => {
                    warn!(match_id = %match_id, error = %e, "Dropping match: match statistics unavailable");
                    None
                }
                _ => {
                    warn!(match_id = %match_id, "Dropping match: empty statistics");
                    None
                }
            }
        })
        .collect()
}

/// Attach the current lineup, when the API has one, to each fixture.
pub async fn attach_lineups(fetcher: &Fetcher, candidates: &[MatchCandidate]) -> Vec<MatchWithLineup> {
    let lineups = join_all(candidates.iter().map(|c| {
        let url = fetcher.lineups_url(c.event_id);
        async move { fetcher.get::<LineupsResponse>(&url).await }
    }))
    .await;

    candidates
        .iter()
        .zip(lineups)
        .map(|(candidate, lineup)| MatchWithLineup {
            candidate: candidate.clone(),
            lineup: lineup.as_ref().map(extract_lineup),
        })
        .collect()
}
