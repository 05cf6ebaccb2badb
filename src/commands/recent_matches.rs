//! Recent matches command implementation

use crate::{
    config::ScrapeConfig,
    storage::{MatchDatabase, RecentMatch, TeamKey},
    Result,
};
use std::path::PathBuf;

pub fn format_recent_match(m: &RecentMatch) -> String {
    let row = &m.match_row;
    format!(
        "{} {} vs {} [{}] shots {}-{}, corners {}-{}, cards {}/{}-{}/{}",
        row.kickoff.format("%Y-%m-%d"),
        m.home_team,
        m.away_team,
        row.league,
        row.home.total_shots,
        row.away.total_shots,
        row.home.corners,
        row.away.corners,
        row.home.yellow_cards,
        row.home.red_cards,
        row.away.yellow_cards,
        row.away.red_cards
    )
}

/// Handle the recent-matches command
pub fn handle_recent_matches(
    team: String,
    country: String,
    limit: usize,
    db: Option<PathBuf>,
    as_json: bool,
) -> Result<()> {
    let db_path = match db {
        Some(path) => path,
        None => ScrapeConfig::from_env()?.db_path,
    };
    let db = MatchDatabase::open(&db_path)?;
    let key = TeamKey::new(&team, &country);
    let matches = db.recent_matches_for_team(&key, limit)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No stored matches for {}", key);
        return Ok(());
    }

    println!("Last {} matches for {}:", matches.len(), key);
    for m in &matches {
        println!("{}", format_recent_match(m));
        for line in &m.player_stats {
            println!(
                "    {:<28} {:>3}' G{} A{} S{}/{} F{}/{} SV{}{}",
                line.player_name,
                line.minutes_played,
                line.goals,
                line.assists,
                line.shots_on_target,
                line.shots,
                line.fouls_committed,
                line.fouls_drawn,
                line.saves,
                if line.is_starting { "" } else { " (sub)" }
            );
        }
    }
    Ok(())
}
