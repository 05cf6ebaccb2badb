//! Ingestion command implementations

use super::resolve_config;
use crate::{
    cli::{
        types::{DayOffset, MatchDate},
        ScrapeArgs,
    },
    models::MatchWithLineup,
    pipeline::{IngestReport, Ingestor},
    Result,
};

/// One text line per fixture: kickoff, teams, league and lineup status
pub fn format_fixture(m: &MatchWithLineup) -> String {
    let c = &m.candidate;
    let lineup = match &m.lineup {
        Some(l) if l.confirmed => "lineups confirmed",
        Some(_) => "lineups predicted",
        None => "no lineups yet",
    };
    format!(
        "{} {} vs {} [{}] ({})",
        c.start_time.format("%Y-%m-%d %H:%M UTC"),
        c.home.name,
        c.away.name,
        c.league,
        lineup
    )
}

fn print_report(report: &IngestReport) {
    let w = &report.write;
    println!(
        "✓ {} complete of {} candidate matches",
        report.complete_records, report.backfilled
    );
    println!(
        "  created {} teams, {} players; stored {} matches ({} player lines)",
        w.teams_created, w.players_created, w.matches_written, w.player_stats_written
    );
    if w.duplicate_matches > 0 || w.failed_matches > 0 {
        println!(
            "  skipped {} already stored, {} failed",
            w.duplicate_matches, w.failed_matches
        );
    }
}

/// Handle the ingest command
pub async fn handle_ingest(day: i64, scrape: ScrapeArgs, as_json: bool) -> Result<()> {
    // Reject bad input before touching the network or the database
    let day = DayOffset::new(day)?;
    let config = resolve_config(&scrape)?;

    println!(
        "Ingesting fixtures for day +{} (db: {})...",
        day,
        config.db_path.display()
    );
    let mut ingestor = Ingestor::new(config)?;
    // tarpaulin::skip - HTTP call, tested via integration tests
    let run = ingestor.run_scheduled(i64::from(day.as_u8())).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&run.matches)?);
        return Ok(());
    }

    print_report(&run.report);
    println!("{} fixtures on {}:", run.matches.len(), run.date);
    for m in &run.matches {
        println!("  {}", format_fixture(m));
    }
    Ok(())
}

/// Handle the ingest-date command
pub async fn handle_ingest_date(date: MatchDate, scrape: ScrapeArgs, as_json: bool) -> Result<()> {
    let config = resolve_config(&scrape)?;

    println!("Ingesting finished matches from {}...", date);
    let mut ingestor = Ingestor::new(config)?;
    // tarpaulin::skip - HTTP call, tested via integration tests
    let report = ingestor.run_past_date_ingestion(date.as_naive()).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
