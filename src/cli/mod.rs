//! CLI argument definitions and parsing.

pub mod types;

use crate::config::DelayRange;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use types::{MatchDate, SourcePlayerId};

/// Scrape settings that override `SDH_*` environment variables.
#[derive(Debug, Default, Args)]
pub struct ScrapeArgs {
    /// Concurrent request permits (or set `SDH_PERMITS`).
    #[clap(long)]
    pub permits: Option<usize>,

    /// Pause before each request in ms: `500` or `2000-20000` (or set `SDH_DELAY_MS`).
    #[clap(long = "delay-ms")]
    pub delay: Option<DelayRange>,

    /// Past matches to collect per team (or set `SDH_TARGET_COUNT`).
    #[clap(long)]
    pub target: Option<usize>,

    /// Database file (or set `SDH_DB_PATH`).
    #[clap(long)]
    pub db: Option<PathBuf>,

    /// Where the scraped batch is dumped as JSON (or set `SDH_DUMP_PATH`).
    #[clap(long)]
    pub dump: Option<PathBuf>,
}

#[derive(Debug, Parser)]
#[clap(
    name = "sport-data-hub",
    about = "Crawl football statistics into a local SQLite dataset"
)]
pub struct SportDataHub {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ingest upcoming fixtures and the recent history of every team playing.
    ///
    /// Prints the day's fixtures with their current lineups when done.
    Ingest {
        /// Days from today: 0 (today), 1 (tomorrow) or 2.
        #[clap(long, short, allow_negative_numbers = true, default_value_t = 1)]
        day: i64,

        #[clap(flatten)]
        scrape: ScrapeArgs,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Ingest finished matches played on a past date.
    IngestDate {
        /// Date as YYYY-MM-DD.
        #[clap(long)]
        date: MatchDate,

        #[clap(flatten)]
        scrape: ScrapeArgs,

        /// Output the report as JSON.
        #[clap(long)]
        json: bool,
    },

    /// Show a team's most recent stored matches with player statistics.
    RecentMatches {
        /// Team name as stored, e.g. "Arsenal".
        #[clap(long, short)]
        team: String,

        /// Team country, e.g. "England".
        #[clap(long, short)]
        country: String,

        /// Number of matches to show.
        #[clap(long, short, default_value_t = 5)]
        limit: usize,

        /// Database file (or set `SDH_DB_PATH`).
        #[clap(long)]
        db: Option<PathBuf>,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Look up a player profile by its API ID.
    Player {
        /// API player ID.
        #[clap(long)]
        id: SourcePlayerId,

        /// Output as JSON.
        #[clap(long)]
        json: bool,
    },
}
