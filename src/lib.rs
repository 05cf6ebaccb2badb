//! Sport Data Hub
//!
//! Crawls a football statistics API into a local SQLite dataset of teams,
//! players, matches and per-match/per-player statistics.
//!
//! ## Pipeline
//!
//! - **Discovery**: fixtures scheduled for today, tomorrow or the day after
//! - **Backfill**: each participating team's recent finished matches
//! - **Aggregation**: lineups with player statistics, then match statistics
//! - **Resolution**: scraped teams and players mapped onto stored rows
//! - **Write**: constraint-aware inserts, one transaction per match
//!
//! Outbound requests share a small permit pool and are paced with a random
//! delay.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sport_data_hub::{Ingestor, ScrapeConfig};
//!
//! # async fn example() -> sport_data_hub::Result<()> {
//! let mut ingestor = Ingestor::new(ScrapeConfig::from_env()?)?;
//! let fixtures = ingestor.run_scheduled_ingestion(1).await?;
//! println!("{} fixtures tomorrow", fixtures.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Every setting has an `SDH_*` variable, for example:
//! ```bash
//! export SDH_DB_PATH=./football.db
//! export SDH_DELAY_MS=2000-20000
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod sofascore;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{
    DayOffset, EventId, MatchDate, MatchId, PlayerId, SourcePlayerId, SourceTeamId, TeamId,
};
pub use config::{DelayRange, ScrapeConfig};
pub use error::{ErrorPayload, IngestError, Result};
pub use pipeline::{IngestReport, Ingestor, WriteSummary};
pub use storage::MatchDatabase;

/// Directory for the log file; defaults to `./logs`.
pub const LOG_DIR_ENV_VAR: &str = "SDH_LOG_DIR";
