//! Command implementations for the sport-data-hub CLI

pub mod ingest;
pub mod player;
pub mod recent_matches;


use crate::{cli::ScrapeArgs, config::ScrapeConfig, Result};

/// Layer command-line overrides on top of an environment-derived config
pub fn apply_overrides(mut config: ScrapeConfig, scrape: &ScrapeArgs) -> Result<ScrapeConfig> {
    if let Some(permits) = scrape.permits {
        config = config.with_permits(permits);
    }
    if let Some(delay) = scrape.delay {
        config = config.with_delay(delay);
    }
    if let Some(target) = scrape.target {
        config = config.with_target_count(target);
    }
    if let Some(db) = &scrape.db {
        config = config.with_db_path(db.clone());
    }
    if let Some(dump) = &scrape.dump {
        config = config.with_dump_path(dump.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Environment config with command-line overrides applied
pub fn resolve_config(scrape: &ScrapeArgs) -> Result<ScrapeConfig> {
    apply_overrides(ScrapeConfig::from_env()?, scrape)
}
