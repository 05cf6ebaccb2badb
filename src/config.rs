//! Scrape and storage configuration.
//!
//! Values start from [`ScrapeConfig::default`], are overridden by `SDH_*`
//! environment variables, and finally by command-line flags.

use crate::core::cache::{default_db_path, default_dump_path};
use crate::error::{IngestError, Result};
use rand::Rng;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const BASE_URL_ENV_VAR: &str = "SDH_BASE_URL";
pub const PERMITS_ENV_VAR: &str = "SDH_PERMITS";
pub const DELAY_ENV_VAR: &str = "SDH_DELAY_MS";
pub const TARGET_COUNT_ENV_VAR: &str = "SDH_TARGET_COUNT";
pub const TIMEOUT_ENV_VAR: &str = "SDH_TIMEOUT_SECS";
pub const DB_PATH_ENV_VAR: &str = "SDH_DB_PATH";
pub const DUMP_PATH_ENV_VAR: &str = "SDH_DUMP_PATH";
pub const SCHEDULE_TTL_ENV_VAR: &str = "SDH_SCHEDULE_TTL_SECS";

pub const DEFAULT_BASE_URL: &str = "https://www.sofascore.com/api/v1";
pub const DEFAULT_PERMITS: usize = 3;
pub const DEFAULT_TARGET_COUNT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SCHEDULE_TTL_SECS: u64 = 600;

/// Inclusive range, in milliseconds, of the pause taken before each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    /// No pacing at all. Used against local mock servers.
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::new(2_000, 20_000)
    }
}

impl fmt::Display for DelayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min_ms, self.max_ms)
    }
}

impl FromStr for DelayRange {
    type Err = IngestError;

    /// Accepts `"500"` for a fixed delay or `"2000-20000"` for a range.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once('-') {
            Some((min, max)) => Ok(Self::new(min.trim().parse()?, max.trim().parse()?)),
            None => {
                let fixed = s.parse()?;
                Ok(Self::new(fixed, fixed))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub permits: usize,
    pub delay: DelayRange,
    pub target_count: usize,
    pub request_timeout: Duration,
    pub db_path: PathBuf,
    pub dump_path: PathBuf,
    pub schedule_ttl: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            permits: DEFAULT_PERMITS,
            delay: DelayRange::default(),
            target_count: DEFAULT_TARGET_COUNT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            db_path: default_db_path(),
            dump_path: default_dump_path(),
            schedule_ttl: Duration::from_secs(DEFAULT_SCHEDULE_TTL_SECS),
        }
    }
}

impl ScrapeConfig {
    /// Defaults overridden by any `SDH_*` variables present in the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ScrapeConfig::from_env`] but reading from an arbitrary source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_ENV_VAR) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(PERMITS_ENV_VAR) {
            config.permits = parse_setting(PERMITS_ENV_VAR, &raw)?;
        }
        if let Some(raw) = lookup(DELAY_ENV_VAR) {
            config.delay = raw.parse().map_err(|_| IngestError::Config {
                key: DELAY_ENV_VAR.to_string(),
                message: format!("expected <ms> or <min>-<max>, got '{}'", raw),
            })?;
        }
        if let Some(raw) = lookup(TARGET_COUNT_ENV_VAR) {
            config.target_count = parse_setting(TARGET_COUNT_ENV_VAR, &raw)?;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV_VAR) {
            config.request_timeout = Duration::from_secs(parse_setting(TIMEOUT_ENV_VAR, &raw)?);
        }
        if let Some(path) = lookup(DB_PATH_ENV_VAR) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(DUMP_PATH_ENV_VAR) {
            config.dump_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(SCHEDULE_TTL_ENV_VAR) {
            config.schedule_ttl = Duration::from_secs(parse_setting(SCHEDULE_TTL_ENV_VAR, &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.permits == 0 {
            return Err(IngestError::Config {
                key: PERMITS_ENV_VAR.to_string(),
                message: "at least one permit is required".to_string(),
            });
        }
        if self.permits > Semaphore::MAX_PERMITS {
            return Err(IngestError::Config {
                key: PERMITS_ENV_VAR.to_string(),
                message: format!("at most {} permits are allowed", Semaphore::MAX_PERMITS),
            });
        }
        if self.base_url.is_empty() {
            return Err(IngestError::Config {
                key: BASE_URL_ENV_VAR.to_string(),
                message: "base URL must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_permits(mut self, permits: usize) -> Self {
        self.permits = permits;
        self
    }

    pub fn with_delay(mut self, delay: DelayRange) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_dump_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dump_path = path.into();
        self
    }

    pub fn with_schedule_ttl(mut self, ttl: Duration) -> Self {
        self.schedule_ttl = ttl;
        self
    }
}

fn parse_setting<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| IngestError::Config {
        key: key.to_string(),
        message: format!("could not parse '{}'", raw),
    })
}
