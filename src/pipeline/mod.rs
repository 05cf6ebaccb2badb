//! The crawl-and-ingest pipeline.
//!
//! Discovery → backfill → aggregation → resolution → write. [`Ingestor`]
//! owns the fetcher, the store and the per-date result cache and runs the
//! stages in order.

pub mod aggregate;
pub mod backfill;
pub mod discovery;
pub mod resolve;
pub mod writer;

pub use aggregate::{aggregate, attach_lineups, merge_results};
pub use backfill::{backfill, backfill_teams, participating_teams};
pub use discovery::{dedup_candidates, discover_on_date, discover_scheduled, EventFilter};
pub use resolve::{resolve, PendingPlayer, ResolutionSession};
pub use writer::{write, WriteSummary};

use crate::cli::types::{DayOffset, SourcePlayerId};
use crate::config::ScrapeConfig;
use crate::core::{write_string, TtlCache};
use crate::error::{IngestError, Result};
use crate::models::{CompleteMatchRecord, MatchCandidate, MatchWithLineup, PlayerProfile};
use crate::sofascore::extract::extract_player_profile;
use crate::sofascore::types::PlayerResponse;
use crate::sofascore::Fetcher;
use crate::storage::{MatchDatabase, RecentMatch, TeamKey};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{error, info, warn};

/// Dates kept in the scheduled-result cache.
const SCHEDULE_CACHE_CAPACITY: usize = 8;

/// What one ingestion pass found and stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub discovered: usize,
    pub backfilled: usize,
    pub complete_records: usize,
    pub write: WriteSummary,
}

/// Result of [`Ingestor::run_scheduled`].
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledRun {
    pub date: NaiveDate,
    pub matches: Vec<MatchWithLineup>,
    pub report: IngestReport,
    /// Served from the per-date cache; nothing was fetched or written.
    pub cached: bool,
}

pub struct Ingestor {
    config: ScrapeConfig,
    fetcher: Fetcher,
    db: MatchDatabase,
    schedule_cache: TtlCache<NaiveDate, Vec<MatchWithLineup>>,
}

impl Ingestor {
    /// Open the configured database and build the fetcher.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        config.validate()?;
        let db = MatchDatabase::open(&config.db_path)?;
        Self::with_database(config, db)
    }

    /// Use an already opened store, e.g. an in-memory one.
    pub fn with_database(config: ScrapeConfig, db: MatchDatabase) -> Result<Self> {
        config.validate()?;
        let fetcher = Fetcher::new(&config)?;
        let schedule_cache = TtlCache::new(SCHEDULE_CACHE_CAPACITY, config.schedule_ttl);
        Ok(Self {
            config,
            fetcher,
            db,
            schedule_cache,
        })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn database(&self) -> &MatchDatabase {
        &self.db
    }

    /// Run the whole pipeline for fixtures `day_offset` days ahead and return
    /// them with their current lineups.
    pub async fn run_scheduled_ingestion(&mut self, day_offset: i64) -> Result<Vec<MatchWithLineup>> {
        Ok(self.run_scheduled(day_offset).await?.matches)
    }

    /// Same as [`Ingestor::run_scheduled_ingestion`], keeping the report.
    pub async fn run_scheduled(&mut self, day_offset: i64) -> Result<ScheduledRun> {
        let day = DayOffset::new(day_offset).map_err(|e| {
            error!(day_offset, error = %e, "Rejected day offset");
            e
        })?;
        let date = day.target_date(Local::now().date_naive());

        if let Some(matches) = self.schedule_cache.get(&date) {
            info!(date = %date, matches = matches.len(), "Serving scheduled matches from cache");
            return Ok(ScheduledRun {
                date,
                matches,
                report: IngestReport::default(),
                cached: true,
            });
        }

        info!(date = %date, "Scheduled ingestion started");
        let discovered = discover_on_date(&self.fetcher, date, EventFilter::Scheduled).await;
        let teams = participating_teams(&discovered);
        let history = backfill_teams(&self.fetcher, &teams, self.config.target_count).await;

        let mut report = self.ingest(&discovered, &history).await?;
        report.discovered = discovered.len();

        let matches = attach_lineups(&self.fetcher, &discovered).await;
        self.schedule_cache.put(date, matches.clone());

        Ok(ScheduledRun {
            date,
            matches,
            report,
            cached: false,
        })
    }

    /// Ingest finished matches played on `date`, which must not be in the future.
    pub async fn run_past_date_ingestion(&mut self, date: NaiveDate) -> Result<IngestReport> {
        if date > Local::now().date_naive() {
            return Err(IngestError::InvalidDate {
                value: date.format("%Y-%m-%d").to_string(),
            });
        }

        info!(date = %date, "Past-date ingestion started");
        let played = discover_on_date(&self.fetcher, date, EventFilter::Finished).await;
        let mut report = self.ingest(&played, &played).await?;
        report.discovered = played.len();
        Ok(report)
    }

    /// Aggregate `candidates`, dump the batch, then resolve and write it.
    /// `discovered` fixtures only contribute their teams.
    async fn ingest(
        &mut self,
        discovered: &[MatchCandidate],
        candidates: &[MatchCandidate],
    ) -> Result<IngestReport> {
        let records = aggregate(&self.fetcher, candidates).await;
        self.dump(&records);

        let mut session = ResolutionSession::new();
        resolve(&mut session, &self.db, discovered, &records)?;
        let summary = write(&mut self.db, &mut session, &records)?;

        Ok(IngestReport {
            discovered: discovered.len(),
            backfilled: candidates.len(),
            complete_records: records.len(),
            write: summary,
        })
    }

    fn dump(&self, records: &[CompleteMatchRecord]) {
        let path = &self.config.dump_path;
        let written = serde_json::to_string_pretty(records)
            .map_err(IngestError::from)
            .and_then(|json| write_string(path, &json).map_err(IngestError::from));
        match written {
            Ok(()) => info!(path = %path.display(), records = records.len(), "Batch dumped"),
            Err(e) => warn!(path = %path.display(), error = %e, "Could not dump batch"),
        }
    }

    /// Read `player/{id}` and extract the profile.
    pub async fn fetch_player_profile(&self, player: SourcePlayerId) -> Result<PlayerProfile> {
        let url = self.fetcher.player_url(player);
        let response: PlayerResponse = self
            .fetcher
            .get(&url)
            .await
            .ok_or_else(|| IngestError::NoData { url: url.clone() })?;
        Ok(extract_player_profile(&response))
    }

    /// Most recent stored matches for a team, newest first.
    pub fn recent_matches_for_team(&self, team: &TeamKey, limit: usize) -> Result<Vec<RecentMatch>> {
        Ok(self.db.recent_matches_for_team(team, limit)?)
    }
}
