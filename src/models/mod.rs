//! Data models flowing through the pipeline

pub mod output;
pub mod scraped;

pub use output::{Lineup, LineupSlot, MatchWithLineup, PlayerProfile};
pub use scraped::{
    CompleteMatchRecord, MatchCandidate, MatchStatistics, PeriodStats, PlayerLine,
    PlayerStatsBySide, Side, SideTotals, TeamRef, FULL_MATCH_PERIOD,
};
