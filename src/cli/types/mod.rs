//! Type-safe wrappers for identifiers and calendar values.

pub mod ids;
pub mod time;

pub use ids::{EventId, MatchId, PlayerId, SourcePlayerId, SourceTeamId, TeamId};
pub use time::{DayOffset, MatchDate, MAX_DAY_OFFSET};
