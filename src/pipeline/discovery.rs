//! Finding the fixtures for a day.

use crate::cli::types::{DayOffset, EventId};
use crate::error::Result;
use crate::models::MatchCandidate;
use crate::sofascore::extract::{
    candidate_from_event, event_local_date, is_finished_with_stats, is_scheduled_with_stats,
    parse_events,
};
use crate::sofascore::types::{Event, EventsPage};
use crate::sofascore::Fetcher;
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use tracing::{error, info, warn};

/// Which events of a day's listings are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    /// Not started yet, in a tournament that records player statistics.
    Scheduled,
    /// Already played, with player statistics.
    Finished,
}

impl EventFilter {
    fn accepts(&self, event: &Event, date: NaiveDate) -> bool {
        match self {
            EventFilter::Scheduled => is_scheduled_with_stats(event, date),
            EventFilter::Finished => {
                is_finished_with_stats(event) && event_local_date(event.start_timestamp) == Some(date)
            }
        }
    }
}

/// Upcoming fixtures `day_offset` days from today (local time).
///
/// Offsets outside `0..=2` are rejected before any request is made.
pub async fn discover_scheduled(fetcher: &Fetcher, day_offset: i64) -> Result<Vec<MatchCandidate>> {
    let day = DayOffset::new(day_offset).map_err(|e| {
        error!(day_offset, error = %e, "Rejected day offset");
        e
    })?;
    let date = day.target_date(Local::now().date_naive());
    Ok(discover_on_date(fetcher, date, EventFilter::Scheduled).await)
}

/// Read both schedule listings for `date` and keep the events `filter` accepts.
pub async fn discover_on_date(
    fetcher: &Fetcher,
    date: NaiveDate,
    filter: EventFilter,
) -> Vec<MatchCandidate> {
    let primary_url = fetcher.scheduled_events_url(date);
    let inverse_url = fetcher.scheduled_events_inverse_url(date);
    let (primary, inverse) = tokio::join!(
        fetcher.get::<EventsPage>(&primary_url),
        fetcher.get::<EventsPage>(&inverse_url),
    );

    let mut events = Vec::new();
    for page in [primary, inverse].into_iter().flatten() {
        events.extend(parse_events(&page));
    }

    let candidates: Vec<MatchCandidate> = events
        .iter()
        .filter(|event| filter.accepts(event, date))
        .filter_map(|event| match candidate_from_event(event, false) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                warn!(match_id = %event.composite_id(), error = %e, "Skipping event");
                None
            }
        })
        .collect();

    let candidates = dedup_candidates(candidates);
    info!(
        date = %date,
        filter = ?filter,
        listed = events.len(),
        kept = candidates.len(),
        "Discovery finished"
    );
    candidates
}

/// Drop repeated event IDs, keeping the first occurrence and the original order.
pub fn dedup_candidates(candidates: Vec<MatchCandidate>) -> Vec<MatchCandidate> {
    let mut seen: HashSet<EventId> = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.event_id))
        .collect()
}
