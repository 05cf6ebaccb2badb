//! Unit tests for the paced fetcher

use super::*;
use crate::sofascore::types::EventsPage;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{header, header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn fetcher_for(server: &MockServer, permits: usize) -> Fetcher {
    let config = ScrapeConfig::default()
        .with_base_url(server.uri())
        .with_permits(permits)
        .with_delay(DelayRange::none());
    Fetcher::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_success_returns_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sport/football/scheduled-events/2024-05-01"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"events": [], "hasNextPage": false})),
        )
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, 3);
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let body = fetcher.fetch(&fetcher.scheduled_events_url(date)).await;

    assert_eq!(body, Some(json!({"events": [], "hasNextPage": false})));
    assert_eq!(fetcher.pool().available(), 3);
}

#[tokio::test]
async fn test_fetch_sends_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/event/1/lineups"))
        .and(header_exists("user-agent"))
        .and(header_exists("referer"))
        .and(header("x-requested-with", "12456b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, 1);
    let body = fetcher.fetch(&fetcher.lineups_url(EventId::new(1))).await;
    assert!(body.is_some());
}

#[tokio::test]
async fn test_non_success_status_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, 1);
    assert!(fetcher
        .fetch(&fetcher.statistics_url(EventId::new(7)))
        .await
        .is_none());
    // The permit comes back even on failure
    assert_eq!(fetcher.pool().available(), 1);
}

#[tokio::test]
async fn test_unreachable_host_is_absent() {
    let config = ScrapeConfig::default()
        .with_base_url("http://127.0.0.1:1")
        .with_delay(DelayRange::none());
    let fetcher = Fetcher::new(&config).unwrap();

    assert!(fetcher.fetch(&fetcher.player_url(SourcePlayerId::new(5))).await.is_none());
}

#[tokio::test]
async fn test_non_json_body_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, 1);
    assert!(fetcher.fetch(&format!("{}/anything", server.uri())).await.is_none());
}

#[tokio::test]
async fn test_get_decodes_typed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/team/42/events/last/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [{"id": 1}, {"id": 2}],
            "hasNextPage": true
        })))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, 1);
    let page: EventsPage = fetcher
        .get(&fetcher.team_events_url(SourceTeamId::new(42), 0))
        .await
        .unwrap();

    assert_eq!(page.events.len(), 2);
    assert!(page.has_next_page);
}

#[tokio::test]
async fn test_gated_fetch_waits_for_permit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, 1);
    let url = format!("{}/event/9/lineups", server.uri());

    let held = fetcher.pool().acquire().await.unwrap();
    assert_eq!(fetcher.pool().available(), 0);

    let blocked = tokio::time::timeout(Duration::from_millis(200), fetcher.fetch(&url)).await;
    assert!(blocked.is_err(), "fetch must wait while the only permit is held");

    // Ungated requests go through regardless
    assert!(fetcher.fetch_ungated(&url).await.is_some());

    drop(held);
    assert!(fetcher.fetch(&url).await.is_some());
}

#[test]
fn test_url_builders() {
    let config = ScrapeConfig::default().with_base_url("https://api.example.com/api/v1/");
    let fetcher = Fetcher::new(&config).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();

    assert_eq!(
        fetcher.scheduled_events_url(date),
        "https://api.example.com/api/v1/sport/football/scheduled-events/2024-01-09"
    );
    assert_eq!(
        fetcher.scheduled_events_inverse_url(date),
        "https://api.example.com/api/v1/sport/football/scheduled-events/2024-01-09/inverse"
    );
    assert_eq!(
        fetcher.team_events_url(SourceTeamId::new(17), 2),
        "https://api.example.com/api/v1/team/17/events/last/2"
    );
    assert_eq!(
        fetcher.player_url(SourcePlayerId::new(934235)),
        "https://api.example.com/api/v1/player/934235"
    );
}

#[test]
fn test_permit_pool_size() {
    let pool = PermitPool::new(3);
    assert_eq!(pool.size(), 3);
    assert_eq!(pool.available(), 3);
}
