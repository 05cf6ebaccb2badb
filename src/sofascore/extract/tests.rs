//! Unit tests for response extraction

use super::*;
use chrono::{Local, TimeZone};
use serde_json::{json, Value};

fn local_ts(y: i32, m: u32, d: u32, h: u32) -> i64 {
    Local
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .unwrap()
        .timestamp()
}

fn event_json(id: u64, status: &str, ts: i64, tournament_stats: bool) -> Value {
    json!({
        "id": id,
        "customId": "AbC",
        "slug": "home-fc-away-fc",
        "status": {"type": status},
        "startTimestamp": ts,
        "tournament": {
            "name": "Premier League",
            "uniqueTournament": {"hasEventPlayerStatistics": tournament_stats}
        },
        "homeTeam": {"id": 10, "name": "Home FC", "country": {"name": "England"}},
        "awayTeam": {"id": 20, "name": "Away FC", "country": {"name": "England"}}
    })
}

fn event(value: Value) -> Event {
    serde_json::from_value(value).unwrap()
}

fn entry(name: &str, stats: Option<Value>) -> Value {
    let mut e = json!({
        "player": {
            "id": 1,
            "name": name,
            "country": {"name": "Spain"},
            "dateOfBirthTimestamp": 631152000
        },
        "position": "M",
        "shirtNumber": 8,
        "substitute": false
    });
    if let Some(s) = stats {
        e["statistics"] = s;
    }
    e
}

fn lineups(home: Vec<Value>, away: Vec<Value>) -> LineupsResponse {
    serde_json::from_value(json!({
        "confirmed": true,
        "home": {"players": home, "formation": "4-3-3"},
        "away": {"players": away, "formation": "4-4-2"}
    }))
    .unwrap()
}

fn item(name: &str, home: u32, away: u32) -> Value {
    json!({"name": name, "home": home.to_string(), "away": away.to_string(),
           "homeValue": home, "awayValue": away})
}

fn full_statistics() -> StatisticsResponse {
    serde_json::from_value(json!({
        "statistics": [
            {
                "period": "ALL",
                "groups": [
                    {"groupName": "Match overview", "statisticsItems": [
                        item("Ball possession", 55, 45),
                        item("Corner kicks", 7, 3),
                        item("Fouls", 10, 14),
                        item("Yellow cards", 2, 4),
                        item("Red cards", 0, 1)
                    ]},
                    {"groupName": "Shots", "statisticsItems": [
                        item("Total shots", 18, 9),
                        item("Shots on target", 6, 2)
                    ]},
                    {"groupName": "Goalkeeping", "statisticsItems": [
                        item("Total saves", 2, 5)
                    ]}
                ]
            },
            {
                "period": "1ST",
                "groups": [
                    {"groupName": "Shots", "statisticsItems": [item("Total shots", 8, 4)]}
                ]
            }
        ]
    }))
    .unwrap()
}

#[test]
fn test_sentinel_birth_date() {
    assert_eq!(birth_date_from_timestamp(None), NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
    assert_eq!(
        birth_date_from_timestamp(Some(631152000)),
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
    );
}

#[test]
fn test_scheduled_filter() {
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let ts = local_ts(2024, 5, 1, 18);

    assert!(is_scheduled_with_stats(&event(event_json(1, "notstarted", ts, true)), date));
    // Wrong day
    assert!(!is_scheduled_with_stats(
        &event(event_json(1, "notstarted", local_ts(2024, 5, 2, 18), true)),
        date
    ));
    // Already finished
    assert!(!is_scheduled_with_stats(&event(event_json(1, "finished", ts, true)), date));
    // Tournament without player statistics
    assert!(!is_scheduled_with_stats(&event(event_json(1, "notstarted", ts, false)), date));

    let mut awarded = event_json(1, "notstarted", ts, true);
    awarded["isAwarded"] = json!(true);
    assert!(!is_scheduled_with_stats(&event(awarded), date));
}

#[test]
fn test_finished_filter_prefers_event_flag() {
    let ts = local_ts(2024, 4, 20, 15);

    let mut with_flag = event_json(2, "finished", ts, false);
    with_flag["hasEventPlayerStatistics"] = json!(true);
    assert!(is_finished_with_stats(&event(with_flag)));

    let mut flag_off = event_json(2, "finished", ts, true);
    flag_off["hasEventPlayerStatistics"] = json!(false);
    assert!(!is_finished_with_stats(&event(flag_off)));

    // Falls back to the tournament flag
    assert!(is_finished_with_stats(&event(event_json(2, "finished", ts, true))));
    assert!(!is_finished_with_stats(&event(event_json(2, "postponed", ts, true))));
}

#[test]
fn test_parse_events_skips_malformed() {
    let page: EventsPage = serde_json::from_value(json!({
        "events": [
            event_json(1, "finished", 1714500000, true),
            {"id": 2, "slug": "missing-everything"},
            event_json(3, "finished", 1714500000, true)
        ],
        "hasNextPage": false
    }))
    .unwrap();

    let ids: Vec<u64> = parse_events(&page).iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_candidate_from_event() {
    let e = event(event_json(11352376, "notstarted", 1714586400, true));
    let c = candidate_from_event(&e, false).unwrap();

    assert_eq!(c.composite_id(), "AbC_11352376_home-fc-away-fc");
    assert_eq!(c.home.name, "Home FC");
    assert_eq!(c.home.source_id, SourceTeamId::new(10));
    assert_eq!(c.away.country, "England");
    assert_eq!(c.league, "Premier League");
    assert_eq!(c.start_time.timestamp(), 1714586400);
}

#[test]
fn test_candidate_missing_country() {
    let mut raw = event_json(5, "notstarted", 1714586400, true);
    raw["awayTeam"] = json!({"id": 20, "name": "Away FC"});
    let e = event(raw);

    let lenient = candidate_from_event(&e, false).unwrap();
    assert_eq!(lenient.away.country, UNKNOWN_COUNTRY);

    match candidate_from_event(&e, true) {
        Err(IngestError::MissingField { field, .. }) => assert_eq!(field, "awayTeam.country.name"),
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_extract_player_stats() {
    let mut home = Vec::new();
    for i in 0..12 {
        home.push(entry(
            &format!("Home {i}"),
            Some(json!({
                "minutesPlayed": 90,
                "blockedScoringAttempt": 1,
                "shotOffTarget": 2,
                "onTargetScoringAttempt": 3,
                "goals": 1,
                "goalAssist": 1,
                "fouls": 2,
                "wasFouled": 4
            })),
        ));
    }
    let away = vec![entry("Keeper", Some(json!({"saves": 6, "minutesPlayed": 90})))];

    let stats = extract_player_stats(&lineups(home, away), "AbC_1_x").unwrap();

    assert_eq!(stats.len(), 13);
    let first = &stats.home[0];
    assert_eq!(first.shots, 6);
    assert_eq!(first.shots_on_target, 3);
    assert_eq!(first.fouls_drawn, 4);
    assert_eq!(first.country, "Spain");
    assert!(first.is_starting);
    assert!(stats.home[10].is_starting);
    assert!(!stats.home[11].is_starting);

    let keeper = &stats.away[0];
    assert_eq!(keeper.saves, 6);
    assert_eq!(keeper.goals, 0);
    assert_eq!(keeper.birth_date, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
}

#[test]
fn test_player_without_statistics_fails_match() {
    let home = vec![
        entry("Has Stats", Some(json!({"minutesPlayed": 90}))),
        entry("Unused Sub", None),
    ];

    match extract_player_stats(&lineups(home, vec![]), "AbC_1_x") {
        Err(IngestError::NoPlayerStatistics { player }) => {
            assert!(player.contains("Unused Sub"));
            assert!(player.contains("AbC_1_x"));
        }
        other => panic!("Expected NoPlayerStatistics, got {:?}", other),
    }
}

#[test]
fn test_extract_match_statistics() {
    let stats = extract_match_statistics(&full_statistics()).unwrap();

    assert_eq!(stats.required_groups, 4);
    assert_eq!(stats.periods.len(), 2);

    let all = stats.full_match().unwrap();
    assert_eq!(all.home.corners, 7);
    assert_eq!(all.away.fouls, 14);
    assert_eq!(all.away.red_cards, 1);
    assert_eq!(all.home.total_shots, 18);
    assert_eq!(all.away.shots_on_target, 2);
    assert_eq!(all.away.total_saves, 5);

    let first_half = &stats.periods[1];
    assert_eq!(first_half.period, "1ST");
    assert_eq!(first_half.home.total_shots, 8);
    assert_eq!(first_half.home.corners, 0);
}

#[test]
fn test_insufficient_statistics_dropped() {
    let response: StatisticsResponse = serde_json::from_value(json!({
        "statistics": [{
            "period": "ALL",
            "groups": [
                {"groupName": "Match overview", "statisticsItems": [item("Fouls", 1, 2)]},
                {"groupName": "Passes", "statisticsItems": []},
                {"groupName": "Shots", "statisticsItems": []}
            ]
        }]
    }))
    .unwrap();

    match extract_match_statistics(&response) {
        Err(IngestError::InsufficientStatistics { groups }) => assert_eq!(groups, 2),
        other => panic!("Expected InsufficientStatistics, got {:?}", other),
    }
}

#[test]
fn test_statistics_without_full_match_period_rejected() {
    let response: StatisticsResponse = serde_json::from_value(json!({
        "statistics": [{
            "period": "1ST",
            "groups": [
                {"groupName": "Match overview", "statisticsItems": [item("Corner kicks", 4, 1)]},
                {"groupName": "Shots", "statisticsItems": [item("Total shots", 7, 3)]},
                {"groupName": "Goalkeeping", "statisticsItems": [item("Total saves", 1, 2)]}
            ]
        }]
    }))
    .unwrap();

    match extract_match_statistics(&response) {
        Err(IngestError::InsufficientStatistics { groups }) => assert_eq!(groups, 0),
        other => panic!("Expected InsufficientStatistics, got {:?}", other),
    }
}

#[test]
fn test_extract_lineup() {
    let lineup = extract_lineup(&lineups(
        vec![entry("A", None), entry("B", None)],
        vec![entry("C", None)],
    ));

    assert!(lineup.confirmed);
    assert_eq!(lineup.home_formation.as_deref(), Some("4-3-3"));
    assert_eq!(lineup.home.len(), 2);
    assert_eq!(lineup.away[0].shirt_number, Some(8));
}

#[test]
fn test_extract_player_profile() {
    let response: PlayerResponse = serde_json::from_value(json!({
        "player": {
            "id": 934235,
            "name": "Jude Bellingham",
            "team": {"name": "Real Madrid", "country": {"name": "Spain"}},
            "country": {"name": "England"},
            "dateOfBirthTimestamp": 1056326400
        }
    }))
    .unwrap();

    let profile = extract_player_profile(&response);
    assert_eq!(profile.name, "Jude Bellingham");
    assert_eq!(profile.team, Some(TeamKey::new("Real Madrid", "Spain")));
    assert_eq!(profile.country, "England");
    assert_eq!(profile.birth_date, NaiveDate::from_ymd_opt(2003, 6, 23).unwrap());
}
