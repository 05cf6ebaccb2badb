//! Integration tests for on-disk storage

use chrono::{NaiveDate, TimeZone, Utc};
use sport_data_hub::{
    models::{PeriodStats, SideTotals},
    storage::*,
};
use tempfile::TempDir;

fn inserted<T: Copy + std::fmt::Debug>(outcome: InsertOutcome<T>) -> T {
    *outcome.inserted().expect("insert should not conflict")
}

#[test]
fn test_open_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("football.db");

    let db = MatchDatabase::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(db.count_teams().unwrap(), 0);
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("football.db");
    let key = TeamKey::new("Celtic", "Scotland");

    let team_id = {
        let mut db = MatchDatabase::open(&path).unwrap();
        inserted(db.insert_team(&key).unwrap())
    };

    // Reopening must not reset the schema or the rows
    let db = MatchDatabase::open(&path).unwrap();
    assert_eq!(db.lookup_team(&key).unwrap(), LookupOutcome::Found(team_id));
}

#[test]
fn test_full_match_round_trip_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut db = MatchDatabase::open(&dir.path().join("football.db")).unwrap();

    let home = inserted(db.insert_team(&TeamKey::new("Celtic", "Scotland")).unwrap());
    let away = inserted(db.insert_team(&TeamKey::new("Rangers", "Scotland")).unwrap());
    let scotland = inserted(db.insert_team(&TeamKey::national("Scotland")).unwrap());
    let player = inserted(
        db.insert_player(&NewPlayer {
            key: PlayerKey::new("Callum McGregor", NaiveDate::from_ymd_opt(1993, 6, 14).unwrap()),
            team_id: home,
            country_id: scotland,
        })
        .unwrap(),
    );

    let totals = SideTotals {
        corners: 8,
        fouls: 13,
        yellow_cards: 3,
        red_cards: 1,
        total_shots: 17,
        shots_on_target: 7,
        total_saves: 2,
    };
    let kickoff = Utc.with_ymd_and_hms(2024, 4, 7, 12, 0, 0).unwrap();
    let match_id = inserted(
        db.insert_match_with_stats(
            &NewMatch {
                kickoff,
                league: "Premiership".to_string(),
                home_team_id: home,
                away_team_id: away,
                home: totals,
                away: SideTotals::default(),
            },
            &[PeriodStats {
                period: "ALL".to_string(),
                home: totals,
                away: SideTotals::default(),
            }],
            &[NewPlayerStat {
                player_id: player,
                goals: 0,
                assists: 1,
                shots: 2,
                shots_on_target: 1,
                fouls_committed: 2,
                fouls_drawn: 1,
                saves: 0,
                is_starting: true,
                minutes_played: 90,
            }],
        )
        .unwrap(),
    );

    let stored = db.get_match(match_id).unwrap().unwrap();
    assert_eq!(stored.kickoff, kickoff);
    assert_eq!(stored.home, totals);

    let recent = db
        .recent_matches_for_team(&TeamKey::new("Rangers", "Scotland"), 1)
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].player_stats[0].player_id, player);
    assert_eq!(recent[0].player_stats[0].player_name, "Callum McGregor");
}
