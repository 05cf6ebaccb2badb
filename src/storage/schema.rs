//! Database schema and connection management

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Connection manager for the football dataset
pub struct MatchDatabase {
    pub(crate) conn: Connection,
}

impl MatchDatabase {
    /// Open (or create) the database at `path` and ensure tables exist
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// Fresh in-memory database, used by tests and dry runs
    pub fn new_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS teams (
                team_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                country TEXT NOT NULL,
                UNIQUE (name, country)
            )",
            [],
        )?;

        // country_id points at the national side, which is also a team row
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS players (
                player_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                team_id INTEGER NOT NULL REFERENCES teams(team_id),
                country_id INTEGER NOT NULL REFERENCES teams(team_id),
                birth_date TEXT NOT NULL,
                UNIQUE (name, birth_date)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS matches (
                match_id INTEGER PRIMARY KEY AUTOINCREMENT,
                kickoff TEXT NOT NULL,
                league TEXT NOT NULL,
                home_team_id INTEGER NOT NULL REFERENCES teams(team_id),
                away_team_id INTEGER NOT NULL REFERENCES teams(team_id),
                home_shots INTEGER NOT NULL DEFAULT 0,
                away_shots INTEGER NOT NULL DEFAULT 0,
                home_shots_on_target INTEGER NOT NULL DEFAULT 0,
                away_shots_on_target INTEGER NOT NULL DEFAULT 0,
                home_fouls INTEGER NOT NULL DEFAULT 0,
                away_fouls INTEGER NOT NULL DEFAULT 0,
                home_corners INTEGER NOT NULL DEFAULT 0,
                away_corners INTEGER NOT NULL DEFAULT 0,
                home_yellow_cards INTEGER NOT NULL DEFAULT 0,
                away_yellow_cards INTEGER NOT NULL DEFAULT 0,
                home_red_cards INTEGER NOT NULL DEFAULT 0,
                away_red_cards INTEGER NOT NULL DEFAULT 0,
                home_saves INTEGER NOT NULL DEFAULT 0,
                away_saves INTEGER NOT NULL DEFAULT 0,
                UNIQUE (kickoff, league, home_team_id, away_team_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS match_period_stats (
                match_id INTEGER NOT NULL REFERENCES matches(match_id) ON DELETE CASCADE,
                period TEXT NOT NULL,
                home_shots INTEGER NOT NULL DEFAULT 0,
                away_shots INTEGER NOT NULL DEFAULT 0,
                home_shots_on_target INTEGER NOT NULL DEFAULT 0,
                away_shots_on_target INTEGER NOT NULL DEFAULT 0,
                home_fouls INTEGER NOT NULL DEFAULT 0,
                away_fouls INTEGER NOT NULL DEFAULT 0,
                home_corners INTEGER NOT NULL DEFAULT 0,
                away_corners INTEGER NOT NULL DEFAULT 0,
                home_yellow_cards INTEGER NOT NULL DEFAULT 0,
                away_yellow_cards INTEGER NOT NULL DEFAULT 0,
                home_red_cards INTEGER NOT NULL DEFAULT 0,
                away_red_cards INTEGER NOT NULL DEFAULT 0,
                home_saves INTEGER NOT NULL DEFAULT 0,
                away_saves INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (match_id, period)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS player_stats (
                stat_id INTEGER PRIMARY KEY AUTOINCREMENT,
                match_id INTEGER NOT NULL REFERENCES matches(match_id) ON DELETE CASCADE,
                player_id INTEGER NOT NULL REFERENCES players(player_id),
                goals INTEGER NOT NULL DEFAULT 0,
                assists INTEGER NOT NULL DEFAULT 0,
                shots INTEGER NOT NULL DEFAULT 0,
                shots_on_target INTEGER NOT NULL DEFAULT 0,
                fouls_committed INTEGER NOT NULL DEFAULT 0,
                fouls_drawn INTEGER NOT NULL DEFAULT 0,
                saves INTEGER NOT NULL DEFAULT 0,
                is_starting INTEGER NOT NULL DEFAULT 0,
                minutes_played INTEGER NOT NULL DEFAULT 0,
                UNIQUE (match_id, player_id)
            )",
            [],
        )?;

        // Indexes for per-team history reads
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_matches_home_kickoff
             ON matches(home_team_id, kickoff)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_matches_away_kickoff
             ON matches(away_team_id, kickoff)",
            [],
        )?;

        Ok(())
    }
}
