//! Basic database query operations

use super::{models::*, schema::MatchDatabase};
use crate::cli::types::{MatchId, PlayerId, TeamId};
use crate::models::{PeriodStats, SideTotals};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, ErrorCode, OptionalExtension, Row, Transaction};

const DATE_FORMAT: &str = "%Y-%m-%d";

const MATCH_COLUMNS: &str = "m.match_id, m.kickoff, m.league, m.home_team_id, m.away_team_id,
     m.home_shots, m.away_shots, m.home_shots_on_target, m.away_shots_on_target,
     m.home_fouls, m.away_fouls, m.home_corners, m.away_corners,
     m.home_yellow_cards, m.away_yellow_cards, m.home_red_cards, m.away_red_cards,
     m.home_saves, m.away_saves";

const PLAYER_STAT_COLUMNS: &str = "s.match_id, s.player_id, p.name, s.goals, s.assists, s.shots,
     s.shots_on_target, s.fouls_committed, s.fouls_drawn, s.saves, s.is_starting, s.minutes_played";

pub(crate) fn format_kickoff(kickoff: &DateTime<Utc>) -> String {
    kickoff.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_kickoff(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn parse_date(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

/// Read fourteen interleaved home/away counters starting at `offset`.
fn read_totals(row: &Row, offset: usize) -> rusqlite::Result<(SideTotals, SideTotals)> {
    let mut home = SideTotals::default();
    let mut away = SideTotals::default();
    home.total_shots = row.get(offset)?;
    away.total_shots = row.get(offset + 1)?;
    home.shots_on_target = row.get(offset + 2)?;
    away.shots_on_target = row.get(offset + 3)?;
    home.fouls = row.get(offset + 4)?;
    away.fouls = row.get(offset + 5)?;
    home.corners = row.get(offset + 6)?;
    away.corners = row.get(offset + 7)?;
    home.yellow_cards = row.get(offset + 8)?;
    away.yellow_cards = row.get(offset + 9)?;
    home.red_cards = row.get(offset + 10)?;
    away.red_cards = row.get(offset + 11)?;
    home.total_saves = row.get(offset + 12)?;
    away.total_saves = row.get(offset + 13)?;
    Ok((home, away))
}

fn totals_values(home: &SideTotals, away: &SideTotals) -> [u32; 14] {
    [
        home.total_shots,
        away.total_shots,
        home.shots_on_target,
        away.shots_on_target,
        home.fouls,
        away.fouls,
        home.corners,
        away.corners,
        home.yellow_cards,
        away.yellow_cards,
        home.red_cards,
        away.red_cards,
        home.total_saves,
        away.total_saves,
    ]
}

fn row_to_match(row: &Row) -> rusqlite::Result<StoredMatch> {
    let (home, away) = read_totals(row, 5)?;
    Ok(StoredMatch {
        match_id: MatchId::new(row.get(0)?),
        kickoff: parse_kickoff(row, 1)?,
        league: row.get(2)?,
        home_team_id: TeamId::new(row.get(3)?),
        away_team_id: TeamId::new(row.get(4)?),
        home,
        away,
    })
}

fn row_to_player_stat(row: &Row) -> rusqlite::Result<StoredPlayerStat> {
    Ok(StoredPlayerStat {
        match_id: MatchId::new(row.get(0)?),
        player_id: PlayerId::new(row.get(1)?),
        player_name: row.get(2)?,
        goals: row.get(3)?,
        assists: row.get(4)?,
        shots: row.get(5)?,
        shots_on_target: row.get(6)?,
        fouls_committed: row.get(7)?,
        fouls_drawn: row.get(8)?,
        saves: row.get(9)?,
        is_starting: row.get(10)?,
        minutes_played: row.get(11)?,
    })
}

impl EntityLookup<'_> {
    fn sql(&self) -> &'static str {
        match self {
            EntityLookup::TeamByNameCountry(_) => {
                "SELECT team_id FROM teams WHERE name = ? AND country = ? ORDER BY team_id"
            }
            EntityLookup::PlayerByNameBirthDate(_) => {
                "SELECT player_id FROM players WHERE name = ? AND birth_date = ? ORDER BY player_id"
            }
        }
    }

    fn values(&self) -> [String; 2] {
        match self {
            EntityLookup::TeamByNameCountry(key) => [key.name.clone(), key.country.clone()],
            EntityLookup::PlayerByNameBirthDate(key) => {
                [key.name.clone(), format_date(&key.birth_date)]
            }
        }
    }
}

/// Insert the match row and every dependent row inside `tx`.
/// On failure returns the table whose statement failed.
fn write_match(
    tx: &Transaction,
    new_match: &NewMatch,
    periods: &[PeriodStats],
    stats: &[NewPlayerStat],
) -> std::result::Result<MatchId, (&'static str, rusqlite::Error)> {
    let t = totals_values(&new_match.home, &new_match.away);
    tx.execute(
        "INSERT INTO matches
         (kickoff, league, home_team_id, away_team_id,
          home_shots, away_shots, home_shots_on_target, away_shots_on_target,
          home_fouls, away_fouls, home_corners, away_corners,
          home_yellow_cards, away_yellow_cards, home_red_cards, away_red_cards,
          home_saves, away_saves)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            format_kickoff(&new_match.kickoff),
            new_match.league,
            new_match.home_team_id.as_i64(),
            new_match.away_team_id.as_i64(),
            t[0],
            t[1],
            t[2],
            t[3],
            t[4],
            t[5],
            t[6],
            t[7],
            t[8],
            t[9],
            t[10],
            t[11],
            t[12],
            t[13]
        ],
    )
    .map_err(|e| ("matches", e))?;
    let match_id = MatchId::new(tx.last_insert_rowid());

    for period in periods {
        let t = totals_values(&period.home, &period.away);
        tx.execute(
            "INSERT INTO match_period_stats
             (match_id, period,
              home_shots, away_shots, home_shots_on_target, away_shots_on_target,
              home_fouls, away_fouls, home_corners, away_corners,
              home_yellow_cards, away_yellow_cards, home_red_cards, away_red_cards,
              home_saves, away_saves)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                match_id.as_i64(),
                period.period,
                t[0],
                t[1],
                t[2],
                t[3],
                t[4],
                t[5],
                t[6],
                t[7],
                t[8],
                t[9],
                t[10],
                t[11],
                t[12],
                t[13]
            ],
        )
        .map_err(|e| ("match_period_stats", e))?;
    }

    for stat in stats {
        tx.execute(
            "INSERT INTO player_stats
             (match_id, player_id, goals, assists, shots, shots_on_target,
              fouls_committed, fouls_drawn, saves, is_starting, minutes_played)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                match_id.as_i64(),
                stat.player_id.as_i64(),
                stat.goals,
                stat.assists,
                stat.shots,
                stat.shots_on_target,
                stat.fouls_committed,
                stat.fouls_drawn,
                stat.saves,
                stat.is_starting,
                stat.minutes_played
            ],
        )
        .map_err(|e| ("player_stats", e))?;
    }

    Ok(match_id)
}

impl MatchDatabase {
    /// Run one identity lookup, returning every matching row id
    pub fn lookup(&self, lookup: EntityLookup<'_>) -> Result<LookupOutcome<i64>> {
        let mut stmt = self.conn.prepare(lookup.sql())?;
        let ids = stmt
            .query_map(params_from_iter(lookup.values().iter()), |row| {
                row.get::<_, i64>(0)
            })?
            .collect::<rusqlite::Result<Vec<i64>>>()?;

        Ok(match ids.len() {
            0 => LookupOutcome::Missing,
            1 => LookupOutcome::Found(ids[0]),
            _ => LookupOutcome::Ambiguous(ids),
        })
    }

    pub fn lookup_team(&self, key: &TeamKey) -> Result<LookupOutcome<TeamId>> {
        Ok(self
            .lookup(EntityLookup::TeamByNameCountry(key))?
            .map(TeamId::new))
    }

    pub fn lookup_player(&self, key: &PlayerKey) -> Result<LookupOutcome<PlayerId>> {
        Ok(self
            .lookup(EntityLookup::PlayerByNameBirthDate(key))?
            .map(PlayerId::new))
    }

    /// Insert a team; an existing (name, country) pair is reported as a conflict
    pub fn insert_team(&mut self, key: &TeamKey) -> Result<InsertOutcome<TeamId>> {
        match self.conn.execute(
            "INSERT INTO teams (name, country) VALUES (?, ?)",
            params![key.name, key.country],
        ) {
            Ok(_) => Ok(InsertOutcome::Inserted(TeamId::new(
                self.conn.last_insert_rowid(),
            ))),
            Err(e) if is_constraint_violation(&e) => Ok(InsertOutcome::Conflict {
                table: "teams",
                message: e.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a player; duplicates and unknown team references are conflicts
    pub fn insert_player(&mut self, player: &NewPlayer) -> Result<InsertOutcome<PlayerId>> {
        match self.conn.execute(
            "INSERT INTO players (name, team_id, country_id, birth_date) VALUES (?, ?, ?, ?)",
            params![
                player.key.name,
                player.team_id.as_i64(),
                player.country_id.as_i64(),
                format_date(&player.key.birth_date)
            ],
        ) {
            Ok(_) => Ok(InsertOutcome::Inserted(PlayerId::new(
                self.conn.last_insert_rowid(),
            ))),
            Err(e) if is_constraint_violation(&e) => Ok(InsertOutcome::Conflict {
                table: "players",
                message: e.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a match with its period counters and player lines as one unit.
    /// Either everything is written or nothing is.
    pub fn insert_match_with_stats(
        &mut self,
        new_match: &NewMatch,
        periods: &[PeriodStats],
        stats: &[NewPlayerStat],
    ) -> Result<InsertOutcome<MatchId>> {
        let tx = self.conn.transaction()?;
        match write_match(&tx, new_match, periods, stats) {
            Ok(match_id) => {
                tx.commit()?;
                Ok(InsertOutcome::Inserted(match_id))
            }
            Err((table, e)) if is_constraint_violation(&e) => {
                tx.rollback()?;
                Ok(InsertOutcome::Conflict {
                    table,
                    message: e.to_string(),
                })
            }
            Err((_, e)) => {
                tx.rollback()?;
                Err(e.into())
            }
        }
    }

    pub fn get_team(&self, key: &TeamKey) -> Result<Option<Team>> {
        let team = self
            .conn
            .query_row(
                "SELECT team_id, name, country FROM teams WHERE name = ? AND country = ?",
                params![key.name, key.country],
                |row| {
                    Ok(Team {
                        team_id: TeamId::new(row.get(0)?),
                        name: row.get(1)?,
                        country: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(team)
    }

    pub fn get_player(&self, key: &PlayerKey) -> Result<Option<Player>> {
        let player = self
            .conn
            .query_row(
                "SELECT player_id, name, team_id, country_id, birth_date
                 FROM players WHERE name = ? AND birth_date = ?",
                params![key.name, format_date(&key.birth_date)],
                |row| {
                    Ok(Player {
                        player_id: PlayerId::new(row.get(0)?),
                        name: row.get(1)?,
                        team_id: TeamId::new(row.get(2)?),
                        country_id: TeamId::new(row.get(3)?),
                        birth_date: parse_date(row, 4)?,
                    })
                },
            )
            .optional()?;
        Ok(player)
    }

    pub fn get_match(&self, match_id: MatchId) -> Result<Option<StoredMatch>> {
        let sql = format!("SELECT {MATCH_COLUMNS} FROM matches m WHERE m.match_id = ?");
        let found = self
            .conn
            .query_row(&sql, params![match_id.as_i64()], row_to_match)
            .optional()?;
        Ok(found)
    }

    /// Find a match by its natural key
    pub fn find_match(
        &self,
        kickoff: &DateTime<Utc>,
        league: &str,
        home_team_id: TeamId,
        away_team_id: TeamId,
    ) -> Result<Option<StoredMatch>> {
        let sql = format!(
            "SELECT {MATCH_COLUMNS} FROM matches m
             WHERE m.kickoff = ? AND m.league = ? AND m.home_team_id = ? AND m.away_team_id = ?"
        );
        let found = self
            .conn
            .query_row(
                &sql,
                params![
                    format_kickoff(kickoff),
                    league,
                    home_team_id.as_i64(),
                    away_team_id.as_i64()
                ],
                row_to_match,
            )
            .optional()?;
        Ok(found)
    }

    pub fn period_stats_for_match(&self, match_id: MatchId) -> Result<Vec<PeriodStats>> {
        let mut stmt = self.conn.prepare(
            "SELECT period,
                    home_shots, away_shots, home_shots_on_target, away_shots_on_target,
                    home_fouls, away_fouls, home_corners, away_corners,
                    home_yellow_cards, away_yellow_cards, home_red_cards, away_red_cards,
                    home_saves, away_saves
             FROM match_period_stats WHERE match_id = ? ORDER BY period",
        )?;
        let rows = stmt
            .query_map(params![match_id.as_i64()], |row| {
                let (home, away) = read_totals(row, 1)?;
                Ok(PeriodStats {
                    period: row.get(0)?,
                    home,
                    away,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn player_stats_for_match(&self, match_id: MatchId) -> Result<Vec<StoredPlayerStat>> {
        let sql = format!(
            "SELECT {PLAYER_STAT_COLUMNS}
             FROM player_stats s JOIN players p ON p.player_id = s.player_id
             WHERE s.match_id = ?
             ORDER BY s.is_starting DESC, s.minutes_played DESC, p.name"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![match_id.as_i64()], row_to_player_stat)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Most recent stored matches involving a team, newest first,
    /// each with its player-stat rows
    pub fn recent_matches_for_team(&self, key: &TeamKey, limit: usize) -> Result<Vec<RecentMatch>> {
        let sql = format!(
            "SELECT {MATCH_COLUMNS}, ht.name, at.name
             FROM matches m
             JOIN teams ht ON ht.team_id = m.home_team_id
             JOIN teams at ON at.team_id = m.away_team_id
             WHERE (ht.name = ?1 AND ht.country = ?2) OR (at.name = ?1 AND at.country = ?2)
             ORDER BY m.kickoff DESC
             LIMIT ?3"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let heads = stmt
            .query_map(params![key.name, key.country, limit as i64], |row| {
                Ok((row_to_match(row)?, row.get::<_, String>(19)?, row.get::<_, String>(20)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut recent = Vec::with_capacity(heads.len());
        for (match_row, home_team, away_team) in heads {
            let player_stats = self.player_stats_for_match(match_row.match_id)?;
            recent.push(RecentMatch {
                match_row,
                home_team,
                away_team,
                player_stats,
            });
        }
        Ok(recent)
    }

    pub fn count_teams(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM teams")
    }

    pub fn count_players(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM players")
    }

    pub fn count_matches(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM matches")
    }

    pub fn count_player_stats(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM player_stats")
    }

    fn count(&self, sql: &str) -> Result<usize> {
        let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
