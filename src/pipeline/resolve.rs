//! Mapping scraped teams and players onto stored rows.

use crate::cli::types::{PlayerId, TeamId};
use crate::error::Result;
use crate::models::{CompleteMatchRecord, MatchCandidate, PlayerLine};
use crate::storage::{LookupOutcome, MatchDatabase, PlayerKey, TeamKey};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

/// A player that does not exist yet, with the teams it will reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPlayer {
    pub key: PlayerKey,
    pub team: TeamKey,
    pub country: TeamKey,
}

/// Everything one run learns about entity identities.
///
/// Created fresh for each run and handed from the resolver to the writer.
#[derive(Debug, Default)]
pub struct ResolutionSession {
    probed_teams: HashSet<TeamKey>,
    probed_players: HashSet<PlayerKey>,
    team_ids: HashMap<TeamKey, TeamId>,
    player_ids: HashMap<PlayerKey, PlayerId>,
    teams_to_create: BTreeSet<TeamKey>,
    players_to_create: BTreeMap<PlayerKey, PendingPlayer>,
    unresolved_teams: BTreeSet<TeamKey>,
    deferred_players: BTreeSet<PlayerKey>,
}

impl ResolutionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team_id(&self, key: &TeamKey) -> Option<TeamId> {
        self.team_ids.get(key).copied()
    }

    pub fn player_id(&self, key: &PlayerKey) -> Option<PlayerId> {
        self.player_ids.get(key).copied()
    }

    pub fn team_ids(&self) -> &HashMap<TeamKey, TeamId> {
        &self.team_ids
    }

    pub fn player_ids(&self) -> &HashMap<PlayerKey, PlayerId> {
        &self.player_ids
    }

    pub fn teams_to_create(&self) -> impl Iterator<Item = &TeamKey> {
        self.teams_to_create.iter()
    }

    pub fn players_to_create(&self) -> impl Iterator<Item = &PendingPlayer> {
        self.players_to_create.values()
    }

    pub fn unresolved_teams(&self) -> impl Iterator<Item = &TeamKey> {
        self.unresolved_teams.iter()
    }

    pub fn deferred_players(&self) -> impl Iterator<Item = &PlayerKey> {
        self.deferred_players.iter()
    }

    /// Known means stored already or queued for creation in this run.
    pub fn is_team_known(&self, key: &TeamKey) -> bool {
        self.team_ids.contains_key(key) || self.teams_to_create.contains(key)
    }

    /// Record the ID of a team that now exists, taking it off the creation queue.
    pub fn record_team(&mut self, key: TeamKey, id: TeamId) {
        self.teams_to_create.remove(&key);
        self.team_ids.insert(key, id);
    }

    pub fn record_player(&mut self, key: PlayerKey, id: PlayerId) {
        self.players_to_create.remove(&key);
        self.player_ids.insert(key, id);
    }

    fn resolve_team(&mut self, db: &MatchDatabase, key: TeamKey) -> Result<()> {
        if !self.probed_teams.insert(key.clone()) {
            return Ok(());
        }
        match db.lookup_team(&key)? {
            LookupOutcome::Missing => {
                debug!(team = %key, "New team");
                self.teams_to_create.insert(key);
            }
            LookupOutcome::Found(id) => {
                self.team_ids.insert(key, id);
            }
            LookupOutcome::Ambiguous(ids) => {
                warn!(team = %key, rows = ids.len(), "Integrity warning: team matches several rows");
                self.unresolved_teams.insert(key);
            }
        }
        Ok(())
    }

    fn resolve_player(&mut self, db: &MatchDatabase, line: &PlayerLine, club: &TeamKey) -> Result<()> {
        let key = line.key();
        if !self.probed_players.insert(key.clone()) {
            return Ok(());
        }
        match db.lookup_player(&key)? {
            LookupOutcome::Found(id) => {
                self.player_ids.insert(key, id);
            }
            LookupOutcome::Ambiguous(ids) => {
                warn!(player = %key, rows = ids.len(), "Integrity warning: player matches several rows");
                self.deferred_players.insert(key);
            }
            LookupOutcome::Missing => {
                let country = line.country_key();
                if self.is_team_known(club) && self.is_team_known(&country) {
                    self.players_to_create.insert(
                        key.clone(),
                        PendingPlayer {
                            key,
                            team: club.clone(),
                            country,
                        },
                    );
                } else {
                    warn!(
                        player = %key,
                        team = %club,
                        country = %country,
                        "Deferring player: team not resolvable"
                    );
                    self.deferred_players.insert(key);
                }
            }
        }
        Ok(())
    }
}

/// Fill `session` with IDs and creation queues for every team and player in
/// `discovered` and `records`. Teams are resolved before players.
pub fn resolve(
    session: &mut ResolutionSession,
    db: &MatchDatabase,
    discovered: &[MatchCandidate],
    records: &[CompleteMatchRecord],
) -> Result<()> {
    let fixtures = discovered.iter().chain(records.iter().map(|r| &r.candidate));
    for candidate in fixtures {
        session.resolve_team(db, candidate.home.key())?;
        session.resolve_team(db, candidate.away.key())?;
    }
    for record in records {
        for (_, line) in record.player_stats.iter() {
            session.resolve_team(db, line.country_key())?;
        }
    }

    for record in records {
        for (side, line) in record.player_stats.iter() {
            let club = record.candidate.team(side).key();
            session.resolve_player(db, line, &club)?;
        }
    }

    info!(
        known_teams = session.team_ids.len(),
        new_teams = session.teams_to_create.len(),
        known_players = session.player_ids.len(),
        new_players = session.players_to_create.len(),
        deferred_players = session.deferred_players.len(),
        "Resolution finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::{EventId, SourcePlayerId, SourceTeamId};
    use crate::models::{MatchStatistics, PlayerStatsBySide, TeamRef};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn team(id: u64, name: &str, country: &str) -> TeamRef {
        TeamRef {
            source_id: SourceTeamId::new(id),
            name: name.to_string(),
            country: country.to_string(),
        }
    }

    fn candidate(id: u64, home: TeamRef, away: TeamRef) -> MatchCandidate {
        MatchCandidate {
            event_id: EventId::new(id),
            custom_id: "xY".to_string(),
            slug: "slug".to_string(),
            home,
            away,
            league: "League".to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap(),
        }
    }

    fn line(name: &str, country: &str) -> PlayerLine {
        PlayerLine {
            source_id: SourcePlayerId::new(1),
            name: name.to_string(),
            country: country.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1995, 3, 4).unwrap(),
            is_starting: true,
            minutes_played: 90,
            goals: 0,
            assists: 0,
            shots: 0,
            shots_on_target: 0,
            fouls_committed: 0,
            fouls_drawn: 0,
            saves: 0,
        }
    }

    fn record(c: MatchCandidate, home: Vec<PlayerLine>, away: Vec<PlayerLine>) -> CompleteMatchRecord {
        CompleteMatchRecord {
            candidate: c,
            statistics: MatchStatistics::default(),
            player_stats: PlayerStatsBySide { home, away },
        }
    }

    #[test]
    fn test_new_teams_and_players_are_queued() {
        let db = MatchDatabase::new_in_memory().unwrap();
        let c = candidate(1, team(1, "Arsenal", "England"), team(2, "Chelsea", "England"));
        let records = vec![record(c, vec![line("Saka", "England")], vec![line("Palmer", "England")])];

        let mut session = ResolutionSession::new();
        resolve(&mut session, &db, &[], &records).unwrap();

        let teams: Vec<&TeamKey> = session.teams_to_create().collect();
        assert_eq!(teams.len(), 3);
        assert!(session.is_team_known(&TeamKey::national("England")));
        assert_eq!(session.players_to_create().count(), 2);
        let saka = session
            .players_to_create()
            .find(|p| p.key.name == "Saka")
            .unwrap();
        assert_eq!(saka.team, TeamKey::new("Arsenal", "England"));
    }

    #[test]
    fn test_existing_entities_are_not_queued() {
        let mut db = MatchDatabase::new_in_memory().unwrap();
        let arsenal = TeamKey::new("Arsenal", "England");
        let id = *db.insert_team(&arsenal).unwrap().inserted().unwrap();

        let c = candidate(1, team(1, "Arsenal", "England"), team(2, "Chelsea", "England"));
        let mut session = ResolutionSession::new();
        resolve(&mut session, &db, &[c], &[]).unwrap();

        assert_eq!(session.team_id(&arsenal), Some(id));
        let queued: Vec<&TeamKey> = session.teams_to_create().collect();
        assert_eq!(queued, vec![&TeamKey::new("Chelsea", "England")]);
    }

    #[test]
    fn test_ambiguous_team_defers_its_players() {
        let db = MatchDatabase::new_in_memory().unwrap();
        db.conn
            .execute_batch(
                "DROP TABLE teams;
                 CREATE TABLE teams (team_id INTEGER PRIMARY KEY, name TEXT, country TEXT);
                 INSERT INTO teams (name, country) VALUES ('City', 'England'), ('City', 'England');",
            )
            .unwrap();

        let c = candidate(1, team(1, "City", "England"), team(2, "United", "England"));
        let records = vec![record(c, vec![line("Foden", "England")], vec![line("Rashford", "England")])];

        let mut session = ResolutionSession::new();
        resolve(&mut session, &db, &[], &records).unwrap();

        let unresolved: Vec<&TeamKey> = session.unresolved_teams().collect();
        assert_eq!(unresolved, vec![&TeamKey::new("City", "England")]);
        assert_eq!(session.deferred_players().count(), 1);
        let queued: Vec<&str> = session
            .players_to_create()
            .map(|p| p.key.name.as_str())
            .collect();
        assert_eq!(queued, vec!["Rashford"]);
    }

    #[test]
    fn test_each_key_probed_once() {
        let db = MatchDatabase::new_in_memory().unwrap();
        let home = team(1, "Arsenal", "England");
        let away = team(2, "Chelsea", "England");
        let records = vec![
            record(candidate(1, home.clone(), away.clone()), vec![line("Saka", "England")], vec![]),
            record(candidate(2, away, home), vec![], vec![line("Saka", "England")]),
        ];

        let mut session = ResolutionSession::new();
        resolve(&mut session, &db, &[], &records).unwrap();

        assert_eq!(session.players_to_create().count(), 1);
        // First sighting decides the club
        let saka = session.players_to_create().next().unwrap();
        assert_eq!(saka.team.name, "Arsenal");
    }

    #[test]
    fn test_same_name_different_countries_are_distinct() {
        let db = MatchDatabase::new_in_memory().unwrap();
        let c = candidate(1, team(1, "City", "England"), team(2, "City", "Scotland"));

        let mut session = ResolutionSession::new();
        resolve(&mut session, &db, &[c], &[]).unwrap();

        assert_eq!(session.teams_to_create().count(), 2);
    }
}
