use std::sync::Arc;

use tracing::debug;

use crate::{
    dao::{
        kv_store::KeyValueStore,
        models::TeamEntity,
        slot::{log_fallback, read_slot, write_slot},
    },
    state::{
        decode::{Decoded, FallbackReason},
        roster::{MAX_TEAMS, MIN_TEAMS, Team, TeamRoster, clamp_team_count},
    },
};

/// Write-through persistence of a board's team roster.
#[derive(Clone)]
pub struct RosterStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl RosterStore {
    /// Store bound to the slot at `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Slot key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted roster, or `fallback_count` default teams when the slot is missing,
    /// corrupt, empty or holds a roster outside `[MIN_TEAMS, MAX_TEAMS]`.
    pub fn load(&self, fallback_count: i64) -> Decoded<TeamRoster> {
        let decoded = read_slot::<Vec<TeamEntity>>(self.store.as_ref(), &self.key).and_then(
            |entities| {
                if (MIN_TEAMS..=MAX_TEAMS).contains(&entities.len()) {
                    Ok(TeamRoster::from_entities(entities))
                } else {
                    Err(FallbackReason::WrongShape(format!(
                        "roster holds {} teams",
                        entities.len()
                    )))
                }
            },
        );

        match decoded {
            Ok(roster) => Decoded::Ok(roster),
            Err(reason) => {
                log_fallback(&self.key, &reason);
                Decoded::fallback(TeamRoster::defaults(fallback_count), reason)
            }
        }
    }

    /// Persist the full roster, replacing whatever the slot held.
    pub fn save(&self, roster: &TeamRoster) {
        write_slot(self.store.as_ref(), &self.key, &roster.to_entities());
    }

    /// Ensure the stored roster has `clamp_team_count(count)` teams. A roster of another size is
    /// replaced by defaults rather than stretched or truncated. Returns the resulting roster.
    pub fn set_count(&self, count: i64) -> TeamRoster {
        let count = clamp_team_count(count);
        let current = self.load(count as i64);
        if !current.is_fallback() && current.value().len() == count {
            return current.into_value();
        }

        debug!(key = %self.key, count, "replacing roster with defaults");
        let roster = TeamRoster::defaults(count as i64);
        self.save(&roster);
        roster
    }

    /// Replace the roster with fresh defaults of `count` teams.
    pub fn reset(&self, count: i64) -> TeamRoster {
        let roster = TeamRoster::defaults(count);
        self.save(&roster);
        roster
    }

    /// Add `delta` to a team's score and persist. Out-of-range indexes change nothing.
    pub fn adjust_score(&self, roster: &mut TeamRoster, index: usize, delta: i64) -> Option<Team> {
        let team = roster.adjust_score(index, delta)?.clone();
        self.save(roster);
        Some(team)
    }

    /// Rename a team and persist. Out-of-range indexes change nothing.
    pub fn rename(&self, roster: &mut TeamRoster, index: usize, name: &str) -> Option<Team> {
        let team = roster.rename(index, name)?.clone();
        self.save(roster);
        Some(team)
    }

    /// Replace the roster wholesale with normalised `teams`. Empty input, or more than
    /// `MAX_TEAMS` records, is ignored and returns `false`.
    pub fn replace(&self, roster: &mut TeamRoster, mut teams: Vec<TeamEntity>) -> bool {
        if teams.is_empty() || teams.len() > MAX_TEAMS {
            return false;
        }
        // Blank names are filled in positionally by `from_entities`.
        teams.resize_with(teams.len().max(MIN_TEAMS), || TeamEntity {
            name: String::new(),
            score: 0,
        });
        let next = TeamRoster::from_entities(teams);
        self.save(&next);
        *roster = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::kv_store::MemoryStore;

    const KEY: &str = "boards.play.test.teams";

    fn store_with(raw: Option<&str>) -> (Arc<MemoryStore>, RosterStore) {
        let memory = Arc::new(MemoryStore::new());
        if let Some(raw) = raw {
            memory.set(KEY, raw).unwrap();
        }
        let roster_store = RosterStore::new(memory.clone(), KEY);
        (memory, roster_store)
    }

    fn alpha_beta() -> TeamRoster {
        TeamRoster::from_entities(vec![
            TeamEntity {
                name: "Alpha".into(),
                score: 300,
            },
            TeamEntity {
                name: "Beta".into(),
                score: 100,
            },
        ])
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_, store) = store_with(None);
        for count in MIN_TEAMS..=MAX_TEAMS {
            let mut roster = TeamRoster::defaults(count as i64);
            roster.adjust_score(0, -250);
            roster.rename(count - 1, "Last");
            store.save(&roster);
            assert_eq!(store.load(2), Decoded::Ok(roster));
        }
    }

    #[test]
    fn corrupt_slots_fall_back_to_defaults() {
        for raw in ["not json", "42", "null", "[]", "{\"name\":\"x\"}", "[1,2]"] {
            let (_, store) = store_with(Some(raw));
            let loaded = store.load(3);
            assert!(loaded.is_fallback(), "{raw}");
            assert_eq!(loaded.into_value(), TeamRoster::defaults(3), "{raw}");
        }
    }

    #[test]
    fn missing_slot_is_reported_as_missing() {
        let (_, store) = store_with(None);
        let loaded = store.load(99);
        assert_eq!(loaded.reason(), Some(&FallbackReason::Missing));
        assert_eq!(loaded.value().len(), MAX_TEAMS);
    }

    #[test]
    fn oversized_roster_is_rejected() {
        let raw = serde_json::to_string(&vec![
            TeamEntity {
                name: "x".into(),
                score: 0
            };
            7
        ])
        .unwrap();
        let (_, store) = store_with(Some(&raw));
        assert!(matches!(
            store.load(2).reason(),
            Some(FallbackReason::WrongShape(_))
        ));
    }

    #[test]
    fn adjust_score_persists_immediately() {
        let (_, store) = store_with(None);
        let mut roster = alpha_beta();
        store.save(&roster);

        let team = store.adjust_score(&mut roster, 0, -100).unwrap();
        assert_eq!(team.score, 200);
        assert_eq!(store.load(2).into_value(), roster);
        assert_eq!(roster.get(1).unwrap().score, 100);
    }

    #[test]
    fn out_of_range_updates_do_not_write() {
        let (memory, store) = store_with(None);
        let mut roster = alpha_beta();
        assert!(store.adjust_score(&mut roster, 5, 100).is_none());
        assert!(store.rename(&mut roster, 5, "Nope").is_none());
        assert!(memory.get(KEY).unwrap().is_none());
    }

    #[test]
    fn set_count_replaces_mismatched_roster() {
        let (_, store) = store_with(None);
        store.save(&alpha_beta());

        let same = store.set_count(2);
        assert_eq!(same, alpha_beta());

        let resized = store.set_count(4);
        assert_eq!(resized, TeamRoster::defaults(4));
        assert_eq!(store.load(2).into_value(), resized);

        assert_eq!(store.set_count(42).len(), MAX_TEAMS);
    }

    #[test]
    fn replace_normalises_and_ignores_empty_input() {
        let (_, store) = store_with(None);
        let mut roster = TeamRoster::defaults(2);

        assert!(!store.replace(&mut roster, Vec::new()));
        assert_eq!(roster, TeamRoster::defaults(2));

        assert!(store.replace(
            &mut roster,
            vec![TeamEntity {
                name: " ".into(),
                score: 40
            }]
        ));
        assert_eq!(roster.len(), MIN_TEAMS);
        assert_eq!(roster.get(0).unwrap().name, "Team 1");
        assert_eq!(roster.get(0).unwrap().score, 40);
        assert_eq!(roster.get(1).unwrap().name, "Team 2");
        assert_eq!(store.load(2).into_value(), roster);
    }
}
