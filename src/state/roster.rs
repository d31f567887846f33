use serde::Serialize;

use crate::dao::models::TeamEntity;

/// Smallest roster a board can be played with.
pub const MIN_TEAMS: usize = 2;
/// Largest roster a board can be played with.
pub const MAX_TEAMS: usize = 6;

/// Clamp any requested team count into `[MIN_TEAMS, MAX_TEAMS]`.
pub fn clamp_team_count(requested: i64) -> usize {
    requested.clamp(MIN_TEAMS as i64, MAX_TEAMS as i64) as usize
}

/// Positional default name, 1-indexed.
pub fn default_team_name(index: usize) -> String {
    format!("Team {}", index + 1)
}

/// A competing team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    /// Display name.
    pub name: String,
    /// Current score, unbounded in both directions.
    pub score: i64,
}

impl Team {
    /// Fresh team for display position `index`.
    pub fn default_at(index: usize) -> Self {
        Self {
            name: default_team_name(index),
            score: 0,
        }
    }

    fn from_entity(index: usize, entity: TeamEntity) -> Self {
        let name = if entity.name.trim().is_empty() {
            default_team_name(index)
        } else {
            entity.name
        };
        Self {
            name,
            score: entity.score,
        }
    }
}

/// Ordered teams of a session; the index is the display and quick-select order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TeamRoster {
    teams: Vec<Team>,
}

impl TeamRoster {
    /// Fresh roster of `clamp_team_count(count)` default teams.
    pub fn defaults(count: i64) -> Self {
        let count = clamp_team_count(count);
        Self {
            teams: (0..count).map(Team::default_at).collect(),
        }
    }

    /// Build a roster from persisted records, replacing blank names by positional defaults.
    pub fn from_entities(entities: Vec<TeamEntity>) -> Self {
        Self {
            teams: entities
                .into_iter()
                .enumerate()
                .map(|(index, entity)| Team::from_entity(index, entity))
                .collect(),
        }
    }

    /// Persisted representation.
    pub fn to_entities(&self) -> Vec<TeamEntity> {
        self.teams
            .iter()
            .map(|team| TeamEntity {
                name: team.name.clone(),
                score: team.score,
            })
            .collect()
    }

    /// Number of teams.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether the roster has no team.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Team at `index`.
    pub fn get(&self, index: usize) -> Option<&Team> {
        self.teams.get(index)
    }

    /// Teams in display order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Iterate teams in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }

    /// Add `delta` to the score of the team at `index`. Returns the updated team, or `None` when
    /// the index is out of range.
    pub fn adjust_score(&mut self, index: usize, delta: i64) -> Option<&Team> {
        let team = self.teams.get_mut(index)?;
        team.score = team.score.saturating_add(delta);
        Some(&*team)
    }

    /// Rename the team at `index` to the trimmed `name`, keeping the positional default when the
    /// trimmed value is empty. Returns the updated team, or `None` when out of range.
    pub fn rename(&mut self, index: usize, name: &str) -> Option<&Team> {
        let team = self.teams.get_mut(index)?;
        let trimmed = name.trim();
        team.name = if trimmed.is_empty() {
            default_team_name(index)
        } else {
            trimmed.to_string()
        };
        Some(&*team)
    }
}

impl<'a> IntoIterator for &'a TeamRoster {
    type Item = &'a Team;
    type IntoIter = std::slice::Iter<'a, Team>;

    fn into_iter(self) -> Self::IntoIter {
        self.teams.iter()
    }
}
