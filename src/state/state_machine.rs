use serde::Serialize;

use crate::{
    dao::models::StartStateEntity,
    state::roster::{MIN_TEAMS, clamp_team_count},
};

/// High-level phases a board session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// The setup overlay is shown and gameplay stays suppressed.
    NotStarted,
    /// The host dismissed the overlay; the board is playable.
    Started,
}

/// Events that move the session between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Host confirmed the setup overlay with a team count.
    Start {
        /// Requested team count, clamped when applied.
        team_count: i64,
    },
    /// Host wiped the session and returned to the setup overlay.
    Reset {
        /// Requested team count, clamped when applied.
        team_count: i64,
    },
}

/// Persisted start/setup state of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartState {
    /// Whether the host dismissed the setup prompt.
    pub started: bool,
    /// Clamped team count.
    pub team_count: usize,
}

impl StartState {
    /// State of a board that was never started.
    pub fn initial(team_count: i64) -> Self {
        Self {
            started: false,
            team_count: clamp_team_count(team_count),
        }
    }

    /// Decode the persisted record, using `fallback_count` when it carries no count.
    pub fn from_entity(entity: StartStateEntity, fallback_count: i64) -> Self {
        Self {
            started: entity.started,
            team_count: clamp_team_count(entity.team_count.unwrap_or(fallback_count)),
        }
    }

    /// Persisted representation.
    pub fn to_entity(self) -> StartStateEntity {
        StartStateEntity {
            started: self.started,
            team_count: Some(self.team_count as i64),
        }
    }

    /// Phase implied by the `started` flag.
    pub fn phase(&self) -> SessionPhase {
        if self.started {
            SessionPhase::Started
        } else {
            SessionPhase::NotStarted
        }
    }
}

impl Default for StartState {
    fn default() -> Self {
        Self::initial(MIN_TEAMS as i64)
    }
}

/// State machine for the setup overlay flow. Both events are accepted from either phase: the host
/// may reopen the overlay mid-game and start again, or reset before ever starting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStateMachine {
    state: StartState,
    version: usize,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new(StartState::default())
    }
}

impl SessionStateMachine {
    /// Resume from a persisted start state.
    pub fn new(state: StartState) -> Self {
        Self { state, version: 0 }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// Current start state.
    pub fn state(&self) -> StartState {
        self.state
    }

    /// Number of transitions applied since the session was loaded.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Apply an event and return the resulting start state.
    pub fn apply(&mut self, event: SessionEvent) -> StartState {
        self.state = match event {
            SessionEvent::Start { team_count } => StartState {
                started: true,
                team_count: clamp_team_count(team_count),
            },
            SessionEvent::Reset { team_count } => StartState::initial(team_count),
        };
        self.version += 1;
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_not_started_with_two_teams() {
        let sm = SessionStateMachine::default();
        assert_eq!(sm.phase(), SessionPhase::NotStarted);
        assert_eq!(sm.state().team_count, 2);
        assert_eq!(sm.version(), 0);
    }

    #[test]
    fn start_then_reset_round_trip() {
        let mut sm = SessionStateMachine::default();

        let started = sm.apply(SessionEvent::Start { team_count: 4 });
        assert_eq!(
            started,
            StartState {
                started: true,
                team_count: 4
            }
        );
        assert_eq!(sm.phase(), SessionPhase::Started);

        let reset = sm.apply(SessionEvent::Reset { team_count: 3 });
        assert_eq!(reset, StartState::initial(3));
        assert_eq!(sm.phase(), SessionPhase::NotStarted);
        assert_eq!(sm.version(), 2);
    }

    #[test]
    fn event_counts_are_clamped() {
        let mut sm = SessionStateMachine::default();
        assert_eq!(sm.apply(SessionEvent::Start { team_count: 99 }).team_count, 6);
        assert_eq!(sm.apply(SessionEvent::Reset { team_count: 0 }).team_count, 2);
    }

    #[test]
    fn restarting_while_started_is_allowed() {
        let mut sm = SessionStateMachine::new(StartState {
            started: true,
            team_count: 2,
        });
        let next = sm.apply(SessionEvent::Start { team_count: 5 });
        assert!(next.started);
        assert_eq!(next.team_count, 5);
    }

    #[test]
    fn entity_without_count_uses_fallback() {
        let entity = StartStateEntity {
            started: true,
            team_count: None,
        };
        assert_eq!(StartState::from_entity(entity, 5).team_count, 5);
        assert_eq!(
            StartState::from_entity(
                StartStateEntity {
                    started: false,
                    team_count: Some(0)
                },
                5
            )
            .team_count,
            2
        );
    }
}
