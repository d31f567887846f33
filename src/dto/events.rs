use serde::Serialize;

use crate::state::{roster::Team, state_machine::SessionPhase, used_cells::ActiveClue};

/// Gameplay revealed after the setup prompt.
pub const EVENT_SESSION_STARTED: &str = "session.started";
/// Session wiped and setup prompt shown again.
pub const EVENT_SESSION_RESET: &str = "session.reset";
/// A team's score changed.
pub const EVENT_SCORE_CHANGED: &str = "team.score";
/// A team was renamed.
pub const EVENT_TEAM_RENAMED: &str = "team.renamed";
/// The quick-selected team changed.
pub const EVENT_TEAM_SELECTED: &str = "team.selected";
/// The roster changed size.
pub const EVENT_ROSTER_RESIZED: &str = "roster.resized";
/// A clue cell was consumed.
pub const EVENT_CELL_USED: &str = "cell.used";
/// The +/- score step changed.
pub const EVENT_SCORE_STEP_CHANGED: &str = "score_step.changed";
/// A clue was opened in the question view.
pub const EVENT_CLUE_OPENED: &str = "clue.opened";
/// The question view was closed.
pub const EVENT_CLUE_CLOSED: &str = "clue.closed";

/// Notification emitted by a board session after its state has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionNotification {
    /// Gameplay can be revealed with `team_count` teams.
    Started {
        /// Board the session belongs to.
        board_id: String,
        /// Clamped team count.
        team_count: usize,
    },
    /// The session was wiped; the setup prompt must be shown again.
    Reset {
        /// Board the session belongs to.
        board_id: String,
        /// Team count proposed by the setup prompt.
        team_count: usize,
    },
    /// A team's score changed.
    ScoreChanged {
        /// Board the session belongs to.
        board_id: String,
        /// Roster position of the team.
        index: usize,
        /// Team after the change.
        team: Team,
    },
    /// A team was renamed.
    TeamRenamed {
        /// Board the session belongs to.
        board_id: String,
        /// Roster position of the team.
        index: usize,
        /// Team after the change.
        team: Team,
    },
    /// The active team changed; `None` clears the selection.
    TeamSelected {
        /// Board the session belongs to.
        board_id: String,
        /// Roster position of the selected team.
        index: Option<usize>,
    },
    /// The roster was replaced by one of a different size.
    RosterResized {
        /// Board the session belongs to.
        board_id: String,
        /// New roster size.
        team_count: usize,
    },
    /// A clue cell was consumed for the first time.
    CellUsed {
        /// Board the session belongs to.
        board_id: String,
        /// Row of the cell.
        row: u32,
        /// Column of the cell.
        col: u32,
    },
    /// The +/- step used for score buttons changed.
    ScoreStepChanged {
        /// Board the session belongs to.
        board_id: String,
        /// New step.
        step: i64,
    },
    /// A clue was opened and is awaiting a verdict.
    ClueOpened {
        /// Board the session belongs to.
        board_id: String,
        /// The open clue.
        clue: ActiveClue,
    },
    /// The open clue was closed, resolved or not.
    ClueClosed {
        /// Board the session belongs to.
        board_id: String,
    },
}

impl SessionNotification {
    /// Stable event name, suitable for an event-stream `event:` field.
    pub fn name(&self) -> &'static str {
        match self {
            SessionNotification::Started { .. } => EVENT_SESSION_STARTED,
            SessionNotification::Reset { .. } => EVENT_SESSION_RESET,
            SessionNotification::ScoreChanged { .. } => EVENT_SCORE_CHANGED,
            SessionNotification::TeamRenamed { .. } => EVENT_TEAM_RENAMED,
            SessionNotification::TeamSelected { .. } => EVENT_TEAM_SELECTED,
            SessionNotification::RosterResized { .. } => EVENT_ROSTER_RESIZED,
            SessionNotification::CellUsed { .. } => EVENT_CELL_USED,
            SessionNotification::ScoreStepChanged { .. } => EVENT_SCORE_STEP_CHANGED,
            SessionNotification::ClueOpened { .. } => EVENT_CLUE_OPENED,
            SessionNotification::ClueClosed { .. } => EVENT_CLUE_CLOSED,
        }
    }

    /// Board the notification belongs to.
    pub fn board_id(&self) -> &str {
        match self {
            SessionNotification::Started { board_id, .. }
            | SessionNotification::Reset { board_id, .. }
            | SessionNotification::ScoreChanged { board_id, .. }
            | SessionNotification::TeamRenamed { board_id, .. }
            | SessionNotification::TeamSelected { board_id, .. }
            | SessionNotification::RosterResized { board_id, .. }
            | SessionNotification::CellUsed { board_id, .. }
            | SessionNotification::ScoreStepChanged { board_id, .. }
            | SessionNotification::ClueOpened { board_id, .. }
            | SessionNotification::ClueClosed { board_id } => board_id,
        }
    }

    /// Phase the session is in once the notification is delivered, when the event implies one.
    pub fn phase(&self) -> Option<SessionPhase> {
        match self {
            SessionNotification::Started { .. } => Some(SessionPhase::Started),
            SessionNotification::Reset { .. } => Some(SessionPhase::NotStarted),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_serialize_with_event_tag() {
        let event = SessionNotification::Started {
            board_id: "demo-1".into(),
            team_count: 4,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "started");
        assert_eq!(json["team_count"], 4);
        assert_eq!(event.name(), EVENT_SESSION_STARTED);
        assert_eq!(event.board_id(), "demo-1");
        assert_eq!(event.phase(), Some(SessionPhase::Started));
    }
}
