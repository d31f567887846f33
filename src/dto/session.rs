use serde::Serialize;

use crate::state::{
    roster::Team,
    state_machine::SessionPhase,
    used_cells::{ActiveClue, CellCoord},
};

/// Read-only view of a board session handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Board the session belongs to.
    pub board_id: String,
    /// Current phase of the setup flow.
    pub phase: SessionPhase,
    /// True while the setup prompt must cover the gameplay view.
    pub gameplay_suppressed: bool,
    /// Number of teams in the roster.
    pub team_count: usize,
    /// Teams in display order.
    pub teams: Vec<Team>,
    /// Used cells in row-major order, serialized as `"row:col"` keys.
    pub used_cells: Vec<CellCoord>,
    /// Step applied by the +/- score buttons.
    pub score_step: i64,
    /// Present when a team is quick-selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_team: Option<usize>,
    /// Present while a clue is open in the question view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_clue: Option<ActiveClue>,
}
