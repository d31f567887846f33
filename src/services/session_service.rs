//! Board session controller. Coordinates the roster, used-cell and start slots of one board and
//! notifies observers once each change has been persisted.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    config::AppConfig,
    dao::{
        keys::StorageKeys,
        kv_store::KeyValueStore,
        models::TeamEntity,
        roster_store::RosterStore,
        slot::remove_slot,
        start_store::StartStore,
        used_cells_store::UsedCellStore,
    },
    dto::{events::SessionNotification, session::SessionSnapshot},
    state::{
        hub::SessionObserver,
        roster::{MIN_TEAMS, Team, TeamRoster, clamp_team_count},
        state_machine::{SessionEvent, SessionPhase, SessionStateMachine, StartState},
        used_cells::{ActiveClue, CellCoord, UsedCellSet},
    },
};

/// Load the session of `board_id` with the default configuration.
pub fn load_session(store: Arc<dyn KeyValueStore>, board_id: impl Into<String>) -> BoardSession {
    BoardSession::load(store, board_id, &AppConfig::default())
}

/// Remove every persisted slot of a board.
pub fn clear_board_state(store: &dyn KeyValueStore, keys: &StorageKeys) {
    for key in keys.all() {
        remove_slot(store, key);
    }
}

/// Base score step of a board: its smallest positive clue value, or `fallback` when it has none.
pub fn base_score_step(clue_points: impl IntoIterator<Item = i64>, fallback: i64) -> i64 {
    clue_points
        .into_iter()
        .filter(|points| *points > 0)
        .min()
        .unwrap_or(fallback)
}

/// Explicit session object owning the state of one board.
pub struct BoardSession {
    board_id: String,
    keys: StorageKeys,
    store: Arc<dyn KeyValueStore>,
    rosters: RosterStore,
    used_cells: UsedCellStore,
    start: StartStore,
    machine: SessionStateMachine,
    roster: TeamRoster,
    used: UsedCellSet,
    default_step: i64,
    base_step: i64,
    score_step: i64,
    active_team: Option<usize>,
    active_clue: Option<ActiveClue>,
    wrong_subtracts: bool,
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl BoardSession {
    /// Load (or initialise) the session of `board_id`. Unusable slots degrade to defaults.
    ///
    /// A session persisted as started gets its roster reconciled to the stored team count, the
    /// same way [`BoardSession::start`] would, and a missing or corrupt roster is written back as
    /// defaults. A session that was not started proposes the size of its saved roster.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        board_id: impl Into<String>,
        config: &AppConfig,
    ) -> Self {
        let board_id = board_id.into();
        let keys = StorageKeys::resolve(&config.key_prefix, &board_id);
        let rosters = RosterStore::new(store.clone(), keys.teams.clone());
        let used_cells = UsedCellStore::new(store.clone(), keys.used.clone());
        let start = StartStore::new(store.clone(), keys.start.clone());

        let mut start_state = start.load(MIN_TEAMS as i64).into_value();
        let roster = if start_state.started {
            rosters.set_count(start_state.team_count as i64)
        } else {
            let roster = rosters.load(start_state.team_count as i64).into_value();
            start_state.team_count = roster.len();
            roster
        };
        let used = used_cells.load().into_value();

        info!(
            board_id = %board_id,
            phase = ?start_state.phase(),
            team_count = start_state.team_count,
            used_cells = used.len(),
            "loaded board session"
        );

        Self {
            board_id,
            keys,
            store,
            rosters,
            used_cells,
            start,
            machine: SessionStateMachine::new(start_state),
            roster,
            used,
            default_step: config.score_step,
            base_step: config.score_step,
            score_step: config.score_step,
            active_team: None,
            active_clue: None,
            wrong_subtracts: config.wrong_subtracts,
            observers: Vec::new(),
        }
    }

    /// Register an observer for subsequent notifications.
    pub fn add_observer(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Board this session belongs to.
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// Storage slots owned by this session.
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Current phase of the setup flow.
    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    /// Start state as it would be persisted now.
    pub fn start_state(&self) -> StartState {
        self.machine.state()
    }

    /// Whether the setup prompt is due and gameplay must stay visually suppressed.
    pub fn is_gameplay_suppressed(&self) -> bool {
        self.phase() == SessionPhase::NotStarted
    }

    /// Teams in display order.
    pub fn roster(&self) -> &TeamRoster {
        &self.roster
    }

    /// Cells consumed so far.
    pub fn used_cells(&self) -> &UsedCellSet {
        &self.used
    }

    /// Step currently applied by the +/- buttons.
    pub fn score_step(&self) -> i64 {
        self.score_step
    }

    /// Step restored by `start`, `reset` and `clear`.
    pub fn base_score_step(&self) -> i64 {
        self.base_step
    }

    /// Roster position of the quick-selected team.
    pub fn active_team(&self) -> Option<usize> {
        self.active_team
    }

    /// The clue open in the question view, if any.
    pub fn active_clue(&self) -> Option<ActiveClue> {
        self.active_clue
    }

    /// Whether a wrong answer takes the clue's points away.
    pub fn wrong_subtracts(&self) -> bool {
        self.wrong_subtracts
    }

    /// Toggle whether a wrong answer takes the clue's points away.
    pub fn set_wrong_subtracts(&mut self, enabled: bool) {
        self.wrong_subtracts = enabled;
    }

    /// Derive the base score step from the board's clue values and make it current.
    pub fn set_clue_points(&mut self, clue_points: impl IntoIterator<Item = i64>) {
        self.base_step = base_score_step(clue_points, self.default_step);
        self.apply_score_step(self.base_step);
    }

    /// Set the step used by [`BoardSession::add_step`] and [`BoardSession::subtract_step`].
    /// Non-positive steps are ignored.
    pub fn set_score_step(&mut self, step: i64) -> bool {
        if step <= 0 {
            return false;
        }
        self.apply_score_step(step);
        true
    }

    /// Mark a clue cell as consumed. Returns `true` when the cell was not used before.
    pub fn mark_used(&mut self, row: u32, col: u32) -> bool {
        if !self.used_cells.mark_used(&mut self.used, row, col) {
            return false;
        }
        debug!(board_id = %self.board_id, row, col, "marked cell used");
        self.emit(SessionNotification::CellUsed {
            board_id: self.board_id.clone(),
            row,
            col,
        });
        true
    }

    /// Whether the cell at `row`, `col` was consumed.
    pub fn is_used(&self, row: u32, col: u32) -> bool {
        self.used_cells.is_used(&self.used, row, col)
    }

    /// Add `delta` to a team's score. Out-of-range indexes are ignored.
    pub fn adjust_score(&mut self, index: usize, delta: i64) -> Option<Team> {
        let team = self.rosters.adjust_score(&mut self.roster, index, delta)?;
        debug!(board_id = %self.board_id, index, delta, score = team.score, "adjusted score");
        self.emit(SessionNotification::ScoreChanged {
            board_id: self.board_id.clone(),
            index,
            team: team.clone(),
        });
        Some(team)
    }

    /// Award the current score step to a team.
    pub fn add_step(&mut self, index: usize) -> Option<Team> {
        self.adjust_score(index, self.score_step)
    }

    /// Take the current score step away from a team.
    pub fn subtract_step(&mut self, index: usize) -> Option<Team> {
        self.adjust_score(index, -self.score_step)
    }

    /// Rename a team; blank names keep the positional default. Out-of-range indexes are ignored.
    pub fn rename_team(&mut self, index: usize, name: &str) -> Option<Team> {
        let team = self.rosters.rename(&mut self.roster, index, name)?;
        debug!(board_id = %self.board_id, index, name = %team.name, "renamed team");
        self.emit(SessionNotification::TeamRenamed {
            board_id: self.board_id.clone(),
            index,
            team: team.clone(),
        });
        Some(team)
    }

    /// Replace the whole roster with `teams`. Empty or oversized input is ignored.
    pub fn replace_teams(&mut self, teams: Vec<TeamEntity>) -> bool {
        let previous = self.roster.len();
        if !self.rosters.replace(&mut self.roster, teams) {
            return false;
        }
        if self.active_team.is_some_and(|index| index >= self.roster.len()) {
            self.select(None);
        }
        if self.roster.len() != previous {
            self.emit_resized();
        }
        true
    }

    /// Quick-select the team at `index`. Out-of-range indexes are ignored.
    pub fn select_team(&mut self, index: usize) -> bool {
        if self.roster.get(index).is_none() {
            return false;
        }
        self.select(Some(index));
        true
    }

    /// Drop the quick-selection.
    pub fn clear_selection(&mut self) {
        self.select(None);
    }

    /// The quick-selected team, or every team when none is selected.
    pub fn active_or_all_teams(&self) -> &[Team] {
        let teams = self.roster.teams();
        match self.active_team {
            Some(index) if index < teams.len() => &teams[index..=index],
            _ => teams,
        }
    }

    /// Open the clue at `row`, `col` worth `points`: the cell is consumed and the score step
    /// becomes the clue's value. Non-positive points fall back to the base step.
    pub fn open_cell(&mut self, row: u32, col: u32, points: i64) -> ActiveClue {
        self.mark_used(row, col);
        let points = if points > 0 { points } else { self.base_step };
        self.apply_score_step(points);

        let clue = ActiveClue {
            cell: CellCoord::new(row, col),
            points,
        };
        self.active_clue = Some(clue);
        debug!(board_id = %self.board_id, row, col, points, "opened clue");
        self.emit(SessionNotification::ClueOpened {
            board_id: self.board_id.clone(),
            clue,
        });
        clue
    }

    /// Resolve the open clue for the quick-selected team and close it.
    ///
    /// A correct answer adds the clue's points, a wrong one subtracts them when
    /// [`BoardSession::wrong_subtracts`] is set. Without an active team the clue is closed and no
    /// score changes. Returns the active team after the verdict, or `None` when no clue is open
    /// or no team is selected.
    pub fn award_active(&mut self, correct: bool) -> Option<Team> {
        let clue = self.active_clue?;
        let delta = match (correct, self.wrong_subtracts) {
            (true, _) => clue.points,
            (false, true) => -clue.points,
            (false, false) => 0,
        };

        self.mark_used(clue.cell.row, clue.cell.col);
        let team = match self.active_team {
            Some(index) if delta != 0 => self.adjust_score(index, delta),
            Some(index) => self.roster.get(index).cloned(),
            None => None,
        };
        self.close_cell();
        team
    }

    /// Close the question view without a verdict.
    pub fn close_cell(&mut self) {
        if self.active_clue.take().is_some() {
            self.emit(SessionNotification::ClueClosed {
                board_id: self.board_id.clone(),
            });
        }
    }

    /// Leave the setup prompt with `team_count` teams.
    ///
    /// A roster of another size is replaced by defaults, discarding scores entered before the
    /// start. A saved roster that already has the requested size is kept.
    pub fn start(&mut self, team_count: i64) -> StartState {
        let team_count = clamp_team_count(team_count);
        self.close_cell();
        if self.roster.len() != team_count {
            self.roster = self.rosters.set_count(team_count as i64);
            self.active_team = None;
            self.emit_resized();
        }

        let state = self.machine.apply(SessionEvent::Start {
            team_count: team_count as i64,
        });
        self.start.save(state);
        self.apply_score_step(self.base_step);

        info!(board_id = %self.board_id, team_count, "session started");
        self.emit(SessionNotification::Started {
            board_id: self.board_id.clone(),
            team_count,
        });
        state
    }

    /// Wipe used cells and scores and return to the setup prompt. Without a count the current
    /// roster size is kept.
    pub fn reset(&mut self, team_count: Option<i64>) -> StartState {
        let previous = self.roster.len();
        let team_count = clamp_team_count(team_count.unwrap_or(previous as i64));

        self.close_cell();
        self.used = self.used_cells.clear();
        self.roster = self.rosters.reset(team_count as i64);
        self.active_team = None;
        let state = self.machine.apply(SessionEvent::Reset {
            team_count: team_count as i64,
        });
        self.start.save(state);
        self.apply_score_step(self.base_step);

        info!(board_id = %self.board_id, team_count, "session reset");
        if team_count != previous {
            self.emit_resized();
        }
        self.emit(SessionNotification::Reset {
            board_id: self.board_id.clone(),
            team_count,
        });
        state
    }

    /// Remove every persisted slot of this board and return to a fresh, not-started session.
    pub fn clear(&mut self) {
        self.close_cell();
        clear_board_state(self.store.as_ref(), &self.keys);
        self.used = UsedCellSet::new();
        self.roster = TeamRoster::defaults(MIN_TEAMS as i64);
        self.active_team = None;
        self.machine = SessionStateMachine::default();
        self.apply_score_step(self.base_step);
        info!(board_id = %self.board_id, "cleared board state");
    }

    /// Serialisable view of the whole session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board_id: self.board_id.clone(),
            phase: self.phase(),
            gameplay_suppressed: self.is_gameplay_suppressed(),
            team_count: self.roster.len(),
            teams: self.roster.teams().to_vec(),
            used_cells: self.used.iter().collect(),
            score_step: self.score_step,
            active_team: self.active_team,
            active_clue: self.active_clue,
        }
    }

    fn select(&mut self, index: Option<usize>) {
        if self.active_team == index {
            return;
        }
        self.active_team = index;
        self.emit(SessionNotification::TeamSelected {
            board_id: self.board_id.clone(),
            index,
        });
    }

    fn apply_score_step(&mut self, step: i64) {
        if self.score_step == step {
            return;
        }
        self.score_step = step;
        self.emit(SessionNotification::ScoreStepChanged {
            board_id: self.board_id.clone(),
            step,
        });
    }

    fn emit_resized(&self) {
        self.emit(SessionNotification::RosterResized {
            board_id: self.board_id.clone(),
            team_count: self.roster.len(),
        });
    }

    fn emit(&self, event: SessionNotification) {
        debug!(board_id = %self.board_id, event = event.name(), "session notification");
        for observer in &self.observers {
            observer.notify(&event);
        }
    }
}
