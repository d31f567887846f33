/// Fail-soft decode results.
pub mod decode;
/// Observer seam and broadcast hub for session notifications.
pub mod hub;
/// Teams and rosters.
pub mod roster;
/// Setup flow phases and transitions.
pub mod state_machine;
/// Clue cells and the used-cell set.
pub mod used_cells;

pub use self::hub::{SessionHub, SessionObserver};
