//! Storage key namespace for board sessions.

/// Namespace used when no configuration overrides it.
pub const DEFAULT_KEY_PREFIX: &str = "boards.play";
/// Board id used when a page path carries no usable segment.
pub const FALLBACK_BOARD_ID: &str = "board-play";

const USED_SLOT: &str = "used";
const TEAMS_SLOT: &str = "teams";
const START_SLOT: &str = "start";

/// The three storage slots owned by one board session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKeys {
    /// Slot holding the used-cell set.
    pub used: String,
    /// Slot holding the team roster.
    pub teams: String,
    /// Slot holding the start state.
    pub start: String,
}

impl StorageKeys {
    /// Derive the slot keys of `board_id` under `prefix`.
    ///
    /// Every key ends with a distinct slot suffix, so keys of different slots never collide and
    /// keys of the same slot collide only when the board ids are equal.
    pub fn resolve(prefix: &str, board_id: &str) -> Self {
        let base = format!("{prefix}.{board_id}");
        Self {
            used: format!("{base}.{USED_SLOT}"),
            teams: format!("{base}.{TEAMS_SLOT}"),
            start: format!("{base}.{START_SLOT}"),
        }
    }

    /// All slot keys, in `used`, `teams`, `start` order.
    pub fn all(&self) -> [&str; 3] {
        [&self.used, &self.teams, &self.start]
    }
}

/// Derive the slot keys of `board_id` under [`DEFAULT_KEY_PREFIX`].
pub fn resolve_keys(board_id: &str) -> StorageKeys {
    StorageKeys::resolve(DEFAULT_KEY_PREFIX, board_id)
}

/// Extract a board id from a page path such as `/boards/play/demo-1`.
pub fn board_id_from_path(path: &str) -> &str {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .unwrap_or(FALLBACK_BOARD_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct_per_slot() {
        let keys = resolve_keys("demo-1");
        assert_eq!(keys.used, "boards.play.demo-1.used");
        assert_eq!(keys.teams, "boards.play.demo-1.teams");
        assert_eq!(keys.start, "boards.play.demo-1.start");
        assert_ne!(keys.used, keys.teams);
        assert_ne!(keys.teams, keys.start);
        assert_ne!(keys.used, keys.start);
    }

    #[test]
    fn different_boards_never_share_a_slot() {
        let ids = ["", " ", "a", "a.used", "a.b", "b", "demo-1", "demo-1.teams"];
        for a in ids {
            for b in ids {
                if a == b {
                    continue;
                }
                let (ka, kb) = (resolve_keys(a), resolve_keys(b));
                assert_ne!(ka.used, kb.used, "{a:?} vs {b:?}");
                assert_ne!(ka.teams, kb.teams, "{a:?} vs {b:?}");
                assert_ne!(ka.start, kb.start, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn keys_are_deterministic() {
        assert_eq!(resolve_keys("x"), resolve_keys("x"));
        assert_eq!(
            StorageKeys::resolve("custom", "x").start,
            "custom.x.start".to_string()
        );
    }

    #[test]
    fn board_id_from_path_takes_last_segment() {
        assert_eq!(board_id_from_path("/boards/play/demo-1"), "demo-1");
        assert_eq!(board_id_from_path("/boards/play/demo-1/"), "demo-1");
        assert_eq!(board_id_from_path("/"), FALLBACK_BOARD_ID);
        assert_eq!(board_id_from_path(""), FALLBACK_BOARD_ID);
    }
}
