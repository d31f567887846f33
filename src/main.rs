//! boards-play host console: drives one board session from stdin against the file-backed store.

use std::{
    env,
    io::{self, BufRead, Write},
    sync::Arc,
};

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boards_play::{
    config::AppConfig,
    dao::{
        keys::{FALLBACK_BOARD_ID, board_id_from_path},
        kv_store::JsonFileStore,
    },
    dto::events::SessionNotification,
    services::{
        console::{self, Reply},
        session_service::BoardSession,
    },
};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let board_id = resolve_board_id();

    let store = JsonFileStore::open(&config.store_path)
        .with_context(|| format!("opening store {}", config.store_path.display()))?;
    let mut session = BoardSession::load(Arc::new(store), board_id, &config);
    if let Some(points) = clue_points_from_env() {
        session.set_clue_points(points);
    }
    session.add_observer(Arc::new(|event: &SessionNotification| {
        info!(event = event.name(), board_id = event.board_id(), "session notification");
    }));

    info!(
        board_id = session.board_id(),
        phase = ?session.phase(),
        "console ready; type `help` for commands"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        match console::parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => match console::execute(&mut session, command) {
                Reply::Text(text) => writeln!(stdout, "{text}").context("writing stdout")?,
                Reply::Quit => break,
            },
            Err(err) => writeln!(stdout, "error: {err}").context("writing stdout")?,
        }
        stdout.flush().context("flushing stdout")?;
    }

    Ok(())
}

/// Board id from the first argument or `BOARD_ID`; paths keep their last segment.
fn resolve_board_id() -> String {
    let raw = env::args()
        .nth(1)
        .or_else(|| env::var("BOARD_ID").ok())
        .unwrap_or_else(|| FALLBACK_BOARD_ID.into());
    board_id_from_path(&raw).to_string()
}

/// Clue values of the board as a comma separated list in `BOARD_CLUE_POINTS`.
fn clue_points_from_env() -> Option<Vec<i64>> {
    let raw = env::var("BOARD_CLUE_POINTS").ok()?;
    let mut points = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        match entry.parse::<i64>() {
            Ok(value) => points.push(value),
            Err(err) => warn!(entry, error = %err, "ignoring invalid clue value"),
        }
    }
    Some(points)
}

/// Configure tracing subscribers; logs go to stderr so stdout only carries replies.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
