//! Application-level configuration loading for board sessions and the host console.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::keys::DEFAULT_KEY_PREFIX;

/// Default location on disk where the host looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BOARDS_PLAY_CONFIG_PATH";
/// Base score step used when a board exposes no positive clue value.
pub const DEFAULT_SCORE_STEP: i64 = 100;
/// Where the file-backed store keeps its slots unless configured otherwise.
const DEFAULT_STORE_PATH: &str = "data/boards-play.json";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared by every session of the process.
pub struct AppConfig {
    /// Namespace prepended to every storage key.
    pub key_prefix: String,
    /// Score step used when the board does not provide clue values.
    pub score_step: i64,
    /// Backing file of the durable store.
    pub store_path: PathBuf,
    /// Whether a wrong answer takes the clue's points away from the active team.
    pub wrong_subtracts: bool,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        key_prefix = %config.key_prefix,
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document. Absent fields keep their defaults.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            score_step: DEFAULT_SCORE_STEP,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            wrong_subtracts: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    key_prefix: Option<String>,
    score_step: Option<i64>,
    store_path: Option<PathBuf>,
    wrong_subtracts: Option<bool>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            key_prefix: value
                .key_prefix
                .map(|prefix| prefix.trim().to_string())
                .filter(|prefix| !prefix.is_empty())
                .unwrap_or(defaults.key_prefix),
            score_step: value
                .score_step
                .filter(|step| *step > 0)
                .unwrap_or(defaults.score_step),
            store_path: value
                .store_path
                .filter(|path| !path.as_os_str().is_empty())
                .unwrap_or(defaults.store_path),
            wrong_subtracts: value.wrong_subtracts.unwrap_or(defaults.wrong_subtracts),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
