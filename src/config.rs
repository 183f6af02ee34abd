//! Application-level configuration loading: game id length and storage backend selection.

use std::{env, fs, io::ErrorKind, path::PathBuf, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BRACKET_BACK_CONFIG_PATH";
/// Environment variable that overrides the configured storage backend.
const STORAGE_BACKEND_ENV: &str = "STORAGE_BACKEND";
/// Length of generated game ids when the config does not say otherwise.
pub const DEFAULT_GAME_ID_LENGTH: usize = 7;
/// Accepted range for `game_id_length`.
const GAME_ID_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=16;
/// Idle time after which an unsaved session is dropped, unless configured.
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);
/// Shortest accepted `session_idle_secs`.
const MIN_SESSION_IDLE: Duration = Duration::from_secs(60);

/// Persistence backend the server connects to at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps, lost on restart.
    #[default]
    Memory,
    /// MongoDB through `MONGO_URI`.
    Mongo,
    /// CouchDB through `COUCH_BASE_URL`.
    Couch,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "couch" | "couchdb" => Ok(Self::Couch),
            other => Err(format!("unknown storage backend `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    game_id_length: usize,
    storage: StorageBackend,
    session_idle: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to defaults, then apply
    /// environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        game_id_length = app_config.game_id_length,
                        storage = ?app_config.storage,
                        session_idle_secs = app_config.session_idle.as_secs(),
                        "loaded config"
                    );
                    app_config
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
        };

        config.with_env_overrides()
    }

    /// Replace the storage backend.
    pub fn with_storage(mut self, storage: StorageBackend) -> Self {
        self.storage = storage;
        self
    }

    /// Replace the game id length, clamped to the accepted range.
    pub fn with_game_id_length(mut self, length: usize) -> Self {
        self.game_id_length = clamp_game_id_length(length);
        self
    }

    /// Replace the idle time after which live sessions are evicted.
    pub fn with_session_idle(mut self, idle: Duration) -> Self {
        self.session_idle = idle;
        self
    }

    /// Number of characters in generated game ids.
    pub fn game_id_length(&self) -> usize {
        self.game_id_length
    }

    /// Storage backend selected at startup.
    pub fn storage(&self) -> StorageBackend {
        self.storage
    }

    /// Idle time after which a live host or prediction session is evicted.
    pub fn session_idle(&self) -> Duration {
        self.session_idle
    }

    fn with_env_overrides(self) -> Self {
        let Ok(value) = env::var(STORAGE_BACKEND_ENV) else {
            return self;
        };
        match value.parse() {
            Ok(storage) => self.with_storage(storage),
            Err(err) => {
                warn!(error = %err, "ignoring {STORAGE_BACKEND_ENV}");
                self
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game_id_length: DEFAULT_GAME_ID_LENGTH,
            storage: StorageBackend::default(),
            session_idle: DEFAULT_SESSION_IDLE,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    game_id_length: Option<usize>,
    #[serde(default)]
    storage: Option<StorageBackend>,
    #[serde(default)]
    session_idle_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            game_id_length: value
                .game_id_length
                .map(clamp_game_id_length)
                .unwrap_or(defaults.game_id_length),
            storage: value.storage.unwrap_or(defaults.storage),
            session_idle: value
                .session_idle_secs
                .map(|secs| Duration::from_secs(secs).max(MIN_SESSION_IDLE))
                .unwrap_or(defaults.session_idle),
        }
    }
}

fn clamp_game_id_length(length: usize) -> usize {
    if GAME_ID_LENGTH_RANGE.contains(&length) {
        return length;
    }
    let clamped = length.clamp(*GAME_ID_LENGTH_RANGE.start(), *GAME_ID_LENGTH_RANGE.end());
    warn!(
        requested = length,
        used = clamped,
        "game_id_length out of range"
    );
    clamped
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_fills_missing_keys_with_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{"storage": "couch"}"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.storage(), StorageBackend::Couch);
        assert_eq!(config.game_id_length(), DEFAULT_GAME_ID_LENGTH);
        assert_eq!(config.session_idle(), DEFAULT_SESSION_IDLE);
    }

    #[test]
    fn session_idle_has_a_floor() {
        let raw: RawConfig = serde_json::from_str(r#"{"session_idle_secs": 5}"#).unwrap();
        assert_eq!(AppConfig::from(raw).session_idle(), MIN_SESSION_IDLE);
        let raw: RawConfig = serde_json::from_str(r#"{"session_idle_secs": 600}"#).unwrap();
        assert_eq!(AppConfig::from(raw).session_idle(), Duration::from_secs(600));
    }

    #[test]
    fn game_id_length_is_clamped() {
        let raw: RawConfig = serde_json::from_str(r#"{"game_id_length": 99}"#).unwrap();
        assert_eq!(AppConfig::from(raw).game_id_length(), 16);
        assert_eq!(AppConfig::default().with_game_id_length(1).game_id_length(), 4);
        assert_eq!(AppConfig::default().with_game_id_length(10).game_id_length(), 10);
    }

    #[test]
    fn storage_backend_parses_aliases() {
        assert_eq!("MongoDB".parse(), Ok(StorageBackend::Mongo));
        assert_eq!(" couch ".parse(), Ok(StorageBackend::Couch));
        assert_eq!("memory".parse(), Ok(StorageBackend::Memory));
        assert!("redis".parse::<StorageBackend>().is_err());
    }
}
