use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::model::MIN_TITLE_LEN;

/// Default quiet period before a pending snapshot is written.
pub const DEFAULT_PERSIST_DEBOUNCE_MS: u64 = 300;

/// Environment variable overriding the data file location.
pub const DATA_ENV: &str = "TICK_DATA";

/// Tunables for a [`crate::store::Store`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Archived states kept for undo.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Quiet period, in milliseconds, before a write is issued.
    #[serde(default = "default_persist_debounce_ms")]
    pub persist_debounce_ms: u64,
    /// Minimum trimmed title length for todos. Values below
    /// [`MIN_TITLE_LEN`] are ignored.
    #[serde(default = "default_min_title_len")]
    pub min_title_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            persist_debounce_ms: default_persist_debounce_ms(),
            min_title_len: default_min_title_len(),
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub const fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    /// Title length the store enforces: the configured value, never below
    /// [`MIN_TITLE_LEN`].
    #[must_use]
    pub fn title_floor(&self) -> usize {
        self.min_title_len.max(MIN_TITLE_LEN)
    }
}

/// Contents of `<config_dir>/tick/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub store: StoreConfig,
    /// Explicit location of the state file.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    /// Preferred output mode (`pretty`, `text`, `json`).
    #[serde(default)]
    pub output: Option<String>,
}

/// Load a config file, falling back to defaults when it does not exist.
pub fn load_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the per-user config from the platform config directory.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    load_config_from(&config_dir.join("tick/config.toml"))
}

/// Resolve where the state file lives.
///
/// Precedence: explicit flag, `TICK_DATA`, config `data_path`, then
/// `<data_dir>/tick/state.json` (or `./.tick/state.json` when the platform
/// has no data directory).
#[must_use]
pub fn resolve_data_path(flag: Option<&Path>, config: &UserConfig) -> PathBuf {
    resolve_data_path_inner(
        flag,
        env::var_os(DATA_ENV).map(PathBuf::from),
        config.data_path.clone(),
        dirs::data_dir(),
    )
}

fn resolve_data_path_inner(
    flag: Option<&Path>,
    env_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Some(path) = env_path.filter(|p| !p.as_os_str().is_empty()) {
        return path;
    }
    if let Some(path) = config_path {
        return path;
    }
    data_dir.map_or_else(
        || PathBuf::from(".tick/state.json"),
        |dir| dir.join("tick/state.json"),
    )
}

const fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

const fn default_persist_debounce_ms() -> u64 {
    DEFAULT_PERSIST_DEBOUNCE_MS
}

const fn default_min_title_len() -> usize {
    MIN_TITLE_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = load_config_from(&dir.path().join("config.toml")).expect("load should succeed");
        assert_eq!(cfg.store.history_limit, 50);
        assert_eq!(cfg.store.persist_debounce_ms, 300);
        assert_eq!(cfg.store.min_title_len, 3);
        assert!(cfg.data_path.is_none());
    }

    #[test]
    fn title_floor_never_drops_below_minimum() {
        let lowered = StoreConfig {
            min_title_len: 0,
            ..StoreConfig::default()
        };
        assert_eq!(lowered.title_floor(), MIN_TITLE_LEN);
        let raised = StoreConfig {
            min_title_len: 5,
            ..StoreConfig::default()
        };
        assert_eq!(raised.title_floor(), 5);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
data_path = "/home/alice/todos.json"

[store]
history_limit = 10
"#,
        )
        .expect("write config");

        let cfg = load_config_from(&path).expect("load should succeed");
        assert_eq!(cfg.store.history_limit, 10);
        assert_eq!(cfg.store.persist_debounce_ms, DEFAULT_PERSIST_DEBOUNCE_MS);
        assert_eq!(cfg.data_path, Some(PathBuf::from("/home/alice/todos.json")));
    }

    #[test]
    fn malformed_config_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store\nhistory_limit = ").expect("write config");
        let err = load_config_from(&path).expect_err("parse should fail");
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn data_path_precedence() {
        let flag = PathBuf::from("/flag.json");
        let env_path = Some(PathBuf::from("/env.json"));
        let cfg_path = Some(PathBuf::from("/cfg.json"));
        let data_dir = Some(PathBuf::from("/data"));

        assert_eq!(
            resolve_data_path_inner(Some(&flag), env_path.clone(), cfg_path.clone(), None),
            flag
        );
        assert_eq!(
            resolve_data_path_inner(None, env_path, cfg_path.clone(), None),
            PathBuf::from("/env.json")
        );
        assert_eq!(
            resolve_data_path_inner(None, Some(PathBuf::new()), cfg_path, None),
            PathBuf::from("/cfg.json")
        );
        assert_eq!(
            resolve_data_path_inner(None, None, None, data_dir),
            PathBuf::from("/data/tick/state.json")
        );
        assert_eq!(
            resolve_data_path_inner(None, None, None, None),
            PathBuf::from(".tick/state.json")
        );
    }
}
