//! Application directory layout and JSON configuration.
//!
//! # Responsibility
//! - Resolve the per-user application directory.
//! - Load `config/config.json`, writing defaults on first run.
//!
//! # Invariants
//! - Returned configs have non-empty paths and a supported log level.
//! - Keys missing from the file fall back to the defaults for `app_dir`.
//! - An existing config file is never rewritten.

use crate::logging::{default_log_level, normalize_level};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "Talenest";
const HOME_OVERRIDE_ENV: &str = "TALENEST_HOME";
const CONFIG_DIR: &str = "config";
const DATA_DIR: &str = "data";
const LOGS_DIR: &str = "logs";
const CONFIG_FILE_NAME: &str = "config.json";
const DB_FILE_NAME: &str = "talenest.db";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub sqlite_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct StoredConfig {
    sqlite_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    log_level: Option<String>,
}

impl AppConfig {
    pub fn defaults_for(app_dir: &Path) -> Self {
        Self {
            sqlite_path: app_dir.join(DATA_DIR).join(DB_FILE_NAME),
            log_dir: app_dir.join(LOGS_DIR),
            log_level: default_log_level().to_string(),
        }
    }

    fn merged(stored: StoredConfig, defaults: Self) -> Self {
        Self {
            sqlite_path: stored.sqlite_path.unwrap_or(defaults.sqlite_path),
            log_dir: stored.log_dir.unwrap_or(defaults.log_dir),
            log_level: stored.log_level.unwrap_or(defaults.log_level),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.sqlite_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("sqlite_path cannot be empty".to_string()));
        }
        if self.log_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("log_dir cannot be empty".to_string()));
        }
        normalize_level(&self.log_level).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(())
    }
}

/// Returns the application directory for the current user.
///
/// Resolution order: `TALENEST_HOME`, `$APPDATA/Talenest`,
/// `$HOME/.local/share/Talenest`, then `Talenest` under the working
/// directory. Relative results are anchored at the working directory.
pub fn app_dir() -> PathBuf {
    let dir = resolve_app_dir(
        non_empty_env(HOME_OVERRIDE_ENV),
        non_empty_env("APPDATA"),
        non_empty_env("HOME"),
    );
    if dir.is_absolute() {
        return dir;
    }
    working_dir().join(dir)
}

/// Path of the config file inside `app_dir`.
pub fn config_path(app_dir: &Path) -> PathBuf {
    app_dir.join(CONFIG_DIR).join(CONFIG_FILE_NAME)
}

/// Loads the config under `app_dir`, creating directories and a defaults
/// file when none exists yet.
///
/// # Errors
/// - `ConfigError::Io` when directories or the file cannot be accessed.
/// - `ConfigError::Parse` when the file is not valid JSON.
/// - `ConfigError::Invalid` when a value is empty or unsupported.
pub fn load_or_init(app_dir: &Path) -> ConfigResult<AppConfig> {
    for directory in [CONFIG_DIR, DATA_DIR] {
        std::fs::create_dir_all(app_dir.join(directory))?;
    }

    let path = config_path(app_dir);
    let defaults = AppConfig::defaults_for(app_dir);
    let (config, source) = if path.exists() {
        let raw = std::fs::read_to_string(&path)?;
        let stored: StoredConfig = serde_json::from_str(&raw)?;
        (AppConfig::merged(stored, defaults), "file")
    } else {
        std::fs::write(&path, serde_json::to_string_pretty(&defaults)?)?;
        (defaults, "defaults")
    };
    config.validate()?;

    info!(
        "event=config_load module=config status=ok source={source} path={}",
        path.display()
    );
    Ok(config)
}

fn non_empty_env(key: &str) -> Option<PathBuf> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

fn resolve_app_dir(
    override_dir: Option<PathBuf>,
    appdata: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    if let Some(appdata) = appdata {
        return appdata.join(APP_DIR_NAME);
    }
    if let Some(home) = home {
        return home.join(".local").join("share").join(APP_DIR_NAME);
    }
    working_dir().join(APP_DIR_NAME)
}

fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::{config_path, load_or_init, resolve_app_dir, AppConfig, ConfigError};
    use std::path::PathBuf;

    #[test]
    fn resolve_app_dir_prefers_override_then_appdata_then_home() {
        let override_dir = PathBuf::from("/srv/talenest");
        let appdata = PathBuf::from("/win/appdata");
        let home = PathBuf::from("/home/reader");

        assert_eq!(
            resolve_app_dir(Some(override_dir.clone()), Some(appdata.clone()), None),
            override_dir
        );
        assert_eq!(
            resolve_app_dir(None, Some(appdata), Some(home.clone())),
            PathBuf::from("/win/appdata/Talenest")
        );
        assert_eq!(
            resolve_app_dir(None, None, Some(home)),
            PathBuf::from("/home/reader/.local/share/Talenest")
        );
        assert!(resolve_app_dir(None, None, None).ends_with("Talenest"));
    }

    #[test]
    fn first_load_writes_defaults_and_second_load_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();

        let first = load_or_init(dir.path()).unwrap();
        assert_eq!(first, AppConfig::defaults_for(dir.path()));
        assert!(config_path(dir.path()).exists());
        assert!(dir.path().join("data").is_dir());

        let second = load_or_init(dir.path()).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(config_path(dir.path()), r#"{ "log_level": "warn" }"#).unwrap();

        let config = load_or_init(dir.path()).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.sqlite_path, dir.path().join("data").join("talenest.db"));
    }

    #[test]
    fn unsupported_level_and_malformed_json_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();

        std::fs::write(config_path(dir.path()), r#"{ "log_level": "loud" }"#).unwrap();
        assert!(matches!(
            load_or_init(dir.path()),
            Err(ConfigError::Invalid(_))
        ));

        std::fs::write(config_path(dir.path()), "{ not json").unwrap();
        assert!(matches!(load_or_init(dir.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn empty_sqlite_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(config_path(dir.path()), r#"{ "sqlite_path": "" }"#).unwrap();

        let err = load_or_init(dir.path()).unwrap_err();
        assert!(err.to_string().contains("sqlite_path"));
    }
}
