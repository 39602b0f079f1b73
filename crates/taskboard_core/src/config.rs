//! Runtime configuration resolved from the environment.
//!
//! | Variable              | Meaning                              | Unset           |
//! |-----------------------|--------------------------------------|-----------------|
//! | `TASKBOARD_DB`        | SQLite database file                 | in-memory board |
//! | `TASKBOARD_LOG_LEVEL` | `trace` to `error`                   | build default   |
//! | `TASKBOARD_LOG_DIR`   | absolute directory for rolling logs  | no file logging |

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TASKBOARD_DB";
pub const LOG_LEVEL_ENV: &str = "TASKBOARD_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TASKBOARD_LOG_DIR";

/// Host-level settings for opening the board core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// `None` keeps the board in memory for this session only.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(DB_PATH_ENV).map(PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoreConfig::from_lookup(|_| None);
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn reads_all_variables_and_ignores_blank_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (DB_PATH_ENV, "/tmp/board.sqlite3"),
            (LOG_LEVEL_ENV, " warn "),
            (LOG_DIR_ENV, "   "),
        ]);
        let config = CoreConfig::from_lookup(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/board.sqlite3")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }
}
