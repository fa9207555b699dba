//! Runtime configuration for tack.
//!
//! # Responsibility
//! - Resolve where the tack file and logs live.
//! - Carry settings explicitly instead of through process-wide state.
//!
//! # Invariants
//! - `store_path` and `log_dir` are always inside `root`.

use crate::logging::default_log_level;
use crate::store::{StoreError, StoreResult};
use std::path::{Path, PathBuf};

/// Environment variable overriding the tack root directory.
pub const TACK_HOME_ENV: &str = "TACK_HOME";
/// Environment variable overriding the log level.
pub const TACK_LOG_ENV: &str = "TACK_LOG";

const TACK_DIR_NAME: &str = ".tack";
const TACK_FILE_NAME: &str = "tacks.json";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TackConfig {
    pub root: PathBuf,
    pub store_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl TackConfig {
    /// Builds a config rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            store_path: root.join(TACK_FILE_NAME),
            log_dir: root.join(LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
            root,
        }
    }

    /// Resolves the config from an optional root override.
    ///
    /// Without an override the root is `<home>/.tack`. A relative override
    /// is resolved against the current directory.
    ///
    /// # Errors
    /// - `StoreError::HomeDirUnavailable` when no override is given and the
    ///   home directory cannot be determined.
    pub fn resolve(root_override: Option<&Path>) -> StoreResult<Self> {
        match root_override {
            Some(root) => std::path::absolute(root)
                .map(Self::with_root)
                .map_err(|source| StoreError::Io {
                    action: "resolve",
                    path: root.to_path_buf(),
                    source,
                }),
            None => dirs::home_dir()
                .map(|home| Self::with_root(home.join(TACK_DIR_NAME)))
                .ok_or(StoreError::HomeDirUnavailable),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
