//! JSON file storage for tacks.
//!
//! # Responsibility
//! - Load the tack file, creating it on first use.
//! - Hold the in-memory directory groups and persist them as one document.
//!
//! # Invariants
//! - The whole document is rewritten on every persist; there are no partial
//!   writes.
//! - Malformed files are reported, never repaired.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod document;
mod file;

pub use document::{DirectoryGroup, TackDocument};
pub use file::{open_store, TackStore};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// No home directory could be resolved for the default store location.
    HomeDirUnavailable,
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HomeDirUnavailable => write!(f, "could not find home directory"),
            Self::Io {
                action,
                path,
                source,
            } => write!(f, "could not {action} `{}`: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "could not parse tack file `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "could not serialize tacks: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::HomeDirUnavailable => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
        }
    }
}
