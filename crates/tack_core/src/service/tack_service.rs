//! Tack use-case service.
//!
//! # Responsibility
//! - Create pins, todos and warnings with collision-free IDs.
//! - Look up user-supplied IDs exactly as typed, after trimming.
//! - Expose directory listing, completion, removal and board views.
//!
//! # Invariants
//! - Messages are trimmed and never empty.
//! - A new ID never matches an ID already in the store.

use crate::model::tack::{LocatedTack, Tack, TackId, TackKind};
use crate::repo::tack_repo::{Completion, RepoError, TackRepository};
use crate::service::board::{build_board, BoardQuery, BoardView, TackCounts};
use chrono::{DateTime, Utc};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Attempts at drawing an unused ID before giving up.
const MAX_ID_ATTEMPTS: usize = 64;

#[derive(Debug)]
pub enum ServiceError {
    EmptyMessage,
    /// Every drawn ID was already taken.
    IdSpaceExhausted,
    /// No tack matches the user-supplied ID.
    NotFound(String),
    NotATodo { id: TackId, kind: TackKind },
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "message cannot be empty"),
            Self::IdSpaceExhausted => write!(
                f,
                "could not find an unused tack id after {MAX_ID_ATTEMPTS} attempts"
            ),
            Self::NotFound(id) if looks_generated(id) => {
                write!(f, "no tack with id \"{id}\"")
            }
            Self::NotFound(id) => write!(
                f,
                "no tack with id \"{id}\"; tack ids are 4 hex characters"
            ),
            Self::NotATodo { id, kind } => write!(f, "tack {id} is a {kind}, not a todo"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id.as_str().to_string()),
            RepoError::NotATodo { id, kind } => Self::NotATodo { id, kind },
            other => Self::Repo(other),
        }
    }
}

/// Tack service facade over repository implementations.
pub struct TackService<R: TackRepository> {
    repo: R,
    next_id: Box<dyn FnMut() -> TackId>,
}

impl<R: TackRepository> TackService<R> {
    /// Creates a service drawing random IDs.
    pub fn new(repo: R) -> Self {
        Self::with_id_source(repo, TackId::generate)
    }

    /// Creates a service with a caller-provided ID source.
    pub fn with_id_source(repo: R, next_id: impl FnMut() -> TackId + 'static) -> Self {
        Self {
            repo,
            next_id: Box::new(next_id),
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Creates one tack of `kind` in `directory`.
    ///
    /// # Errors
    /// - `EmptyMessage` when `message` is blank.
    /// - `IdSpaceExhausted` when no unused ID was drawn.
    pub fn add(
        &mut self,
        kind: TackKind,
        directory: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Result<LocatedTack, ServiceError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ServiceError::EmptyMessage);
        }

        let id = self.unused_id()?;
        let tack = Tack::new(id, kind, message, now);
        self.repo.add_tack(directory, tack.clone())?;
        Ok(LocatedTack {
            directory: directory.to_string(),
            tack,
        })
    }

    pub fn pin(
        &mut self,
        directory: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Result<LocatedTack, ServiceError> {
        self.add(TackKind::Pin, directory, message, now)
    }

    pub fn todo(
        &mut self,
        directory: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Result<LocatedTack, ServiceError> {
        self.add(TackKind::Todo, directory, message, now)
    }

    pub fn warn(
        &mut self,
        directory: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Result<LocatedTack, ServiceError> {
        self.add(TackKind::Warn, directory, message, now)
    }

    /// Finds one tack by user-supplied ID.
    pub fn find(&self, raw_id: &str) -> Result<LocatedTack, ServiceError> {
        let id = lookup_id(raw_id)?;
        self.repo
            .find_tack(&id)
            .ok_or_else(|| ServiceError::NotFound(id.as_str().to_string()))
    }

    /// Marks a todo done. Already-done todos are reported, not rewritten.
    pub fn complete(&mut self, raw_id: &str, now: DateTime<Utc>) -> Result<Completion, ServiceError> {
        let id = lookup_id(raw_id)?;
        Ok(self.repo.mark_done(&id, now)?)
    }

    /// Removes any tack by user-supplied ID.
    pub fn remove(&mut self, raw_id: &str) -> Result<LocatedTack, ServiceError> {
        let id = lookup_id(raw_id)?;
        Ok(self.repo.remove_tack(&id)?)
    }

    pub fn list_here(&self, directory: &str) -> Vec<Tack> {
        self.repo.list_for_directory(directory)
    }

    /// Directories with tacks, sorted alphabetically.
    pub fn directories(&self) -> Vec<String> {
        let mut directories = self.repo.list_directories();
        directories.sort();
        directories
    }

    pub fn counts_here(&self, directory: &str) -> TackCounts {
        TackCounts::from_tacks(&self.repo.list_for_directory(directory))
    }

    pub fn board(&self, query: BoardQuery, now: DateTime<Utc>) -> BoardView {
        build_board(self.repo.list_all(), query, now)
    }

    fn unused_id(&mut self) -> Result<TackId, ServiceError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = (self.next_id)();
            if self.repo.find_tack(&candidate).is_none() {
                return Ok(candidate);
            }
            warn!(
                "event=id_collision module=service status=retry attempt={} id={}",
                attempt, candidate
            );
        }
        Err(ServiceError::IdSpaceExhausted)
    }
}

/// Blank input cannot match any tack, so it is reported as not found.
fn lookup_id(raw_id: &str) -> Result<TackId, ServiceError> {
    TackId::parse(raw_id).ok_or_else(|| ServiceError::NotFound(raw_id.trim().to_string()))
}

fn looks_generated(raw_id: &str) -> bool {
    TackId::parse(raw_id).is_some_and(|id| id.is_canonical())
}
