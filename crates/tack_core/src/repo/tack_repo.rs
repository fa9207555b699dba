//! Tack repository contract and JSON file implementation.
//!
//! # Responsibility
//! - Provide directory-keyed CRUD over the tack document.
//! - Persist the whole file after every successful mutation.
//!
//! # Invariants
//! - Failed mutations (not found, kind mismatch, failed save) leave both
//!   the file and the in-memory document unchanged.
//! - "Already done" completions do not rewrite the file.
//! - ID lookups return the first match in document order.

use crate::model::tack::{
    CompletionOutcome, LocatedTack, Tack, TackId, TackKind, TackStateError,
};
use crate::store::{StoreError, TackDocument, TackStore};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    NotFound(TackId),
    NotATodo { id: TackId, kind: TackKind },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "no tack with id \"{id}\""),
            Self::NotATodo { id, kind } => write!(f, "tack {id} is a {kind}, not a todo"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
            Self::NotATodo { .. } => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Outcome of a completion request, with the tack as it now stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub outcome: CompletionOutcome,
    pub tack: LocatedTack,
}

/// Repository interface for tack operations.
pub trait TackRepository {
    /// Appends `tack` under `directory` and persists.
    fn add_tack(&mut self, directory: &str, tack: Tack) -> RepoResult<()>;
    /// Finds the first tack with `id`.
    fn find_tack(&self, id: &TackId) -> Option<LocatedTack>;
    /// Removes the first tack with `id` and persists.
    fn remove_tack(&mut self, id: &TackId) -> RepoResult<LocatedTack>;
    /// Completes the todo with `id`, persisting only on a real transition.
    fn mark_done(&mut self, id: &TackId, now: DateTime<Utc>) -> RepoResult<Completion>;
    /// Tacks pinned to `directory`, in insertion order.
    fn list_for_directory(&self, directory: &str) -> Vec<Tack>;
    /// Directories with at least one tack, in store order.
    fn list_directories(&self) -> Vec<String>;
    /// Every tack with its directory, in store order.
    fn list_all(&self) -> Vec<LocatedTack>;
}

/// Repository backed by the JSON tack file.
pub struct JsonTackRepository {
    store: TackStore,
}

impl JsonTackRepository {
    pub fn new(store: TackStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TackStore {
        &self.store
    }

    /// Persists the current document, restoring `snapshot` if the save fails.
    fn commit(&mut self, snapshot: TackDocument) -> RepoResult<()> {
        if let Err(err) = self.store.save() {
            *self.store.document_mut() = snapshot;
            return Err(err.into());
        }
        Ok(())
    }
}

impl TackRepository for JsonTackRepository {
    fn add_tack(&mut self, directory: &str, tack: Tack) -> RepoResult<()> {
        let id = tack.id.clone();
        let kind = tack.kind;
        let snapshot = self.store.document().clone();
        self.store.document_mut().push(directory, tack);
        self.commit(snapshot)?;
        info!(
            "event=tack_add module=repo status=ok id={} kind={}",
            id, kind
        );
        Ok(())
    }

    fn find_tack(&self, id: &TackId) -> Option<LocatedTack> {
        self.store
            .document()
            .find(id)
            .map(|(directory, tack)| LocatedTack {
                directory: directory.to_string(),
                tack: tack.clone(),
            })
    }

    fn remove_tack(&mut self, id: &TackId) -> RepoResult<LocatedTack> {
        let snapshot = self.store.document().clone();
        let Some(removed) = self.store.document_mut().take(id) else {
            warn!("event=tack_remove module=repo status=not_found id={}", id);
            return Err(RepoError::NotFound(id.clone()));
        };
        self.commit(snapshot)?;
        info!(
            "event=tack_remove module=repo status=ok id={} kind={}",
            id, removed.tack.kind
        );
        Ok(removed)
    }

    fn mark_done(&mut self, id: &TackId, now: DateTime<Utc>) -> RepoResult<Completion> {
        let snapshot = self.store.document().clone();
        let Some((directory, tack)) = self.store.document_mut().find_mut(id) else {
            warn!("event=tack_done module=repo status=not_found id={}", id);
            return Err(RepoError::NotFound(id.clone()));
        };

        let outcome = tack.complete(now).map_err(|err| match err {
            TackStateError::NotATodo(kind) => RepoError::NotATodo {
                id: id.clone(),
                kind,
            },
        })?;
        let located = LocatedTack {
            directory: directory.to_string(),
            tack: tack.clone(),
        };

        if outcome == CompletionOutcome::Completed {
            self.commit(snapshot)?;
        }
        info!(
            "event=tack_done module=repo status=ok id={} outcome={:?}",
            id, outcome
        );
        Ok(Completion {
            outcome,
            tack: located,
        })
    }

    fn list_for_directory(&self, directory: &str) -> Vec<Tack> {
        self.store
            .document()
            .group(directory)
            .map(|group| group.tacks().to_vec())
            .unwrap_or_default()
    }

    fn list_directories(&self) -> Vec<String> {
        self.store
            .document()
            .directories()
            .map(str::to_string)
            .collect()
    }

    fn list_all(&self) -> Vec<LocatedTack> {
        self.store
            .document()
            .groups()
            .iter()
            .flat_map(|group| {
                group.tacks().iter().map(|tack| LocatedTack {
                    directory: group.directory().to_string(),
                    tack: tack.clone(),
                })
            })
            .collect()
    }
}
