//! Tack domain model.
//!
//! # Responsibility
//! - Define the annotation record pinned to a directory.
//! - Own the todo completion lifecycle (`open -> done`).
//!
//! # Invariants
//! - `id`, `kind`, `message` and `created_at` never change after creation.
//! - `done_at` is set exactly when `done` flips to `true`, and never again.
//! - Only `TackKind::Todo` can be completed.
//! - A tack does not carry its directory; the owning group does.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static TACK_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{4}$").expect("valid tack id regex"));

/// Short identifier shown to users and typed back into `done`/`rm`.
///
/// Two random bytes, hex-encoded. Uniqueness is not implied by the type;
/// creation paths check for collisions against the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TackId(String);

impl TackId {
    /// Generates a fresh random ID.
    pub fn generate() -> Self {
        Self(format!("{:04x}", rand::random::<u16>()))
    }

    /// Parses user input into an ID.
    ///
    /// Input is trimmed and otherwise kept verbatim, so IDs match exactly
    /// as stored. Blank input yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Whether the ID has the generated shape: four lowercase hex characters.
    ///
    /// Hand-edited files may hold other IDs; they still load and match.
    pub fn is_canonical(&self) -> bool {
        TACK_ID_RE.is_match(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TackId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Kind of annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TackKind {
    /// Free-form note with no completion state.
    Pin,
    /// Actionable item with an open/done lifecycle.
    Todo,
    /// Cautionary note; behaves like a pin.
    Warn,
}

impl TackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pin => "pin",
            Self::Todo => "todo",
            Self::Warn => "warn",
        }
    }
}

impl Display for TackKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One annotation as stored under its directory key.
///
/// Wire shape: `id`, `kind`, `message`, `done` (omitted when false),
/// `created_at`, `done_at` (omitted when unset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tack {
    pub id: TackId,
    pub kind: TackKind,
    pub message: String,
    /// Meaningful only when `kind == TackKind::Todo`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub done: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_at: Option<DateTime<Utc>>,
}

/// Result of asking a todo to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The todo moved from open to done.
    Completed,
    /// The todo was already done; nothing changed.
    AlreadyDone,
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TackStateError {
    /// Only todos can be completed.
    NotATodo(TackKind),
}

impl Display for TackStateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotATodo(kind) => write!(f, "a {kind} cannot be marked done"),
        }
    }
}

impl Error for TackStateError {}

impl Tack {
    /// Creates an open tack.
    pub fn new(
        id: TackId,
        kind: TackKind,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            message: message.into(),
            done: false,
            created_at,
            done_at: None,
        }
    }

    pub fn is_open_todo(&self) -> bool {
        self.kind == TackKind::Todo && !self.done
    }

    /// Whether this is an open todo created strictly more than `threshold`
    /// before `now`.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.is_open_todo() && now.signed_duration_since(self.created_at) > threshold
    }

    /// Applies the `open -> done` transition.
    ///
    /// # Invariants
    /// - A second call reports `AlreadyDone` and leaves `done_at` untouched.
    /// - Non-todo tacks are never mutated.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<CompletionOutcome, TackStateError> {
        if self.kind != TackKind::Todo {
            return Err(TackStateError::NotATodo(self.kind));
        }
        if self.done {
            return Ok(CompletionOutcome::AlreadyDone);
        }
        self.done = true;
        self.done_at = Some(now);
        Ok(CompletionOutcome::Completed)
    }
}

/// A tack together with the directory that owns it.
///
/// Read model returned by lookups; the directory comes from the owning
/// group, never from the tack itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatedTack {
    pub directory: String,
    #[serde(flatten)]
    pub tack: Tack,
}

fn is_false(value: &bool) -> bool {
    !*value
}
