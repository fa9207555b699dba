//! Board and summary projections.
//!
//! # Responsibility
//! - Build the cross-directory board view, optionally limited to
//!   directories with stale todos.
//! - Count tacks by state for the one-line shell summary.
//!
//! # Invariants
//! - Board sections are sorted alphabetically by directory.
//! - The summary footer always describes the whole store, not the filtered
//!   sections.

use crate::model::tack::{LocatedTack, Tack, TackKind};
use chrono::{DateTime, Duration, Utc};

/// Default age, in days, after which an open todo counts as stale.
pub const DEFAULT_STALE_DAYS: u32 = 7;

/// Query options for the board view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardQuery {
    /// When set, keep only directories holding an open todo older than
    /// this many days.
    pub stale_after_days: Option<u32>,
}

/// Tacks of one directory on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSection {
    pub directory: String,
    pub tacks: Vec<Tack>,
}

/// Footer totals over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardSummary {
    pub total_tacks: usize,
    pub directories: usize,
    pub open_todos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub sections: Vec<BoardSection>,
    pub summary: BoardSummary,
}

/// Per-state counts used by the quiet summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TackCounts {
    pub pins: usize,
    pub open_todos: usize,
    pub warnings: usize,
    pub done: usize,
}

impl TackCounts {
    pub fn from_tacks<'a>(tacks: impl IntoIterator<Item = &'a Tack>) -> Self {
        let mut counts = Self::default();
        for tack in tacks {
            match tack.kind {
                TackKind::Pin => counts.pins += 1,
                TackKind::Warn => counts.warnings += 1,
                TackKind::Todo if tack.done => counts.done += 1,
                TackKind::Todo => counts.open_todos += 1,
            }
        }
        counts
    }

    pub fn is_empty(&self) -> bool {
        self.pins + self.open_todos + self.warnings + self.done == 0
    }
}

/// Groups `tacks` into sorted board sections and applies the stale filter.
pub fn build_board(tacks: Vec<LocatedTack>, query: BoardQuery, now: DateTime<Utc>) -> BoardView {
    let mut sections: Vec<BoardSection> = Vec::new();
    let mut summary = BoardSummary::default();

    for LocatedTack { directory, tack } in tacks {
        summary.total_tacks += 1;
        if tack.is_open_todo() {
            summary.open_todos += 1;
        }
        match sections
            .iter_mut()
            .find(|section| section.directory == directory)
        {
            Some(section) => section.tacks.push(tack),
            None => sections.push(BoardSection {
                directory,
                tacks: vec![tack],
            }),
        }
    }
    summary.directories = sections.len();

    if let Some(days) = query.stale_after_days {
        let threshold = Duration::days(i64::from(days));
        sections.retain(|section| section.tacks.iter().any(|tack| tack.is_stale(now, threshold)));
    }
    sections.sort_by(|left, right| left.directory.cmp(&right.directory));

    BoardView { sections, summary }
}
