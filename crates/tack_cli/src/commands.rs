//! Command handlers.
//!
//! # Responsibility
//! - Run one use-case per invocation against a freshly opened store.
//! - Print either styled text or JSON, as selected by `OutputOptions`.
//!
//! # Invariants
//! - Handlers read settings only from `CommandContext`; there is no global
//!   flag state.

use crate::hook::{snippet, Shell};
use crate::render::{self, Palette, Tone};
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use tack_core::{open_service, BoardQuery, CompletionOutcome, Tack, TackConfig, TackKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub json: bool,
    /// One-line summary for shell hooks; only affects the default listing.
    pub quiet: bool,
    pub palette: Palette,
}

/// Everything a handler needs to know about this invocation.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: TackConfig,
    pub output: OutputOptions,
    /// Directory the tacks are read from and pinned to.
    pub cwd: String,
    pub home: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardArgs {
    pub stale: bool,
    pub days: u32,
}

/// Default action: show the tacks of the current directory.
pub fn list_here(ctx: &CommandContext, out: &mut impl Write) -> Result<()> {
    let service = open_service(&ctx.config)?;
    let palette = ctx.output.palette;

    if ctx.output.json {
        return write_json(out, &service.list_here(&ctx.cwd));
    }

    if ctx.output.quiet {
        if let Some(summary) = render::quiet_summary(palette, &service.counts_here(&ctx.cwd)) {
            writeln!(out, "{summary}")?;
        }
        return Ok(());
    }

    let tacks = service.list_here(&ctx.cwd);
    if tacks.is_empty() {
        writeln!(out, "{}", render::empty_here(palette))?;
        return Ok(());
    }

    let now = Utc::now();
    writeln!(
        out,
        "{}",
        render::listing_title(palette, &ctx.cwd, ctx.home.as_deref())
    )?;
    writeln!(out)?;
    for tack in &tacks {
        writeln!(out, "{}", render::tack_line(palette, tack, now))?;
    }
    writeln!(out)?;
    Ok(())
}

/// `pin`, `todo` and `warn`.
pub fn add(
    ctx: &CommandContext,
    kind: TackKind,
    words: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let mut service = open_service(&ctx.config)?;
    let created = service.add(kind, &ctx.cwd, &words.join(" "), Utc::now())?;

    if ctx.output.json {
        return write_json(out, &created);
    }

    let palette = ctx.output.palette;
    let (verb, tone) = match kind {
        TackKind::Pin => ("Pinned", Tone::Accent),
        TackKind::Todo => ("Added todo", Tone::Todo),
        TackKind::Warn => ("Warning pinned", Tone::Warn),
    };
    writeln!(
        out,
        "  {} {verb} {}",
        palette.paint("✓", Tone::Success),
        palette.paint(&created.tack.message, tone)
    )?;
    writeln!(
        out,
        "  {}",
        palette.paint(&format!("id: {}", created.tack.id), Tone::Subtle)
    )?;
    Ok(())
}

pub fn done(ctx: &CommandContext, id: &str, out: &mut impl Write) -> Result<()> {
    let mut service = open_service(&ctx.config)?;
    let completion = service.complete(id, Utc::now())?;

    if ctx.output.json {
        return write_json(out, &completion.tack);
    }

    let palette = ctx.output.palette;
    match completion.outcome {
        CompletionOutcome::AlreadyDone => {
            writeln!(out, "  {} Already done!", palette.paint("—", Tone::Subtle))?;
        }
        CompletionOutcome::Completed => {
            writeln!(
                out,
                "  {} Done: {}",
                palette.paint("✓", Tone::Success),
                palette.paint(&completion.tack.tack.message, Tone::Done)
            )?;
        }
    }
    Ok(())
}

pub fn remove(ctx: &CommandContext, id: &str, out: &mut impl Write) -> Result<()> {
    let mut service = open_service(&ctx.config)?;
    let removed = service.remove(id)?;

    if ctx.output.json {
        return write_json(out, &removed);
    }

    let palette = ctx.output.palette;
    writeln!(
        out,
        "  {} Removed: {}",
        palette.paint("✓", Tone::Success),
        palette.paint(&removed.tack.message, Tone::Subtle)
    )?;
    Ok(())
}

/// Cross-directory view, optionally limited to stale todos.
pub fn board(ctx: &CommandContext, args: BoardArgs, out: &mut impl Write) -> Result<()> {
    let service = open_service(&ctx.config)?;
    let now = Utc::now();
    let view = service.board(
        BoardQuery {
            stale_after_days: args.stale.then_some(args.days),
        },
        now,
    );

    if ctx.output.json {
        let by_directory: BTreeMap<&str, &[Tack]> = view
            .sections
            .iter()
            .map(|section| (section.directory.as_str(), section.tacks.as_slice()))
            .collect();
        return write_json(out, &by_directory);
    }

    let palette = ctx.output.palette;
    if view.summary.total_tacks == 0 {
        writeln!(out, "{}", render::empty_board(palette))?;
        return Ok(());
    }

    writeln!(out, "{}", palette.paint("🗂  Tack Board", Tone::Title))?;
    writeln!(out)?;
    for section in &view.sections {
        writeln!(
            out,
            "{}",
            render::board_section(palette, section, ctx.home.as_deref(), now)
        )?;
        writeln!(out)?;
    }
    if args.stale && view.sections.is_empty() {
        writeln!(out, "{}", render::no_stale(palette))?;
        writeln!(out)?;
    }
    writeln!(out, "{}", render::board_footer(palette, &view.summary))?;
    Ok(())
}

pub fn hook(palette: Palette, shell: Shell, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", snippet(shell))?;
    writeln!(out)?;
    writeln!(
        out,
        "  {} Copy the above into your shell config, then restart your shell.",
        palette.paint("💡", Tone::Success)
    )?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
