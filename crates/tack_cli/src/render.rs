//! Terminal rendering for tacks.
//!
//! # Responsibility
//! - Turn core read models into styled text lines.
//! - Keep all color decisions behind `Palette` so plain output stays
//!   byte-stable for pipes and tests.

use chrono::{DateTime, Local, Utc};
use owo_colors::{OwoColorize, Style};
use std::path::Path;
use tack_core::{BoardSection, BoardSummary, Tack, TackCounts, TackKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Title,
    Accent,
    Todo,
    Warn,
    Done,
    Success,
    Error,
    Subtle,
    Empty,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Title => Style::new().bold().magenta(),
            Self::Accent => Style::new().magenta(),
            Self::Todo => Style::new().cyan(),
            Self::Warn => Style::new().bold().yellow(),
            Self::Done => Style::new().dimmed().strikethrough(),
            Self::Success => Style::new().green(),
            Self::Error => Style::new().bold().red(),
            Self::Subtle => Style::new().bright_black(),
            Self::Empty => Style::new().bright_black().italic(),
        }
    }
}

/// Applies tones when color is enabled, passes text through otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if self.enabled {
            text.style(tone.style()).to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn kind_icon(tack: &Tack) -> &'static str {
    match tack.kind {
        TackKind::Pin => "📌",
        TackKind::Todo if tack.done => "☑",
        TackKind::Todo => "☐",
        TackKind::Warn => "⚠️",
    }
}

fn message_tone(tack: &Tack) -> Tone {
    match tack.kind {
        TackKind::Pin => Tone::Accent,
        TackKind::Todo if tack.done => Tone::Done,
        TackKind::Todo => Tone::Todo,
        TackKind::Warn => Tone::Warn,
    }
}

/// One tack line: id, icon, message, age.
pub fn tack_line(palette: Palette, tack: &Tack, now: DateTime<Utc>) -> String {
    format!(
        "  {} {} {}  {}",
        palette.paint(&format!("{:<6}", tack.id), Tone::Subtle),
        kind_icon(tack),
        palette.paint(&tack.message, message_tone(tack)),
        palette.paint(&time_ago(tack.created_at, now), Tone::Subtle)
    )
}

pub fn dir_header(palette: Palette, directory: &str, home: Option<&Path>) -> String {
    palette.paint(
        &format!("📁 {}", shorten_path(directory, home)),
        Tone::Title,
    )
}

pub fn listing_title(palette: Palette, directory: &str, home: Option<&Path>) -> String {
    format!(
        "{} {}",
        palette.paint("📋 Tacks in", Tone::Title),
        dir_header(palette, directory, home)
    )
}

pub fn empty_here(palette: Palette) -> String {
    palette.paint(
        "  No tacks here. Use `tack pin`, `tack todo`, or `tack warn` to add one.",
        Tone::Empty,
    )
}

pub fn empty_board(palette: Palette) -> String {
    palette.paint(
        "  No tacks anywhere. Your filesystem is a blank slate.",
        Tone::Empty,
    )
}

pub fn no_stale(palette: Palette) -> String {
    palette.paint("  ✨ No stale TODOs! You're on top of things.", Tone::Success)
}

/// Compact summary for shell hooks; `None` when there is nothing to show.
pub fn quiet_summary(palette: Palette, counts: &TackCounts) -> Option<String> {
    if counts.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    if counts.pins > 0 {
        parts.push(format!("📌 {} note{}", counts.pins, plural(counts.pins)));
    }
    if counts.open_todos > 0 {
        parts.push(format!(
            "☐ {} todo{}",
            counts.open_todos,
            plural(counts.open_todos)
        ));
    }
    if counts.warnings > 0 {
        parts.push(palette.paint(
            &format!("⚠️  {} warning{}", counts.warnings, plural(counts.warnings)),
            Tone::Warn,
        ));
    }
    if counts.done > 0 {
        parts.push(palette.paint(&format!("☑ {} done", counts.done), Tone::Subtle));
    }

    Some(format!(
        "{}{}",
        palette.paint("📋 ", Tone::Subtle),
        parts.join(&palette.paint(" · ", Tone::Subtle))
    ))
}

/// One board section framed on the left.
pub fn board_section(
    palette: Palette,
    section: &BoardSection,
    home: Option<&Path>,
    now: DateTime<Utc>,
) -> String {
    let mut lines = vec![format!(
        "{} {}",
        palette.paint("╭─", Tone::Subtle),
        dir_header(palette, &section.directory, home)
    )];
    for tack in &section.tacks {
        lines.push(format!(
            "{}{}",
            palette.paint("│", Tone::Subtle),
            tack_line(palette, tack, now)
        ));
    }
    lines.push(palette.paint("╰─", Tone::Subtle));
    lines.join("\n")
}

pub fn board_footer(palette: Palette, summary: &BoardSummary) -> String {
    format!(
        "  {}",
        palette.paint(
            &format!(
                "{} tack{} across {} director{} · {} open todo{}",
                summary.total_tacks,
                plural(summary.total_tacks),
                summary.directories,
                if summary.directories == 1 { "y" } else { "ies" },
                summary.open_todos,
                plural(summary.open_todos)
            ),
            Tone::Subtle
        )
    )
}

/// Human-readable age of `then` relative to `now`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    }
    if elapsed.num_hours() < 1 {
        return format!("{}m ago", elapsed.num_minutes());
    }
    if elapsed.num_days() < 1 {
        return format!("{}h ago", elapsed.num_hours());
    }
    match elapsed.num_days() {
        1 => "yesterday".to_string(),
        days if days < 30 => format!("{days}d ago"),
        _ => then.with_timezone(&Local).format("%b %-d").to_string(),
    }
}

/// Replaces a leading home directory with `~`.
pub fn shorten_path(directory: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return directory.to_string();
    };
    match Path::new(directory).strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => directory.to_string(),
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::{
        board_footer, quiet_summary, shorten_path, tack_line, time_ago, Palette,
    };
    use chrono::{Duration, TimeZone, Utc};
    use std::path::Path;
    use tack_core::{BoardSummary, Tack, TackCounts, TackId, TackKind};

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now - Duration::seconds(20), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(time_ago(now - Duration::hours(30), now), "yesterday");
        assert_eq!(time_ago(now - Duration::days(4), now), "4d ago");
        assert!(!time_ago(now - Duration::days(90), now).ends_with("ago"));
    }

    #[test]
    fn shorten_path_stops_at_component_boundaries() {
        let home = Path::new("/home/me");
        assert_eq!(shorten_path("/home/me/src/app", Some(home)), "~/src/app");
        assert_eq!(shorten_path("/home/me", Some(home)), "~");
        assert_eq!(shorten_path("/home/merge", Some(home)), "/home/merge");
        assert_eq!(shorten_path("/srv", None), "/srv");
    }

    #[test]
    fn quiet_summary_is_empty_without_tacks() {
        assert_eq!(quiet_summary(Palette::new(false), &TackCounts::default()), None);
    }

    #[test]
    fn quiet_summary_lists_nonzero_counts_only() {
        let counts = TackCounts {
            pins: 2,
            open_todos: 1,
            warnings: 0,
            done: 3,
        };
        assert_eq!(
            quiet_summary(Palette::new(false), &counts).unwrap(),
            "📋 📌 2 notes · ☐ 1 todo · ☑ 3 done"
        );
    }

    #[test]
    fn plain_tack_line_has_no_escape_codes() {
        let now = Utc::now();
        let tack = Tack::new(TackId::parse("ab12").unwrap(), TackKind::Warn, "careful", now);
        let line = tack_line(Palette::new(false), &tack, now);
        assert_eq!(line, "  ab12   ⚠️ careful  just now");
    }

    #[test]
    fn colored_output_contains_escape_codes() {
        let now = Utc::now();
        let tack = Tack::new(TackId::parse("ab12").unwrap(), TackKind::Pin, "hi", now);
        assert!(tack_line(Palette::new(true), &tack, now).contains('\u{1b}'));
    }

    #[test]
    fn footer_pluralizes() {
        let summary = BoardSummary {
            total_tacks: 1,
            directories: 1,
            open_todos: 0,
        };
        assert_eq!(
            board_footer(Palette::new(false), &summary),
            "  1 tack across 1 directory · 0 open todos"
        );
    }
}
