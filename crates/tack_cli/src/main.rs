//! `tack` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments into an explicit `CommandContext`.
//! - Bootstrap logging, dispatch one command, and report errors once.

mod commands;
mod hook;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{BoardArgs, CommandContext, OutputOptions};
use hook::Shell;
use log::info;
use render::{Palette, Tone};
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tack_core::{
    init_logging, TackConfig, TackKind, DEFAULT_STALE_DAYS, TACK_HOME_ENV, TACK_LOG_ENV,
};

const LONG_ABOUT: &str = "tack: pin notes, TODOs, and warnings to directories.

Your filesystem becomes a spatial notebook. Every time you enter
a directory, see what you left for yourself.

  tack pin \"remember: API key rotates monthly\"
  tack todo \"fix flaky test in auth_test.go\"
  tack warn \"DO NOT deploy from this branch\"
  tack                          show tacks here
  tack board                    see all tacks everywhere";

#[derive(Parser, Debug)]
#[command(name = "tack", version, about = "Sticky context for your terminal", long_about = LONG_ABOUT)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Compact one-line summary (for shell hooks)
    #[arg(short, long)]
    quiet: bool,

    /// Directory holding tacks.json and logs [default: ~/.tack]
    #[arg(long, env = TACK_HOME_ENV, global = true, hide = true)]
    tack_home: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error|off
    #[arg(long, env = TACK_LOG_ENV, global = true, hide = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pin a note to the current directory
    Pin {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Add a TODO to the current directory
    Todo {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Pin a warning to the current directory
    Warn {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Mark a TODO as done
    Done { id: String },
    /// Remove a tack
    #[command(visible_aliases = ["remove", "delete"])]
    Rm { id: String },
    /// Bird's-eye view of all tacks across your machine
    Board {
        /// Only show directories with stale TODOs
        #[arg(long)]
        stale: bool,
        /// Number of days before a TODO is considered stale
        #[arg(long, default_value_t = DEFAULT_STALE_DAYS)]
        days: u32,
    },
    /// Print shell hook for auto-display on cd
    #[command(
        long_about = "Print a shell hook snippet that shows tack summaries
whenever you cd into a directory.

Add the output to your shell config:
  tack hook bash >> ~/.bashrc
  tack hook zsh  >> ~/.zshrc
  tack hook fish >> ~/.config/fish/conf.d/tack.fish"
    )]
    Hook {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Pin { .. } => "pin",
            Self::Todo { .. } => "todo",
            Self::Warn { .. } => "warn",
            Self::Done { .. } => "done",
            Self::Rm { .. } => "rm",
            Self::Board { .. } => "board",
            Self::Hook { .. } => "hook",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let palette = Palette::new(color_enabled(std::io::stderr().is_terminal()));
            eprintln!("{}", palette.paint(&format!("error: {err}"), Tone::Error));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = TackConfig::resolve(cli.tack_home.as_deref())?;
    if let Some(level) = cli.log_level {
        config = config.with_log_level(level);
    }
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        if !cli.quiet {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let cwd = working_directory()?;
    let output = OutputOptions {
        json: cli.json,
        quiet: cli.quiet,
        palette: Palette::new(color_enabled(std::io::stdout().is_terminal())),
    };
    let ctx = CommandContext {
        config,
        output,
        cwd: cwd.to_string_lossy().into_owned(),
        home: dirs::home_dir(),
    };

    info!(
        "event=command module=cli status=start command={} json={} quiet={}",
        cli.command.as_ref().map_or("list", Command::name),
        cli.json,
        cli.quiet
    );

    let mut out = std::io::stdout().lock();
    match cli.command {
        None => commands::list_here(&ctx, &mut out),
        Some(Command::Pin { message }) => commands::add(&ctx, TackKind::Pin, &message, &mut out),
        Some(Command::Todo { message }) => commands::add(&ctx, TackKind::Todo, &message, &mut out),
        Some(Command::Warn { message }) => commands::add(&ctx, TackKind::Warn, &message, &mut out),
        Some(Command::Done { id }) => commands::done(&ctx, &id, &mut out),
        Some(Command::Rm { id }) => commands::remove(&ctx, &id, &mut out),
        Some(Command::Board { stale, days }) => {
            commands::board(&ctx, BoardArgs { stale, days }, &mut out)
        }
        Some(Command::Hook { shell }) => commands::hook(output.palette, shell, &mut out),
    }
}

/// Current directory, spelled the way the shell reached it.
fn working_directory() -> Result<PathBuf> {
    let physical = std::env::current_dir().context("could not determine current directory")?;
    Ok(prefer_logical(physical, std::env::var_os("PWD")))
}

/// `$PWD` wins when it is absolute and names the same directory, so tacks
/// pinned through a symlink stay under the symlinked path.
fn prefer_logical(physical: PathBuf, pwd: Option<OsString>) -> PathBuf {
    match pwd.map(PathBuf::from) {
        Some(logical) if logical.is_absolute() && same_directory(&logical, &physical) => logical,
        _ => physical,
    }
}

fn same_directory(left: &Path, right: &Path) -> bool {
    match (std::fs::canonicalize(left), std::fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

fn color_enabled(is_terminal: bool) -> bool {
    is_terminal && std::env::var_os("NO_COLOR").is_none()
}
