//! Slate entry point.
//!
//! # Usage
//!
//! ```bash
//! # Plain session
//! slate
//!
//! # Extra literal commands, logs kept off the terminal
//! slate --command sig="Kind regards" --log-file slate.log
//! ```

use clap::Parser;
use slate::{CommandEntry, CommandTable, Engine, EngineConfig, MergePolicy, NoExtension};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Multi-line terminal text input with live word-wrap
#[derive(Parser, Debug)]
#[command(name = "slate")]
#[command(about = "Multi-line terminal text input with live word-wrap and slash commands")]
#[command(version)]
struct Args {
    /// Key read timeout in milliseconds
    #[arg(long, default_value_t = 5)]
    key_timeout_ms: u64,

    /// Pause after a terminal resize in milliseconds
    #[arg(long, default_value_t = 50)]
    resize_debounce_ms: u64,

    /// Blank rows reserved below the banner
    #[arg(long, default_value_t = 20)]
    reserve_rows: usize,

    /// Literal slash command, as NAME=TEXT (repeatable)
    #[arg(long = "command", value_name = "NAME=TEXT", value_parser = parse_command)]
    commands: Vec<(String, String)>,

    /// Use only the given commands instead of extending the built-ins
    #[arg(long)]
    replace_defaults: bool,

    /// Let given commands replace built-ins with the same name
    #[arg(long)]
    overwrite: bool,

    /// Do not print the banner
    #[arg(short, long)]
    quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn parse_command(raw: &str) -> Result<(String, String), String> {
    let (name, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=TEXT, got `{raw}`"))?;
    let name = name.trim_start_matches('\\');
    if name.is_empty() {
        return Err("command name is empty".to_string());
    }
    Ok((name.to_string(), text.to_string()))
}

fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(File::create(path)?)),
        ),
        None => None,
    };
    let stderr_layer = log_file
        .is_none()
        .then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn run(args: Args) -> slate::Result<()> {
    let table = if args.commands.is_empty() && !args.replace_defaults {
        CommandTable::default()
    } else {
        let custom = args
            .commands
            .into_iter()
            .map(|(name, text)| (name, CommandEntry::Literal(text)));
        CommandTable::merged(
            custom,
            MergePolicy {
                extend_defaults: !args.replace_defaults,
                overwrite: args.overwrite,
            },
        )?
    };

    let config = EngineConfig {
        capture: slate::CaptureConfig {
            key_timeout: Duration::from_millis(args.key_timeout_ms),
            resize_debounce: Duration::from_millis(args.resize_debounce_ms),
            ..Default::default()
        },
        reserve_rows: args.reserve_rows,
        ..Default::default()
    };

    if !args.quiet {
        println!(
            "Press 'ESC', 'CTRL+C' or 'CTRL+D' to quit. \
             Type \\help for a list of '\\' commands (also clears all text)."
        );
    }

    tracing::info!(commands = table.len(), "starting session");
    Engine::new(config, table, Box::new(NoExtension)).run()
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("error: cannot open log file: {e}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "session failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
