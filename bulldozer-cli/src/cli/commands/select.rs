use std::io::{Stderr, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use colored::*;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use is_terminal::IsTerminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use serde::Serialize;
use tokio::runtime::Handle;

use crate::cli::{SelectCommand, apply_overrides, open_session};
use crate::config::Config;
use crate::session::NodeRegistry;
use crate::tui::apps::select::{SelectApp, SelectParams};
use crate::tui::{Exit, Runtime};
use crate::wizard::{Handoff, Transition};

/// What the next wizard step receives, as JSON
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    generated_at: DateTime<Utc>,
    source: Option<String>,
    selected_id: Option<&'a str>,
    nodes: &'a NodeRegistry,
}

pub fn handle_select_command(args: SelectCommand, mut config: Config, handle: Handle) -> Result<()> {
    ensure_screen_terminal(std::io::stderr().is_terminal())?;

    apply_overrides(&mut config, &args.source, args.rows)?;
    if let Some(secs) = args.timeout {
        config.preview.fetch_timeout_secs = (secs > 0).then_some(secs);
    }

    let session = open_session(&config)?;
    if session.is_none() {
        log::warn!("No data source configured, opening the select screen empty");
    }
    let params = SelectParams {
        session,
        fetch_timeout: config.fetch_timeout(),
    };
    log::debug!(
        "Preview rows: {}, fetch timeout: {:?}",
        config.preview.row_limit,
        params.fetch_timeout
    );

    match run_screen(params, handle)? {
        Exit::Transition(Transition::Next(handoff)) => {
            let source = config
                .source
                .directory
                .as_ref()
                .map(|d| d.display().to_string());
            let json = manifest_json(&handoff, source, Utc::now())?;
            write_manifest(&json, args.output.as_deref(), std::io::stdout().lock())?;
            print_summary(&handoff, args.output.as_deref());
        }
        Exit::Transition(Transition::Back) => {
            eprintln!("{}", "Went back, nothing selected".dimmed());
        }
        Exit::Quit => {
            eprintln!("{}", "Cancelled".dimmed());
        }
    }
    Ok(())
}

/// The screen draws on stderr, so only stderr has to be a terminal
fn ensure_screen_terminal(stderr_is_terminal: bool) -> Result<()> {
    if !stderr_is_terminal {
        bail!("The select screen needs an interactive terminal on stderr; use `nodes` or `preview` in scripts");
    }
    Ok(())
}

/// Raw mode and alternate screen on stderr, undone on drop (panics included)
struct ScreenGuard;

impl ScreenGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = Self;
        execute!(std::io::stderr(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
        if let Err(e) = execute!(std::io::stderr(), EnableMouseCapture) {
            log::warn!("Mouse capture unavailable: {}", e);
        }
        Ok(guard)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(std::io::stderr(), DisableMouseCapture, LeaveAlternateScreen) {
            log::warn!("Failed to leave alternate screen: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            log::warn!("Failed to disable raw mode: {}", e);
        }
    }
}

/// Own the terminal for the lifetime of the screen
///
/// Drawing on stderr keeps stdout free for the manifest, so
/// `bulldozer-cli select > selection.json` works.
fn run_screen(params: SelectParams, handle: Handle) -> Result<Exit> {
    let _guard = ScreenGuard::enter()?;
    let mut terminal: Terminal<CrosstermBackend<Stderr>> =
        Terminal::new(CrosstermBackend::new(std::io::stderr())).context("Failed to initialize terminal")?;
    terminal.clear().context("Failed to clear terminal")?;

    let result = Runtime::<SelectApp>::new(params, handle).run(&mut terminal);

    if let Err(e) = terminal.show_cursor() {
        log::warn!("Failed to restore cursor: {}", e);
    }
    result
}

fn manifest_json(handoff: &Handoff, source: Option<String>, generated_at: DateTime<Utc>) -> Result<String> {
    let manifest = Manifest {
        generated_at,
        source,
        selected_id: handoff.selected_id.as_deref(),
        nodes: &handoff.nodes,
    };
    serde_json::to_string_pretty(&manifest).context("Failed to serialize selection manifest")
}

/// Write to `output`, or to `stdout` (usually redirected) when no file is given
fn write_manifest(json: &str, output: Option<&Path>, mut stdout: impl Write) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
            log::info!("Wrote manifest to {}", path.display());
        }
        None => {
            writeln!(stdout, "{}", json).context("Failed to write manifest to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

fn print_summary(handoff: &Handoff, output: Option<&Path>) {
    let nodes = &handoff.nodes;
    eprintln!(
        "{} {} of {} data sources selected",
        "✓".green().bold(),
        nodes.checked_count().to_string().bold(),
        nodes.len()
    );
    for node in nodes.checked_nodes() {
        eprintln!("  {} {}", "•".cyan(), node.label);
    }
    if let Some(path) = output {
        eprintln!("Manifest written to {}", path.display().to_string().cyan());
    }
}
