use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::Term;
use inquire::{InquireError, Select, Text};
use wetter_core::{Config, ForecastService, OpenMeteoProvider, SearchController};

use crate::view;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wetter", version, about = "Mehrtägige Wettervorhersage für deutsche Orte")]
pub struct Cli {
    /// Log verbosity (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search interactively (default).
    Interactive,

    /// Look up one place and print its forecast.
    Show {
        /// Place name, e.g. "Berlin".
        city: String,

        /// Print the resulting state as JSON instead of cards.
        #[arg(long)]
        json: bool,
    },

    /// Edit the configuration file.
    Configure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Clear,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Search => "Suchen",
            Action::Clear => "Löschen",
            Action::Quit => "Beenden",
        }
    }

    /// Menu entries; searching is only offered for non-blank input.
    fn available(can_submit: bool) -> Vec<Action> {
        if can_submit {
            vec![Action::Search, Action::Clear, Action::Quit]
        } else {
            vec![Action::Clear, Action::Quit]
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        let config_path = Config::resolve_path(self.config)?;

        match self.command.unwrap_or(Command::Interactive) {
            Command::Interactive => {
                let mut ctl = controller(&config_path)?;
                interactive(&mut ctl).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, json } => {
                let mut ctl = controller(&config_path)?;
                let found = show(
                    &mut ctl,
                    &city,
                    json,
                    terminal_width(),
                    &mut std::io::stdout().lock(),
                )
                .await?;

                Ok(if found {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                })
            }
            Command::Configure => {
                configure(&config_path)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn controller(config_path: &std::path::Path) -> Result<SearchController<OpenMeteoProvider>> {
    let config = Config::load_from(config_path)?;
    tracing::debug!(path = %config_path.display(), ?config, "configuration loaded");

    let provider =
        OpenMeteoProvider::from_config(&config).context("Failed to create HTTP client")?;
    Ok(SearchController::new(provider))
}

/// One lookup written to `out`. Returns false when the lookup failed.
async fn show<S: ForecastService, W: Write>(
    ctl: &mut SearchController<S>,
    city: &str,
    json: bool,
    width: usize,
    out: &mut W,
) -> Result<bool> {
    if !json {
        writeln!(out, "{}", view::LOADING_MESSAGE)?;
        out.flush()?;
    }

    ctl.submit(city).await;

    let state = ctl.state();
    if json {
        let text =
            serde_json::to_string_pretty(state).context("Failed to serialize search state")?;
        writeln!(out, "{text}")?;
    } else {
        write!(out, "{}", view::render(state, width))?;
    }

    Ok(state.error_message.is_none())
}

fn terminal_width() -> usize {
    let (_rows, cols) = Term::stdout().size();
    usize::from(cols)
}

/// Prompt loop. Enter on a non-blank place searches, Esc opens the action menu.
async fn interactive<S: ForecastService>(ctl: &mut SearchController<S>) -> Result<()> {
    loop {
        let input = Text::new("Ort:")
            .with_initial_value(&ctl.state().city_text)
            .with_help_message("Enter: Suchen, Esc: Menü")
            .prompt_skippable();

        let action = match input {
            Ok(Some(text)) => {
                ctl.set_city_text(text);
                if !ctl.can_submit() {
                    continue;
                }
                Action::Search
            }
            Ok(None) => {
                match Select::new("Aktion:", Action::available(ctl.can_submit())).prompt() {
                    Ok(action) => action,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => return Ok(()),
                    Err(e) => return Err(e).context("Failed to read action"),
                }
            }
            Err(InquireError::OperationInterrupted) => return Ok(()),
            Err(e) => return Err(e).context("Failed to read place name"),
        };

        match action {
            Action::Search => {
                println!("{}", view::LOADING_MESSAGE);
                ctl.submit_current().await;
            }
            Action::Clear => ctl.clear(),
            Action::Quit => return Ok(()),
        }

        print!("{}", view::render(ctl.state(), terminal_width()));
    }
}

/// Interactive editing of the config file.
fn configure(path: &std::path::Path) -> Result<()> {
    let mut cfg = Config::load_from(path)?;

    cfg.language = Text::new("Sprache der Ortsnamen:")
        .with_default(&cfg.language)
        .prompt()?;

    cfg.timezone = Text::new("Zeitzone:").with_default(&cfg.timezone).prompt()?;

    let days = Text::new("Vorhersagetage (1-16, leer = Standard):")
        .with_initial_value(&cfg.forecast_days.map(|d| d.to_string()).unwrap_or_default())
        .prompt()?;
    cfg.forecast_days = parse_optional(&days).context("Vorhersagetage must be a number")?;

    let timeout = Text::new("Timeout in Sekunden (leer = keiner):")
        .with_initial_value(&cfg.timeout_secs.map(|t| t.to_string()).unwrap_or_default())
        .prompt()?;
    cfg.timeout_secs = parse_optional(&timeout).context("Timeout must be a number")?;

    cfg.save_to(path)?;
    println!("Konfiguration gespeichert: {}", path.display());
    Ok(())
}

fn parse_optional<T: std::str::FromStr>(raw: &str) -> Result<Option<T>, T::Err> {
    let raw = raw.trim();
    if raw.is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}
