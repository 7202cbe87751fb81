//! QRKit Application Shell
//!
//! This is the thin command-line shell that wires configuration, logging,
//! storage and the engine together. Core logic lives in the `crates/`
//! directory.

pub mod cli;
pub mod commands;
pub mod state;

use clap::Parser;
use cli::{Cli, ColorsAction, Commands, HistoryAction};
use qrkit_core::AppConfig;
use state::AppState;
use std::io::Write;
use std::process::ExitCode;
use tracing::info;

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,qrkit=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}


/// Execute one parsed command. Returns whether it succeeded in the
/// user-facing sense (a failed validation is not an error but still exits
/// non-zero).
pub async fn execute(state: &AppState, command: Commands, out: &mut dyn Write) -> anyhow::Result<bool> {
    match command {
        Commands::Templates => commands::content::templates(out)?,
        Commands::Validate { template, input } => {
            return commands::content::validate(template, &input, out);
        }
        Commands::Generate {
            template,
            input,
            out: path,
        } => commands::content::generate(state, template, &input, path.as_deref(), out).await?,
        Commands::History { action } => match action {
            HistoryAction::List => commands::history::list(state, out)?,
            HistoryAction::Remove { id } => commands::history::remove(state, &id, out)?,
            HistoryAction::Clear => commands::history::clear(state, out)?,
        },
        Commands::Colors { action } => match action {
            ColorsAction::Show => commands::history::show_colors(state, out)?,
            ColorsAction::Set { dark, light } => {
                commands::history::set_colors(state, dark.as_deref(), light.as_deref(), out)?;
            }
        },
        Commands::Scan { image } => commands::content::scan(state, &image, out)?,
        Commands::Diagnose { report } => {
            commands::diagnose::diagnose(state, report.as_deref(), out).await?;
        }
    }
    Ok(true)
}

/// Parse arguments, run the command and map the outcome to an exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    info!("Starting QRKit v{}", env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async move {
        let config = AppConfig::load_with_env(cli.config.as_deref())?;
        let state = AppState::new(config)?;
        let mut stdout = std::io::stdout().lock();
        execute(&state, cli.command, &mut stdout).await
    });

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
