// Teger - command-line entry point

use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use teger::cli::{Cli, Commands, ConfigCommands};
use teger::commands::{self, EvidenceSource, ReportOptions, ReportStyle};
use teger::models::response::CommandResponse;
use teger::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    let api_key = match &cli.command {
        Commands::Scan { api_key, .. } | Commands::Health { api_key } => api_key.clone(),
        _ => None,
    };
    let state = AppState::open(cli.config, cli.store, api_key).context("failed to open state")?;

    let ok = match cli.command {
        Commands::Scan {
            evidence,
            file,
            pending,
            compact,
            raw,
            ..
        } => {
            let source = if pending {
                EvidenceSource::Pending
            } else {
                let text = match &file {
                    Some(path) => commands::read_evidence_text(path)
                        .with_context(|| format!("failed to read {}", path.display()))?,
                    None => evidence.text.clone().unwrap_or_default(),
                };
                EvidenceSource::Direct(evidence.into_evidence(text))
            };
            let options = ReportOptions {
                style: if compact {
                    ReportStyle::Compact
                } else {
                    ReportStyle::Full
                },
                color: std::io::stdout().is_terminal(),
                show_raw: raw,
            };
            let response = commands::scan(&state, source).await;
            emit(json, &response, |state| commands::render_state(state, &options))?
        }
        Commands::Capture { evidence, show } => {
            if show {
                let response = commands::show_pending(&state);
                emit(json, &response, |pending| match pending {
                    Some(p) => format!(
                        "Pending capture from {} ({}), {} chars, captured {}",
                        p.evidence.sender_or_unknown(),
                        p.evidence.platform,
                        p.evidence.text.chars().count(),
                        p.captured_at
                            .map(|at| at.to_rfc3339())
                            .unwrap_or_else(|| "at an unknown time".to_string())
                    ),
                    None => "No pending capture.".to_string(),
                })?
            } else {
                let text = evidence.text.clone().unwrap_or_default();
                let response = commands::capture(&state, evidence.into_evidence(text));
                emit(json, &response, |_| {
                    "Captured. Run `teger scan --pending` to analyze.".to_string()
                })?
            }
        }
        Commands::Config { command } => {
            let response = match command {
                ConfigCommands::Show => commands::get_settings(&state).await,
                ConfigCommands::Set(args) => commands::update_settings(&state, args.into()).await,
                ConfigCommands::Reset => commands::reset_settings(&state).await,
            };
            emit(json, &response, |config| {
                serde_json::to_string_pretty(config).unwrap_or_default()
            })?
        }
        Commands::Health { .. } => {
            let response = commands::get_health(&state).await;
            emit(json, &response, |health| {
                format!("{} is {} (model {})", health.engine, health.status, health.model)
            })?
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print a response as JSON or text. Returns whether it succeeded.
fn emit<T: Serialize>(
    json: bool,
    response: &CommandResponse<T>,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        match (&response.data, &response.error) {
            (Some(data), _) => println!("{}", render(data)),
            (None, Some(error)) => eprintln!("Error: {}", error),
            (None, None) => {}
        }
    }
    Ok(response.success)
}
