//! Entry point: parse CLI and dispatch to command handlers.

use anyhow::Context;
use clap::Parser;
use sport_data_hub::{
    cli::{Commands, SportDataHub},
    commands::{
        ingest::{handle_ingest, handle_ingest_date},
        player::handle_player,
        recent_matches::handle_recent_matches,
    },
    Result, LOG_DIR_ENV_VAR,
};
use std::path::PathBuf;
use std::process::ExitCode;

fn init_tracing() -> anyhow::Result<PathBuf> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = match std::env::var_os(LOG_DIR_ENV_VAR) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?.join("logs"),
    };
    std::fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("sport-data-hub.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sport_data_hub=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(log_path)
}

async fn run(app: SportDataHub) -> Result<()> {
    match app.command {
        Commands::Ingest { day, scrape, json } => handle_ingest(day, scrape, json).await?,

        Commands::IngestDate { date, scrape, json } => {
            handle_ingest_date(date, scrape, json).await?
        }

        Commands::RecentMatches {
            team,
            country,
            limit,
            db,
            json,
        } => handle_recent_matches(team, country, limit, db, json)?,

        Commands::Player { id, json } => handle_player(id, json).await?,
    }

    Ok(())
}

/// Run the CLI.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("warning: file logging disabled: {e:#}");
    }

    let app = SportDataHub::parse();
    match run(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            let payload = e.to_payload();
            match serde_json::to_string(&payload) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}
