use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use travel_journal_lib::application::services::LocationResolution;
use travel_journal_lib::domain::entities::{Entry, EntryDraft, TripReminder};
use travel_journal_lib::domain::value_objects::Coordinates;
use travel_journal_lib::infrastructure::photo::photo_data_url;
use travel_journal_lib::{init_logging, AppConfig, AppState};

#[derive(Parser)]
#[command(name = "travel-journal")]
#[command(about = "Offline-first travel journal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", env = "TRAVEL_JOURNAL_LOG_LEVEL", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "TRAVEL_JOURNAL_JSON_LOGS", global = true)]
    json_logs: bool,

    /// SQLite database url
    #[arg(long, env = "TRAVEL_JOURNAL_DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Base url of the remote entry service
    #[arg(long, env = "TRAVEL_JOURNAL_REMOTE_URL", global = true)]
    remote_url: Option<String>,

    /// Never talk to the remote store
    #[arg(long, env = "TRAVEL_JOURNAL_FORCE_OFFLINE", global = true)]
    offline: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new entry
    Record {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Free text location; resolved from --lat/--lng when omitted
        #[arg(short = 'L', long)]
        location: Option<String>,
        /// Image file attached as a data url
        #[arg(long)]
        photo: Option<PathBuf>,
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// Show the current entries, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Replay queued entries against the remote store
    Sync,
    /// Re-pair unsynced entries with queue items
    Reindex,
    /// Show sync state
    Status,
    /// Delete every local entry and queued write
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Resolve a position to location text
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Stay running, reconcile on every reconnect and print notices
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.json_logs)?;

    let mut config = AppConfig::from_env();
    if let Some(url) = cli.database_url.clone() {
        config.database.url = url;
    }
    if let Some(url) = cli.remote_url.clone() {
        config.remote.base_url = url;
    }
    if cli.offline {
        config.connectivity.force_offline = true;
    }

    info!("Starting travel-journal v{}", env!("CARGO_PKG_VERSION"));
    let state = AppState::build(config)
        .await
        .context("failed to initialise the journal")?;

    let result = run(&state, cli.command).await;
    state.shutdown().await;
    result
}

async fn run(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Record {
            title,
            description,
            location,
            photo,
            lat,
            lng,
        } => {
            state.start().await?;
            let location = match location {
                Some(location) => location,
                None => resolve_location(state, lat, lng).await?,
            };
            let mut draft = EntryDraft::new(title, description, location);
            if let Some(path) = photo {
                draft = draft.with_photo(photo_data_url(&path).await?);
            }
            let entry = state.repository.submit(draft).await?;
            if entry.synced {
                println!("Saved and synced: {}", entry.title);
            } else {
                println!("Saved offline, will sync later: {}", entry.title);
            }
        }
        Commands::List { json } => {
            state.start().await?;
            let entries = state.repository.current_entries().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_entries(&entries);
            }
            let reminder = entries
                .first()
                .and_then(|latest| TripReminder::for_entry(latest, Utc::now()));
            if let Some(reminder) = reminder {
                println!("\n{}", reminder.message());
            }
        }
        Commands::Sync => {
            let report = state.sync_now().await?;
            if let Some(reindex) = report.reindex.filter(|r| r.repaired_anything()) {
                println!(
                    "Repaired queue: {} re-enqueued, {} removed",
                    reindex.requeued_entry_ids.len(),
                    reindex.removed_queue_ids.len()
                );
            }
            if let Some(outcome) = report.reconcile {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
        }
        Commands::Reindex => {
            let report = state.reindex_job.run_guarded().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Status => {
            let status = state.repository.status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Clear { yes } => {
            if !yes {
                bail!("refusing to delete the journal without --yes");
            }
            state.repository.clear_all().await?;
            println!("All local entries removed");
        }
        Commands::Locate { lat, lng } => {
            let coordinates = Coordinates::new(lat, lng).map_err(anyhow::Error::msg)?;
            let resolution = state
                .location_service(Some(coordinates))?
                .resolve()
                .await;
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        }
        Commands::Watch => {
            let mut notices = state.repository.notices();
            let report = state.start().await?;
            println!("{}", serde_json::to_string(&report)?);
            let _tasks = state.watch();
            info!("Watching connectivity. Press Ctrl+C to stop.");
            loop {
                tokio::select! {
                    notice = notices.recv() => match notice {
                        Ok(notice) => println!("{}", serde_json::to_string(&notice)?),
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            info!("Shutting down");
        }
    }
    Ok(())
}

async fn resolve_location(state: &AppState, lat: Option<f64>, lng: Option<f64>) -> Result<String> {
    let position = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng).map_err(anyhow::Error::msg)?),
        _ => None,
    };
    let resolution = state.location_service(position)?.resolve().await;
    match resolution {
        LocationResolution::ManualEntryRequired { .. } => Ok(String::new()),
        other => Ok(other.location_text().unwrap_or_default().to_string()),
    }
}

fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        println!("No entries yet");
        return;
    }
    for entry in entries {
        let marker = if entry.synced { "synced" } else { "pending" };
        println!("[{marker}] {} ({})", entry.title, entry.display_date);
        if !entry.location.is_empty() {
            println!("    {}", entry.location);
        }
        if !entry.description.is_empty() {
            println!("    {}", entry.description);
        }
    }
}
