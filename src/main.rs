//! Steamwatch
//!
//! Command line entry point: watch apps on the Steam store, fetch their current
//! prices and list what changed.

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use steamwatch::catalog::StoreApiClient;
use steamwatch::database::{create_pool, run_migrations};
use steamwatch::services::{FetchOutcome, ItemReport};
use steamwatch::signals::SignalBus;
use steamwatch::util::extract_app_id;
use steamwatch::{render, AppConfig, AppError, AppResult, AppState};
use tracing::{debug, error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "steamwatch", about = "Watch Steam games for price changes", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a game to the watchlist
    Watch(WatchArgs),
    /// Remove a game from the watchlist
    Unwatch(UnwatchArgs),
    /// List watched games
    Ls(LsArgs),
    /// Fetch current data from the store
    Fetch(FetchArgs),
    /// Show recorded snapshots per package
    Report(ReportArgs),
    /// Show the most recent changes across all games
    Recent(RecentArgs),
}

#[derive(Debug, Args)]
struct WatchArgs {
    /// App id or store URL
    app_id: String,

    /// Price alert threshold in minor units (e.g. cents)
    #[arg(short, long)]
    threshold: Option<i64>,
}

#[derive(Debug, Args)]
struct UnwatchArgs {
    /// App id or store URL
    app_id: String,

    /// Delete the game and its history instead of disabling it
    #[arg(short, long)]
    delete: bool,
}

#[derive(Debug, Args)]
struct LsArgs {
    /// Include disabled games
    #[arg(short, long)]
    all: bool,
}

#[derive(Debug, Args)]
struct FetchArgs {
    /// Only fetch these games (default: all enabled)
    #[arg(short, long, num_args = 1..)]
    games: Vec<String>,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Only report these games (default: all enabled)
    #[arg(short, long, num_args = 1..)]
    games: Vec<String>,

    /// Snapshots per package
    #[arg(short = 'n', long, value_parser = clap::value_parser!(i64).range(1..))]
    limit: Option<i64>,
}

#[derive(Debug, Args)]
struct RecentArgs {
    /// Number of snapshots
    #[arg(short = 'n', long, value_parser = clap::value_parser!(i64).range(1..))]
    limit: Option<i64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables first
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", AppError::Config(e));
            return ExitCode::FAILURE;
        }
    };

    let log_level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("steamwatch={},sqlx=warn", log_level).into()
            }),
        )
        .init();

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &AppConfig) -> AppResult<()> {
    debug!("Using database {}", config.database_url());
    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;

    run_migrations(&pool).await.map_err(|e| {
        error!("Database migration failed: {}", e);
        AppError::Database(e)
    })?;

    let catalog = StoreApiClient::new(&config.store)?;
    let state = AppState::new(
        pool,
        Arc::new(catalog),
        Arc::new(SignalBus::with_logging()),
        config.store.country_code.clone(),
    );

    match command {
        Commands::Watch(args) => {
            let app_id = extract_app_id(&args.app_id)?;
            let item = state.watch_service.watch(&app_id, args.threshold).await?;
            println!("Watching {} ({})", item.display_name(), item.steam_id);
        }
        Commands::Unwatch(args) => {
            let app_id = extract_app_id(&args.app_id)?;
            if let Some(item) = state.watch_service.unwatch(&app_id, args.delete).await? {
                let action = if args.delete { "Deleted" } else { "Disabled" };
                println!("{} {} ({})", action, item.display_name(), item.steam_id);
            }
        }
        Commands::Ls(args) => {
            let items = state.watch_service.ls(args.all).await?;
            println!("{}", render::render_ls(&items));
        }
        Commands::Fetch(args) => {
            let results = if args.games.is_empty() {
                state.watch_service.fetch_all().await?
            } else {
                let mut results = Vec::new();
                for game in &args.games {
                    let app_id = extract_app_id(game)?;
                    let Some(item) = state.watch_service.find(&app_id).await? else {
                        warn!("{} is not being watched, skipped", app_id);
                        continue;
                    };
                    let outcome = state.watch_service.fetch(&item).await?;
                    results.push((item, outcome));
                }
                results
            };

            for (item, outcome) in results {
                match outcome {
                    FetchOutcome::SkippedDisabled => {
                        println!("{}: disabled, skipped", item.display_name())
                    }
                    FetchOutcome::Updated(summary) => println!(
                        "{}: {} packages, {} new snapshots, {} changes",
                        item.display_name(),
                        summary.packages_seen,
                        summary.snapshots_recorded,
                        summary.changes_signalled
                    ),
                }
            }
        }
        Commands::Report(args) => {
            let limit = Some(args.limit.unwrap_or(config.report_limit));
            let reports = if args.games.is_empty() {
                state.report_service.report_all(limit).await?
            } else {
                let mut reports = Vec::new();
                for game in &args.games {
                    let app_id = extract_app_id(game)?;
                    let Some(item) = state.watch_service.find(&app_id).await? else {
                        warn!("{} is not being watched, skipped", app_id);
                        continue;
                    };
                    let packages = state.report_service.report(&item, limit).await?;
                    reports.push(ItemReport { item, packages });
                }
                reports
            };
            println!("{}", render::render_report(&reports));
        }
        Commands::Recent(args) => {
            let limit = Some(args.limit.unwrap_or(config.recent_limit));
            let recent = state.report_service.recent(limit).await?;
            println!("{}", render::render_recent(&recent));
        }
    }

    info!("Done");
    Ok(())
}
