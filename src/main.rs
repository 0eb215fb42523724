//! Command line driver for the skill ledger
//!
//! Reads a chronologically ordered JSON array of parsed games, rates them,
//! and prints the resulting standings (plus optional team suggestions) as
//! JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use skill_ledger::config::{validate_config, AppConfig};
use skill_ledger::metrics::RatingMetrics;
use skill_ledger::rating::{Diagnostics, GameProcessing};
use skill_ledger::stats::StatisticsSummary;
use skill_ledger::{
    CompetitorStanding, GameRecord, GameValidityGate, Matchup, RatingEngine, TeamBalanceSearch,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Skill Ledger - team ratings and balanced team suggestions
#[derive(Parser)]
#[command(
    name = "skill-ledger",
    version,
    about = "Rate two-team games and suggest balanced teams",
    long_about = "Skill Ledger folds chronologically ordered game results into Gaussian skill \
                 beliefs (TrueSkill-style two-team updates) and suggests the most evenly \
                 matched ways to split a roster into two teams."
)]
struct Args {
    /// JSON file with an array of game records in chronological order
    #[arg(short, long, value_name = "FILE")]
    games: PathBuf,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Roster to split into balanced teams after rating
    #[arg(short, long, value_name = "COMPETITOR", num_args = 1..)]
    balance: Vec<String>,

    /// Number of team suggestions to print
    #[arg(long, value_name = "N")]
    top_n: Option<usize>,

    /// Only list competitors past the provisional threshold
    #[arg(long)]
    ranked_only: bool,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Print Prometheus metrics to stderr when done
    #[arg(long)]
    metrics: bool,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without rating games")]
    dry_run: bool,
}

#[derive(Serialize)]
struct Report {
    total_games: u64,
    rated_games: u64,
    skipped_games: BTreeMap<String, u64>,
    diagnostics: Diagnostics,
    standings: Vec<CompetitorStanding>,
    statistics: StatisticsSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    matchups: Option<Vec<Matchup>>,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display startup banner with the active model parameters
fn display_startup_banner(config: &AppConfig) {
    info!("Skill Ledger {}", skill_ledger::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!(
        "   Prior: mu={} sigma={:.4}",
        config.rating.initial_mean, config.rating.initial_stddev
    );
    info!(
        "   Noise: beta={:.4} tau={:.4} draw_probability={}",
        config.rating.beta, config.rating.tau, config.rating.draw_probability
    );
    info!(
        "   Balance: top_n={} max_roster_size={}",
        config.balance.top_n, config.balance.max_roster_size
    );
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(top_n) = args.top_n {
        config.balance.top_n = top_n;
    }

    validate_config(&config)?;
    Ok(config)
}

fn read_games(path: &Path) -> Result<Vec<GameRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read games file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse games file {}", path.display()))
}

fn run(args: &Args, config: &AppConfig) -> Result<Report> {
    let games = read_games(&args.games)?;
    info!("Loaded {} games from {}", games.len(), args.games.display());

    let gate = match &config.known_competitors {
        Some(known) => GameValidityGate::with_known_competitors(known.iter().cloned()),
        None => GameValidityGate::new(),
    };
    let metrics = Arc::new(RatingMetrics::new()?);
    let mut engine =
        RatingEngine::with_gate(config.rating.clone(), gate)?.with_metrics(metrics.clone());

    let mut skipped_games = BTreeMap::new();
    for game in &games {
        if let GameProcessing::Skipped { reason } = engine.process_game(game)? {
            *skipped_games.entry(reason.to_string()).or_insert(0) += 1;
        }
    }
    info!(
        "Rated {} of {} games ({} competitors)",
        engine.rated_games(),
        games.len(),
        engine.beliefs().len()
    );

    let matchups = if args.balance.is_empty() {
        None
    } else {
        let search =
            TeamBalanceSearch::new(config.balance.clone())?.with_metrics(metrics.clone());
        Some(search.find_top_balanced(&engine, &args.balance, config.balance.top_n)?)
    };

    let standings = if args.ranked_only {
        engine.ranked_standings()
    } else {
        engine.standings()
    };

    if args.metrics {
        eprintln!("{}", metrics.encode_text()?);
    }

    Ok(Report {
        total_games: engine.statistics().total_games(),
        rated_games: engine.rated_games(),
        skipped_games,
        diagnostics: engine.diagnostics(),
        standings,
        statistics: engine.statistics().summary(),
        matchups,
    })
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    if args.dry_run {
        info!("Configuration validation successful");
        info!("Dry run completed - exiting without rating games");
        return Ok(());
    }

    match run(&args, &config) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            error!("Rating run failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
