//! Command-line entry point for puckrank
//!
//! Loads configuration, folds the supplied match history and prints the
//! requested view as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use puckrank::config::AppConfig;
use puckrank::projection::Projector;
use puckrank::rating::Glicko2Calculator;
use puckrank::standings::{GroupBy, LeagueInfo, StandingsComposer, StandingsOrder};
use puckrank::{Match, Season};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Glicko-2 ratings, standings and projections for a hockey league
#[derive(Parser)]
#[command(
    name = "puckrank",
    version,
    about = "Glicko-2 ratings, standings and season projections for a hockey league",
    long_about = "puckrank rebuilds every team's rating and standings record from a season's \
                 match history, then prints standings, per-team reports or season projections \
                 as JSON."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Match history
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "JSON array of match records in date order"
    )]
    matches: PathBuf,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Skip the league membership check
    #[arg(long, help = "Accept a match history that does not cover the full league")]
    allow_partial: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the standings table
    Standings {
        /// Column to sort by instead of the default tie-break chain
        #[arg(short, long, value_name = "COLUMN")]
        sort: Option<String>,

        /// Split the table by conference, division or wildcard bracket
        #[arg(short, long, value_name = "conf|div|wildcard")]
        group: Option<String>,
    },
    /// Print one team's rating history, upcoming fixtures and projection
    Team {
        /// Abbreviation or full name
        name: String,

        /// Number of trailing rating states
        #[arg(long, value_name = "N")]
        last: Option<usize>,

        /// Number of upcoming fixtures
        #[arg(long, value_name = "N")]
        next: Option<usize>,
    },
    /// Print standings rows with season projections attached
    Projections,
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
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration from file or environment, then apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    puckrank::config::validate_config(&config)?;
    Ok(config)
}

fn read_matches(path: &Path) -> Result<Vec<Match>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read match file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse match file {}", path.display()))
}

/// Find the season's identifier for a user-supplied team name
fn resolve_team(season: &Season, league: &LeagueInfo, name: &str) -> Result<String> {
    if season.contains(name) {
        return Ok(name.to_string());
    }

    let info = league.team(name)?;
    [info.abbrev.clone(), info.full_name()]
        .into_iter()
        .find(|candidate| season.contains(candidate))
        .ok_or_else(|| {
            puckrank::EngineError::UnknownTeam {
                team: name.to_string(),
            }
            .into()
        })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(args: Args, config: AppConfig) -> Result<()> {
    let calculator = Glicko2Calculator::new(config.rating.clone())?;
    let league = LeagueInfo::nhl();

    let matches = read_matches(&args.matches)?;
    info!("Loaded {} match records from {}", matches.len(), args.matches.display());

    let season = Season::build(matches, &calculator)?;
    if let Err(e) = league.validate_season(&season) {
        if !args.allow_partial {
            return Err(e);
        }
        warn!("Continuing with partial league: {}", e);
    }

    let composer = StandingsComposer::new(&league, config.standings.clone());
    let projector = Projector::new(&calculator, config.projection.clone());

    match args.command {
        Command::Standings { sort, group } => {
            let order = StandingsOrder::parse(sort.as_deref())?;
            match group {
                Some(group) => {
                    let group_by: GroupBy = group.parse()?;
                    print_json(&composer.grouped(&season, order, group_by)?)
                }
                None => print_json(&composer.rows(&season, order)),
            }
        }
        Command::Team { name, last, next } => {
            let id = resolve_team(&season, &league, &name)?;
            print_json(&projector.team_report(&season, &id, last, next)?)
        }
        Command::Projections => {
            let rows = composer
                .rows(&season, StandingsOrder::Default)
                .into_iter()
                .map(|row| {
                    let projection = projector.project(&season, &row.team)?;
                    Ok(row.with_projection(projection))
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&rows)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("{} v{}", config.service.name, puckrank::VERSION);
    run(args, config)
}
