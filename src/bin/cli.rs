//! Timetable ingestion CLI

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use timetable_ingest::{
    error::{AppError, Result},
    models::{Config, FeedKind, IdRange},
    pipeline::{self, IdentifierInput},
    services::{FeedSource, HttpFeedClient, RefreshMode},
};

/// Room and group calendar feed ingestion
#[derive(Parser, Debug)]
#[command(
    name = "timetable-ingest",
    version,
    about = "Discovers, downloads and flattens university calendar feeds"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe room identifiers and record the ones of interest
    Discover {
        /// First identifier (default: ranges.rooms.start)
        #[arg(long)]
        start: Option<u64>,

        /// Last identifier, inclusive (default: ranges.rooms.end)
        #[arg(long)]
        end: Option<u64>,

        /// Continue after the last checkpointed identifier
        #[arg(long)]
        resume: bool,
    },

    /// Download feeds into the content store
    Fetch {
        kind: KindArg,

        /// First identifier (rooms default to the discovered list)
        #[arg(long, requires = "end")]
        start: Option<u64>,

        /// Last identifier, inclusive
        #[arg(long, requires = "start")]
        end: Option<u64>,

        /// Remove every stored feed of this kind first
        #[arg(long)]
        refresh: bool,
    },

    /// Extract stored feeds into the dataset file
    Extract {
        /// Only extract one kind (default: rooms, then groups)
        #[arg(long)]
        kind: Option<KindArg>,

        /// Output path (default: paths.output_file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run full pipeline: Discover → Fetch rooms → Fetch groups → Extract
    Pipeline {
        /// Skip discovery, use the existing identifier list
        #[arg(long)]
        skip_discover: bool,
    },

    /// Validate the configuration
    Validate,

    /// Show content store and run status
    Info,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Rooms,
    Groups,
}

impl From<KindArg> for FeedKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Rooms => FeedKind::Room,
            KindArg::Groups => FeedKind::Group,
        }
    }
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn http_source(config: &Config) -> Result<Arc<dyn FeedSource>> {
    Ok(Arc::new(HttpFeedClient::new(&config.feed)?))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = loaded
        .as_ref()
        .map(|config| config.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &level);

    let config = match loaded {
        Ok(config) => {
            log::info!("Loaded configuration from {}", cli.config.display());
            config
        }
        Err(e) => {
            log::warn!(
                "Config load failed from {}: {}. Using defaults.",
                cli.config.display(),
                e
            );
            Config::default()
        }
    };

    match cli.command {
        Command::Discover { start, end, resume } => {
            let range = match (start, end) {
                (None, None) => None,
                (start, end) => Some(IdRange::new(
                    start.unwrap_or(config.ranges.rooms.start),
                    end.unwrap_or(config.ranges.rooms.end),
                )),
            };
            if range.is_some_and(|r| r.is_empty()) {
                return Err(AppError::validation("--start must not exceed --end"));
            }

            let source = http_source(&config)?;
            let summary = pipeline::run_discover(&config, source, range, resume).await?;
            log::info!(
                "Discovery complete: {} of {} probed ID(s) accepted",
                summary.accepted,
                summary.probed
            );
        }

        Command::Fetch {
            kind,
            start,
            end,
            refresh,
        } => {
            let kind = FeedKind::from(kind);
            let input = match (start, end) {
                (Some(start), Some(end)) => IdentifierInput::Range(IdRange::new(start, end)),
                _ => IdentifierInput::for_kind(&config, kind),
            };
            let mode = if refresh {
                RefreshMode::FullRefresh
            } else {
                RefreshMode::Incremental
            };

            let source = http_source(&config)?;
            let summary = pipeline::run_fetch(&config, source, kind, &input, mode).await?;
            if summary.unsuccessful() > 0 {
                log::warn!(
                    "{} of {} ID(s) produced no feed",
                    summary.unsuccessful(),
                    summary.requested
                );
            }
        }

        Command::Extract { kind, output } => {
            let kinds: Vec<FeedKind> = match kind {
                Some(kind) => vec![kind.into()],
                None => FeedKind::ALL.to_vec(),
            };
            let output = output.unwrap_or_else(|| config.paths.output_file.clone());

            pipeline::run_extract(&config, &kinds, &output).await?;
        }

        Command::Pipeline { skip_discover } => {
            pipeline::run_pipeline(&config, http_source(&config)?, skip_discover).await?;
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
            log::info!("All validations passed!");
        }

        Command::Info => {
            pipeline::run_info(&config).await?;
        }
    }

    log::info!("Done!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_to_storage_dir() {
        let cli = Cli::try_parse_from(["timetable-ingest", "info"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("storage/config.toml"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_fetch_range_needs_both_bounds() {
        let half_range = ["timetable-ingest", "fetch", "groups", "--start", "5"];
        assert!(Cli::try_parse_from(half_range).is_err());

        let cli = Cli::try_parse_from([
            "timetable-ingest",
            "fetch",
            "groups",
            "--start",
            "5",
            "--end",
            "9",
            "--config",
            "other.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(
            cli.command,
            Command::Fetch { start: Some(5), end: Some(9), refresh: false, .. }
        ));
    }
}
