use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commander_metrics::config::AppConfig;
use commander_metrics::fetch::{Coordinator, Debouncer, HttpStatsBackend, StatsRequest};
use commander_metrics::models::{ColorIdentity, FilterSpec, TitleTier};
use commander_metrics::rank::{Direction, SortKey};
use commander_metrics::view::{card_view, commander_view};

#[derive(Parser)]
#[command(name = "commander-metrics")]
#[command(about = "Tournament metrics engine for budget Commander formats")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Exact color identity, compact codes (e.g. "WU", "c" for colorless)
    #[arg(long)]
    colors: Option<ColorIdentity>,

    /// Minimum mana value
    #[arg(long)]
    min_mv: Option<f64>,

    /// Maximum mana value
    #[arg(long)]
    max_mv: Option<f64>,

    /// Start of the date window (dd/mm/yyyy)
    #[arg(long)]
    from: Option<String>,

    /// End of the date window (dd/mm/yyyy)
    #[arg(long)]
    to: Option<String>,

    /// Restrict to these tournament ids (comma-separated)
    #[arg(long, value_delimiter = ',')]
    tournaments: Vec<u64>,

    /// Title tier: all, top4, top8, champion
    #[arg(long, default_value = "all")]
    tier: TitleTier,

    /// Case-insensitive name substring
    #[arg(long)]
    name: Option<String>,

    /// Sort key: winrate, wins, entries, name, champion, percentage
    #[arg(long, default_value = "winrate")]
    sort: SortKey,

    /// Sort ascending (default is descending)
    #[arg(long)]
    asc: bool,

    /// Page to show
    #[arg(long, default_value = "1")]
    page: u32,

    /// Rows per page (default from config)
    #[arg(long)]
    page_size: Option<u32>,
}

impl FilterArgs {
    fn spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::new().with_tier(self.tier);
        if let Some(colors) = self.colors {
            spec = spec.with_colors(colors);
        }
        if self.min_mv.is_some() || self.max_mv.is_some() {
            spec = spec.with_mana_value(
                self.min_mv.unwrap_or(0.0),
                self.max_mv.unwrap_or(f64::MAX),
            );
        }
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            spec = spec.with_date_range(from.as_str(), to.as_str());
        }
        if !self.tournaments.is_empty() {
            spec = spec.with_tournaments(self.tournaments.iter().copied());
        }
        if let Some(name) = &self.name {
            spec = spec.with_name_query(name.clone());
        }
        spec
    }

    fn direction(&self) -> Direction {
        if self.asc {
            Direction::Asc
        } else {
            Direction::Desc
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Commander win-rate rankings
    Commanders {
        #[command(flatten)]
        filters: FilterArgs,

        /// Pin an exact commander name
        #[arg(long)]
        commander: Option<String>,

        /// Pin an exact partner name
        #[arg(long)]
        partner: Option<String>,
    },

    /// Card usage rankings
    Cards {
        #[command(flatten)]
        filters: FilterArgs,

        /// Deck count for the usage-percent fallback
        #[arg(long, default_value = "0")]
        total_decks: u32,
    },

    /// List tournaments
    Tournaments,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting commander-metrics v{}", env!("CARGO_PKG_VERSION"));

    let config_path = PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)?
    } else {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        AppConfig::default()
    };

    let backend = HttpStatsBackend::new(config.base_url()?, config.backend.timeout())?;
    let debouncer = Debouncer::new(config.search.debounce(), config.search.min_query_len);
    let coordinator = Coordinator::new(Arc::new(backend), debouncer);

    match cli.command {
        Commands::Commanders {
            filters,
            commander,
            partner,
        } => {
            let scope = StatsRequest {
                tournament_ids: filters.tournaments.clone(),
            };
            coordinator.refresh_winrates(&scope).await;

            let mut spec = filters.spec();
            if let Some(name) = commander {
                spec = spec.with_commander(name);
            }
            if let Some(name) = partner {
                spec = spec.with_partner(name);
            }

            let mut view = commander_view(
                coordinator.winrates.snapshot(),
                filters.page_size.unwrap_or(config.page_size),
            );
            view.set_spec(spec);
            view.set_sort(filters.sort, filters.direction());
            view.set_page(filters.page);

            println!("{}", serde_json::to_string_pretty(&view.current())?);
        }

        Commands::Cards {
            filters,
            total_decks,
        } => {
            let scope = StatsRequest {
                tournament_ids: filters.tournaments.clone(),
            };
            coordinator.refresh_cards(&scope, total_decks).await;

            let mut view = card_view(
                coordinator.cards.snapshot(),
                filters.page_size.unwrap_or(config.page_size),
            );
            view.set_spec(filters.spec());
            view.set_sort(filters.sort, filters.direction());
            view.set_page(filters.page);

            println!("{}", serde_json::to_string_pretty(&view.current())?);
        }

        Commands::Tournaments => {
            coordinator.refresh_tournaments().await;
            println!(
                "{}",
                serde_json::to_string_pretty(&coordinator.tournaments.snapshot())?
            );
        }
    }

    Ok(())
}
