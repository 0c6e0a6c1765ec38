mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use lb_api_types::LeadQuery;
use lb_client::HttpLeadService;
use lb_core::config::Config;
use lb_telemetry::logging::{self, LogFormat};
use lb_telemetry::tracing_setup::create_operation_span;
use tracing::Instrument;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// leadboard CLI -- view the lead pipeline and move leads between stages.
#[derive(Parser)]
#[command(name = "lb", version, about)]
struct Cli {
    /// Lead API base URL (overrides `api.base_url`).
    #[arg(long, global = true, env = "LEADBOARD_API_URL")]
    api_url: Option<String>,

    /// Config file (default: ~/.leadboard/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the kanban board: one section per pipeline stage.
    Board {
        /// Only leads of this campaign.
        #[arg(long)]
        campaign: Option<String>,
        /// Free-text search.
        #[arg(long)]
        search: Option<String>,
        /// Server-side status filter.
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        /// Page size (default: `kanban.page_limit`).
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Move a lead to another stage.
    Move {
        /// Lead ID.
        lead: String,
        /// Target status: new, contacted, interested, qualified or closed.
        status: String,
        /// Campaign whose leads are loaded alongside the moved one.
        #[arg(long)]
        campaign: Option<String>,
    },

    /// Show one lead.
    Show {
        /// Lead ID.
        lead: String,
    },

    /// Lead totals per status.
    Stats,

    /// Print the effective configuration as TOML.
    Config,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Board { .. } => "board",
            Commands::Move { .. } => "move",
            Commands::Show { .. } => "show",
            Commands::Stats => "stats",
            Commands::Config => "config",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate()?;
    }

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Human
    };
    logging::init_logging(
        "lb",
        &logging::filter_directive(&config.general.log_level, cli.verbose),
        format,
    );

    let (span, trace_id) = create_operation_span(cli.command.name());
    tracing::debug!(%trace_id, base_url = %config.api.base_url, "starting command");

    run(cli.command, config).instrument(span).await
}

async fn run(command: Commands, config: Config) -> anyhow::Result<()> {
    let connect = || HttpLeadService::from_config(&config.api);

    match command {
        Commands::Board {
            campaign,
            search,
            status,
            page,
            limit,
        } => {
            let query = LeadQuery {
                campaign_id: campaign,
                page,
                limit: Some(limit.unwrap_or(config.kanban.page_limit)),
                search,
                status,
            };
            commands::board::run(&connect()?, query, config.kanban.board_options()).await
        }
        Commands::Move {
            lead,
            status,
            campaign,
        } => {
            let service = Arc::new(connect()?);
            commands::move_lead::run(service, &config.kanban, &lead, &status, campaign).await
        }
        Commands::Show { lead } => commands::show::run(&connect()?, &lead).await,
        Commands::Stats => commands::stats::run(&connect()?).await,
        Commands::Config => commands::config::run(&config),
    }
}
