use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use herald::cli::{
    cmd_info, cmd_insights, cmd_serve, cmd_track, init_logging, load_config,
    load_local_env_overrides, InsightsArgs, ServeArgs, TrackArgs,
};
use tracing::{error, info};

/// Herald - engagement tracking and AI content insights
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Standalone metrics server port (0 disables it; `serve` also exposes /metrics)
    #[arg(long, default_value_t = 0)]
    metrics_port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the insight HTTP function
    Serve(ServeArgs),

    /// Generate an insight report from a JSON request
    Insights(InsightsArgs),

    /// Enrich and submit a single tracking event
    Track(TrackArgs),

    /// Show build and configuration information
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.debug, cli.log_json)?;
    load_local_env_overrides();
    let _metrics_server = herald::metrics::spawn_metrics_server(cli.metrics_port);

    info!("Starting Herald v{}", env!("CARGO_PKG_VERSION"));

    let loaded = load_config(cli.config.as_ref()).await?;

    let result = match cli.command {
        Commands::Serve(args) => cmd_serve(args, &loaded.config).await,
        Commands::Insights(args) => cmd_insights(args, &loaded.config).await,
        Commands::Track(args) => cmd_track(args, &loaded.config).await,
        Commands::Info => cmd_info(&loaded),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
