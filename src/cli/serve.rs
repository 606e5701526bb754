use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use herald_insights::InsightGenerator;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::metrics;
use crate::server::{build_router, ServeState};

#[derive(Args, Clone, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind (overrides `serve.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides `serve.port` and HERALD_SERVE_PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

pub fn build_state(config: &Config) -> Result<ServeState> {
    let generator = InsightGenerator::openai(config.insights.settings(), config.insights.openai())
        .context("failed to build upstream model client")?;
    Ok(ServeState::new(Arc::new(generator)))
}

pub async fn cmd_serve(args: ServeArgs, config: &Config) -> Result<()> {
    let host = args.host.unwrap_or_else(|| config.serve.host.clone());
    let port = args.port.unwrap_or(config.serve.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    let state = build_state(config)?;
    if !state.insights_configured() {
        warn!(
            target: "herald::serve",
            "no upstream model credential configured; insight requests will fail"
        );
    }
    metrics::register_metrics();

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        target: "herald::serve",
        %addr,
        model = %config.insights.model,
        "insight server listening"
    );

    axum::serve(listener, build_router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("insight server exited with error")?;
    info!(target: "herald::serve", "insight server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target: "herald::serve", ?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
