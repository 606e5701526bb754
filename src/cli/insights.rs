use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use herald_insights::{InsightGenerator, InsightRequest};
use tokio::io::AsyncReadExt;

use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct InsightsArgs {
    /// JSON file with `{posts, engagementData}`; `-` reads stdin
    #[arg(value_name = "FILE", default_value = "-")]
    pub input: PathBuf,

    /// Override the configured model
    #[arg(long)]
    pub model: Option<String>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

pub async fn cmd_insights(args: InsightsArgs, config: &Config) -> Result<()> {
    let raw = read_input(&args.input).await?;
    let request: InsightRequest = if raw.trim().is_empty() {
        InsightRequest::default()
    } else {
        serde_json::from_str(&raw).context("input is not a valid insight request")?
    };

    let mut settings = config.insights.settings();
    if let Some(model) = args.model {
        settings.model = model;
    }
    let generator = InsightGenerator::openai(settings, config.insights.openai())?;
    let report = generator.generate(&request).await?;

    let rendered = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{rendered}");
    Ok(())
}

async fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("failed to read stdin")?;
        return Ok(buffer);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}
