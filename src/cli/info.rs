use anyhow::Result;
use herald_core_types::EventType;

use super::runtime::LoadedConfig;

pub fn cmd_info(loaded: &LoadedConfig) -> Result<()> {
    let config = &loaded.config;

    println!("Herald Engagement Analytics");
    println!("===========================");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Build Date: {}", env!("HERALD_BUILD_DATE"));
    println!("Git Commit: {}", env!("HERALD_GIT_HASH"));
    println!();

    println!("Configuration:");
    if loaded.from_file {
        println!("- Source: {}", loaded.path.display());
    } else {
        println!("- Source: defaults ({} not found)", loaded.path.display());
    }
    println!(
        "- Serve Address: {}:{}",
        config.serve.host, config.serve.port
    );
    println!("- Model: {} @ {}", config.insights.model, config.insights.api_base);
    println!(
        "- Temperature: {} (timeout {}s)",
        config.insights.temperature, config.insights.timeout_secs
    );
    println!(
        "- Model Credential: {}",
        if config.insights_configured() {
            "configured"
        } else {
            "missing"
        }
    );
    match config.sink.rest() {
        Some(rest) => println!("- Event Sink: {}", rest.endpoint()),
        None => println!("- Event Sink: not configured"),
    }
    println!();

    println!("Event Types:");
    for event_type in EventType::ALL {
        println!("- {:<14} {:?}", event_type.as_str(), event_type.family());
    }
    Ok(())
}
