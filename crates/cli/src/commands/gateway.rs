//! `greenmow gateway` — Start the HTTP API server.

use crate::bootstrap;
use greenmow_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("GreenMow Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model: {}", config.model);
    println!("   Knowledge base: {}", config.kb.dir.display());

    let state = bootstrap::build_state(&config).await?;
    greenmow_gateway::start(state, &config.gateway.host, config.gateway.port).await?;

    Ok(())
}
