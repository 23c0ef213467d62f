//! Shared runtime assembly: config to a ready gateway state.

use greenmow_agent::ChatEngine;
use greenmow_config::AppConfig;
use greenmow_gateway::GatewayState;
use greenmow_kb::KnowledgeBase;
use greenmow_providers::OpenAiCompatProvider;
use greenmow_store::FleetStore;
use std::sync::Arc;
use tracing::info;

/// Build the full engine stack from config: store, tools, knowledge base,
/// provider, sessions. The knowledge base is indexed up front.
pub async fn build_state(config: &AppConfig) -> Result<GatewayState, Box<dyn std::error::Error>> {
    let Some(api_key) = config.api_key.clone() else {
        return Err(
            "No API key configured. Set GREENMOW_API_KEY or api_key in greenmow.toml.".into(),
        );
    };

    let store = Arc::new(
        FleetStore::connect(&config.store.path.to_string_lossy())
            .await
            .map_err(|e| format!("Failed to open fleet store: {e}"))?,
    );

    let kb = Arc::new(KnowledgeBase::new(
        config.kb.dir.clone(),
        config.kb.chunk_size,
        config.kb.overlap,
    ));
    let chunks = kb.reload().await?;
    info!(chunks, "knowledge base ready");

    let provider = Arc::new(OpenAiCompatProvider::new(
        "openai",
        config.api_url.clone(),
        api_key,
    ));

    let engine = Arc::new(ChatEngine::new(
        provider,
        config.model.clone(),
        config.bot_name.clone(),
        greenmow_tools::fleet_registry(store),
        kb.clone(),
        config.sessions.max_sessions,
    ));

    Ok(GatewayState { engine, kb })
}
