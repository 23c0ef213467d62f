//! `greenmow chat` — Send a single message from the terminal.

use crate::bootstrap;
use greenmow_agent::TurnRequest;
use greenmow_config::AppConfig;

pub async fn run(
    message: String,
    rag: bool,
    top_k: usize,
    session: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let state = bootstrap::build_state(&config).await?;

    let result = state
        .engine
        .run_turn(TurnRequest {
            message,
            use_retrieval: rag,
            top_k,
            session_id: session,
        })
        .await?;

    println!("{}", result.reply);
    if !result.sources.is_empty() {
        println!();
        println!("Sources:");
        for source in &result.sources {
            println!("  - {source}");
        }
    }
    println!();
    println!("(session: {}, lang: {})", result.session_id, result.language);

    Ok(())
}
