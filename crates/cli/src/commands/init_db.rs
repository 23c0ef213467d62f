//! `greenmow init-db` — Create the fleet database and seed demo data.

use greenmow_config::AppConfig;
use greenmow_store::FleetStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let store = FleetStore::connect(&config.store.path.to_string_lossy())
        .await
        .map_err(|e| format!("Failed to open fleet store: {e}"))?;
    store.seed_demo_data().await?;

    let mowers = store.list_mowers(None).await?;
    println!("Database ready at {}", config.store.path.display());
    println!("{} mowers seeded:", mowers.len());
    for mower in &mowers {
        println!(
            "  {}  {:<16} {:<12} {}",
            mower.id,
            mower.model,
            mower.status.as_str(),
            mower.site
        );
    }

    Ok(())
}
