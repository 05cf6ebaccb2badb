//! Player lookup command implementation

use super::resolve_config;
use crate::{
    cli::{types::SourcePlayerId, ScrapeArgs},
    pipeline::Ingestor,
    storage::MatchDatabase,
    Result,
};

/// Handle the player command
pub async fn handle_player(id: SourcePlayerId, as_json: bool) -> Result<()> {
    let config = resolve_config(&ScrapeArgs::default())?;
    // Profile lookups never write, so an in-memory store is enough
    let ingestor = Ingestor::with_database(config, MatchDatabase::new_in_memory()?)?;
    // tarpaulin::skip - HTTP call, tested via integration tests
    let profile = ingestor.fetch_player_profile(id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("{} (id {})", profile.name, profile.source_id);
    if let Some(team) = &profile.team {
        println!("  club:    {}", team);
    }
    println!("  country: {}", profile.country);
    println!("  born:    {}", profile.birth_date);
    Ok(())
}
