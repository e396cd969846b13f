//! One-shot agent runner: configure the research persona, run a single query
//! through the hosted tool-calling layer, print the answer.

use anyhow::Result;
use recherche_core::{AgentConfig, AgentDefinition, OpenAiClient, run_agent};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,recherche_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    // Vendor tooling spawned from this process keys off this flag; nothing in
    // the runner itself reads it back.
    unsafe {
        std::env::set_var("OPENAI_AGENTS_DISABLE_TRACING", "1");
    }

    // Missing credentials abort here, before any network call.
    let config = AgentConfig::from_env()?;
    let client = OpenAiClient::new(config.api_key.clone())?;

    let agent = AgentDefinition::research_agent(config.model.clone(), &config.mcp_server_url);
    info!(agent = %agent.name, model = %agent.model, mcp_server_url = %config.mcp_server_url, "agent configured");

    let output = run_agent(&client, &agent, &config.demo_query).await?;

    println!("# Ergebnis");
    println!("{output}");

    Ok(())
}
