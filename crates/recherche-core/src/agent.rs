//! Research agent persona and one-shot run helper.
//!
//! Tool selection is delegated entirely to the hosted model: this code only
//! declares the persona and its two capabilities and forwards a single query.

use serde_json::{Value, json};
use tracing::info;

use crate::{RechercheError, ResponsesApi, ResponsesRequest, ToolSpec};

/// Fixed guidance for the research persona: web search first, then the
/// internal lookup pair, sources cited inline.
pub const RESEARCH_INSTRUCTIONS: &str = "Du bist ein gründlicher Researcher. Nutze zuerst \
    Websuche, dann hole interne Dateien über das MCP-Fetch/Search-Paar. Zitiere Quellen inline.";

/// Query used when `DEMO_QUERY` is not set.
pub const DEFAULT_DEMO_QUERY: &str =
    "Fasse die neuesten Trends zum 'semaglutide' Markt zusammen und nenne Zahlen.";

const AGENT_NAME: &str = "Research Agent";
const MCP_SERVER_LABEL: &str = "internal_file_lookup";

/// An agent persona: a name, a model, fixed instructions, and the callable
/// capabilities the hosted runtime may pick from.
#[derive(Debug, Clone)]
pub struct AgentDefinition {
    pub name: String,
    pub model: String,
    pub instructions: String,
    pub tools: Vec<ToolSpec>,
}

impl AgentDefinition {
    /// The demo persona: open web search plus the tool server reachable at
    /// `mcp_server_url`, with approval gating disabled.
    pub fn research_agent(model: impl Into<String>, mcp_server_url: &str) -> Self {
        Self {
            name: AGENT_NAME.to_string(),
            model: model.into(),
            instructions: RESEARCH_INSTRUCTIONS.to_string(),
            tools: vec![
                ToolSpec::web_search(),
                ToolSpec::hosted_mcp(MCP_SERVER_LABEL, mcp_server_url),
            ],
        }
    }
}

fn run_metadata() -> Value {
    json!({ "origin": "local-demo" })
}

/// Run one query through the hosted tool-calling layer and return the final
/// output text. Failures propagate untouched; there is no retry layer.
pub async fn run_agent(
    api: &dyn ResponsesApi,
    agent: &AgentDefinition,
    query: &str,
) -> Result<String, RechercheError> {
    info!(agent = %agent.name, model = %agent.model, "running research query");

    let mut request =
        ResponsesRequest::for_query(&agent.model, query).with_tools(agent.tools.clone());
    request.instructions = Some(agent.instructions.clone());
    request.metadata = Some(run_metadata());

    let reply = api.create(request).await?;

    let text = match reply.preferred_output() {
        Value::String(text) => text,
        other => other.to_string(),
    };
    Ok(text)
}
