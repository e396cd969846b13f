//! Shared building blocks for the Recherche demo.
//!
//! This crate holds the OpenAI Responses client, the `deep_research`
//! operation exposed by the tool server, and the agent definition used by the
//! one-shot runner. Both binaries construct their configuration once at
//! startup from the process environment and pass it down explicitly.

mod agent;
mod config;
mod error;
mod openai;
mod research;
mod secret;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use agent::{AgentDefinition, DEFAULT_DEMO_QUERY, RESEARCH_INSTRUCTIONS, run_agent};
pub use config::{AgentConfig, DEFAULT_MODEL, ServerConfig};
pub use error::RechercheError;
pub use openai::{
    ContentPart, InputItem, OpenAiClient, Reasoning, ResponsesApi, ResponsesReply,
    ResponsesRequest, ToolSpec,
};
pub use research::{DeepResearch, EMPTY_QUERY_ANSWER, ResearchResult};
pub use secret::SecretValue;
