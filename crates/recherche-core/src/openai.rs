//! Minimal client for the OpenAI Responses API.
//!
//! Only the request surface this demo needs is modeled: role-tagged text
//! input, a reasoning-summary flag, and the tool-capability list. Everything
//! in the reply beyond `output_text` / `output` / `id` / `usage` is ignored
//! and passed through untouched.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{RechercheError, SecretValue};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Whole-call timeout matching the originals' 600-second client setting.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ResponsesRequest {
    /// Single user-message request with an automatic reasoning summary.
    pub fn for_query(model: impl Into<String>, query: &str) -> Self {
        Self {
            model: model.into(),
            input: vec![InputItem::user_text(query)],
            instructions: None,
            reasoning: Some(Reasoning::auto_summary()),
            tools: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InputItem {
    pub role: String,
    pub content: Vec<ContentPart>,
}

impl InputItem {
    pub fn user_text(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: vec![ContentPart::input_text(text)],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    InputText { text: String },
}

impl ContentPart {
    pub fn input_text(text: &str) -> Self {
        Self::InputText {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Reasoning {
    pub summary: String,
}

impl Reasoning {
    pub fn auto_summary() -> Self {
        Self {
            summary: "auto".to_string(),
        }
    }
}

/// Tool capabilities the hosted model may invoke during a run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolSpec {
    WebSearchPreview,
    Mcp {
        server_label: String,
        server_url: String,
        require_approval: String,
    },
}

impl ToolSpec {
    pub fn web_search() -> Self {
        Self::WebSearchPreview
    }

    /// Hosted MCP reference with approval gating disabled.
    pub fn hosted_mcp(label: &str, server_url: &str) -> Self {
        Self::Mcp {
            server_label: label.to_string(),
            server_url: server_url.to_string(),
            require_approval: "never".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsesReply {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub usage: Option<Value>,
}

impl ResponsesReply {
    /// Ordered answer preference: `output_text`, else raw `output`, else an
    /// empty string.
    pub fn preferred_output(&self) -> Value {
        if let Some(text) = &self.output_text {
            return Value::String(text.clone());
        }
        if let Some(raw) = &self.output {
            return raw.clone();
        }
        Value::String(String::new())
    }
}

/// Seam between the demo and the vendor-hosted reasoning endpoint.
#[async_trait]
pub trait ResponsesApi: Send + Sync {
    async fn create(&self, request: ResponsesRequest) -> Result<ResponsesReply, RechercheError>;
}

/// Reqwest-backed live client with bearer authentication.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretValue,
}

impl OpenAiClient {
    pub fn new(api_key: SecretValue) -> Result<Self, RechercheError> {
        let http = reqwest::Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: OPENAI_API_BASE.to_string(),
            api_key,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ResponsesApi for OpenAiClient {
    async fn create(&self, request: ResponsesRequest) -> Result<ResponsesReply, RechercheError> {
        let url = format!("{}/responses", self.base_url);
        debug!(model = %request.model, tools = request.tools.len(), "dispatching responses call");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RechercheError::upstream(status.as_u16(), body));
        }

        Ok(response.json::<ResponsesReply>().await?)
    }
}
