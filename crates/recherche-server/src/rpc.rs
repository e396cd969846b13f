//! JSON-RPC 2.0 framing and the MCP method surface.
//!
//! The server speaks the SSE flavour of the protocol: requests arrive via
//! `POST /message`, responses leave through the session's event stream.

use recherche_core::DeepResearch;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "recherche-server";

pub const TOOL_NAME: &str = "deep_research";
const TOOL_DESCRIPTION: &str = "Run OpenAI Deep Research with web search";

const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcResponse {
    fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

fn tool_listing() -> Value {
    json!({
        "tools": [{
            "name": TOOL_NAME,
            "description": TOOL_DESCRIPTION,
            "inputSchema": {
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            }
        }]
    })
}

/// Handle one inbound JSON-RPC message. Notifications (and requests without
/// an id) produce no response.
pub async fn dispatch(research: &DeepResearch, request: RpcRequest) -> Option<RpcResponse> {
    if request.method.starts_with("notifications/") {
        return None;
    }
    let id = request.id?;

    let response = match request.method.as_str() {
        "initialize" => RpcResponse::result(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),
        "ping" => RpcResponse::result(id, json!({})),
        "tools/list" => RpcResponse::result(id, tool_listing()),
        "tools/call" => call_tool(research, id, request.params).await,
        other => {
            warn!(method = other, "unknown rpc method");
            RpcResponse::error(id, METHOD_NOT_FOUND, format!("unknown method: {other}"))
        }
    };

    Some(response)
}

async fn call_tool(research: &DeepResearch, id: Value, params: Value) -> RpcResponse {
    let name = params.get("name").and_then(Value::as_str).unwrap_or("");
    if name != TOOL_NAME {
        return RpcResponse::error(id, INVALID_PARAMS, format!("unknown tool: {name}"));
    }

    let query = params
        .pointer("/arguments/query")
        .and_then(Value::as_str)
        .unwrap_or("");

    info!(tool = TOOL_NAME, "tool invocation received");

    match research.run(query).await {
        Ok(result) => {
            let text = serde_json::to_string(&result)
                .unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"));
            RpcResponse::result(
                id,
                json!({
                    "content": [{ "type": "text", "text": text }],
                    "isError": false
                }),
            )
        }
        Err(err) => {
            warn!(error = %err, "deep research call failed");
            RpcResponse::error(id, INTERNAL_ERROR, err.to_string())
        }
    }
}
