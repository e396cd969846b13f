use std::env;

use crate::{RechercheError, SecretValue};

/// Model identifier used when `DEEP_RESEARCH_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "o3-deep-research-2025-06-26";

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const MODEL_ENV: &str = "DEEP_RESEARCH_MODEL";
const HOST_ENV: &str = "MCP_SERVER_HOST";
const PORT_ENV: &str = "PORT";
const MCP_PORT_ENV: &str = "MCP_SERVER_PORT";
const SERVER_URL_ENV: &str = "MCP_SERVER_URL";
const DEMO_QUERY_ENV: &str = "DEMO_QUERY";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SERVER_URL: &str = "http://localhost:8000/sse/";

/// Tool server settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub api_key: SecretValue,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, RechercheError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so tests never touch process
    /// environment state.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, RechercheError> {
        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: resolve_port(&lookup)?,
            model: resolve_model(&lookup),
            api_key: require_key(&lookup)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Agent runner settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub model: String,
    pub mcp_server_url: String,
    pub demo_query: String,
    pub api_key: SecretValue,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, RechercheError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, RechercheError> {
        Ok(Self {
            model: resolve_model(&lookup),
            mcp_server_url: lookup(SERVER_URL_ENV)
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            demo_query: lookup(DEMO_QUERY_ENV)
                .unwrap_or_else(|| crate::DEFAULT_DEMO_QUERY.to_string()),
            api_key: require_key(&lookup)?,
        })
    }
}

fn resolve_model(lookup: &impl Fn(&str) -> Option<String>) -> String {
    lookup(MODEL_ENV)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

// `PORT` wins over `MCP_SERVER_PORT` so hosting platforms that inject it keep
// working.
fn resolve_port(lookup: &impl Fn(&str) -> Option<String>) -> Result<u16, RechercheError> {
    let raw = lookup(PORT_ENV).or_else(|| lookup(MCP_PORT_ENV));
    match raw {
        Some(value) => value.trim().parse::<u16>().map_err(|_| {
            RechercheError::InvalidConfiguration(format!("invalid port value: {value}"))
        }),
        None => Ok(DEFAULT_PORT),
    }
}

fn require_key(lookup: &impl Fn(&str) -> Option<String>) -> Result<SecretValue, RechercheError> {
    match lookup(API_KEY_ENV) {
        Some(value) if !value.trim().is_empty() => Ok(SecretValue::new(value)),
        _ => Err(RechercheError::MissingSecret(API_KEY_ENV.to_string())),
    }
}
