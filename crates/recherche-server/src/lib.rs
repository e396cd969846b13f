//! MCP tool server exposing a single `deep_research` operation over the SSE
//! transport.
//!
//! Any caller that can reach the listening address may invoke the tool; the
//! inbound side is deliberately unauthenticated in this demo.

pub mod error;
pub mod routes;
pub mod rpc;
pub mod state;
