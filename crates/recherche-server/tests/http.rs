use std::sync::Arc;

use axum_test::TestServer;
use recherche_core::{DeepResearch, ResponsesReply, testing::RecordingApi};
use recherche_server::{routes::build_router, state::AppState};
use serde_json::{Value, json};
use tokio::time::{Duration, timeout};
use uuid::Uuid;

fn state_with(api: Arc<RecordingApi>) -> AppState {
    AppState::new(DeepResearch::new(api, "o3-deep-research-2025-06-26"))
}

#[tokio::test]
async fn root_reports_status_and_tool() {
    let server = TestServer::new(build_router(state_with(Arc::new(RecordingApi::default()))))
        .expect("server should start");

    let response = server.get("/").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({ "status": "ok", "tools": ["deep_research"], "transport": "sse" })
    );
}

#[tokio::test]
async fn message_for_unknown_session_is_rejected() {
    let server = TestServer::new(build_router(state_with(Arc::new(RecordingApi::default()))))
        .expect("server should start");

    let response = server
        .post("/message")
        .add_query_param("session_id", Uuid::new_v4().to_string())
        .json(&json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }))
        .await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>(), json!({ "error": "unknown session" }));
}

#[tokio::test]
async fn tools_list_response_arrives_on_session_stream() {
    let state = state_with(Arc::new(RecordingApi::default()));
    let (session_id, mut receiver) = state.open_session();
    let server = TestServer::new(build_router(state)).expect("server should start");

    let response = server
        .post("/message")
        .add_query_param("session_id", session_id.to_string())
        .json(&json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }))
        .await;
    assert_eq!(response.status_code(), 202);

    let payload = timeout(Duration::from_secs(1), receiver.recv())
        .await
        .expect("delivery should not time out")
        .expect("stream should stay open");
    let rpc: Value = serde_json::from_str(&payload).expect("payload should be JSON-RPC");
    assert_eq!(rpc["id"], 1);
    assert_eq!(rpc["result"]["tools"][0]["name"], "deep_research");
}

#[tokio::test]
async fn blank_tool_call_short_circuits_over_http() {
    let api = Arc::new(RecordingApi::default());
    let state = state_with(api.clone());
    let (session_id, mut receiver) = state.open_session();
    let server = TestServer::new(build_router(state)).expect("server should start");

    let response = server
        .post("/message")
        .add_query_param("session_id", session_id.to_string())
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": { "name": "deep_research", "arguments": { "query": "" } }
        }))
        .await;
    assert_eq!(response.status_code(), 202);

    let payload = timeout(Duration::from_secs(1), receiver.recv())
        .await
        .expect("delivery should not time out")
        .expect("stream should stay open");
    let rpc: Value = serde_json::from_str(&payload).expect("payload should be JSON-RPC");
    let text = rpc["result"]["content"][0]["text"].as_str().unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(text).unwrap(),
        json!({ "answer": "Leere Anfrage." })
    );
    assert_eq!(api.call_count(), 0, "blank query must not reach upstream");
}

#[tokio::test]
async fn tool_call_round_trips_mocked_answer() {
    let api = Arc::new(RecordingApi::with_reply(ResponsesReply {
        id: Some("run_1".to_string()),
        output_text: Some("4".to_string()),
        output: None,
        usage: Some(json!({ "tokens": 10 })),
    }));
    let state = state_with(api.clone());
    let (session_id, mut receiver) = state.open_session();
    let server = TestServer::new(build_router(state)).expect("server should start");

    let response = server
        .post("/message")
        .add_query_param("session_id", session_id.to_string())
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "deep_research", "arguments": { "query": "What is 2+2?" } }
        }))
        .await;
    assert_eq!(response.status_code(), 202);

    let payload = timeout(Duration::from_secs(1), receiver.recv())
        .await
        .expect("delivery should not time out")
        .expect("stream should stay open");
    let rpc: Value = serde_json::from_str(&payload).expect("payload should be JSON-RPC");
    let text = rpc["result"]["content"][0]["text"].as_str().unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(text).unwrap(),
        json!({ "answer": "4", "run_id": "run_1", "usage": { "tokens": 10 } })
    );
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn notification_produces_no_stream_traffic() {
    let state = state_with(Arc::new(RecordingApi::default()));
    let (session_id, mut receiver) = state.open_session();
    let server = TestServer::new(build_router(state)).expect("server should start");

    let response = server
        .post("/message")
        .add_query_param("session_id", session_id.to_string())
        .json(&json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
        .await;
    assert_eq!(response.status_code(), 202);

    let outcome = timeout(Duration::from_millis(100), receiver.recv()).await;
    assert!(outcome.is_err(), "notifications must not emit a response");
}
