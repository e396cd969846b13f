use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{RechercheError, ResponsesApi, ResponsesRequest, ToolSpec};

/// Placeholder answer returned for blank queries without touching upstream.
pub const EMPTY_QUERY_ANSWER: &str = "Leere Anfrage.";

/// Record passed back verbatim from the upstream response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub answer: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
}

impl ResearchResult {
    fn empty_query() -> Self {
        Self {
            answer: Value::String(EMPTY_QUERY_ANSWER.to_string()),
            run_id: None,
            usage: None,
        }
    }
}

/// The single operation exposed by the tool server: one deep-research turn
/// with web search enabled.
pub struct DeepResearch {
    api: Arc<dyn ResponsesApi>,
    model: String,
}

impl DeepResearch {
    pub fn new(api: Arc<dyn ResponsesApi>, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[instrument(name = "deep_research", skip(self, query))]
    pub async fn run(&self, query: &str) -> Result<ResearchResult, RechercheError> {
        if query.trim().is_empty() {
            return Ok(ResearchResult::empty_query());
        }

        info!(model = %self.model, "starting deep research");

        let request = ResponsesRequest::for_query(&self.model, query)
            .with_tools(vec![ToolSpec::web_search()]);
        let reply = self.api.create(request).await?;

        Ok(ResearchResult {
            answer: reply.preferred_output(),
            run_id: reply.id,
            usage: reply.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ResponsesReply, testing::RecordingApi};
    use serde_json::json;

    fn service(api: Arc<RecordingApi>) -> DeepResearch {
        DeepResearch::new(api, "o3-deep-research-2025-06-26")
    }

    #[tokio::test]
    async fn blank_query_short_circuits_without_upstream_call() {
        for query in ["", "   ", "\n\t"] {
            let api = Arc::new(RecordingApi::default());
            let result = service(api.clone()).run(query).await.expect("should succeed");

            assert_eq!(result.answer, json!(EMPTY_QUERY_ANSWER));
            assert_eq!(result.run_id, None);
            assert_eq!(result.usage, None);
            assert_eq!(api.call_count(), 0, "blank query must not reach upstream");
        }
    }

    #[tokio::test]
    async fn blank_query_serializes_to_answer_only() {
        let api = Arc::new(RecordingApi::default());
        let result = service(api).run("").await.expect("should succeed");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "answer": "Leere Anfrage." })
        );
    }

    #[tokio::test]
    async fn non_blank_query_makes_exactly_one_call_with_web_search() {
        let api = Arc::new(RecordingApi::with_reply(ResponsesReply {
            id: Some("run_1".to_string()),
            output_text: Some("4".to_string()),
            output: None,
            usage: Some(json!({ "tokens": 10 })),
        }));

        let result = service(api.clone())
            .run("What is 2+2?")
            .await
            .expect("should succeed");

        assert_eq!(api.call_count(), 1);
        let request = api.last_request().expect("request should be recorded");
        assert_eq!(request.model, "o3-deep-research-2025-06-26");
        let tools = serde_json::to_value(&request.tools).unwrap();
        assert_eq!(tools, json!([{ "type": "web_search_preview" }]));

        assert_eq!(result.answer, json!("4"));
        assert_eq!(result.run_id.as_deref(), Some("run_1"));
        assert_eq!(result.usage, Some(json!({ "tokens": 10 })));
    }

    #[tokio::test]
    async fn raw_output_used_when_output_text_missing() {
        let api = Arc::new(RecordingApi::with_reply(ResponsesReply {
            id: Some("run_2".to_string()),
            output_text: None,
            output: Some(json!([{ "type": "message", "text": "fallback" }])),
            usage: None,
        }));

        let result = service(api).run("anything").await.expect("should succeed");
        assert_eq!(
            result.answer,
            json!([{ "type": "message", "text": "fallback" }])
        );
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let api = Arc::new(RecordingApi::failing(502, "bad gateway"));
        let err = service(api).run("anything").await.unwrap_err();
        assert!(matches!(
            err,
            RechercheError::Upstream { status: 502, .. }
        ));
    }
}
