//! Recording stand-in for the upstream Responses API, used by unit and
//! HTTP-level tests to assert call counts and request shapes.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{RechercheError, ResponsesApi, ResponsesReply, ResponsesRequest};

#[derive(Default)]
pub struct RecordingApi {
    requests: Mutex<Vec<ResponsesRequest>>,
    reply: Option<ResponsesReply>,
    failure: Option<(u16, String)>,
}

impl RecordingApi {
    pub fn with_reply(reply: ResponsesReply) -> Self {
        Self {
            reply: Some(reply),
            ..Self::default()
        }
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            failure: Some((status, body.into())),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("request log poisoned").len()
    }

    pub fn last_request(&self) -> Option<ResponsesRequest> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .last()
            .cloned()
    }
}

#[async_trait]
impl ResponsesApi for RecordingApi {
    async fn create(&self, request: ResponsesRequest) -> Result<ResponsesReply, RechercheError> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request);

        if let Some((status, body)) = &self.failure {
            return Err(RechercheError::upstream(*status, body.clone()));
        }

        Ok(self.reply.clone().unwrap_or_default())
    }
}
