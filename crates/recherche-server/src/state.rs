use std::sync::Arc;

use dashmap::DashMap;
use recherche_core::DeepResearch;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

const SESSION_CHANNEL_CAPACITY: usize = 32;

/// Shared server state: the research service plus the live SSE sessions.
///
/// Each session maps its id to the sender half of the channel backing the SSE
/// stream; the channel carries serialized JSON-RPC payloads. Invocations
/// share no other mutable state.
#[derive(Clone)]
pub struct AppState {
    research: Arc<DeepResearch>,
    sessions: Arc<DashMap<Uuid, mpsc::Sender<String>>>,
}

impl AppState {
    pub fn new(research: DeepResearch) -> Self {
        Self {
            research: Arc::new(research),
            sessions: Arc::new(DashMap::new()),
        }
    }

    pub fn research(&self) -> Arc<DeepResearch> {
        self.research.clone()
    }

    /// Register a fresh session and hand back the receiver the SSE stream
    /// drains.
    pub fn open_session(&self) -> (Uuid, mpsc::Receiver<String>) {
        let session_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
        self.sessions.insert(session_id, tx);
        debug!(%session_id, "sse session opened");
        (session_id, rx)
    }

    pub fn session_exists(&self, session_id: &Uuid) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Deliver one payload to a session's SSE stream. A session whose
    /// receiver is gone is dropped from the registry.
    pub async fn deliver(&self, session_id: &Uuid, payload: String) -> bool {
        let sender = match self.sessions.get(session_id) {
            Some(entry) => entry.value().clone(),
            None => return false,
        };

        if sender.send(payload).await.is_err() {
            self.sessions.remove(session_id);
            debug!(%session_id, "sse session dropped, receiver gone");
            return false;
        }
        true
    }
}
