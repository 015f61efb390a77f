use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

use crate::models::quiz_session::QuizSession;
use crate::utils::token::generate_session_id;

/// Everything the server remembers about one browser session.
#[derive(Debug, Default)]
pub struct SessionData {
    pub detected_languages: Vec<String>,
    pub quiz: Option<QuizSession>,
}

/// Handle to one session. Holding the lock serialises that session's operations.
pub type SessionHandle = Arc<Mutex<SessionData>>;

#[derive(Debug)]
struct SessionEntry {
    data: SessionHandle,
    last_seen: Instant,
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

/// Result of resolving a request's session id.
#[derive(Clone, Debug)]
pub struct ResolvedSession {
    pub id: String,
    pub handle: SessionHandle,
    pub created: bool,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Looks up a live session or creates a new one when the id is absent, unknown or expired.
    pub async fn get_or_create(&self, id: Option<&str>) -> ResolvedSession {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if let Some(id) = id {
            if let Some(entry) = entries.get_mut(id) {
                if now.duration_since(entry.last_seen) < self.ttl {
                    entry.last_seen = now;
                    return ResolvedSession {
                        id: id.to_string(),
                        handle: entry.data.clone(),
                        created: false,
                    };
                }
                entries.remove(id);
            }
        }

        let ttl = self.ttl;
        entries.retain(|_, e| now.duration_since(e.last_seen) < ttl);

        let id = generate_session_id();
        let handle: SessionHandle = Arc::new(Mutex::new(SessionData::default()));
        entries.insert(
            id.clone(),
            SessionEntry {
                data: handle.clone(),
                last_seen: now,
            },
        );
        tracing::debug!(sessions = entries.len(), "Session created");
        ResolvedSession {
            id,
            handle,
            created: true,
        }
    }

    /// Drops sessions idle for longer than the TTL; returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| now.duration_since(e.last_seen) < ttl);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
