use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{ConversationSession, ConversationTurn};

/// In-process conversation store.
///
/// Uses Arc<Mutex<>> pattern for safe concurrent access across handlers.
/// Sessions are keyed by a v4 UUID handed out at creation time.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, ConversationSession>>>,
    max_turns: usize,
}

impl SessionStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_turns,
        }
    }

    /// Create a session with an optional pinned context string.
    pub fn create(&self, context: Option<String>) -> ConversationSession {
        let session = ConversationSession::new(Uuid::new_v4().to_string(), context);
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Fetch a session and mark it active.
    pub fn get(&self, id: &str) -> Option<ConversationSession> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.get_mut(id).map(|session| {
            session.touch();
            session.clone()
        })
    }

    /// Fetch a session's turns, oldest first, and mark it active.
    pub fn history(&self, id: &str) -> Option<Vec<ConversationTurn>> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.get_mut(id).map(|session| {
            session.touch();
            session.turns.clone()
        })
    }

    /// Append a turn, enforcing the per-session turn cap.
    ///
    /// Returns false when the session does not exist.
    pub fn append_turn(&self, id: &str, turn: ConversationTurn) -> bool {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(id) {
            Some(session) => {
                session.push_turn(turn, self.max_turns);
                true
            }
            None => false,
        }
    }

    /// Drop sessions idle for longer than `ttl` as of `now`.
    ///
    /// Returns the number of sessions removed.
    pub fn remove_idle(&self, ttl: Duration, now: DateTime<Utc>) -> u64 {
        let cutoff = now - ttl;
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| session.last_active_at >= cutoff);
        (before - sessions.len()) as u64
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().unwrap().is_empty()
    }
}

/// Periodic eviction of idle sessions
#[derive(Clone)]
pub struct SessionSweeper {
    store: SessionStore,
    ttl_secs: u64,
    interval_secs: u64,
}

impl SessionSweeper {
    pub fn new(store: SessionStore, ttl_secs: u64, interval_secs: u64) -> Self {
        Self {
            store,
            ttl_secs,
            interval_secs,
        }
    }

    /// Run a single sweep pass
    ///
    /// Removes every session whose last activity is older than the TTL.
    /// Returns the number of sessions removed.
    pub fn run_once(&self) -> u64 {
        let before = self.store.len();

        if before == 0 {
            debug!("No sessions to sweep");
            return 0;
        }

        let removed = self
            .store
            .remove_idle(Duration::seconds(self.ttl_secs as i64), Utc::now());

        if removed > 0 {
            info!(
                "Session sweep complete: {} removed, {} remaining",
                removed,
                before as u64 - removed
            );
        } else {
            debug!("Session sweep complete: nothing idle out of {}", before);
        }

        removed
    }

    /// Get the configured interval in seconds
    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }
}
