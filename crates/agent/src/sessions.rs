//! In-memory session store with capacity-bounded eviction.
//!
//! Sessions are keyed by caller-supplied (or generated) ids. When the
//! store is full, inserting a new session evicts the least recently
//! touched one.

use greenmow_core::{Language, SessionRecord};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::RwLock;

struct SessionEntry {
    record: SessionRecord,
    touched: Instant,
}

/// Capacity-bounded store of per-session conversational state.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Current language for a session, if it exists. Touches the entry.
    pub async fn language(&self, session_id: &str) -> Option<Language> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(session_id)?;
        entry.touched = Instant::now();
        Some(entry.record.language)
    }

    /// Set (or initialize) the language for a session.
    pub async fn set_language(&self, session_id: &str, language: Language) {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(entry) => {
                entry.record.language = language;
                entry.touched = Instant::now();
            }
            None => {
                Self::evict_if_full(&mut sessions, self.max_sessions);
                sessions.insert(
                    session_id.to_string(),
                    SessionEntry {
                        record: SessionRecord::new(language),
                        touched: Instant::now(),
                    },
                );
            }
        }
    }

    /// Last reply stored for a session, if any.
    pub async fn last_reply(&self, session_id: &str) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .map(|e| e.record.last_reply.clone())
            .filter(|r| !r.trim().is_empty())
    }

    /// Record the reply just produced for a session.
    pub async fn set_last_reply(&self, session_id: &str, reply: &str) {
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(session_id) {
            entry.record.last_reply = reply.to_string();
            entry.touched = Instant::now();
        }
    }

    /// Returns true the first time for a session, false afterwards.
    /// Used to fire the one-time self-identification correction.
    pub async fn claim_name_correction(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(entry) if !entry.record.name_corrected => {
                entry.record.name_corrected = true;
                entry.touched = Instant::now();
                true
            }
            _ => false,
        }
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn evict_if_full(sessions: &mut HashMap<String, SessionEntry>, max: usize) {
        while sessions.len() >= max {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, e)| e.touched)
                .map(|(id, _)| id.clone())
            else {
                return;
            };
            tracing::debug!(session_id = %oldest, "evicting least recently used session");
            sessions.remove(&oldest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_session_via_set_language() {
        let store = SessionStore::new(10);
        assert!(store.language("s1").await.is_none());

        store.set_language("s1", Language::De).await;
        assert_eq!(store.language("s1").await, Some(Language::De));

        store.set_language("s1", Language::En).await;
        assert_eq!(store.language("s1").await, Some(Language::En));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn last_reply_ignores_blank() {
        let store = SessionStore::new(10);
        store.set_language("s1", Language::En).await;
        assert!(store.last_reply("s1").await.is_none());

        store.set_last_reply("s1", "   ").await;
        assert!(store.last_reply("s1").await.is_none());

        store.set_last_reply("s1", "Hello!").await;
        assert_eq!(store.last_reply("s1").await.as_deref(), Some("Hello!"));
    }

    #[tokio::test]
    async fn name_correction_fires_once() {
        let store = SessionStore::new(10);
        store.set_language("s1", Language::En).await;
        assert!(store.claim_name_correction("s1").await);
        assert!(!store.claim_name_correction("s1").await);
        // unknown session never fires
        assert!(!store.claim_name_correction("ghost").await);
    }

    #[tokio::test]
    async fn full_store_evicts_least_recently_touched() {
        let store = SessionStore::new(2);
        store.set_language("a", Language::En).await;
        store.set_language("b", Language::De).await;

        // touch "a" so "b" is the eviction candidate
        store.language("a").await;

        store.set_language("c", Language::En).await;
        assert_eq!(store.len().await, 2);
        assert!(store.language("b").await.is_none());
        assert!(store.language("a").await.is_some());
        assert!(store.language("c").await.is_some());
    }
}
