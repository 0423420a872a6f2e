use super::message::Message;
use super::session::Session;

/// Owns the full set of sessions and the active-session pointer.
///
/// Invariants enforced here: at least one session always exists, and the
/// active pointer always names a session in the list. New sessions are
/// prepended so the most recent one appears first.
pub struct SessionStore {
    sessions: Vec<Session>,
    active_id: String,
}

impl SessionStore {
    /// Fresh store with a single default session.
    pub fn new() -> Self {
        let session = Session::new();
        let active_id = session.id.clone();
        Self {
            sessions: vec![session],
            active_id,
        }
    }

    /// Rebuild a store from persisted sessions, repairing an empty list or a
    /// dangling active pointer.
    pub fn from_persisted(sessions: Vec<Session>) -> Self {
        if sessions.is_empty() {
            return Self::new();
        }
        let active_id = sessions[0].id.clone();
        Self {
            sessions,
            active_id,
        }
    }

    /// Insert a fresh session at the front of the list and make it active.
    /// Returns the new session id.
    pub fn create(&mut self) -> String {
        let session = Session::new();
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.active_id = id.clone();
        id
    }

    /// Remove a session. When the list would become empty a fresh default
    /// session is created; when the removed session was active the first
    /// remaining session (list order) becomes active.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        let removed = self.sessions.len() != before;

        if self.sessions.is_empty() {
            self.create();
        } else if self.active_id == id {
            self.active_id = self.sessions[0].id.clone();
        }

        removed
    }

    /// Set the active pointer. Unknown ids are a silent no-op.
    pub fn select(&mut self, id: &str) -> bool {
        if self.sessions.iter().any(|s| s.id == id) {
            self.active_id = id.to_string();
            true
        } else {
            tracing::debug!(session_id = %id, "Ignoring select for unknown session");
            false
        }
    }

    /// Append one or more messages to the named session. Returns false when
    /// the session no longer exists (e.g. deleted while a reply was in flight).
    pub fn append_messages(&mut self, id: &str, messages: Vec<Message>) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.append_messages(messages);
                true
            }
            None => {
                tracing::warn!(session_id = %id, "Dropping messages for missing session");
                false
            }
        }
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_has_one_active_session() {
        let store = SessionStore::new();
        assert_eq!(store.count(), 1);
        assert_eq!(store.active_id(), store.sessions()[0].id);
    }

    #[test]
    fn test_create_prepends_and_activates() {
        let mut store = SessionStore::new();
        let first = store.active_id().to_string();
        let second = store.create();

        assert_eq!(store.count(), 2);
        assert_eq!(store.sessions()[0].id, second);
        assert_eq!(store.sessions()[1].id, first);
        assert_eq!(store.active_id(), second);
    }

    #[test]
    fn test_remove_last_session_recreates_default() {
        let mut store = SessionStore::new();
        let id = store.active_id().to_string();

        assert!(store.remove(&id));
        assert_eq!(store.count(), 1);
        assert_ne!(store.active_id(), id);
    }

    #[test]
    fn test_remove_every_session_never_empties_store() {
        let mut store = SessionStore::new();
        store.create();
        store.create();

        let ids: Vec<String> = store.sessions().iter().map(|s| s.id.clone()).collect();
        for id in ids {
            store.remove(&id);
            assert!(store.count() >= 1);
        }
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_remove_active_falls_back_to_first_remaining() {
        let mut store = SessionStore::new();
        let older = store.active_id().to_string();
        let newer = store.create();

        assert!(store.remove(&newer));
        assert_eq!(store.active_id(), older);
    }

    #[test]
    fn test_remove_inactive_keeps_active_pointer() {
        let mut store = SessionStore::new();
        let older = store.active_id().to_string();
        let newer = store.create();

        assert!(store.remove(&older));
        assert_eq!(store.active_id(), newer);
    }

    #[test]
    fn test_select_unknown_id_is_noop() {
        let mut store = SessionStore::new();
        let active = store.active_id().to_string();

        assert!(!store.select("no-such-session"));
        assert_eq!(store.active_id(), active);
    }

    #[test]
    fn test_from_persisted_repairs_empty_list() {
        let store = SessionStore::from_persisted(Vec::new());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_from_persisted_activates_first_session() {
        let a = Session::new();
        let b = Session::new();
        let first_id = a.id.clone();

        let store = SessionStore::from_persisted(vec![a, b]);
        assert_eq!(store.active_id(), first_id);
    }
}
