use std::sync::Arc;

use parking_lot::Mutex;

use super::error::RepositoryResult;
use super::session_repository::{BoxFuture, SessionRepository};
use crate::chat::models::Session;

/// In-memory repository for sessions.
/// Useful for testing and development.
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    state: Arc<Mutex<Option<Vec<Session>>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the last saved session list, if any.
    pub fn stored(&self) -> Option<Vec<Session>> {
        self.state.lock().clone()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn load(&self) -> BoxFuture<'static, RepositoryResult<Option<Vec<Session>>>> {
        let state = self.state.clone();
        Box::pin(async move { Ok(state.lock().clone()) })
    }

    fn save(&self, sessions: Vec<Session>) -> BoxFuture<'static, RepositoryResult<()>> {
        let state = self.state.clone();
        Box::pin(async move {
            *state.lock() = Some(sessions);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_before_save_is_none() {
        let repo = InMemorySessionRepository::new();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let repo = InMemorySessionRepository::new();
        let sessions = vec![Session::new()];

        repo.save(sessions.clone()).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, sessions[0].id);
    }

    #[tokio::test]
    async fn test_save_replaces_state() {
        let repo = InMemorySessionRepository::new();
        repo.save(vec![Session::new(), Session::new()]).await.unwrap();
        repo.save(vec![]).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert!(loaded.is_empty());
    }
}
