use std::path::PathBuf;

use super::error::{RepositoryError, RepositoryResult};
use super::session_repository::{BoxFuture, SessionRepository};
use crate::chat::models::Session;

/// JSON file-based repository for sessions.
/// Stores the whole session list as one document at
/// `<config_dir>/kalai/<storage_key>.json`.
pub struct JsonSessionRepository {
    path: PathBuf,
}

impl JsonSessionRepository {
    pub fn new(storage_key: &str) -> RepositoryResult<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| RepositoryError::InitializationError {
                message: "Could not determine config directory".to_string(),
            })?
            .join("kalai");

        Ok(Self::with_dir(dir, storage_key))
    }

    /// Repository rooted at an explicit directory. Used by tests.
    pub fn with_dir(dir: PathBuf, storage_key: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", storage_key)),
        }
    }
}

impl SessionRepository for JsonSessionRepository {
    fn load(&self) -> BoxFuture<'static, RepositoryResult<Option<Vec<Session>>>> {
        let path = self.path.clone();

        Box::pin(async move {
            if !tokio::fs::try_exists(&path).await? {
                return Ok(None);
            }

            let content = tokio::fs::read_to_string(&path).await?;
            let sessions: Vec<Session> = serde_json::from_str(&content)?;
            Ok(Some(sessions))
        })
    }

    fn save(&self, sessions: Vec<Session>) -> BoxFuture<'static, RepositoryResult<()>> {
        let path = self.path.clone();

        Box::pin(async move {
            if let Some(dir) = path.parent() {
                tokio::fs::create_dir_all(dir).await?;
            }

            let json = serde_json::to_string_pretty(&sessions)?;

            // Write atomically (write to temp, then rename)
            let temp_path = path.with_extension("json.tmp");
            tokio::fs::write(&temp_path, json).await?;
            tokio::fs::rename(&temp_path, &path).await?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::models::{Attachment, Message};

    #[tokio::test]
    async fn test_load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonSessionRepository::with_dir(dir.path().to_path_buf(), "sessions");

        let loaded = repo.load().await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonSessionRepository::with_dir(dir.path().to_path_buf(), "sessions");

        let mut session = Session::new();
        session.append_messages(vec![Message::user(
            "hello",
            vec![Attachment {
                name: "chart.png".into(),
                mime_type: "image/png".into(),
                data: "AAAA".into(),
                preview: Some("data:image/png;base64,AAAA".into()),
            }],
        )]);
        let sessions = vec![session.clone(), Session::new()];

        repo.save(sessions.clone()).await.unwrap();
        let loaded = repo.load().await.unwrap().unwrap();

        assert_eq!(loaded, sessions);
        assert_eq!(loaded[0].messages[1].attachments[0].name, "chart.png");
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonSessionRepository::with_dir(dir.path().to_path_buf(), "sessions");

        repo.save(vec![Session::new(), Session::new()]).await.unwrap();
        repo.save(vec![Session::new()]).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonSessionRepository::with_dir(dir.path().to_path_buf(), "sessions");

        tokio::fs::create_dir_all(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join("sessions.json"), "not json")
            .await
            .unwrap();

        assert!(matches!(
            repo.load().await,
            Err(RepositoryError::SerializationError(_))
        ));
    }
}
