use std::future::Future;
use std::pin::Pin;

use super::error::RepositoryResult;
use crate::chat::models::Session;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Repository trait for session persistence.
///
/// The full session list is the unit of durable state: it is written after
/// every mutation and read back once at startup. Implementations are keyed by
/// a storage identifier chosen at construction, not by session id.
pub trait SessionRepository: Send + Sync + 'static {
    /// Load the persisted session list. `Ok(None)` means nothing has been
    /// written yet; an error means the stored state exists but is unreadable.
    fn load(&self) -> BoxFuture<'static, RepositoryResult<Option<Vec<Session>>>>;

    /// Durably write the full session list.
    fn save(&self, sessions: Vec<Session>) -> BoxFuture<'static, RepositoryResult<()>>;
}
