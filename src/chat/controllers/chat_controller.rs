use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::chat::models::{Attachment, Message, Session, SessionStore};
use crate::chat::repositories::SessionRepository;
use crate::chat::services::{
    GenerationService, RequestBuilder, encode_bytes, encode_file, failure_message, interpret,
};

/// Recoverable error events surfaced to the UI collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    AttachmentFailed { name: String, reason: String },
}

/// Read-only state the UI collaborator renders from.
#[derive(Debug, Clone)]
pub struct UiSnapshot {
    pub sessions: Vec<Session>,
    pub current_session_id: String,
    pub pending_text: String,
    pub pending_attachments: Vec<Attachment>,
    pub is_sending: bool,
}

#[derive(Default)]
struct PendingTurn {
    text: String,
    attachments: Vec<Attachment>,
}

/// Orchestrates sessions, the pending turn, and the generation service.
///
/// All collaborators are passed in at construction (no module-level
/// globals), so tests can substitute fakes for both the service and the
/// persistence store.
pub struct ChatController {
    store: Mutex<SessionStore>,
    pending: Arc<Mutex<PendingTurn>>,
    /// Session ids with a generation call in flight. At most one per
    /// session; other sessions may send concurrently.
    in_flight: Mutex<HashSet<String>>,
    events: Arc<Mutex<Vec<ChatEvent>>>,
    repo: Arc<dyn SessionRepository>,
    service: Arc<dyn GenerationService>,
    builder: RequestBuilder,
}

impl ChatController {
    pub fn new(
        service: Arc<dyn GenerationService>,
        repo: Arc<dyn SessionRepository>,
        builder: RequestBuilder,
    ) -> Self {
        Self {
            store: Mutex::new(SessionStore::new()),
            pending: Arc::new(Mutex::new(PendingTurn::default())),
            in_flight: Mutex::new(HashSet::new()),
            events: Arc::new(Mutex::new(Vec::new())),
            repo,
            service,
            builder,
        }
    }

    /// Bootstrap from persisted state. Missing or unreadable state falls
    /// back to the single-default-session store and never fails startup.
    pub async fn load(
        service: Arc<dyn GenerationService>,
        repo: Arc<dyn SessionRepository>,
        builder: RequestBuilder,
    ) -> Self {
        let store = match repo.load().await {
            Ok(Some(sessions)) if !sessions.is_empty() => {
                info!(count = sessions.len(), "Loaded persisted sessions");
                SessionStore::from_persisted(sessions)
            }
            Ok(_) => {
                info!("No persisted sessions, starting fresh");
                SessionStore::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load persisted sessions, starting fresh");
                SessionStore::new()
            }
        };

        Self {
            store: Mutex::new(store),
            pending: Arc::new(Mutex::new(PendingTurn::default())),
            in_flight: Mutex::new(HashSet::new()),
            events: Arc::new(Mutex::new(Vec::new())),
            repo,
            service,
            builder,
        }
    }

    // ── pending turn ──

    pub fn set_pending_text(&self, text: impl Into<String>) {
        self.pending.lock().text = text.into();
    }

    /// Queue a file for the next turn. Encoding runs on a spawned task;
    /// each file joins the pending collection as its read completes, so the
    /// append order is completion order, not selection order. A failed read
    /// never aborts the turn: it becomes an [`ChatEvent::AttachmentFailed`].
    pub fn attach_file(&self, path: PathBuf) -> tokio::task::JoinHandle<()> {
        let pending = self.pending.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            match encode_file(&path).await {
                Ok(attachment) => {
                    debug!(name = %attachment.name, mime_type = %attachment.mime_type, "Attachment encoded");
                    pending.lock().attachments.push(attachment);
                }
                Err(err) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string());
                    warn!(error = %err, name = %name, "Failed to read attachment");
                    events.lock().push(ChatEvent::AttachmentFailed {
                        name,
                        reason: err.to_string(),
                    });
                }
            }
        })
    }

    /// Queue already-loaded bytes (e.g. a paste or drag-drop payload).
    pub fn attach_bytes(&self, name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) {
        let attachment = encode_bytes(name, mime_type, bytes);
        self.pending.lock().attachments.push(attachment);
    }

    pub fn remove_attachment(&self, index: usize) {
        let mut pending = self.pending.lock();
        if index < pending.attachments.len() {
            pending.attachments.remove(index);
        }
    }

    // ── session intents ──

    pub async fn new_session(&self) -> String {
        let id = self.store.lock().create();
        info!(session_id = %id, "Created session");
        self.persist().await;
        id
    }

    pub async fn delete_session(&self, id: &str) -> bool {
        let removed = self.store.lock().remove(id);
        if removed {
            info!(session_id = %id, "Deleted session");
            self.persist().await;
        }
        removed
    }

    /// Switch the active session. Unknown ids are ignored. Allowed while a
    /// send is in flight; the reply lands in the session that sent it.
    pub fn select_session(&self, id: &str) -> bool {
        self.store.lock().select(id)
    }

    // ── send ──

    /// Dispatch the pending turn to the generation service.
    ///
    /// The user message is appended before the network call so the turn is
    /// visible immediately. Every exit path clears the in-flight mark and
    /// service failures become the fixed apology message, so the session
    /// always stays usable.
    pub async fn send(&self) {
        // Lock order everywhere: store, then pending, then in_flight.
        let session_id = self.store.lock().active_id().to_string();

        let user_message = {
            let mut pending = self.pending.lock();
            if pending.text.trim().is_empty() && pending.attachments.is_empty() {
                debug!("Ignoring send with no text and no attachments");
                return;
            }

            if !self.in_flight.lock().insert(session_id.clone()) {
                debug!(session_id = %session_id, "Send already in flight for session, ignoring");
                return;
            }

            let text = std::mem::take(&mut pending.text);
            let attachments = std::mem::take(&mut pending.attachments);
            Message::user(text, attachments)
        };

        let request = self
            .builder
            .build(&user_message.text, &user_message.attachments);

        self.store
            .lock()
            .append_messages(&session_id, vec![user_message]);
        self.persist().await;

        info!(session_id = %session_id, model = %request.model_variant, "Dispatching turn");
        let reply = match self.service.generate(request).await {
            Ok(response) => interpret(response),
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "Generation failed, substituting apology");
                failure_message()
            }
        };

        self.store.lock().append_messages(&session_id, vec![reply]);
        self.in_flight.lock().remove(&session_id);
        self.persist().await;
    }

    // ── UI collaborator surface ──

    pub fn snapshot(&self) -> UiSnapshot {
        let store = self.store.lock();
        let pending = self.pending.lock();
        let current_session_id = store.active_id().to_string();
        let is_sending = self.in_flight.lock().contains(&current_session_id);

        UiSnapshot {
            sessions: store.sessions().to_vec(),
            current_session_id,
            pending_text: pending.text.clone(),
            pending_attachments: pending.attachments.clone(),
            is_sending,
        }
    }

    pub fn is_sending(&self) -> bool {
        let active = self.store.lock().active_id().to_string();
        self.in_flight.lock().contains(&active)
    }

    /// Drain recoverable error events accumulated since the last call.
    pub fn take_events(&self) -> Vec<ChatEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Best-effort durable write of the full session list. A failed write is
    /// logged and dropped; it never blocks the interactive path.
    async fn persist(&self) {
        let sessions = self.store.lock().sessions().to_vec();
        if let Err(e) = self.repo.save(sessions).await {
            warn!(error = %e, "Failed to persist sessions");
        }
    }
}
