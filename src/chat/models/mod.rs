pub mod message;
pub mod session;
pub mod session_store;

pub use message::{Attachment, Message, Role};
pub use session::{DEFAULT_TITLE, GREETING, Session, TITLE_MAX_CHARS};
pub use session_store::SessionStore;
