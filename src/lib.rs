//! Session/message orchestration and multimodal attachment pipeline for a
//! Gemini-backed conversational client. The UI is an external collaborator:
//! it renders [`chat::UiSnapshot`] and forwards user intents into
//! [`chat::ChatController`].

pub mod chat;
