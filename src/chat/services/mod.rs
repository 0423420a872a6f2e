pub mod attachment;
pub mod gemini_client;
pub mod generation;
pub mod request_builder;
pub mod response_interpreter;

pub use attachment::{AttachmentError, encode_bytes, encode_file, mime_type_for_path};
pub use gemini_client::GeminiClient;
pub use generation::{
    GenerationError, GenerationRequest, GenerationResponse, GenerationService, InlineData,
};
pub use request_builder::RequestBuilder;
pub use response_interpreter::{failure_message, interpret};
