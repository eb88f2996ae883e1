//! Chat glue between a messaging surface, the eligibility classifier and a hosted
//! generative-text provider.

pub mod gemini;
pub mod generator;
pub mod prompt;
pub mod router;
pub mod selection;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use gemini::GeminiClient;
pub use generator::{GenerationError, TextGenerator};
pub use router::assistant_router;
pub use selection::{ModelSelectionError, ModelSelector, PROBE_PROMPT};
pub use service::{
    AssistantError, AssistantReply, AssistantRequest, AssistantService, ReplySource,
};
pub use session::{ChatMessage, ChatRole, ChatSession, GREETING};
