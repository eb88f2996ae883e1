use std::future::Future;

/// Seam to the hosted generative-text provider.
///
/// The provider only ever phrases text; eligibility decisions are computed before it is called.
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;

    /// Model identifiers the provider currently offers, without any `models/` prefix.
    fn list_models(&self) -> impl Future<Output = Result<Vec<String>, GenerationError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider response could not be read: {0}")]
    MalformedResponse(String),
    #[error("model {model} replied with empty text")]
    EmptyReply { model: String },
}
