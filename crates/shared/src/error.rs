use thiserror::Error;

/// Failure taxonomy for the digest pipeline. All variants are fatal for the
/// current run; per-item extraction failures are absorbed inside
/// `ContentExtractor` and never surface here.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("OPENROUTER_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenRouter returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("OpenRouter response contained no choices")]
    EmptyResponse,

    #[error(
        "model response is not valid JSON ({length} chars, truncated: {likely_truncated}), tail: {tail:?}"
    )]
    MalformedResponse {
        length: usize,
        /// Last characters of the raw response, for diagnosing mid-string
        /// truncation at the token budget.
        tail: String,
        likely_truncated: bool,
    },

    #[error("model response does not match the digest schema: {0}")]
    SchemaViolation(String),
}
