use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("upstream model credential is not configured")]
    MissingCredential,
    #[error("upstream model returned {status}")]
    Upstream { status: u16, body: String },
    #[error("upstream model request failed: {0}")]
    Transport(String),
    #[error("upstream model response invalid: {0}")]
    InvalidResponse(String),
}

impl InsightError {
    /// Stable label used for metrics and structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            InsightError::MissingCredential => "missing_credential",
            InsightError::Upstream { .. } => "upstream_error",
            InsightError::Transport(_) => "transport_error",
            InsightError::InvalidResponse(_) => "invalid_response",
        }
    }
}
