use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum EsErrorKind {
    #[error("append rejected: {0}")]
    AppendRejected(String),
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Debug, Error)]
#[error(transparent)]
pub struct EsError(pub EsErrorKind);

impl EsError {
    pub fn new(kind: EsErrorKind) -> Self {
        Self(kind)
    }

    pub fn kind(&self) -> &EsErrorKind {
        &self.0
    }
}

impl From<EsErrorKind> for EsError {
    fn from(kind: EsErrorKind) -> Self {
        EsError(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_displays_its_kind() {
        let err: EsError = EsErrorKind::AppendRejected("user_id must not be empty".into()).into();
        assert_eq!(err.to_string(), "append rejected: user_id must not be empty");
        assert!(matches!(err.kind(), EsErrorKind::AppendRejected(_)));
    }
}
