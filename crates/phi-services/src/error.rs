/// Errors from the content store and reward ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("content not found: {0}")]
    NotFound(String),

    #[error("content integrity check failed for {0}")]
    IntegrityMismatch(String),

    #[error("invalid content id: {0}")]
    InvalidContentId(String),

    #[error("provider already registered: {0}")]
    ProviderExists(String),

    #[error("provider not registered: {0}")]
    UnknownProvider(String),

    #[error("work units must be positive")]
    NoWork,

    #[error("balance overflow for {0}")]
    Overflow(String),
}
