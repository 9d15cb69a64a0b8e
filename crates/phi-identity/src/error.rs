/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("DID not found: {0}")]
    NotFound(String),

    #[error("DID already registered: {0}")]
    AlreadyRegistered(String),

    #[error("malformed DID: {0}")]
    MalformedDid(String),

    #[error("resolution timed out: {0}")]
    Timeout(String),

    #[error("document id {document_id} does not match DID {did}")]
    DocumentMismatch { did: String, document_id: String },
}
