use phi_crypto::KeyFormatError;
use phi_identity::RegistryError;

/// Structural problems with a credential, reported fail-fast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("credential type does not include VerifiableCredential")]
    MissingCredentialType,

    #[error("invalid timestamp in {field}: {value}")]
    BadTimestamp { field: String, value: String },

    #[error("issuance date {0} is in the future")]
    FutureIssuance(String),

    #[error("credential expired at {0}")]
    Expired(String),

    #[error("proof is missing or carries an empty signature")]
    EmptyProof,

    #[error("credentialSubject claim '{0}' is reserved")]
    ReservedClaim(String),

    #[error("proof purpose must be assertionMethod, got {0}")]
    UnexpectedProofPurpose(String),

    #[error("malformed credential: {0}")]
    Malformed(String),
}

/// Why a presented credential was denied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("credential subject {subject} does not match holder {holder}")]
    SubjectMismatch { holder: String, subject: String },

    #[error("issuer could not be resolved: {0}")]
    IssuerUnresolvable(RegistryError),

    #[error("structural error: {0}")]
    StructuralError(CredentialError),

    #[error("verification method {0} not found in issuer document")]
    UnknownVerificationMethod(String),

    #[error("malformed issuer key: {0}")]
    KeyFormat(KeyFormatError),

    #[error("invalid signature")]
    InvalidSignature,
}

impl VerificationError {
    /// Stable reason code for logs and audit trails.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SubjectMismatch { .. } => "SUBJECT_MISMATCH",
            Self::IssuerUnresolvable(_) => "ISSUER_UNRESOLVABLE",
            Self::StructuralError(_) => "STRUCTURAL_ERROR",
            Self::UnknownVerificationMethod(_) => "UNKNOWN_VERIFICATION_METHOD",
            Self::KeyFormat(_) => "KEY_FORMAT",
            Self::InvalidSignature => "INVALID_SIGNATURE",
        }
    }
}

/// Holder wallet errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("credential subject {subject} does not match wallet owner {owner}")]
    NotOwner { owner: String, subject: String },

    #[error("credential not found: {0}")]
    NotFound(String),
}
