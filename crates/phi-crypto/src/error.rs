/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key format error: {0}")]
    KeyFormat(#[from] KeyFormatError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Key material that cannot be interpreted for its declared algorithm.
///
/// Distinct from a rejected signature: this means the protocol input itself
/// is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyFormatError {
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid key encoding: {0}")]
    Encoding(String),
}
