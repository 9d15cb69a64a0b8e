//! Phi Credentials: credential model, canonical signing input, issuer, holder wallet,
//! and the resolve-and-verify protocol.

pub mod canonical;
pub mod credential;
pub mod error;
pub mod holder;
pub mod issuer;
pub mod validation;
pub mod verifier;

pub use canonical::canonicalize;
pub use credential::{
    CredentialSubject, Proof, ProofPurpose, VerifiableCredential, CREDENTIALS_V1_CONTEXT,
    VERIFIABLE_CREDENTIAL_TYPE,
};
pub use error::{CredentialError, VerificationError, WalletError};
pub use holder::CredentialWallet;
pub use issuer::CredentialIssuer;
pub use validation::validate_structure;
pub use verifier::{CredentialVerifier, Decision};
