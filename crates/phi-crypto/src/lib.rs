pub mod error;
pub mod hashing;
pub mod keys;
pub mod signing;

pub use error::{CryptoError, KeyFormatError};
pub use hashing::{hash, Hash};
pub use keys::{KeyAlgorithm, KeyPair, PublicKey};
pub use signing::{sign, verify_signature, Signature};
