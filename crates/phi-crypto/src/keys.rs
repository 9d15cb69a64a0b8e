use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use crate::error::{CryptoError, KeyFormatError};

/// Ed25519 public key length in bytes.
pub const ED25519_PUBLIC_KEY_LEN: usize = 32;

/// Signature schemes a DID Document key may declare.
///
/// The protocol verifies with a single fixed scheme; other method types are
/// reported as `UnsupportedAlgorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    Ed25519,
}

impl KeyAlgorithm {
    /// Map a DID Document verification-method type to an algorithm.
    pub fn from_method_type(method_type: &str) -> Result<Self, KeyFormatError> {
        match method_type {
            "Ed25519VerificationKey2018" | "Ed25519VerificationKey2020" => Ok(Self::Ed25519),
            other => Err(KeyFormatError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// The verification-method type written into new DID Documents.
    pub fn method_type(&self) -> &'static str {
        match self {
            Self::Ed25519 => "Ed25519VerificationKey2020",
        }
    }

    /// The proof type written into credentials signed with this algorithm.
    pub fn proof_type(&self) -> &'static str {
        match self {
            Self::Ed25519 => "Ed25519Signature2020",
        }
    }

    /// Expected public key length in bytes.
    pub fn public_key_len(&self) -> usize {
        match self {
            Self::Ed25519 => ED25519_PUBLIC_KEY_LEN,
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "Ed25519"),
        }
    }
}

/// Ed25519 key pair for signing operations.
/// Private key material is zeroized on drop by `ed25519-dalek`.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair using OS-provided entropy.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Create a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Create a key pair from a hex-encoded 32-byte seed.
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self, CryptoError> {
        let mut bytes = hex::decode(seed_hex.trim())
            .map_err(|e| CryptoError::InvalidInput(format!("invalid seed hex: {}", e)))?;
        if bytes.len() != 32 {
            let actual = bytes.len();
            bytes.zeroize();
            return Err(KeyFormatError::InvalidLength {
                expected: 32,
                actual,
            }
            .into());
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes);
        let kp = Self::from_seed(&seed);
        seed.zeroize();
        bytes.zeroize();
        Ok(kp)
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Hex encoding of the 32-byte seed. Handle with care.
    pub fn seed_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

/// Ed25519 public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Create from raw bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyFormatError> {
        let bytes_arr: [u8; 32] =
            bytes
                .try_into()
                .map_err(|_| KeyFormatError::InvalidLength {
                    expected: ED25519_PUBLIC_KEY_LEN,
                    actual: bytes.len(),
                })?;
        let verifying_key = VerifyingKey::from_bytes(&bytes_arr)
            .map_err(|e| KeyFormatError::Encoding(format!("invalid public key: {}", e)))?;
        Ok(Self { verifying_key })
    }

    /// Get the raw bytes (32 bytes).
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.verifying_key.as_bytes()
    }

    /// Encode as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Encode as base58.
    pub fn to_bs58(&self) -> String {
        bs58::encode(self.as_bytes()).into_string()
    }

    /// Decode from base58.
    pub fn from_bs58(bs58_str: &str) -> Result<Self, KeyFormatError> {
        let bytes = bs58::decode(bs58_str)
            .into_vec()
            .map_err(|e| KeyFormatError::Encoding(format!("invalid base58: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}
