use ed25519_dalek::{Signer, VerifyingKey};

use crate::error::KeyFormatError;
use crate::keys::{KeyAlgorithm, KeyPair};

/// Ed25519 signature length in bytes.
pub const ED25519_SIGNATURE_LEN: usize = 64;

/// Ed25519 signature (64 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    inner: ed25519_dalek::Signature,
}

impl Signature {
    /// Get the raw bytes (64 bytes).
    pub fn to_bytes(&self) -> [u8; 64] {
        self.inner.to_bytes()
    }

    /// Encode as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// Sign a message using Ed25519.
pub fn sign(message: &[u8], keypair: &KeyPair) -> Signature {
    Signature {
        inner: keypair.signing_key().sign(message),
    }
}

/// Verify `signature` over `message` with raw public key bytes.
///
/// Returns `Ok(false)` for any signature that does not verify, including
/// empty or wrong-length signatures and keys that are not valid curve points.
/// Only a key whose length is wrong for `algorithm` is an error.
pub fn verify_signature(
    algorithm: KeyAlgorithm,
    public_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<bool, KeyFormatError> {
    match algorithm {
        KeyAlgorithm::Ed25519 => verify_ed25519(public_key, message, signature),
    }
}

fn verify_ed25519(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, KeyFormatError> {
    let key_bytes: [u8; 32] = public_key
        .try_into()
        .map_err(|_| KeyFormatError::InvalidLength {
            expected: KeyAlgorithm::Ed25519.public_key_len(),
            actual: public_key.len(),
        })?;

    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
        tracing::debug!("public key is not a valid Ed25519 point");
        return Ok(false);
    };

    let Ok(sig_bytes) = <[u8; ED25519_SIGNATURE_LEN]>::try_from(signature) else {
        tracing::debug!(len = signature.len(), "signature has wrong length");
        return Ok(false);
    };
    let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);

    Ok(verifying_key.verify_strict(message, &sig).is_ok())
}
