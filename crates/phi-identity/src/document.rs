use chrono::{DateTime, Utc};
use phi_core::{Did, DidUrl};
use phi_crypto::{KeyAlgorithm, KeyFormatError, PublicKey};
use serde::{Deserialize, Serialize};

/// A verification method (public key) within a DID Document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Verification method identifier (e.g., "did:phi:abc#keys-1").
    pub id: String,
    /// Type of the verification method (e.g., "Ed25519VerificationKey2020").
    #[serde(rename = "type")]
    pub method_type: String,
    /// The DID that controls this verification method.
    pub controller: String,
    /// Base58-encoded public key material.
    pub public_key_base58: String,
}

impl VerificationMethod {
    /// The algorithm declared by `method_type`.
    pub fn algorithm(&self) -> Result<KeyAlgorithm, KeyFormatError> {
        KeyAlgorithm::from_method_type(&self.method_type)
    }

    /// Decode the raw public key bytes.
    pub fn key_bytes(&self) -> Result<Vec<u8>, KeyFormatError> {
        bs58::decode(&self.public_key_base58)
            .into_vec()
            .map_err(|e| KeyFormatError::Encoding(format!("invalid base58: {}", e)))
    }
}

/// A service endpoint in a DID Document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service identifier (e.g., "did:phi:abc#service-1").
    pub id: String,
    /// Service type (e.g., "VerifiableCredentialService").
    #[serde(rename = "type")]
    pub service_type: String,
    /// Service endpoint URI.
    pub service_endpoint: String,
}

/// DID Document describing a DID's keys and service endpoints.
///
/// Owned by the registry once registered; resolution hands out copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    /// The DID subject.
    pub id: Did,
    /// Verification methods (public keys) associated with this DID.
    #[serde(default)]
    pub verification_method: Vec<VerificationMethod>,
    /// Service endpoints.
    #[serde(default)]
    pub service: Vec<Service>,
    /// When the document was created.
    pub created: DateTime<Utc>,
}

impl DidDocument {
    /// Create a document with no keys or services.
    pub fn new(id: Did) -> Self {
        Self {
            id,
            verification_method: Vec::new(),
            service: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Create a document with a single Ed25519 key at `<did>#keys-1`.
    pub fn for_key(id: Did, public_key: &PublicKey) -> Self {
        let mut doc = Self::new(id);
        doc.add_verification_method(KeyAlgorithm::Ed25519, public_key);
        doc
    }

    /// Add a service endpoint and return the document.
    pub fn with_service(mut self, service_type: &str, endpoint: &str) -> Self {
        let idx = self.service.len() + 1;
        self.service.push(Service {
            id: format!("{}#service-{}", self.id, idx),
            service_type: service_type.to_string(),
            service_endpoint: endpoint.to_string(),
        });
        self
    }

    /// Add a verification method with the next `#keys-N` fragment.
    pub fn add_verification_method(&mut self, algorithm: KeyAlgorithm, public_key: &PublicKey) {
        let idx = self.verification_method.len() + 1;
        self.verification_method.push(VerificationMethod {
            id: format!("{}#keys-{}", self.id, idx),
            method_type: algorithm.method_type().to_string(),
            controller: self.id.to_string(),
            public_key_base58: public_key.to_bs58(),
        });
    }

    /// Find the verification method a DID URL points at.
    ///
    /// The URL must dereference against this document's DID; method ids may
    /// be stored either absolute (`did:phi:x#keys-1`) or relative (`#keys-1`).
    pub fn find_verification_method(&self, reference: &DidUrl) -> Option<&VerificationMethod> {
        if reference.did() != &self.id {
            return None;
        }
        let fragment = reference.fragment()?;
        self.verification_method.iter().find(|vm| {
            match DidUrl::parse_relative(&vm.id, &self.id) {
                Ok(url) => url.did() == &self.id && url.fragment() == Some(fragment),
                Err(_) => false,
            }
        })
    }
}
