use chrono::{DateTime, Utc};
use phi_core::Did;
use phi_crypto::{sign, KeyAlgorithm, KeyPair};
use phi_identity::DidDocument;
use serde_json::{Map, Value};

use crate::credential::{format_timestamp, Proof, ProofPurpose, VerifiableCredential};
use crate::error::CredentialError;

/// Issues verifiable credentials signed by the issuer's keypair.
pub struct CredentialIssuer {
    /// DID of the issuer.
    did: Did,
    /// Issuer's signing keypair.
    keypair: KeyPair,
    /// DID URL of the signing key, written into every proof.
    verification_method: String,
}

impl CredentialIssuer {
    /// Create an issuer signing with `<did>#keys-1`.
    pub fn new(did: Did, keypair: KeyPair) -> Self {
        let verification_method = format!("{}#keys-1", did);
        Self {
            did,
            keypair,
            verification_method,
        }
    }

    /// Get the issuer's DID.
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// The DID Document to register for this issuer.
    pub fn did_document(&self) -> DidDocument {
        DidDocument::for_key(self.did.clone(), &self.keypair.public_key())
    }

    /// Issue a credential with no expiration.
    pub fn issue(
        &self,
        subject_did: &str,
        credential_type: Vec<String>,
        claims: Map<String, Value>,
    ) -> Result<VerifiableCredential, CredentialError> {
        let vc = VerifiableCredential::new(self.did.as_str(), subject_did, credential_type, claims);
        self.sign(vc)
    }

    /// Issue a credential with a specific expiration date.
    pub fn issue_with_expiration(
        &self,
        subject_did: &str,
        credential_type: Vec<String>,
        claims: Map<String, Value>,
        expiration: DateTime<Utc>,
    ) -> Result<VerifiableCredential, CredentialError> {
        let vc = VerifiableCredential::new(self.did.as_str(), subject_did, credential_type, claims)
            .with_expiration(expiration);
        self.sign(vc)
    }

    /// Attach a fresh proof to `vc`, replacing any existing one.
    ///
    /// The credential's issuer must be this issuer's DID, and its claims must
    /// not shadow a subject field.
    pub fn sign(&self, mut vc: VerifiableCredential) -> Result<VerifiableCredential, CredentialError> {
        if vc.issuer != self.did.as_str() {
            return Err(CredentialError::Malformed(format!(
                "credential issuer {} is not {}",
                vc.issuer, self.did
            )));
        }
        vc.credential_subject.check_claims()?;

        vc.proof = Some(Proof {
            proof_type: KeyAlgorithm::Ed25519.proof_type().to_string(),
            created: format_timestamp(Utc::now()),
            verification_method: self.verification_method.clone(),
            proof_purpose: Some(ProofPurpose::AssertionMethod),
            signature: Vec::new(),
        });

        let payload = vc.signing_input()?;
        let signature = sign(&payload, &self.keypair);
        if let Some(proof) = vc.proof.as_mut() {
            proof.signature = signature.to_bytes().to_vec();
        }

        tracing::info!(
            issuer = %self.did,
            subject = %vc.credential_subject.id,
            credential_id = %vc.id,
            "credential issued"
        );

        Ok(vc)
    }
}
