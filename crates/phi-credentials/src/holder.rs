use dashmap::DashMap;

use crate::credential::VerifiableCredential;
use crate::error::WalletError;

/// Credential wallet holding the credentials its owner may present.
pub struct CredentialWallet {
    /// DID of the wallet owner.
    owner_did: String,
    /// Credential ID → VerifiableCredential.
    credentials: DashMap<String, VerifiableCredential>,
}

impl CredentialWallet {
    /// Create a new credential wallet.
    pub fn new(owner_did: impl Into<String>) -> Self {
        Self {
            owner_did: owner_did.into(),
            credentials: DashMap::new(),
        }
    }

    /// Get the wallet owner's DID.
    pub fn owner_did(&self) -> &str {
        &self.owner_did
    }

    /// Store a credential whose subject is the wallet owner.
    pub fn store(&self, credential: VerifiableCredential) -> Result<(), WalletError> {
        if credential.credential_subject.id != self.owner_did {
            return Err(WalletError::NotOwner {
                owner: self.owner_did.clone(),
                subject: credential.credential_subject.id.clone(),
            });
        }
        let id = credential.id.clone();
        self.credentials.insert(id.clone(), credential);
        tracing::debug!(credential_id = %id, "credential stored in wallet");
        Ok(())
    }

    /// Hand out a copy of a stored credential for presentation.
    pub fn present(&self, id: &str) -> Result<VerifiableCredential, WalletError> {
        self.credentials
            .get(id)
            .map(|e| e.clone())
            .ok_or_else(|| WalletError::NotFound(id.to_string()))
    }

    /// List credentials by type.
    pub fn list_by_type(&self, credential_type: &str) -> Vec<VerifiableCredential> {
        self.credentials
            .iter()
            .filter(|e| e.has_type(credential_type))
            .map(|e| e.value().clone())
            .collect()
    }

    /// Number of credentials in the wallet.
    pub fn count(&self) -> usize {
        self.credentials.len()
    }

    /// Check if the wallet is empty.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}
