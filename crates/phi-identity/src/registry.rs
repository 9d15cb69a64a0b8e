use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use phi_core::Did;

use crate::document::DidDocument;
use crate::error::RegistryError;

/// Key-value backend for the registry.
///
/// `put` must be an atomic insert-if-absent: two concurrent `put`s for the
/// same DID leave exactly one document stored and the loser observes
/// `AlreadyRegistered`. `get` must never observe a partially written document.
pub trait RegistryStorage: Send + Sync {
    /// Store a document for a DID that has none yet.
    fn put(&self, did: &Did, document: DidDocument) -> Result<(), RegistryError>;

    /// Fetch the document stored for a DID.
    fn get(&self, did: &Did) -> Option<DidDocument>;
}

/// In-memory storage backed by a sharded concurrent map.
#[derive(Default)]
pub struct InMemoryStorage {
    /// DID -> DidDocument
    store: DashMap<Did, DidDocument>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistryStorage for InMemoryStorage {
    fn put(&self, did: &Did, document: DidDocument) -> Result<(), RegistryError> {
        // The entry guard holds the shard write lock across check and insert.
        match self.store.entry(did.clone()) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyRegistered(did.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(document);
                Ok(())
            }
        }
    }

    fn get(&self, did: &Did) -> Option<DidDocument> {
        self.store.get(did).map(|entry| entry.clone())
    }
}

/// Synchronous DID resolution, used by the in-process verification path.
pub trait ResolveDid: Send + Sync {
    /// Resolve a DID string to its document.
    fn resolve_did(&self, did: &str) -> Result<DidDocument, RegistryError>;
}

impl<T: ResolveDid + ?Sized> ResolveDid for std::sync::Arc<T> {
    fn resolve_did(&self, did: &str) -> Result<DidDocument, RegistryError> {
        (**self).resolve_did(did)
    }
}

/// Write-once registry mapping DIDs to DID Documents.
///
/// The registry is the sole writer of documents. Registration validates DID
/// syntax and rejects a second registration for the same DID; there is no
/// update or removal.
pub struct DidRegistry<S = InMemoryStorage> {
    storage: S,
}

impl DidRegistry<InMemoryStorage> {
    /// Create a new, empty in-memory registry.
    pub fn new() -> Self {
        Self::with_storage(InMemoryStorage::new())
    }

    /// Number of registered DIDs.
    pub fn count(&self) -> usize {
        self.storage.store.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.store.is_empty()
    }

    /// List all registered DIDs, sorted.
    pub fn list_dids(&self) -> Vec<Did> {
        let mut dids: Vec<Did> = self
            .storage
            .store
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        dids.sort();
        dids
    }
}

impl Default for DidRegistry<InMemoryStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RegistryStorage> DidRegistry<S> {
    /// Create a registry over a custom storage backend.
    pub fn with_storage(storage: S) -> Self {
        Self { storage }
    }

    /// Register a document for a DID.
    pub fn register(&self, did: &str, document: DidDocument) -> Result<(), RegistryError> {
        let did = parse_did(did)?;
        if document.id != did {
            return Err(RegistryError::DocumentMismatch {
                did: did.to_string(),
                document_id: document.id.to_string(),
            });
        }

        self.storage.put(&did, document).inspect_err(|e| {
            tracing::debug!(did = %did, error = %e, "registration rejected");
        })?;

        tracing::info!(did = %did, "DID registered");
        Ok(())
    }

    /// Resolve a DID to a copy of its document.
    pub fn resolve(&self, did: &str) -> Result<DidDocument, RegistryError> {
        let did = parse_did(did)?;
        let doc = self
            .storage
            .get(&did)
            .ok_or_else(|| RegistryError::NotFound(did.to_string()))?;
        tracing::debug!(did = %did, "DID resolved");
        Ok(doc)
    }

    /// Whether a DID has a document.
    pub fn contains(&self, did: &str) -> bool {
        Did::parse(did)
            .map(|did| self.storage.get(&did).is_some())
            .unwrap_or(false)
    }
}

impl<S: RegistryStorage> ResolveDid for DidRegistry<S> {
    fn resolve_did(&self, did: &str) -> Result<DidDocument, RegistryError> {
        self.resolve(did)
    }
}

fn parse_did(did: &str) -> Result<Did, RegistryError> {
    Did::parse(did).map_err(|e| RegistryError::MalformedDid(e.to_string()))
}
