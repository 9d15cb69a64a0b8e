use dashmap::DashMap;
use phi_crypto::{hash, Hash};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ServiceError;

const CONTENT_ID_PREFIX: &str = "b3:";

/// Content identifier: the BLAKE3 hash of the stored bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(Hash);

impl ContentId {
    /// Address `data` by its hash.
    pub fn for_content(data: &[u8]) -> Self {
        Self(hash(data))
    }

    /// Parse the `b3:<hex>` form.
    pub fn parse(s: &str) -> Result<Self, ServiceError> {
        let hex_part = s
            .strip_prefix(CONTENT_ID_PREFIX)
            .ok_or_else(|| ServiceError::InvalidContentId(s.to_string()))?;
        let bytes = hex::decode(hex_part).map_err(|_| ServiceError::InvalidContentId(s.to_string()))?;
        let digest: Hash = bytes
            .try_into()
            .map_err(|_| ServiceError::InvalidContentId(s.to_string()))?;
        Ok(Self(digest))
    }

    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CONTENT_ID_PREFIX, hex::encode(self.0))
    }
}

impl FromStr for ContentId {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentId {
    type Error = ServiceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.to_string()
    }
}

/// Content-addressed retrieval interface.
pub trait ContentStore: Send + Sync {
    /// Store `data`, returning its content id. Storing the same bytes twice
    /// yields the same id.
    fn store(&self, data: &[u8]) -> Result<ContentId, ServiceError>;

    /// Fetch the bytes addressed by `id`.
    fn fetch(&self, id: &ContentId) -> Result<Vec<u8>, ServiceError>;
}

/// In-memory content store. Every fetch re-hashes the stored bytes.
#[derive(Default)]
pub struct MemoryContentStore {
    blobs: DashMap<ContentId, Vec<u8>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.blobs.contains_key(id)
    }
}

impl ContentStore for MemoryContentStore {
    fn store(&self, data: &[u8]) -> Result<ContentId, ServiceError> {
        let id = ContentId::for_content(data);
        self.blobs.entry(id).or_insert_with(|| data.to_vec());
        tracing::debug!(content_id = %id, size = data.len(), "content stored");
        Ok(id)
    }

    fn fetch(&self, id: &ContentId) -> Result<Vec<u8>, ServiceError> {
        let data = self
            .blobs
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        if ContentId::for_content(&data) != *id {
            tracing::warn!(content_id = %id, "stored content does not match its address");
            return Err(ServiceError::IntegrityMismatch(id.to_string()));
        }
        Ok(data)
    }
}
