use async_trait::async_trait;
use phi_core::RegistryConfig;
use std::time::Duration;

use crate::document::DidDocument;
use crate::error::RegistryError;
use crate::registry::{DidRegistry, RegistryStorage};

/// Trait for resolving DIDs to their documents, possibly over the network.
#[async_trait]
pub trait DidResolver: Send + Sync {
    /// Resolve a DID URI to its DID Document.
    async fn resolve(&self, did: &str) -> Result<DidDocument, RegistryError>;
}

#[async_trait]
impl<T: DidResolver + ?Sized> DidResolver for std::sync::Arc<T> {
    async fn resolve(&self, did: &str) -> Result<DidDocument, RegistryError> {
        (**self).resolve(did).await
    }
}

#[async_trait]
impl<S: RegistryStorage> DidResolver for DidRegistry<S> {
    async fn resolve(&self, did: &str) -> Result<DidDocument, RegistryError> {
        DidRegistry::resolve(self, did)
    }
}

/// Wraps a remote resolver with a per-attempt timeout and at most one retry.
///
/// Only timeouts are retried. `NotFound` and `MalformedDid` are definitive
/// answers and are returned immediately.
pub struct ResilientResolver<R> {
    inner: R,
    timeout: Duration,
    retries: u32,
}

impl<R: DidResolver> ResilientResolver<R> {
    /// Create a resolver with an explicit timeout and retry count (clamped to 1).
    pub fn new(inner: R, timeout: Duration, retries: u32) -> Self {
        Self {
            inner,
            timeout,
            retries: retries.min(1),
        }
    }

    /// Create a resolver from registry configuration.
    pub fn from_config(inner: R, config: &RegistryConfig) -> Self {
        Self::new(inner, config.resolve_timeout(), config.effective_retries())
    }
}

#[async_trait]
impl<R: DidResolver> DidResolver for ResilientResolver<R> {
    async fn resolve(&self, did: &str) -> Result<DidDocument, RegistryError> {
        for attempt in 0..=self.retries {
            match tokio::time::timeout(self.timeout, self.inner.resolve(did)).await {
                Ok(Err(RegistryError::Timeout(_))) | Err(_) => {
                    tracing::warn!(did = did, attempt = attempt, "DID resolution timed out");
                }
                Ok(result) => return result,
            }
        }

        Err(RegistryError::Timeout(format!(
            "{} after {} attempt(s) of {:?}",
            did,
            self.retries + 1,
            self.timeout
        )))
    }
}
