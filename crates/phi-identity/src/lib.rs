//! Phi Identity Layer
//!
//! - DID Documents (W3C-compatible subset)
//! - The write-once DID registry over a pluggable storage backend
//! - Async resolution with per-attempt timeout and a single retry

pub mod document;
pub mod error;
pub mod registry;
pub mod resolver;

pub use document::{DidDocument, Service, VerificationMethod};
pub use error::RegistryError;
pub use registry::{DidRegistry, InMemoryStorage, RegistryStorage, ResolveDid};
pub use resolver::{DidResolver, ResilientResolver};
