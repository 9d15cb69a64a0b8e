//! Phi Services: collaborators that sit outside the verification protocol.
//!
//! - Content-addressed storage for credential payloads
//! - Reward ledger invoked by callers after an accepted proof

pub mod content_store;
pub mod error;
pub mod rewards;

pub use content_store::{ContentId, ContentStore, MemoryContentStore};
pub use error::ServiceError;
pub use rewards::{Provider, RewardCallback, RewardLedger};
