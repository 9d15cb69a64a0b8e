//! Phi Core: DID syntax, protocol states, configuration, and errors shared
//! by every Phi crate.

pub mod config;
pub mod error;
pub mod protocol_state;
pub mod types;

pub use config::{LoggingConfig, PhiConfig, RegistryConfig, VerifierConfig};
pub use error::CoreError;
pub use protocol_state::ProtocolState;
pub use types::{Did, DidUrl};
