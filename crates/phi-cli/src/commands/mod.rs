pub mod demo;
pub mod issue;
pub mod keygen;
pub mod resolve;
pub mod verify;

use anyhow::Context;
use phi_identity::{DidDocument, DidRegistry};
use std::path::Path;

/// Load a registry file: a JSON array of DID Documents, registered under their ids.
pub fn load_registry(path: &Path) -> anyhow::Result<DidRegistry> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading registry file {}", path.display()))?;
    let documents: Vec<DidDocument> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing registry file {}", path.display()))?;

    let registry = DidRegistry::new();
    for doc in documents {
        let did = doc.id.to_string();
        registry.register(&did, doc)?;
    }
    tracing::debug!(path = %path.display(), count = registry.count(), "registry loaded");
    Ok(registry)
}

/// Read an argument as a file path if it exists, otherwise as inline text.
pub fn read_file_or_inline(arg: &str) -> anyhow::Result<String> {
    if Path::new(arg).exists() {
        Ok(std::fs::read_to_string(arg)?)
    } else {
        Ok(arg.to_string())
    }
}
