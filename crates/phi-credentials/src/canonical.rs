//! Deterministic JSON serialization used as the signing input.
//!
//! JCS (RFC 8785): object keys sorted at every nesting level, compact
//! separators, and canonical number formatting. Arrays keep their order.
//! The output depends only on the logical content, never on map insertion
//! order.

use serde_json::Value;

/// Canonicalize a JSON value.
pub fn canonicalize(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let s = serde_jcs::to_string(value)?;
    Ok(s.into_bytes())
}
