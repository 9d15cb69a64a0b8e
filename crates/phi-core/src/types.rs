use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Decentralized Identifier.
/// Format: `did:<method>:<method-specific-id>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Parse and validate a DID string.
    pub fn parse(uri: &str) -> Result<Self, CoreError> {
        let rest = uri.strip_prefix("did:").ok_or_else(|| {
            CoreError::InvalidDid(format!("DID must start with 'did:', got: {}", uri))
        })?;

        let (method, id) = rest.split_once(':').ok_or_else(|| {
            CoreError::InvalidDid(format!(
                "DID must have format 'did:<method>:<method-specific-id>', got: {}",
                uri
            ))
        })?;

        if method.is_empty()
            || !method
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Err(CoreError::InvalidDid(format!(
                "DID method must be lowercase alphanumeric, got: {:?}",
                method
            )));
        }

        if id.is_empty() || id.ends_with(':') {
            return Err(CoreError::InvalidDid(format!(
                "DID method-specific id is empty or ends with ':', got: {}",
                uri
            )));
        }

        if let Some(bad) = id.chars().find(|c| !is_id_char(*c)) {
            return Err(CoreError::InvalidDid(format!(
                "invalid character {:?} in DID {}",
                bad, uri
            )));
        }

        Ok(Self(uri.to_string()))
    }

    /// Create a DID from method and identifier components.
    pub fn from_parts(method: &str, identifier: &str) -> Result<Self, CoreError> {
        Self::parse(&format!("did:{}:{}", method, identifier))
    }

    /// Get the full DID URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the method (e.g. `phi`).
    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// Extract the method-specific identifier.
    pub fn method_specific_id(&self) -> &str {
        self.0.splitn(3, ':').nth(2).unwrap_or_default()
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':' | '%')
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Did {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Did {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A DID URL with an optional fragment, e.g. `did:phi:issuer#keys-1`.
///
/// Path and query components are not used by the protocol and are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DidUrl {
    did: Did,
    fragment: Option<String>,
}

impl DidUrl {
    /// Parse an absolute DID URL.
    pub fn parse(url: &str) -> Result<Self, CoreError> {
        let (did_part, fragment) = match url.split_once('#') {
            Some((d, f)) => (d, Some(f)),
            None => (url, None),
        };

        if did_part.contains(['/', '?']) {
            return Err(CoreError::InvalidDidUrl(format!(
                "path and query components are not supported: {}",
                url
            )));
        }

        let did = Did::parse(did_part).map_err(|e| CoreError::InvalidDidUrl(e.to_string()))?;
        let fragment = match fragment {
            Some("") => {
                return Err(CoreError::InvalidDidUrl(format!("empty fragment: {}", url)));
            }
            Some(f) => Some(f.to_string()),
            None => None,
        };

        Ok(Self { did, fragment })
    }

    /// Parse a reference that is either an absolute DID URL or a bare
    /// fragment (`#keys-1`) relative to `base`.
    pub fn parse_relative(reference: &str, base: &Did) -> Result<Self, CoreError> {
        match reference.strip_prefix('#') {
            Some("") => Err(CoreError::InvalidDidUrl(format!(
                "empty fragment: {}",
                reference
            ))),
            Some(fragment) => Ok(Self {
                did: base.clone(),
                fragment: Some(fragment.to_string()),
            }),
            None => Self::parse(reference),
        }
    }

    /// The DID this URL dereferences against.
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// The fragment, without the leading `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

impl fmt::Display for DidUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fragment {
            Some(fragment) => write!(f, "{}#{}", self.did, fragment),
            None => write!(f, "{}", self.did),
        }
    }
}
