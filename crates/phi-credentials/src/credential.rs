use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::canonical;
use crate::error::CredentialError;

/// Base context for W3C Verifiable Credentials v1.
pub const CREDENTIALS_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Type tag every credential must carry.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// A Verifiable Credential as presented by a holder.
///
/// Fields are kept close to the wire so that structural validation can report
/// exactly which one is missing or malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    #[serde(rename = "@context", default, deserialize_with = "one_or_many")]
    pub context: Vec<String>,
    #[serde(default)]
    pub id: String,
    /// Type tags, order preserved (e.g. ["VerifiableCredential", "UniversityDegreeCredential"]).
    #[serde(rename = "type", default, deserialize_with = "one_or_many")]
    pub credential_type: Vec<String>,
    /// DID of the issuer.
    #[serde(default)]
    pub issuer: String,
    /// RFC 3339 issuance timestamp.
    #[serde(default)]
    pub issuance_date: String,
    /// Optional RFC 3339 expiration timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub credential_subject: CredentialSubject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

/// The subject DID plus arbitrary claims.
///
/// `claims` must not carry an `id` key; it would shadow the subject DID on
/// the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubject {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

/// Claim names that collide with `credentialSubject` fields.
const RESERVED_CLAIMS: &[&str] = &["id"];

impl CredentialSubject {
    /// Reject claims that would shadow a subject field.
    pub fn check_claims(&self) -> Result<(), CredentialError> {
        match RESERVED_CLAIMS.iter().find(|name| self.claims.contains_key(**name)) {
            Some(name) => Err(CredentialError::ReservedClaim((*name).to_string())),
            None => Ok(()),
        }
    }
}

/// Relationship the proof's key is used under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    AssertionMethod,
    Authentication,
    KeyAgreement,
    CapabilityInvocation,
    CapabilityDelegation,
}

impl ProofPurpose {
    /// The wire name (e.g. "assertionMethod").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssertionMethod => "assertionMethod",
            Self::Authentication => "authentication",
            Self::KeyAgreement => "keyAgreement",
            Self::CapabilityInvocation => "capabilityInvocation",
            Self::CapabilityDelegation => "capabilityDelegation",
        }
    }
}

/// Proof attached to a verifiable credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Signature suite (e.g. "Ed25519Signature2020").
    #[serde(rename = "type", default)]
    pub proof_type: String,
    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created: String,
    /// DID URL of the signing key (e.g. "did:phi:issuer#keys-1").
    #[serde(default)]
    pub verification_method: String,
    #[serde(default)]
    pub proof_purpose: Option<ProofPurpose>,
    /// Raw signature bytes, hex-encoded on the wire.
    #[serde(
        rename = "proofValue",
        alias = "jws",
        default,
        serialize_with = "hex_serialize",
        deserialize_with = "hex_deserialize"
    )]
    pub signature: Vec<u8>,
}

impl VerifiableCredential {
    /// Create a new unsigned credential issued now.
    pub fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        credential_type: Vec<String>,
        claims: Map<String, Value>,
    ) -> Self {
        let mut types = vec![VERIFIABLE_CREDENTIAL_TYPE.to_string()];
        for t in credential_type {
            if t != VERIFIABLE_CREDENTIAL_TYPE {
                types.push(t);
            }
        }

        Self {
            context: vec![CREDENTIALS_V1_CONTEXT.to_string()],
            id: format!("urn:uuid:{}", Uuid::now_v7()),
            credential_type: types,
            issuer: issuer.into(),
            issuance_date: format_timestamp(Utc::now()),
            expiration_date: None,
            credential_subject: CredentialSubject {
                id: subject.into(),
                claims,
            },
            proof: None,
        }
    }

    /// Override the issuance date.
    pub fn with_issuance_date(mut self, issued: DateTime<Utc>) -> Self {
        self.issuance_date = format_timestamp(issued);
        self
    }

    /// Set the expiration date.
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration_date = Some(format_timestamp(expiration));
        self
    }

    /// Canonical bytes covered by the proof signature.
    ///
    /// Every field takes part except the signature value itself, so the proof
    /// metadata (suite, created, verification method, purpose) is also signed.
    pub fn signing_input(&self) -> Result<Vec<u8>, CredentialError> {
        let mut value =
            serde_json::to_value(self).map_err(|e| CredentialError::Malformed(e.to_string()))?;
        // Flattened claims serialize after the subject id; pin the real id.
        if let Some(subject) = value.get_mut("credentialSubject").and_then(Value::as_object_mut) {
            subject.insert("id".into(), Value::from(self.credential_subject.id.as_str()));
        }
        if let Some(proof) = value.get_mut("proof").and_then(Value::as_object_mut) {
            proof.remove("proofValue");
        }
        canonical::canonicalize(&value).map_err(|e| CredentialError::Malformed(e.to_string()))
    }

    /// Check if the credential carries a proof.
    pub fn is_signed(&self) -> bool {
        self.proof.as_ref().is_some_and(|p| !p.signature.is_empty())
    }

    /// Whether the type set includes `t`.
    pub fn has_type(&self, t: &str) -> bool {
        self.credential_type.iter().any(|ct| ct == t)
    }

    /// Serialize to JSON bytes for storage or transport.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CredentialError> {
        serde_json::to_vec(self).map_err(|e| CredentialError::Malformed(e.to_string()))
    }

    /// Parse a credential from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CredentialError> {
        serde_json::from_slice(bytes).map_err(|e| CredentialError::Malformed(e.to_string()))
    }
}

/// RFC 3339 with second precision and a `Z` suffix.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, CredentialError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CredentialError::BadTimestamp {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

fn hex_serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}

fn hex_deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    // Undecodable signatures (e.g. a JWS string) become empty and are denied
    // downstream as an invalid signature.
    Ok(hex::decode(s.trim()).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "proof value is not hex");
        Vec::new()
    }))
}
