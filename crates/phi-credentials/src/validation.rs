//! Structural validation of a credential, independent of any cryptography.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::credential::{
    parse_timestamp, ProofPurpose, VerifiableCredential, VERIFIABLE_CREDENTIAL_TYPE,
};
use crate::error::CredentialError;

/// Check a credential's structure at time `now`, returning the first violation.
///
/// Order of checks:
/// 1. required top-level fields (`@context`, `id`, `type`, `issuer`,
///    `issuanceDate`, `credentialSubject.id`), no reserved claim names
/// 2. `type` includes `VerifiableCredential`
/// 3. `issuanceDate` parses and is not later than `now + clock_skew`
/// 4. `expirationDate`, if present, parses and is not earlier than `now - clock_skew`
/// 5. proof metadata present, purpose `assertionMethod`, signature bytes non-empty
pub fn validate_structure(
    vc: &VerifiableCredential,
    now: DateTime<Utc>,
    clock_skew: Duration,
) -> Result<(), CredentialError> {
    require(!vc.context.is_empty(), "@context")?;
    require(!vc.id.is_empty(), "id")?;
    require(!vc.credential_type.is_empty(), "type")?;
    require(!vc.issuer.is_empty(), "issuer")?;
    require(!vc.issuance_date.is_empty(), "issuanceDate")?;
    require(!vc.credential_subject.id.is_empty(), "credentialSubject.id")?;
    vc.credential_subject.check_claims()?;

    if !vc.has_type(VERIFIABLE_CREDENTIAL_TYPE) {
        return Err(CredentialError::MissingCredentialType);
    }

    let issued = parse_timestamp("issuanceDate", &vc.issuance_date)?;
    if let Ok(ahead) = (issued - now).to_std() {
        if ahead > clock_skew {
            return Err(CredentialError::FutureIssuance(vc.issuance_date.clone()));
        }
    }

    if let Some(expiration) = &vc.expiration_date {
        let expires = parse_timestamp("expirationDate", expiration)?;
        if let Ok(behind) = (now - expires).to_std() {
            if behind > clock_skew {
                return Err(CredentialError::Expired(expiration.clone()));
            }
        }
    }

    let proof = vc.proof.as_ref().ok_or(CredentialError::EmptyProof)?;
    require(!proof.proof_type.is_empty(), "proof.type")?;
    require(!proof.created.is_empty(), "proof.created")?;
    require(!proof.verification_method.is_empty(), "proof.verificationMethod")?;
    match proof.proof_purpose {
        None => return Err(CredentialError::MissingField("proof.proofPurpose".into())),
        Some(ProofPurpose::AssertionMethod) => {}
        Some(other) => {
            return Err(CredentialError::UnexpectedProofPurpose(other.as_str().to_string()));
        }
    }
    if proof.signature.is_empty() {
        return Err(CredentialError::EmptyProof);
    }

    Ok(())
}

fn require(present: bool, field: &str) -> Result<(), CredentialError> {
    if present {
        Ok(())
    } else {
        Err(CredentialError::MissingField(field.to_string()))
    }
}
