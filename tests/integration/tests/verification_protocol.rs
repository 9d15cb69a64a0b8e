//! Integration test: resolve-and-verify across registry, credentials, and crypto.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use phi_core::{Did, VerifierConfig};
use phi_credentials::{
    CredentialError, CredentialIssuer, CredentialVerifier, Decision, VerifiableCredential,
    VerificationError,
};
use phi_crypto::KeyPair;
use phi_identity::{DidDocument, DidRegistry, DidResolver, RegistryError, ResilientResolver};
use phi_integration_tests::{
    degree_claims, degree_credential, registry_with_university, university, verification_time,
    CountingResolver, HOLDER_DID, ISSUER_DID,
};
use serde_json::Map;

// =========================================================================
// Presentation outcomes
// =========================================================================

#[test]
fn test_registered_issuer_valid_credential_accepted() {
    let verifier = CredentialVerifier::new(registry_with_university());
    let vc = degree_credential(&university(), HOLDER_DID);

    let decision = verifier.resolve_and_verify_at(HOLDER_DID, &vc, verification_time());
    assert_eq!(decision, Decision::Accepted);
}

#[test]
fn test_mismatched_subject_denied_without_resolution() {
    let verifier = CredentialVerifier::new(CountingResolver::new(registry_with_university()));
    let vc = degree_credential(&university(), "did:phi:999");

    let decision = verifier.resolve_and_verify_at(HOLDER_DID, &vc, verification_time());
    assert_eq!(
        decision,
        Decision::Denied(VerificationError::SubjectMismatch {
            holder: HOLDER_DID.into(),
            subject: "did:phi:999".into(),
        })
    );
    assert_eq!(verifier.resolver().calls(), 0);
}

#[test]
fn test_unregistered_issuer_denied() {
    let verifier = CredentialVerifier::new(DidRegistry::new());
    let vc = degree_credential(&university(), HOLDER_DID);

    let decision = verifier.resolve_and_verify_at(HOLDER_DID, &vc, verification_time());
    assert!(matches!(
        decision,
        Decision::Denied(VerificationError::IssuerUnresolvable(RegistryError::NotFound(_)))
    ));
}

#[test]
fn test_empty_signature_denied_as_invalid() {
    let verifier = CredentialVerifier::new(registry_with_university());
    let mut vc = degree_credential(&university(), HOLDER_DID);
    vc.proof.as_mut().unwrap().signature = Vec::new();

    // Every other proof field is still populated.
    let proof = vc.proof.as_ref().unwrap();
    assert!(!proof.proof_type.is_empty());
    assert!(!proof.verification_method.is_empty());

    let decision = verifier.resolve_and_verify_at(HOLDER_DID, &vc, verification_time());
    assert_eq!(decision, Decision::Denied(VerificationError::InvalidSignature));
}

#[test]
fn test_future_issuance_denied_with_zero_skew() {
    let issuer = university();
    let verifier = CredentialVerifier::new(registry_with_university());
    let vc = VerifiableCredential::new(ISSUER_DID, HOLDER_DID, vec![], Map::new())
        .with_issuance_date(verification_time() + Duration::days(365));
    let vc = issuer.sign(vc).unwrap();

    let decision = verifier.resolve_and_verify_at(HOLDER_DID, &vc, verification_time());
    assert!(matches!(
        decision,
        Decision::Denied(VerificationError::StructuralError(CredentialError::FutureIssuance(_)))
    ));
}

#[test]
fn test_expired_credential_denied() {
    let issuer = university();
    let verifier = CredentialVerifier::new(registry_with_university());
    let vc = VerifiableCredential::new(ISSUER_DID, HOLDER_DID, vec![], Map::new())
        .with_issuance_date(verification_time() - Duration::days(400))
        .with_expiration(verification_time() - Duration::days(35));
    let vc = issuer.sign(vc).unwrap();

    let decision = verifier.resolve_and_verify_at(HOLDER_DID, &vc, verification_time());
    assert!(matches!(
        decision,
        Decision::Denied(VerificationError::StructuralError(CredentialError::Expired(_)))
    ));
}

#[test]
fn test_skew_tolerance_admits_slightly_early_credential() {
    let issuer = university();
    let verifier = CredentialVerifier::with_config(
        registry_with_university(),
        VerifierConfig { clock_skew_secs: 300 },
    );
    let vc = VerifiableCredential::new(ISSUER_DID, HOLDER_DID, vec![], Map::new())
        .with_issuance_date(verification_time() + Duration::minutes(2));
    let vc = issuer.sign(vc).unwrap();

    assert!(verifier
        .resolve_and_verify_at(HOLDER_DID, &vc, verification_time())
        .is_accepted());
}

#[test]
fn test_signature_checked_against_issuer_key_not_holder_key() {
    // The holder registers its own document; a credential it signs itself
    // while claiming the university as issuer must not verify.
    let registry = registry_with_university();
    let holder_key = KeyPair::from_seed(&[9u8; 32]);
    let holder_doc = DidDocument::for_key(Did::parse(HOLDER_DID).unwrap(), &holder_key.public_key());
    registry.register(HOLDER_DID, holder_doc).unwrap();

    let forger = CredentialIssuer::new(Did::parse(ISSUER_DID).unwrap(), holder_key);
    let forged = degree_credential(&forger, HOLDER_DID);

    let verifier = CredentialVerifier::new(registry);
    let decision = verifier.resolve_and_verify_at(HOLDER_DID, &forged, verification_time());
    assert_eq!(decision, Decision::Denied(VerificationError::InvalidSignature));
}

#[test]
fn test_rewritten_subject_denied() {
    let issuer = university();
    let verifier = CredentialVerifier::new(registry_with_university());
    let mut vc = degree_credential(&issuer, HOLDER_DID);
    vc.credential_subject.id = "did:phi:attacker".into();

    let decision = verifier.resolve_and_verify_at("did:phi:attacker", &vc, verification_time());
    assert_eq!(decision, Decision::Denied(VerificationError::InvalidSignature));
}

#[test]
fn test_id_claim_cannot_be_issued() {
    let mut claims = degree_claims();
    claims.insert("id".into(), HOLDER_DID.into());
    assert_eq!(
        university().issue(HOLDER_DID, vec![], claims),
        Err(CredentialError::ReservedClaim("id".into()))
    );
}

#[test]
fn test_denials_carry_distinct_codes() {
    let issuer = university();
    let verifier = CredentialVerifier::new(registry_with_university());
    let good = degree_credential(&issuer, HOLDER_DID);

    let mut unknown_key = good.clone();
    unknown_key.proof.as_mut().unwrap().verification_method = format!("{}#keys-7", ISSUER_DID);
    let mut tampered = good.clone();
    tampered.credential_subject.claims.insert("degree".into(), "PhD".into());
    let mut no_context = good.clone();
    no_context.context.clear();

    let codes: Vec<&str> = [
        verifier.resolve_and_verify_at("did:phi:someone-else", &good, verification_time()),
        CredentialVerifier::new(DidRegistry::new()).resolve_and_verify_at(
            HOLDER_DID,
            &good,
            verification_time(),
        ),
        verifier.resolve_and_verify_at(HOLDER_DID, &no_context, verification_time()),
        verifier.resolve_and_verify_at(HOLDER_DID, &unknown_key, verification_time()),
        verifier.resolve_and_verify_at(HOLDER_DID, &tampered, verification_time()),
    ]
    .iter()
    .map(|d| d.denial_reason().unwrap().code())
    .collect();

    assert_eq!(
        codes,
        vec![
            "SUBJECT_MISMATCH",
            "ISSUER_UNRESOLVABLE",
            "STRUCTURAL_ERROR",
            "UNKNOWN_VERIFICATION_METHOD",
            "INVALID_SIGNATURE",
        ]
    );
}

#[test]
fn test_decision_is_recomputed_per_presentation() {
    let registry = Arc::new(registry_with_university());
    let verifier = CredentialVerifier::new(CountingResolver::new(DidRegistry::new()));
    let vc = degree_credential(&university(), HOLDER_DID);

    // Nothing registered behind the counting resolver: both calls resolve and deny.
    verifier.resolve_and_verify_at(HOLDER_DID, &vc, verification_time());
    verifier.resolve_and_verify_at(HOLDER_DID, &vc, verification_time());
    assert_eq!(verifier.resolver().calls(), 2);

    let shared = CredentialVerifier::new(Arc::clone(&registry));
    assert!(shared.resolve_and_verify_at(HOLDER_DID, &vc, verification_time()).is_accepted());
}

// =========================================================================
// Concurrency
// =========================================================================

#[test]
fn test_concurrent_verification() {
    let verifier = Arc::new(CredentialVerifier::new(registry_with_university()));
    let issuer = university();
    let good = degree_credential(&issuer, HOLDER_DID);
    let mut bad = good.clone();
    bad.proof.as_mut().unwrap().signature[0] ^= 0xff;

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let verifier = Arc::clone(&verifier);
            let vc = if i % 2 == 0 { good.clone() } else { bad.clone() };
            std::thread::spawn(move || {
                (i, verifier.resolve_and_verify_at(HOLDER_DID, &vc, verification_time()))
            })
        })
        .collect();

    for handle in handles {
        let (i, decision) = handle.join().unwrap();
        assert_eq!(decision.is_accepted(), i % 2 == 0);
    }
}

// =========================================================================
// Remote resolution
// =========================================================================

/// A resolver that never answers within any reasonable timeout.
struct StalledResolver;

#[async_trait]
impl DidResolver for StalledResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, RegistryError> {
        tokio::time::sleep(StdDuration::from_secs(5)).await;
        Err(RegistryError::NotFound(did.to_string()))
    }
}

#[tokio::test]
async fn test_remote_resolution_accepts() {
    let resolver = ResilientResolver::new(registry_with_university(), StdDuration::from_secs(1), 1);
    let verifier = CredentialVerifier::new(resolver);
    let vc = degree_credential(&university(), HOLDER_DID);

    let decision = verifier
        .resolve_and_verify_remote_at(HOLDER_DID, &vc, verification_time())
        .await;
    assert!(decision.is_accepted());
}

#[tokio::test]
async fn test_remote_resolution_timeout_denies() {
    let resolver = ResilientResolver::new(StalledResolver, StdDuration::from_millis(50), 1);
    let verifier = CredentialVerifier::new(resolver);
    let vc = degree_credential(&university(), HOLDER_DID);

    let decision = verifier
        .resolve_and_verify_remote_at(HOLDER_DID, &vc, verification_time())
        .await;
    assert!(matches!(
        decision,
        Decision::Denied(VerificationError::IssuerUnresolvable(RegistryError::Timeout(_)))
    ));
}
