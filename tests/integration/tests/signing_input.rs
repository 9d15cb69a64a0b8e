//! Integration test: canonical signing input and signature properties over
//! real credentials.

use phi_credentials::{CredentialVerifier, Decision, VerifiableCredential, VerificationError};
use phi_crypto::{sign, verify_signature, KeyAlgorithm, KeyPair};
use phi_integration_tests::{
    degree_credential, registry_with_university, university, verification_time, HOLDER_DID,
};

const CREDENTIAL_A: &str = r#"{
    "@context": ["https://www.w3.org/2018/credentials/v1"],
    "id": "urn:uuid:0190f1c2-7d1e-7000-8000-000000000001",
    "type": ["VerifiableCredential", "UniversityDegreeCredential"],
    "issuer": "did:phi:issuer-university-xyz",
    "issuanceDate": "2025-12-09T10:00:00Z",
    "credentialSubject": {
        "id": "did:phi:123456789abcdefghi",
        "degree": "Bachelor of Science in Network Engineering",
        "gpa": 3.8,
        "honors": {"summa": false, "dean_list": [2023, 2024]}
    }
}"#;

const CREDENTIAL_B: &str = r#"{
    "credentialSubject": {
        "honors": {"dean_list": [2023, 2024], "summa": false},
        "gpa": 3.8,
        "id": "did:phi:123456789abcdefghi",
        "degree": "Bachelor of Science in Network Engineering"
    },
    "issuanceDate": "2025-12-09T10:00:00Z",
    "issuer": "did:phi:issuer-university-xyz",
    "type": ["VerifiableCredential", "UniversityDegreeCredential"],
    "id": "urn:uuid:0190f1c2-7d1e-7000-8000-000000000001",
    "@context": ["https://www.w3.org/2018/credentials/v1"]
}"#;

#[test]
fn test_signing_input_independent_of_field_order() {
    let a = VerifiableCredential::from_json_slice(CREDENTIAL_A.as_bytes()).unwrap();
    let b = VerifiableCredential::from_json_slice(CREDENTIAL_B.as_bytes()).unwrap();
    assert_eq!(a.signing_input().unwrap(), b.signing_input().unwrap());
}

#[test]
fn test_signing_input_excludes_only_signature_value() {
    let vc = degree_credential(&university(), HOLDER_DID);
    let input = String::from_utf8(vc.signing_input().unwrap()).unwrap();
    assert!(!input.contains("proofValue"));
    assert!(input.contains("\"verificationMethod\""));
    assert!(input.contains("\"Ed25519Signature2020\""));

    let mut resigned = vc.clone();
    resigned.proof.as_mut().unwrap().signature = vec![0u8; 64];
    assert_eq!(vc.signing_input().unwrap(), resigned.signing_input().unwrap());
}

#[test]
fn test_sign_verify_round_trip_and_bit_flips() {
    let kp = KeyPair::from_seed(&[3u8; 32]);
    let vc = VerifiableCredential::from_json_slice(CREDENTIAL_A.as_bytes()).unwrap();
    let input = vc.signing_input().unwrap();
    let signature = sign(&input, &kp).to_bytes();
    let public_key = kp.public_key();

    assert_eq!(
        verify_signature(KeyAlgorithm::Ed25519, public_key.as_bytes(), &input, &signature),
        Ok(true)
    );

    for bit in 0..signature.len() * 8 {
        let mut flipped = signature;
        flipped[bit / 8] ^= 1 << (bit % 8);
        assert_eq!(
            verify_signature(KeyAlgorithm::Ed25519, public_key.as_bytes(), &input, &flipped),
            Ok(false),
            "bit {} flip must not verify",
            bit
        );
    }
}

#[test]
fn test_wire_round_trip_still_verifies() {
    let verifier = CredentialVerifier::new(registry_with_university());
    let vc = degree_credential(&university(), HOLDER_DID);

    let bytes = vc.to_json_bytes().unwrap();
    let parsed = VerifiableCredential::from_json_slice(&bytes).unwrap();
    assert_eq!(parsed, vc);
    assert!(verifier
        .resolve_and_verify_at(HOLDER_DID, &parsed, verification_time())
        .is_accepted());
}

#[test]
fn test_jws_field_name_accepted() {
    let verifier = CredentialVerifier::new(registry_with_university());
    let vc = degree_credential(&university(), HOLDER_DID);

    let mut json: serde_json::Value = serde_json::to_value(&vc).unwrap();
    let proof = json["proof"].as_object_mut().unwrap();
    let value = proof.remove("proofValue").unwrap();
    proof.insert("jws".into(), value);

    let parsed: VerifiableCredential = serde_json::from_value(json).unwrap();
    assert!(verifier
        .resolve_and_verify_at(HOLDER_DID, &parsed, verification_time())
        .is_accepted());
}

#[test]
fn test_empty_jws_string_denied() {
    let verifier = CredentialVerifier::new(registry_with_university());
    let vc = degree_credential(&university(), HOLDER_DID);

    let mut json: serde_json::Value = serde_json::to_value(&vc).unwrap();
    json["proof"]["proofValue"] = serde_json::Value::from("");

    let parsed: VerifiableCredential = serde_json::from_value(json).unwrap();
    assert_eq!(
        verifier.resolve_and_verify_at(HOLDER_DID, &parsed, verification_time()),
        Decision::Denied(VerificationError::InvalidSignature)
    );
}

#[test]
fn test_jws_compact_string_denied_as_invalid_signature() {
    let verifier = CredentialVerifier::new(registry_with_university());
    let vc = degree_credential(&university(), HOLDER_DID);

    let mut json: serde_json::Value = serde_json::to_value(&vc).unwrap();
    let proof = json["proof"].as_object_mut().unwrap();
    proof.remove("proofValue");
    proof.insert("jws".into(), "eyJhbGciOiJFZERTQSJ9..c2lnbmF0dXJl".into());

    let parsed = VerifiableCredential::from_json_slice(&serde_json::to_vec(&json).unwrap()).unwrap();
    assert_eq!(
        verifier.resolve_and_verify_at(HOLDER_DID, &parsed, verification_time()),
        Decision::Denied(VerificationError::InvalidSignature)
    );
}
