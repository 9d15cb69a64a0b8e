//! Integration test: credential bytes through the content store, then a reward
//! issued only on acceptance.

use phi_credentials::{CredentialVerifier, CredentialWallet, Decision, VerifiableCredential};
use phi_integration_tests::{
    degree_credential, registry_with_university, university, verification_time, HOLDER_DID,
};
use phi_services::{ContentId, ContentStore, MemoryContentStore, RewardCallback, RewardLedger, ServiceError};

/// Verify and, only on acceptance, credit the holder.
fn present_and_reward(
    verifier: &CredentialVerifier<phi_identity::DidRegistry>,
    ledger: &RewardLedger,
    vc: &VerifiableCredential,
    work_units: u64,
) -> (Decision, Option<u64>) {
    let decision = verifier.resolve_and_verify_at(HOLDER_DID, vc, verification_time());
    let balance = match decision {
        Decision::Accepted => Some(ledger.reward(HOLDER_DID, work_units).unwrap()),
        Decision::Denied(_) => None,
    };
    (decision, balance)
}

#[test]
fn test_store_fetch_verify_reward() {
    let verifier = CredentialVerifier::new(registry_with_university());
    let store = MemoryContentStore::new();
    let ledger = RewardLedger::new(2);
    ledger.register_provider(HOLDER_DID, "storage").unwrap();

    let vc = degree_credential(&university(), HOLDER_DID);
    let cid = store.store(&vc.to_json_bytes().unwrap()).unwrap();

    let fetched = VerifiableCredential::from_json_slice(&store.fetch(&cid).unwrap()).unwrap();
    let wallet = CredentialWallet::new(HOLDER_DID);
    wallet.store(fetched.clone()).unwrap();
    let presented = wallet.present(&fetched.id).unwrap();

    let (decision, balance) = present_and_reward(&verifier, &ledger, &presented, 10);
    assert_eq!(decision, Decision::Accepted);
    assert_eq!(balance, Some(20));
}

#[test]
fn test_denied_presentation_issues_no_reward() {
    let verifier = CredentialVerifier::new(registry_with_university());
    let ledger = RewardLedger::new(2);
    ledger.register_provider(HOLDER_DID, "storage").unwrap();

    let mut vc = degree_credential(&university(), HOLDER_DID);
    vc.proof.as_mut().unwrap().signature.clear();

    let (decision, balance) = present_and_reward(&verifier, &ledger, &vc, 10);
    assert!(!decision.is_accepted());
    assert_eq!(balance, None);
    assert_eq!(ledger.balance(HOLDER_DID), 0);
}

#[test]
fn test_same_credential_same_content_id() {
    let store = MemoryContentStore::new();
    let vc = degree_credential(&university(), HOLDER_DID);
    let bytes = vc.to_json_bytes().unwrap();

    let first = store.store(&bytes).unwrap();
    let second = store.store(&bytes).unwrap();
    assert_eq!(first, second);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_unknown_content_id() {
    let store = MemoryContentStore::new();
    let cid: ContentId = "b3:0000000000000000000000000000000000000000000000000000000000000000"
        .parse()
        .unwrap();
    assert!(matches!(store.fetch(&cid), Err(ServiceError::NotFound(_))));
}
