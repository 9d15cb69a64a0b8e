//! `phi demo`: register an issuer, issue a credential, store and fetch it by
//! content id, verify it, then reward the holder. Also runs the denial cases.

use chrono::{Duration, Utc};
use clap::Args;
use phi_core::{Did, PhiConfig};
use phi_credentials::{CredentialIssuer, CredentialVerifier, CredentialWallet, Decision, VerifiableCredential};
use phi_crypto::KeyPair;
use phi_identity::{DidRegistry, ResilientResolver};
use phi_services::{ContentStore, MemoryContentStore, RewardCallback, RewardLedger};
use serde_json::{Map, Value};
use std::sync::Arc;

const ISSUER_DID: &str = "did:phi:issuer-university-xyz";
const HOLDER_DID: &str = "did:phi:123456789abcdefghi";

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Work units credited to the holder after acceptance.
    #[arg(long, default_value_t = 10)]
    pub work_units: u64,

    /// Reward credited per work unit.
    #[arg(long, default_value_t = 1)]
    pub reward_rate: u64,
}

pub async fn run(args: &DemoArgs, config: &PhiConfig) -> anyhow::Result<()> {
    let registry = Arc::new(DidRegistry::new());
    let issuer = CredentialIssuer::new(Did::parse(ISSUER_DID)?, KeyPair::generate());
    registry.register(ISSUER_DID, issuer.did_document())?;
    println!("Registered issuer {}", ISSUER_DID);

    let verifier = CredentialVerifier::with_config(
        ResilientResolver::from_config(Arc::clone(&registry), &config.registry),
        config.verifier.clone(),
    );

    let mut claims = Map::new();
    claims.insert(
        "degree".into(),
        Value::from("Bachelor of Science in Network Engineering"),
    );
    let credential = issuer.issue(HOLDER_DID, vec!["UniversityDegreeCredential".into()], claims)?;
    println!("Issued credential {}", credential.id);

    let wallet = CredentialWallet::new(HOLDER_DID);
    wallet.store(credential.clone())?;

    let content = MemoryContentStore::new();
    let cid = content.store(&credential.to_json_bytes()?)?;
    println!("Stored credential at {}", cid);

    let fetched = VerifiableCredential::from_json_slice(&content.fetch(&cid)?)?;
    let presented = wallet.present(&fetched.id)?;

    let decision = verifier.resolve_and_verify_remote(HOLDER_DID, &presented).await;
    println!("Holder presents credential: {}", decision);

    if decision.is_accepted() {
        let ledger = RewardLedger::new(args.reward_rate);
        ledger.register_provider(HOLDER_DID, "storage")?;
        let balance = ledger.reward(HOLDER_DID, args.work_units)?;
        println!("Access granted; rewarded {} work units, balance {}", args.work_units, balance);
    }

    println!();
    println!("Denial cases:");

    let stranger = verifier.resolve_and_verify_remote("did:phi:999", &presented).await;
    print_case("presented by another holder", &stranger);

    let rogue = CredentialIssuer::new(Did::parse("did:phi:unregistered-issuer")?, KeyPair::generate());
    let unregistered = rogue.issue(HOLDER_DID, vec![], Map::new())?;
    let unresolvable = verifier.resolve_and_verify_remote(HOLDER_DID, &unregistered).await;
    print_case("issuer never registered", &unresolvable);

    let mut stripped = presented.clone();
    if let Some(proof) = stripped.proof.as_mut() {
        proof.signature.clear();
    }
    let empty = verifier.resolve_and_verify_remote(HOLDER_DID, &stripped).await;
    print_case("empty signature", &empty);

    let future = VerifiableCredential::new(ISSUER_DID, HOLDER_DID, vec![], Map::new())
        .with_issuance_date(Utc::now() + Duration::days(365));
    let future = issuer.sign(future)?;
    let early = verifier.resolve_and_verify_remote(HOLDER_DID, &future).await;
    print_case("issued one year from now", &early);

    Ok(())
}

fn print_case(label: &str, decision: &Decision) {
    println!("  {:<30} {}", label, decision);
}
