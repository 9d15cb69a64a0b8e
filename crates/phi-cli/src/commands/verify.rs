//! `phi verify`: decide whether a holder may present a credential.

use clap::Args;
use phi_core::PhiConfig;
use phi_credentials::{CredentialVerifier, Decision, VerifiableCredential};
use phi_identity::ResilientResolver;
use std::path::PathBuf;

use super::{load_registry, read_file_or_inline};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Registry file (JSON array of DID Documents).
    #[arg(short, long)]
    pub registry: PathBuf,

    /// DID of the entity presenting the credential.
    #[arg(long)]
    pub holder: String,

    /// Credential JSON (as string or path to file).
    #[arg(short, long)]
    pub credential: String,
}

pub async fn run(args: &VerifyArgs, config: &PhiConfig) -> anyhow::Result<()> {
    let json = read_file_or_inline(&args.credential)?;
    let credential = VerifiableCredential::from_json_slice(json.as_bytes())?;

    let resolver = ResilientResolver::from_config(load_registry(&args.registry)?, &config.registry);
    let verifier = CredentialVerifier::with_config(resolver, config.verifier.clone());

    let decision = verifier.resolve_and_verify_remote(&args.holder, &credential).await;
    println!("{}", decision);

    match decision {
        Decision::Accepted => Ok(()),
        Decision::Denied(reason) => anyhow::bail!("credential denied ({})", reason.code()),
    }
}
