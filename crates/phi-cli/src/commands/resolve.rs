//! `phi resolve`: resolve a DID against a registry file.

use clap::Args;
use phi_core::PhiConfig;
use phi_identity::{DidResolver, ResilientResolver};
use std::path::PathBuf;

use super::load_registry;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Registry file (JSON array of DID Documents).
    #[arg(short, long)]
    pub registry: PathBuf,

    /// The DID to resolve.
    pub did: String,
}

pub async fn run(args: &ResolveArgs, config: &PhiConfig) -> anyhow::Result<()> {
    let resolver = ResilientResolver::from_config(load_registry(&args.registry)?, &config.registry);
    let document = resolver.resolve(&args.did).await?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
