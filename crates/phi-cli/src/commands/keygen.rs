//! `phi keygen`: generate a key pair and its DID Document.

use clap::Args;
use phi_core::Did;
use phi_crypto::KeyPair;
use phi_identity::DidDocument;

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Derive the key pair from this 32-byte hex seed instead of generating one.
    #[arg(long)]
    pub seed: Option<String>,

    /// DID for the document. Defaults to `did:phi:<base58 public key>`.
    #[arg(long)]
    pub did: Option<String>,
}

pub fn run(args: &KeygenArgs) -> anyhow::Result<()> {
    let keypair = match &args.seed {
        Some(seed) => KeyPair::from_seed_hex(seed)?,
        None => KeyPair::generate(),
    };
    let public_key = keypair.public_key();

    let did = match &args.did {
        Some(did) => Did::parse(did)?,
        None => Did::from_parts("phi", &public_key.to_bs58())?,
    };
    let document = DidDocument::for_key(did, &public_key);

    println!("Seed (keep secret): {}", keypair.seed_hex());
    println!("Public key:         {}", public_key.to_bs58());
    println!();
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
