//! `phi issue`: sign a verifiable credential with an issuer seed.

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Args;
use phi_core::Did;
use phi_credentials::CredentialIssuer;
use phi_crypto::KeyPair;

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Issuer's 32-byte hex seed.
    #[arg(long)]
    pub seed: String,

    /// Issuer DID.
    #[arg(short, long)]
    pub issuer: String,

    /// Subject DID to issue the credential to.
    #[arg(short, long)]
    pub subject: String,

    /// Credential type(s), comma-separated.
    #[arg(short = 't', long = "type", value_delimiter = ',')]
    pub credential_type: Vec<String>,

    /// Claims as a JSON object.
    #[arg(short, long, default_value = "{}")]
    pub claims: String,

    /// Expire the credential this many days from now.
    #[arg(long)]
    pub expires_in_days: Option<i64>,
}

pub fn run(args: &IssueArgs) -> anyhow::Result<()> {
    let claims: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&args.claims).context("claims must be a JSON object")?;

    let issuer = CredentialIssuer::new(Did::parse(&args.issuer)?, KeyPair::from_seed_hex(&args.seed)?);
    let credential = match args.expires_in_days {
        Some(days) => issuer.issue_with_expiration(
            &args.subject,
            args.credential_type.clone(),
            claims,
            Utc::now() + Duration::days(days),
        )?,
        None => issuer.issue(&args.subject, args.credential_type.clone(), claims)?,
    };

    println!("{}", serde_json::to_string_pretty(&credential)?);
    Ok(())
}
