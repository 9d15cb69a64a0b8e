//! Phi CLI: key generation, credential issuance, DID resolution, and
//! credential verification against a registry file.
//!
//! Subcommands: keygen, issue, resolve, verify, demo.

mod commands;

use clap::{Parser, Subcommand};
use phi_core::PhiConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Phi: decentralized identity resolution and credential verification.
#[derive(Parser, Debug)]
#[command(name = "phi", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "phi.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Override the log format (text, json).
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Override the verifier's clock-skew tolerance in seconds.
    #[arg(long, global = true)]
    clock_skew_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a key pair and a DID Document for it.
    Keygen(commands::keygen::KeygenArgs),
    /// Issue a signed verifiable credential.
    Issue(commands::issue::IssueArgs),
    /// Resolve a DID against a registry file.
    Resolve(commands::resolve::ResolveArgs),
    /// Verify a credential presented by a holder.
    Verify(commands::verify::VerifyArgs),
    /// Run the end-to-end flow in memory.
    Demo(commands::demo::DemoArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = PhiConfig::load(&cli.config)?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    if let Some(skew) = cli.clock_skew_secs {
        config.verifier.clock_skew_secs = skew;
    }

    init_tracing(&config)?;

    match &cli.command {
        Commands::Keygen(args) => commands::keygen::run(args),
        Commands::Issue(args) => commands::issue::run(args),
        Commands::Resolve(args) => commands::resolve::run(args, &config).await,
        Commands::Verify(args) => commands::verify::run(args, &config).await,
        Commands::Demo(args) => commands::demo::run(args, &config).await,
    }
}

fn init_tracing(config: &PhiConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match config.logging.format.as_str() {
        "json" => builder.json().init(),
        "text" => builder.init(),
        other => anyhow::bail!("unknown log format '{}' (expected text or json)", other),
    }
    Ok(())
}
