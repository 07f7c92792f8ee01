use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hwkey_hsm::{DerivationPath, Discovery, HsmConfig, HsmDeviceType, LedgerKey, LedgerKeyRecord};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "hwkey", about = "Use a Ledger-held secp256k1 key from the command line")]
struct CliArgs {
    /// TOML configuration file
    #[arg(long, env = "HWKEY_CONFIG")]
    config: Option<PathBuf>,

    /// Use the software device instead of hardware
    #[arg(long)]
    simulate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the public key and address for a path
    Pubkey(PathArgs),

    /// Write the key record (public key and path) to a file
    Export {
        #[command(flatten)]
        path: PathArgs,

        /// Destination file
        #[arg(long)]
        out: PathBuf,
    },

    /// Check a stored key record against the connected device
    Validate {
        /// Record written by `export`
        #[arg(long)]
        record: PathBuf,
    },

    /// Sign a message, confirming the address on the device first
    Sign {
        #[command(flatten)]
        path: PathArgs,

        #[command(flatten)]
        message: MessageArgs,
    },
}

#[derive(Args, Debug)]
struct PathArgs {
    /// Derivation path, e.g. 44/118/0/0/0 or m/44'/118'/0'/0/0
    #[arg(long, default_value = "44/118/0/0/0")]
    path: DerivationPath,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct MessageArgs {
    /// Message as UTF-8 text
    #[arg(long)]
    message: Option<String>,

    /// Message as hex
    #[arg(long)]
    message_hex: Option<String>,
}

impl MessageArgs {
    fn bytes(&self) -> anyhow::Result<Vec<u8>> {
        match (&self.message, &self.message_hex) {
            (Some(text), _) => Ok(text.as_bytes().to_vec()),
            (None, Some(encoded)) => hex::decode(encoded).context("--message-hex is not hex"),
            (None, None) => anyhow::bail!("no message given"),
        }
    }
}

fn load_config(args: &CliArgs) -> anyhow::Result<HsmConfig> {
    let mut config = match &args.config {
        Some(path) => HsmConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => HsmConfig::default(),
    };
    if args.simulate {
        config.device_type = HsmDeviceType::Simulation;
    }
    Ok(config)
}

fn run(
    command: Command,
    discovery: &Discovery,
    config: &HsmConfig,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Command::Pubkey(args) => {
            let key = LedgerKey::new(args.path, discovery, config)?;
            writeln!(out, "path:       {}", key.path())?;
            writeln!(out, "public key: {}", key.public_key())?;
            writeln!(out, "address:    {}", key.display_address())?;
        }
        Command::Export { path, out: file } => {
            let key = LedgerKey::new(path.path, discovery, config)?;
            std::fs::write(&file, key.to_bytes()?)
                .with_context(|| format!("failed to write {}", file.display()))?;
            writeln!(out, "exported {} to {}", key.path(), file.display())?;
        }
        Command::Validate { record } => {
            let bytes = std::fs::read(&record)
                .with_context(|| format!("failed to read {}", record.display()))?;
            let record = LedgerKeyRecord::from_bytes(&bytes)?;
            let key = LedgerKey::restore(record, discovery, config)?;
            writeln!(out, "key {} matches device", key.public_key())?;
        }
        Command::Sign { path, message } => {
            let message = message.bytes()?;
            let mut key = LedgerKey::new(path.path, discovery, config)?;
            let signature = key.sign_interactive(&message)?;
            writeln!(out, "{}", hex::encode(signature))?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hwkey=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    let discovery = Discovery::from_config(&config)?;
    tracing::debug!(device = %config.device_type, "discovery registered");

    run(args.command, &discovery, &config, &mut io::stdout())
}
