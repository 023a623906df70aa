//! TonVault CLI
//!
//! Encrypted TON wallet vault, address conversion and configuration.
//! Every command prints a single JSON document on stdout; logs go to stderr.

mod commands;
mod config;
mod types;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tonvault_storage::WalletVersion;
use tracing_subscriber::EnvFilter;
use types::ErrorOutput;

#[derive(Parser)]
#[command(name = "tonvault")]
#[command(about = "Encrypted TON wallet vault and address tools", version)]
pub struct Cli {
    /// Vault password
    #[arg(short, long, global = true, env = "WALLET_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Directory holding wallets.enc and config.json (default: ~/.openclaw/ton-skill)
    #[arg(long, global = true, env = "TONVAULT_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wallet vault commands
    #[command(subcommand)]
    Wallet(WalletCommands),
    /// Address formatting
    #[command(subcommand)]
    Address(AddressCommands),
    /// Encrypt a string into a base64 envelope
    Encrypt {
        /// Data to encrypt
        #[arg(short, long)]
        data: String,
    },
    /// Decrypt a base64 envelope
    Decrypt {
        /// Encrypted data (base64)
        #[arg(short, long)]
        data: String,
    },
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Generate a new mnemonic and store it under the given address
    Create {
        /// Wallet address (raw or user-friendly)
        #[arg(short, long)]
        address: String,
        /// Label (default: wallet_N)
        #[arg(short, long)]
        label: Option<String>,
        /// Wallet contract version
        #[arg(long, default_value = "v4r2", value_parser = WalletVersion::from_str)]
        version: WalletVersion,
    },
    /// Import an existing 24-word mnemonic
    Import {
        /// Space separated mnemonic
        #[arg(short, long)]
        mnemonic: String,
        /// Wallet address (raw or user-friendly)
        #[arg(short, long)]
        address: String,
        /// Label (default: imported_N)
        #[arg(short, long)]
        label: Option<String>,
        /// Wallet contract version
        #[arg(long, default_value = "v4r2", value_parser = WalletVersion::from_str)]
        version: WalletVersion,
    },
    /// Store a wallet record as given
    Add {
        /// Wallet address (raw or user-friendly)
        #[arg(short, long)]
        address: String,
        /// Label
        #[arg(short, long)]
        label: Option<String>,
        /// Wallet contract version
        #[arg(long, default_value = "v4r2", value_parser = WalletVersion::from_str)]
        version: WalletVersion,
        /// Mnemonic; keys are derived from it unless given explicitly
        #[arg(short, long)]
        mnemonic: Option<String>,
        /// Public key (hex)
        #[arg(long)]
        public_key: Option<String>,
        /// Private key (hex)
        #[arg(long)]
        private_key: Option<String>,
        /// Mark the wallet as imported
        #[arg(long)]
        imported: bool,
    },
    /// List wallets (no secrets)
    List,
    /// Show one wallet (no secrets)
    Show {
        /// Label or address (default: configured default_wallet)
        wallet: Option<String>,
    },
    /// Rename a wallet
    Label {
        /// Label or address
        wallet: String,
        /// New label
        new_label: String,
    },
    /// Remove a wallet from the vault
    Remove {
        /// Label or address
        wallet: String,
    },
    /// Print a wallet's mnemonic
    Export {
        /// Label or address (default: configured default_wallet)
        wallet: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AddressCommands {
    /// Convert to raw format
    ToRaw {
        /// User-friendly address
        address: String,
    },
    /// Convert to user-friendly format
    ToFriendly {
        /// Raw address
        address: String,
        /// Render the non-bounceable (UQ) form
        #[arg(long)]
        non_bounceable: bool,
        /// Render the testnet form
        #[arg(long)]
        testnet: bool,
    },
    /// Check whether a string is a valid address
    Validate {
        /// Address to validate
        address: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a value (dot notation)
    Get {
        /// Config key, e.g. limits.max_transfer_ton
        key: String,
    },
    /// Set a value (dot notation); the value is parsed as JSON when possible
    Set {
        /// Config key
        key: String,
        /// Value to set
        value: String,
    },
    /// Show the whole config
    Show,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: failed to render output: {e}"),
    }
}

fn main() -> ExitCode {
    // .env must be read before clap resolves env-backed arguments
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match commands::run(cli) {
        Ok(output) => {
            print_json(&output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            print_json(&ErrorOutput::from_error(&err));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "EQDtFpEwcFAEcRe5mLVh2N6C0x-_hJEM7W61_JLnSF74p4q2";

    fn parsed_version(args: &[&str]) -> Result<WalletVersion, clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        match cli.command {
            Commands::Wallet(WalletCommands::Create { version, .. })
            | Commands::Wallet(WalletCommands::Import { version, .. })
            | Commands::Wallet(WalletCommands::Add { version, .. }) => Ok(version),
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_version_defaults_and_known_values() {
        let version = parsed_version(&["tonvault", "wallet", "add", "--address", ADDRESS]).unwrap();
        assert_eq!(version, WalletVersion::V4R2);

        let version = parsed_version(&[
            "tonvault", "wallet", "create", "--address", ADDRESS, "--version", "V3R2",
        ])
        .unwrap();
        assert_eq!(version, WalletVersion::V3R2);
    }

    #[test]
    fn test_unknown_version_rejected_on_every_wallet_command() {
        for args in [
            vec!["tonvault", "wallet", "add", "--address", ADDRESS, "--version", "v9"],
            vec!["tonvault", "wallet", "create", "--address", ADDRESS, "--version", "v5r1"],
            vec![
                "tonvault", "wallet", "import", "-m", "x", "--address", ADDRESS, "--version", "v2",
            ],
        ] {
            let err = parsed_version(&args).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "{args:?}");
        }
    }
}
