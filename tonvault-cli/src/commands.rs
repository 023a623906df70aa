//! Command handlers. Each returns the JSON document to print.

use anyhow::Result;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::str::FromStr;
use tonvault_crypto::{decrypt_json, encrypt_json};
use tonvault_error::VaultError;
use tonvault_storage::{paths, WalletPatch, WalletRecord, WalletStorage, WalletVersion};
use tonvault_ton::{AddressFlags, Mnemonic, TonAddress};
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::Config;
use crate::{AddressCommands, Cli, Commands, ConfigCommands, WalletCommands};

/// Resolved password and data directory for one invocation
struct Context {
    password: Option<Zeroizing<String>>,
    home: Option<PathBuf>,
}

impl Context {
    fn home(&self) -> Result<PathBuf> {
        match &self.home {
            Some(home) => Ok(home.clone()),
            None => Ok(paths::data_dir()?),
        }
    }

    fn password(&self) -> Result<&str> {
        self.password
            .as_deref()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| VaultError::PasswordRequired.into())
    }

    fn config(&self) -> Result<Config> {
        Ok(Config::load(self.home()?.join(paths::CONFIG_FILE)))
    }

    fn storage(&self) -> Result<WalletStorage> {
        let password = self.password()?;
        Ok(WalletStorage::new(password, self.home()?.join(paths::VAULT_FILE)))
    }
}

/// Dispatches a parsed command line
pub fn run(cli: Cli) -> Result<Value> {
    let ctx = Context {
        password: cli.password.map(Zeroizing::new),
        home: cli.home,
    };

    match cli.command {
        Commands::Wallet(cmd) => wallet(&ctx, cmd),
        Commands::Address(cmd) => address(&ctx, cmd),
        Commands::Encrypt { data } => {
            let encrypted = encrypt_json(&json!({ "data": data }), ctx.password()?)?;
            Ok(json!({ "encrypted": encrypted }))
        }
        Commands::Decrypt { data } => Ok(decrypt_json::<Value>(&data, ctx.password()?)?),
        Commands::Config(cmd) => config(&ctx, cmd),
    }
}

fn wallet(ctx: &Context, cmd: WalletCommands) -> Result<Value> {
    match cmd {
        WalletCommands::Create { address, label, version } => {
            let storage = ctx.storage()?;
            let mnemonic = Mnemonic::generate()?;
            let label = match label {
                Some(label) => label,
                None => format!("wallet_{}", storage.get_wallets(false)?.len() + 1),
            };

            let record = new_record(ctx, &address, label, version, &mnemonic)?;
            let summary = summary(&record);
            storage.add_wallet(record)?;

            Ok(json!({
                "success": true,
                "wallet": summary,
                "mnemonic": mnemonic.words(),
                "warning": "Write down the mnemonic and keep it offline. It is shown only once.",
            }))
        }

        WalletCommands::Import { mnemonic, address, label, version } => {
            let storage = ctx.storage()?;
            let mnemonic = Mnemonic::parse(&mnemonic)?;
            let label = match label {
                Some(label) => label,
                None => format!("imported_{}", storage.get_wallets(false)?.len() + 1),
            };

            let record = new_record(ctx, &address, label, version, &mnemonic)?
                .with_extra("imported", json!(true));
            let summary = summary(&record);
            storage.add_wallet(record)?;

            Ok(json!({ "success": true, "wallet": summary }))
        }

        WalletCommands::Add {
            address,
            label,
            version,
            mnemonic,
            public_key,
            private_key,
            imported,
        } => {
            let storage = ctx.storage()?;
            let mut record = WalletRecord::new(friendly_address(ctx, &address)?)
                .with_version(version)
                .with_raw_address();
            if let Some(label) = label {
                record = record.with_label(label);
            }

            if let Some(phrase) = mnemonic {
                let mnemonic = Mnemonic::parse(&phrase)?;
                let key_pair = mnemonic.to_key_pair()?;
                record = record
                    .with_keys(key_pair.public_key_hex(), key_pair.private_key_hex().as_str())
                    .with_mnemonic(mnemonic.words().to_vec());
            }
            // Explicit keys win over derived ones
            if public_key.is_some() || private_key.is_some() {
                record.public_key = public_key.or(record.public_key);
                record.private_key = private_key.or(record.private_key);
            }
            if imported {
                record = record.with_extra("imported", json!(true));
            }

            let summary = summary(&record);
            storage.add_wallet(record)?;
            Ok(json!({ "success": true, "wallet": summary }))
        }

        WalletCommands::List => {
            let wallets: Vec<Value> =
                ctx.storage()?.get_wallets(false)?.iter().map(summary).collect();
            Ok(json!({ "success": true, "count": wallets.len(), "wallets": wallets }))
        }

        WalletCommands::Show { wallet } => {
            let storage = ctx.storage()?;
            let identifier = resolve_identifier(ctx, wallet)?;
            let record = find(&storage, &identifier, false)?;
            Ok(json!({ "success": true, "wallet": record }))
        }

        WalletCommands::Label { wallet, new_label } => {
            let storage = ctx.storage()?;
            let record = find(&storage, &wallet, false)?;
            let old_label = record.label.clone();
            let updated =
                storage.update_wallet(&record.address, WalletPatch::new().label(&new_label))?;
            Ok(json!({
                "success": true,
                "address": updated.address,
                "old_label": old_label,
                "new_label": updated.label,
            }))
        }

        WalletCommands::Remove { wallet } => {
            let storage = ctx.storage()?;
            let record = find(&storage, &wallet, false)?;
            let removed = storage.remove_wallet(&record.address)?;
            Ok(json!({
                "success": true,
                "removed": { "label": removed.label, "address": removed.address },
            }))
        }

        WalletCommands::Export { wallet } => {
            let storage = ctx.storage()?;
            let identifier = resolve_identifier(ctx, wallet)?;
            let record = find(&storage, &identifier, true)?;
            let mnemonic = record
                .mnemonic
                .clone()
                .ok_or_else(|| {
                    VaultError::Other(format!("Wallet '{}' has no stored mnemonic", record.label))
                })?;
            Ok(json!({
                "success": true,
                "label": record.label,
                "address": record.address,
                "mnemonic": mnemonic,
                "warning": "Anyone with this mnemonic controls the wallet.",
            }))
        }
    }
}

fn address(ctx: &Context, cmd: AddressCommands) -> Result<Value> {
    match cmd {
        AddressCommands::ToRaw { address } => {
            let (parsed, flags) = TonAddress::parse_friendly(&address)?;
            Ok(json!({
                "raw": parsed.to_raw(),
                "friendly": address,
                "bounceable": flags.bounceable,
                "testnet": flags.testnet,
            }))
        }

        AddressCommands::ToFriendly { address, non_bounceable, testnet } => {
            let parsed = TonAddress::from_str(&address)?;
            let testnet = testnet || ctx.config()?.network().is_testnet();
            let flags = AddressFlags::new(!non_bounceable, testnet);
            Ok(json!({
                "raw": parsed.to_raw(),
                "friendly": parsed.to_friendly(flags),
                "bounceable": flags.bounceable,
                "testnet": flags.testnet,
            }))
        }

        AddressCommands::Validate { address } => {
            let format = if address.contains(':') { "raw" } else { "friendly" };
            let valid = TonAddress::from_str(&address).is_ok();
            Ok(json!({ "address": address, "valid": valid, "format": format }))
        }
    }
}

fn config(ctx: &Context, cmd: ConfigCommands) -> Result<Value> {
    let mut config = ctx.config()?;
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).cloned().unwrap_or(Value::Null);
            Ok(json!({ "key": key, "value": value }))
        }
        ConfigCommands::Set { key, value } => {
            let parsed = serde_json::from_str(&value).unwrap_or(Value::String(value));
            config.set(&key, parsed.clone())?;
            config.save()?;
            Ok(json!({ "success": true, "key": key, "value": parsed }))
        }
        ConfigCommands::Show => Ok(Value::Object(config.values().clone())),
    }
}

/// Builds a record holding `mnemonic` and the keys derived from it
fn new_record(
    ctx: &Context,
    address: &str,
    label: String,
    version: WalletVersion,
    mnemonic: &Mnemonic,
) -> Result<WalletRecord> {
    let key_pair = mnemonic.to_key_pair()?;
    Ok(WalletRecord::new(friendly_address(ctx, address)?)
        .with_label(label)
        .with_version(version)
        .with_raw_address()
        .with_keys(key_pair.public_key_hex(), key_pair.private_key_hex().as_str())
        .with_mnemonic(mnemonic.words().to_vec()))
}

/// Validates `address` and returns its user-friendly form. Friendly input
/// is kept as typed; raw input is rendered bounceable for the configured
/// network.
fn friendly_address(ctx: &Context, address: &str) -> Result<String> {
    let parsed = TonAddress::from_str(address)?;
    if !address.contains(':') {
        return Ok(address.to_string());
    }
    let network = ctx.config()?.network();
    debug!(%network, "rendering raw address");
    Ok(parsed.to_friendly(network.address_flags(true)))
}

/// Falls back to the configured default wallet
fn resolve_identifier(ctx: &Context, wallet: Option<String>) -> Result<String> {
    match wallet {
        Some(wallet) => Ok(wallet),
        None => ctx
            .config()?
            .default_wallet()
            .map(str::to_owned)
            .ok_or_else(|| {
                VaultError::ConfigError(
                    "no wallet given and no default_wallet configured".into(),
                )
                .into()
            }),
    }
}

fn find(storage: &WalletStorage, identifier: &str, include_secrets: bool) -> Result<WalletRecord> {
    storage
        .get_wallet(identifier, include_secrets)?
        .ok_or_else(|| VaultError::WalletNotFound(identifier.to_string()).into())
}

/// Fields shown by `wallet list` and after mutations
fn summary(record: &WalletRecord) -> Value {
    json!({
        "label": record.label,
        "address": record.address,
        "version": record.version,
        "created_at": record.created_at,
    })
}
