//! Default file locations

use std::path::PathBuf;
use tonvault_error::{Result, VaultError};

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "TONVAULT_HOME";

/// Vault file name inside the data directory
pub const VAULT_FILE: &str = "wallets.enc";

/// Config file name inside the data directory
pub const CONFIG_FILE: &str = "config.json";

/// Returns the data directory: `$TONVAULT_HOME`, else `~/.openclaw/ton-skill`
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".openclaw").join("ton-skill"))
        .ok_or_else(|| VaultError::ConfigError("cannot determine home directory".into()))
}

/// Default vault path
pub fn default_vault_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(VAULT_FILE))
}
