//! # TonVault Error
//!
//! This crate provides the unified error type for the TonVault workspace.
//! The address codec, the encryption envelope and the wallet vault all
//! report failures through [`VaultError`], so callers can tell a bad password
//! apart from a missing wallet without string matching.
//!
//! ## Error Categories
//!
//! - Format errors: malformed addresses, mnemonics and ciphertext
//! - Authentication errors: wrong vault password or corrupted vault
//! - Lookup errors: wallet not found, wallet already exists
//! - Environment errors: IO, JSON, configuration
//!
//! ## Example
//!
//! ```
//! use tonvault_error::{VaultError, Result};
//!
//! fn require_label(label: &str) -> Result<()> {
//!     if label.is_empty() {
//!         return Err(VaultError::WalletNotFound(label.to_string()));
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use thiserror::Error;

/// The main error type for TonVault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    // ============ Format Errors ============
    /// Invalid address format or checksum
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress {
        /// The rejected address
        address: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid mnemonic phrase
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Key derivation failed
    #[error("Key derivation failed: {0}")]
    KeyDerivationError(String),

    /// Encrypted payload is structurally malformed (too short, bad base64)
    #[error("Invalid encrypted data: {0}")]
    InvalidCiphertext(String),

    // ============ Authentication Errors ============
    /// Wrong password or corrupted ciphertext
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// No vault password was supplied
    #[error("Password required")]
    PasswordRequired,

    // ============ Vault State Errors ============
    /// Wallet already exists
    #[error("Wallet already exists: {0}")]
    WalletExists(String),

    /// Wallet not found
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    // ============ IO Errors ============
    /// File IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ============ Generic ============
    /// Unknown/other error
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using VaultError
pub type Result<T> = std::result::Result<T, VaultError>;

// ============ From implementations for common error types ============

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::JsonError(err.to_string())
    }
}

impl From<base64::DecodeError> for VaultError {
    fn from(err: base64::DecodeError) -> Self {
        VaultError::InvalidCiphertext(format!("base64: {err}"))
    }
}

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u32)]
pub enum ErrorCode {
    /// Unknown error
    Unknown = 0,
    /// Invalid address
    InvalidAddress = 1001,
    /// Invalid mnemonic
    InvalidMnemonic = 1002,
    /// Malformed ciphertext
    InvalidCiphertext = 2001,
    /// Wrong password or corrupted vault
    DecryptionFailed = 2002,
    /// Key derivation failure
    KeyDerivation = 2003,
    /// No password supplied
    PasswordRequired = 2004,
    /// Wallet already stored
    WalletExists = 3001,
    /// Wallet not stored
    WalletNotFound = 3002,
    /// Filesystem failure
    Io = 4001,
    /// JSON failure
    Json = 4002,
    /// Configuration failure
    Config = 4003,
}

impl ErrorCode {
    /// Numeric value of the code
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl VaultError {
    /// Returns the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            VaultError::InvalidAddress { .. } => ErrorCode::InvalidAddress,
            VaultError::InvalidMnemonic(_) => ErrorCode::InvalidMnemonic,
            VaultError::KeyDerivationError(_) => ErrorCode::KeyDerivation,
            VaultError::InvalidCiphertext(_) => ErrorCode::InvalidCiphertext,
            VaultError::DecryptionFailed(_) => ErrorCode::DecryptionFailed,
            VaultError::PasswordRequired => ErrorCode::PasswordRequired,
            VaultError::WalletExists(_) => ErrorCode::WalletExists,
            VaultError::WalletNotFound(_) => ErrorCode::WalletNotFound,
            VaultError::IoError(_) => ErrorCode::Io,
            VaultError::JsonError(_) => ErrorCode::Json,
            VaultError::ConfigError(_) => ErrorCode::Config,
            VaultError::Other(_) => ErrorCode::Unknown,
        }
    }

    /// Returns true if the vault could not be opened with the given password.
    ///
    /// Callers must treat this as fatal: an unreadable vault is never the same
    /// thing as an empty one.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            VaultError::DecryptionFailed(_) | VaultError::InvalidCiphertext(_)
        )
    }

    /// Returns true for the normal negative result of a lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::WalletNotFound(_))
    }

    /// Short actionable hint for the user, if one applies
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            VaultError::InvalidAddress { .. } => Some(
                "Check the address format: raw is 'workchain:64 hex chars', \
                 user-friendly is 48 base64url characters",
            ),
            VaultError::InvalidMnemonic(_) => {
                Some("A TON mnemonic is exactly 24 words from the BIP-39 English wordlist")
            }
            VaultError::InvalidCiphertext(_) | VaultError::DecryptionFailed(_) => {
                Some("Check your password and try again")
            }
            VaultError::PasswordRequired => {
                Some("Pass --password or set WALLET_PASSWORD (a .env file works too)")
            }
            VaultError::WalletExists(_) => {
                Some("List wallets with 'wallet list' to see what is already stored")
            }
            VaultError::WalletNotFound(_) => {
                Some("List wallets with 'wallet list' or use the correct address")
            }
            VaultError::ConfigError(_) => Some("Inspect the configuration with 'config show'"),
            _ => None,
        }
    }
}
