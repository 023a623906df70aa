//! # TonVault TON
//!
//! TON (The Open Network) primitives used by the TonVault wallet vault.
//!
//! ## Features
//!
//! - CRC16-XMODEM checksum used by user-friendly addresses
//! - Raw (`workchain:hash`) and user-friendly (base64url, tagged, checksummed)
//!   address conversion
//! - TON 24-word mnemonic generation, validation and Ed25519 key derivation
//!
//! ## Example
//!
//! ```rust
//! use tonvault_ton::{friendly_to_raw, raw_to_friendly};
//!
//! let raw = "0:4e95324902a9671fa85343288b17ad6c45d93b2e2849166cc8f3aa1e9e0a0472";
//! let friendly = raw_to_friendly(raw, true, false)?;
//! assert!(friendly.starts_with("EQ"));
//! assert_eq!(friendly_to_raw(&friendly)?, raw);
//! # Ok::<(), tonvault_ton::TonError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod address;
pub mod mnemonic;

pub use address::{
    crc16, friendly_to_raw, is_valid_address, normalize_address, raw_to_friendly,
    AddressFlags, AddressFormat, TonAddress, FRIENDLY_ADDRESS_LEN,
};
pub use mnemonic::{Mnemonic, TonKeyPair, MNEMONIC_WORD_COUNT};

pub use tonvault_error::VaultError;

/// TON-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TonError {
    /// Invalid address format or checksum
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress {
        /// The rejected input
        address: String,
        /// Reason for rejection
        reason: String,
    },

    /// Invalid mnemonic phrase
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Key derivation failed
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Unknown network name
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
}

impl TonError {
    pub(crate) fn address(address: &str, reason: impl Into<String>) -> Self {
        TonError::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<TonError> for VaultError {
    fn from(e: TonError) -> Self {
        match e {
            TonError::InvalidAddress { address, reason } => {
                VaultError::InvalidAddress { address, reason }
            }
            TonError::InvalidMnemonic(msg) => VaultError::InvalidMnemonic(msg),
            TonError::KeyDerivation(msg) => VaultError::KeyDerivationError(msg),
            TonError::UnknownNetwork(name) => {
                VaultError::ConfigError(format!("unknown network '{name}'"))
            }
        }
    }
}

/// TON network selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TonNetwork {
    /// TON Mainnet
    #[default]
    Mainnet,
    /// TON Testnet
    Testnet,
}

impl TonNetwork {
    /// Returns the user-friendly address flags for this network
    pub fn address_flags(&self, bounceable: bool) -> AddressFlags {
        AddressFlags::new(bounceable, self.is_testnet())
    }

    /// Check if this is testnet
    pub fn is_testnet(&self) -> bool {
        matches!(self, TonNetwork::Testnet)
    }
}

impl fmt::Display for TonNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TonNetwork::Mainnet => write!(f, "mainnet"),
            TonNetwork::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for TonNetwork {
    type Err = TonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(TonNetwork::Mainnet),
            "testnet" => Ok(TonNetwork::Testnet),
            other => Err(TonError::UnknownNetwork(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ton_network_flags() {
        assert_eq!(TonNetwork::Mainnet.address_flags(true).tag(), 0x11);
        assert_eq!(TonNetwork::Mainnet.address_flags(false).tag(), 0x51);
        assert_eq!(TonNetwork::Testnet.address_flags(true).tag(), 0x91);
        assert_eq!(TonNetwork::Testnet.address_flags(false).tag(), 0xD1);
    }

    #[test]
    fn test_ton_network_parse() {
        assert_eq!("Mainnet".parse::<TonNetwork>().unwrap(), TonNetwork::Mainnet);
        assert_eq!("testnet".parse::<TonNetwork>().unwrap(), TonNetwork::Testnet);
        assert!("devnet".parse::<TonNetwork>().is_err());
        assert_eq!(TonNetwork::Testnet.to_string(), "testnet");
    }

    #[test]
    fn test_error_conversion_keeps_kind() {
        let err: VaultError = TonError::address("EQx", "Invalid CRC checksum").into();
        assert!(matches!(err, VaultError::InvalidAddress { .. }));
        assert!(err.to_string().contains("checksum"));

        let err: VaultError = TonError::InvalidMnemonic("20 words".into()).into();
        assert!(matches!(err, VaultError::InvalidMnemonic(_)));
    }
}
