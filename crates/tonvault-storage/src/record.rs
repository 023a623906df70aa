//! Vault document and wallet records

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tonvault_ton::TonAddress;

use tonvault_error::VaultError;

/// Current vault document format
pub const VAULT_FORMAT_VERSION: u32 = 1;

/// Fields stripped from records returned without secrets
pub const SECRET_FIELDS: [&str; 3] = ["mnemonic", "private_key", "secret_key"];

/// Keys owned by typed [`WalletRecord`] fields. They never live in `extra`.
const TYPED_FIELDS: [&str; 8] = [
    "address",
    "address_raw",
    "label",
    "public_key",
    "private_key",
    "mnemonic",
    "version",
    "created_at",
];

/// Wallet contract version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WalletVersion {
    /// Wallet v3 revision 2
    V3R2,
    /// Wallet v4 revision 2
    #[default]
    V4R2,
    /// Any other version string found in a vault, kept verbatim
    Other(String),
}

impl WalletVersion {
    /// Canonical lower-case name
    pub fn as_str(&self) -> &str {
        match self {
            WalletVersion::V3R2 => "v3r2",
            WalletVersion::V4R2 => "v4r2",
            WalletVersion::Other(name) => name,
        }
    }
}

impl From<String> for WalletVersion {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "v3r2" => WalletVersion::V3R2,
            "v4r2" => WalletVersion::V4R2,
            _ => WalletVersion::Other(s),
        }
    }
}

impl From<WalletVersion> for String {
    fn from(v: WalletVersion) -> Self {
        v.as_str().to_string()
    }
}

impl FromStr for WalletVersion {
    type Err = VaultError;

    /// Strict parse for user input: only known versions are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match WalletVersion::from(s.to_string()) {
            WalletVersion::Other(name) => Err(VaultError::ConfigError(format!(
                "unsupported wallet version '{name}', expected v3r2 or v4r2"
            ))),
            known => Ok(known),
        }
    }
}

impl fmt::Display for WalletVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One wallet in the vault.
///
/// `address` is the uniqueness key. Fields this type does not know about
/// are kept in `extra` and written back unchanged.
#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WalletRecord {
    /// User-friendly address
    pub address: String,
    /// Cached raw rendering of `address`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_raw: Option<String>,
    /// Display name, matched case-insensitively
    #[serde(default)]
    pub label: String,
    /// Ed25519 public key (hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Ed25519 secret key (hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// 24 mnemonic words
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<Vec<String>>,
    /// Wallet contract version
    #[serde(default)]
    pub version: WalletVersion,
    /// ISO-8601 creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Unknown fields, preserved across load/save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WalletRecord {
    /// Creates a record for `address` with a `created_at` of now
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            created_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            ..Default::default()
        }
    }

    /// Sets the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the wallet version
    pub fn with_version(mut self, version: WalletVersion) -> Self {
        self.version = version;
        self
    }

    /// Sets the key material
    pub fn with_keys(
        mut self,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        self.public_key = Some(public_key.into());
        self.private_key = Some(private_key.into());
        self
    }

    /// Sets the mnemonic words
    pub fn with_mnemonic(mut self, words: Vec<String>) -> Self {
        self.mnemonic = Some(words);
        self
    }

    /// Fills `address_raw` from `address` when it parses
    pub fn with_raw_address(mut self) -> Self {
        self.address_raw = TonAddress::from_str(&self.address)
            .ok()
            .map(|a| a.to_raw());
        self
    }

    /// Sets an extra field. Names of typed fields are ignored.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !TYPED_FIELDS.contains(&key.as_str()) {
            self.extra.insert(key, value);
        }
        self
    }

    /// Returns true if the record carries any of [`SECRET_FIELDS`]
    pub fn has_secrets(&self) -> bool {
        SECRET_FIELDS.iter().any(|field| match *field {
            "mnemonic" => self.mnemonic.is_some(),
            "private_key" => self.private_key.is_some(),
            other => self.extra.contains_key(other),
        })
    }

    /// Returns a copy without any of [`SECRET_FIELDS`]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for field in SECRET_FIELDS {
            match field {
                "mnemonic" => copy.mnemonic = None,
                "private_key" => copy.private_key = None,
                other => {
                    copy.extra.remove(other);
                }
            }
        }
        copy
    }

    /// Label (case-insensitive) or exact address match
    pub fn matches_exact(&self, identifier: &str) -> bool {
        self.label.to_lowercase() == identifier.to_lowercase() || self.address == identifier
    }

    /// [`Self::matches_exact`], falling back to comparing both addresses in
    /// any format. Unparseable addresses never match.
    pub fn matches(&self, identifier: &str) -> bool {
        if self.matches_exact(identifier) {
            return true;
        }
        match (
            TonAddress::from_str(&self.address),
            TonAddress::from_str(identifier),
        ) {
            (Ok(ours), Ok(theirs)) => ours == theirs,
            _ => false,
        }
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("address", &self.address)
            .field("label", &self.label)
            .field("version", &self.version)
            .field("has_secrets", &self.has_secrets())
            .finish_non_exhaustive()
    }
}

/// Partial update for a [`WalletRecord`].
///
/// `address` is not patchable; remove the wallet and add it again instead.
#[derive(Clone, Default)]
pub struct WalletPatch {
    /// New label
    pub label: Option<String>,
    /// New raw address cache
    pub address_raw: Option<String>,
    /// New public key
    pub public_key: Option<String>,
    /// New private key
    pub private_key: Option<String>,
    /// New mnemonic
    pub mnemonic: Option<Vec<String>>,
    /// New version
    pub version: Option<WalletVersion>,
    /// New creation time
    pub created_at: Option<String>,
    /// Extra fields to set
    pub extra: Map<String, Value>,
}

impl WalletPatch {
    /// Creates an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the version
    pub fn version(mut self, version: WalletVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the key material
    pub fn keys(mut self, public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self.private_key = Some(private_key.into());
        self
    }

    /// Sets the mnemonic
    pub fn mnemonic(mut self, words: Vec<String>) -> Self {
        self.mnemonic = Some(words);
        self
    }

    /// Sets an extra field
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Returns true if applying the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.address_raw.is_none()
            && self.public_key.is_none()
            && self.private_key.is_none()
            && self.mnemonic.is_none()
            && self.version.is_none()
            && self.created_at.is_none()
            && self.extra.is_empty()
    }

    /// Shallow-merges the patch into `record`
    pub fn apply(self, record: &mut WalletRecord) {
        if let Some(label) = self.label {
            record.label = label;
        }
        if let Some(raw) = self.address_raw {
            record.address_raw = Some(raw);
        }
        if let Some(public_key) = self.public_key {
            record.public_key = Some(public_key);
        }
        if let Some(private_key) = self.private_key {
            record.private_key = Some(private_key);
        }
        if let Some(mnemonic) = self.mnemonic {
            record.mnemonic = Some(mnemonic);
        }
        if let Some(version) = self.version {
            record.version = version;
        }
        if let Some(created_at) = self.created_at {
            record.created_at = Some(created_at);
        }
        for (key, value) in self.extra {
            if !TYPED_FIELDS.contains(&key.as_str()) {
                record.extra.insert(key, value);
            }
        }
    }
}

impl fmt::Debug for WalletPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletPatch")
            .field("label", &self.label)
            .field("version", &self.version)
            .field("extra_keys", &self.extra.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Decrypted vault contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultDocument {
    /// Stored wallets, in insertion order
    #[serde(default)]
    pub wallets: Vec<WalletRecord>,
    /// Document format version
    #[serde(default = "default_format_version")]
    pub version: u32,
    /// Unknown top-level keys, preserved across load/save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_format_version() -> u32 {
    VAULT_FORMAT_VERSION
}

impl Default for VaultDocument {
    fn default() -> Self {
        Self {
            wallets: Vec::new(),
            version: VAULT_FORMAT_VERSION,
            extra: Map::new(),
        }
    }
}

impl VaultDocument {
    /// Position of the first wallet with exactly this address
    pub fn position_by_address(&self, address: &str) -> Option<usize> {
        self.wallets.iter().position(|w| w.address == address)
    }

    /// Position of the first wallet matching by label or exact address
    pub fn position_exact(&self, identifier: &str) -> Option<usize> {
        self.wallets.iter().position(|w| w.matches_exact(identifier))
    }
}
