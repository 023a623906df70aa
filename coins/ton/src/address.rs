//! TON address codec.
//!
//! A TON account is identified by a workchain id and a 32-byte hash. The raw
//! form is `"<workchain>:<64 hex chars>"`. The user-friendly form is the
//! base64url encoding (no padding) of 36 bytes:
//!
//! ```text
//! tag(1) | workchain(1, signed) | hash(32) | crc16(2, big-endian)
//! ```
//!
//! The tag carries the bounceable bit (`0x11` vs `0x51`) and the testnet bit
//! (`0x80`). The CRC16-XMODEM over the first 34 bytes is the only typo
//! protection the format has.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use crc::{Crc, CRC_16_XMODEM};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TonError;

/// Length of a user-friendly address string
pub const FRIENDLY_ADDRESS_LEN: usize = 48;

const FRIENDLY_BYTES_LEN: usize = 36;
const CHECKSUMMED_LEN: usize = 34;

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TESTNET: u8 = 0x80;

/// CRC16-XMODEM calculator (poly 0x1021, init 0, no reflection, no xorout)
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Computes CRC-16/XMODEM over `data`.
pub fn crc16(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}

/// Flags carried in the tag byte of a user-friendly address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressFlags {
    /// Bounceable (`0x11`) or non-bounceable (`0x51`)
    pub bounceable: bool,
    /// Testnet-only address (`| 0x80`)
    pub testnet: bool,
}

impl AddressFlags {
    /// Creates a new flag set
    pub fn new(bounceable: bool, testnet: bool) -> Self {
        Self { bounceable, testnet }
    }

    /// Encodes the flags as a tag byte
    pub fn tag(&self) -> u8 {
        let mut tag = if self.bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if self.testnet {
            tag |= TAG_TESTNET;
        }
        tag
    }

    /// Decodes a tag byte. Unknown tags are not rejected; the non-bounceable
    /// bit (`0x40`) and the testnet bit are read as-is.
    pub fn from_tag(tag: u8) -> Self {
        Self {
            bounceable: tag & (TAG_BOUNCEABLE ^ TAG_NON_BOUNCEABLE) == 0,
            testnet: tag & TAG_TESTNET != 0,
        }
    }
}

impl Default for AddressFlags {
    fn default() -> Self {
        Self::new(true, false)
    }
}

/// Target representation for [`normalize_address`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFormat {
    /// `workchain:hex`
    Raw,
    /// 48-char base64url
    Friendly,
}

impl FromStr for AddressFormat {
    type Err = TonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(AddressFormat::Raw),
            "friendly" => Ok(AddressFormat::Friendly),
            other => Err(TonError::address(other, "unknown address format")),
        }
    }
}

/// TON address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TonAddress {
    /// Workchain ID (0 for basechain, -1 for masterchain)
    pub workchain: i8,
    /// Account ID (32 bytes hash)
    pub hash: [u8; 32],
}

impl TonAddress {
    /// Creates a new address
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    /// Creates an address from raw format (workchain:hash)
    pub fn from_raw(raw: &str) -> Result<Self, TonError> {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() != 2 {
            return Err(TonError::address(raw, "Expected format: workchain:hash"));
        }

        let workchain = parts[0]
            .trim()
            .parse::<i64>()
            .map_err(|_| TonError::address(raw, "Invalid workchain"))?;
        let workchain = i8::try_from(workchain)
            .map_err(|_| TonError::address(raw, "Workchain does not fit in a signed byte"))?;

        let hash_hex = parts[1].strip_prefix("0x").unwrap_or(parts[1]);
        let hash_bytes =
            hex::decode(hash_hex).map_err(|e| TonError::address(raw, e.to_string()))?;
        let hash: [u8; 32] = hash_bytes.as_slice().try_into().map_err(|_| {
            TonError::address(
                raw,
                format!("Hash must be 32 bytes, got {}", hash_bytes.len()),
            )
        })?;

        Ok(Self { workchain, hash })
    }

    /// Creates an address from user-friendly base64 format
    pub fn from_friendly(addr: &str) -> Result<Self, TonError> {
        Self::parse_friendly(addr).map(|(address, _)| address)
    }

    /// Parses a user-friendly address and returns the tag flags with it
    pub fn parse_friendly(addr: &str) -> Result<(Self, AddressFlags), TonError> {
        // Handle both standard base64 and URL-safe base64
        let mut normalized = addr.replace('-', "+").replace('_', "/");
        while normalized.len() % 4 != 0 {
            normalized.push('=');
        }

        let bytes = STANDARD
            .decode(&normalized)
            .map_err(|e| TonError::address(addr, e.to_string()))?;

        if bytes.len() != FRIENDLY_BYTES_LEN {
            return Err(TonError::address(
                addr,
                format!(
                    "Invalid address length: {}, expected {}",
                    bytes.len(),
                    FRIENDLY_BYTES_LEN
                ),
            ));
        }

        let (data, checksum) = bytes.split_at(CHECKSUMMED_LEN);
        let expected_crc = u16::from_be_bytes([checksum[0], checksum[1]]);
        if crc16(data) != expected_crc {
            return Err(TonError::address(addr, "Invalid CRC checksum"));
        }

        let flags = AddressFlags::from_tag(bytes[0]);
        let workchain = bytes[1] as i8;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..CHECKSUMMED_LEN]);

        Ok((Self { workchain, hash }, flags))
    }

    /// Returns the raw address format (workchain:hash)
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// Returns the user-friendly base64url address
    pub fn to_friendly(&self, flags: AddressFlags) -> String {
        let mut data = Vec::with_capacity(FRIENDLY_BYTES_LEN);
        data.push(flags.tag());
        data.push(self.workchain as u8);
        data.extend_from_slice(&self.hash);

        let crc = crc16(&data);
        data.extend_from_slice(&crc.to_be_bytes());

        URL_SAFE_NO_PAD.encode(&data)
    }

    /// Returns bounceable mainnet address
    pub fn to_bounceable(&self) -> String {
        self.to_friendly(AddressFlags::new(true, false))
    }

    /// Returns non-bounceable mainnet address
    pub fn to_non_bounceable(&self) -> String {
        self.to_friendly(AddressFlags::new(false, false))
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bounceable())
    }
}

impl FromStr for TonAddress {
    type Err = TonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            Self::from_raw(s)
        } else {
            Self::from_friendly(s)
        }
    }
}

/// Converts `workchain:hash` to a user-friendly address.
pub fn raw_to_friendly(raw: &str, bounceable: bool, testnet: bool) -> Result<String, TonError> {
    let address = TonAddress::from_raw(raw)?;
    Ok(address.to_friendly(AddressFlags::new(bounceable, testnet)))
}

/// Converts a user-friendly address (base64 or base64url) to `workchain:hash`.
pub fn friendly_to_raw(friendly: &str) -> Result<String, TonError> {
    TonAddress::from_friendly(friendly).map(|address| address.to_raw())
}

/// Returns true if `address` parses as either representation. Never fails.
pub fn is_valid_address(address: &str) -> bool {
    if address.contains(':') {
        TonAddress::from_raw(address).is_ok()
    } else {
        TonAddress::from_friendly(address).is_ok()
    }
}

/// Converts `address` to the requested representation.
///
/// An address already in the requested format is returned unchanged.
/// Friendly output is bounceable mainnet.
pub fn normalize_address(address: &str, to_format: AddressFormat) -> Result<String, TonError> {
    match (address.contains(':'), to_format) {
        (true, AddressFormat::Raw) | (false, AddressFormat::Friendly) => Ok(address.to_string()),
        (true, AddressFormat::Friendly) => raw_to_friendly(address, true, false),
        (false, AddressFormat::Raw) => friendly_to_raw(address),
    }
}
