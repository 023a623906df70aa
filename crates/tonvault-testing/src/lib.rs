//! # TonVault Testing Infrastructure
//!
//! Shared testing utilities for the TonVault workspace:
//! - Edge case addresses, passwords and ciphertexts
//! - Property-based testing strategies
//! - Secret leak assertions for vault listings and error output
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tonvault_testing::*;
//!
//! for addr in EdgeCaseAddresses::invalid() {
//!     assert!(!is_valid_address(addr));
//! }
//!
//! proptest! {
//!     #[test]
//!     fn test_raw_roundtrip((wc, hash) in raw_address_parts()) {
//!         // ...
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Edge Case Addresses
// ============================================================================

/// Known TON addresses and malformed inputs
pub struct EdgeCaseAddresses;

impl EdgeCaseAddresses {
    /// Bounceable mainnet address with a valid checksum
    pub const FRIENDLY_1: &'static str = "EQDtFpEwcFAEcRe5mLVh2N6C0x-_hJEM7W61_JLnSF74p4q2";

    /// Raw form of [`Self::FRIENDLY_1`]
    pub const RAW_1: &'static str =
        "0:ed1691307050047117b998b561d8de82d31fbf84910ced6eb5fc92e7485ef8a7";

    /// Non-bounceable form of [`Self::FRIENDLY_1`]
    pub const NON_BOUNCEABLE_1: &'static str =
        "UQDtFpEwcFAEcRe5mLVh2N6C0x-_hJEM7W61_JLnSF74p9dz";

    /// Second bounceable mainnet address
    pub const FRIENDLY_2: &'static str = "EQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG";

    /// Raw form of [`Self::FRIENDLY_2`]
    pub const RAW_2: &'static str =
        "0:6f5bc67986e06430961d9df00433926a4cd92e597ddd8aa6043645ac20bd1782";

    /// Third bounceable mainnet address
    pub const FRIENDLY_3: &'static str = "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs";

    /// Masterchain address (workchain -1)
    pub const MASTERCHAIN: &'static str =
        "-1:3333333333333333333333333333333333333333333333333333333333333333";

    /// Right length and alphabet but a wrong checksum
    pub const BAD_CHECKSUM: &'static str = "EQBOlTJJAqaXH6hTQyiLF61sRdk7LihJFmzI86oengoEchAX";

    /// Inputs that are neither raw nor user-friendly addresses
    pub fn invalid() -> Vec<&'static str> {
        vec![
            "",
            "invalid",
            "EQshort",
            "0:abc123",
            "0:1:2",
            "x:ed1691307050047117b998b561d8de82d31fbf84910ced6eb5fc92e7485ef8a7",
            "0x742d35Cc6634C0532925a3b844Bc9e7595f5fFb9",
            Self::BAD_CHECKSUM,
        ]
    }
}

// ============================================================================
// Edge Case Passwords
// ============================================================================

/// Vault passwords that exercise encoding boundaries
pub struct EdgeCasePasswords;

impl EdgeCasePasswords {
    /// Password used by most vault tests
    pub const DEFAULT: &'static str = "test_password_123";

    /// Empty password (allowed, never recommended)
    pub const EMPTY: &'static str = "";

    /// Non-ASCII password
    pub const UNICODE: &'static str = "пароль🔑密码";

    /// Returns all edge case passwords, including a 10,000 character one
    pub fn all() -> Vec<String> {
        vec![
            Self::DEFAULT.to_string(),
            Self::EMPTY.to_string(),
            Self::UNICODE.to_string(),
            " leading and trailing ".to_string(),
            "x".repeat(10_000),
        ]
    }
}

// ============================================================================
// Edge Case Ciphertexts
// ============================================================================

/// Malformed envelopes for decryption error paths
pub struct EdgeCaseCiphertexts;

impl EdgeCaseCiphertexts {
    /// Too short to hold salt and IV
    pub fn truncated() -> Vec<Vec<u8>> {
        vec![vec![], vec![0], vec![0; 16], vec![0; 31]]
    }

    /// Header present but the ciphertext body is unusable
    pub fn bad_body() -> Vec<Vec<u8>> {
        vec![
            vec![0; 32],      // Empty body
            vec![0; 32 + 1],  // Not block aligned
            vec![0; 32 + 15], // One byte short of a block
        ]
    }
}

// ============================================================================
// Property-Based Testing Strategies
// ============================================================================

/// Generates workchain ids seen in practice (basechain and masterchain)
pub fn workchain() -> impl Strategy<Value = i8> {
    prop_oneof![Just(0i8), Just(-1i8)]
}

/// Generates any signed 8-bit workchain
pub fn any_workchain() -> impl Strategy<Value = i8> {
    any::<i8>()
}

/// Generates 32-byte account hashes
pub fn account_hash() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

/// Generates `(workchain, hash)` pairs
pub fn raw_address_parts() -> impl Strategy<Value = (i8, [u8; 32])> {
    (workchain(), account_hash())
}

/// Generates canonical raw address strings (`wc:lowercase hex`)
pub fn raw_address() -> impl Strategy<Value = String> {
    raw_address_parts().prop_map(|(wc, hash)| format!("{}:{}", wc, hex::encode(hash)))
}

/// Generates `(bounceable, testnet)` flag pairs
pub fn address_flags() -> impl Strategy<Value = (bool, bool)> {
    (any::<bool>(), any::<bool>())
}

/// Generates vault passwords, including non-ASCII ones
pub fn password() -> impl Strategy<Value = String> {
    "\\PC{0,64}"
}

/// Generates arbitrary plaintexts up to 4 KiB
pub fn plaintext() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..4096)
}

/// Generates wallet labels
pub fn label() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_ -]{0,23}"
}

/// Generates JSON documents that look like a vault payload
pub fn vault_document() -> impl Strategy<Value = Value> {
    prop::collection::vec((raw_address(), label()), 0..8).prop_map(|entries| {
        let wallets: Vec<Value> = entries
            .into_iter()
            .map(|(address, label)| json!({ "address": address, "label": label }))
            .collect();
        json!({ "wallets": wallets, "version": 1 })
    })
}

// ============================================================================
// Secret Leak Checks
// ============================================================================

/// Assertions for secret material in output
pub struct SecurityTests;

impl SecurityTests {
    /// Panics if any of `secrets` appears in `text`
    pub fn assert_no_secrets(text: &str, secrets: &[&str]) {
        for secret in secrets.iter().filter(|s| !s.is_empty()) {
            assert!(
                !text.contains(secret),
                "secret material leaked into output: {}...",
                &secret[..secret.len().min(8)]
            );
        }
    }

    /// Panics if a JSON value carries any of `secret_fields`, at any depth
    pub fn assert_redacted(value: &Value, secret_fields: &[&str]) {
        match value {
            Value::Object(map) => {
                for (key, inner) in map {
                    assert!(
                        !secret_fields.contains(&key.as_str()),
                        "secret field '{}' present",
                        key
                    );
                    Self::assert_redacted(inner, secret_fields);
                }
            }
            Value::Array(items) => items
                .iter()
                .for_each(|item| Self::assert_redacted(item, secret_fields)),
            _ => {}
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
