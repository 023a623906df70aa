//! # TonVault Crypto
//!
//! Password-based encryption for the wallet vault.
//!
//! ## Envelope format
//!
//! ```text
//! salt (16) || iv (16) || AES-256-CBC ciphertext (PKCS7 padded)
//! ```
//!
//! The key is derived from the password and the per-message salt with
//! [`derive_key`]. A fresh salt and IV are drawn from the OS RNG on every
//! call to [`encrypt`], so encrypting the same input twice yields different
//! envelopes.
//!
//! There is no MAC. A wrong password is detected through the PKCS7 padding
//! check (and, for [`decrypt_json`], the JSON parse that follows), which is
//! enough to tell "wrong password" apart from "empty vault" but does not
//! authenticate the ciphertext.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::{json, Value};
//! use tonvault_crypto::{decrypt_json, encrypt_json};
//!
//! let encoded = encrypt_json(&json!({"wallets": []}), "hunter2")?;
//! let value: Value = decrypt_json(&encoded, "hunter2")?;
//! assert_eq!(value, json!({"wallets": []}));
//! assert!(decrypt_json::<Value>(&encoded, "wrong").is_err());
//! # Ok::<(), tonvault_error::VaultError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod envelope;
pub mod kdf;

pub use envelope::{decrypt, decrypt_json, encrypt, encrypt_json, HEADER_LEN, IV_LEN, SALT_LEN};
pub use kdf::{derive_key, KDF_ITERATIONS, KEY_LEN};

pub use tonvault_error::{Result, VaultError};
