//! # TonVault Storage
//!
//! Password-encrypted vault of TON wallets.
//!
//! The vault is one file holding a standard-base64 envelope (see
//! `tonvault-crypto`) whose plaintext is the JSON document
//! `{"wallets": [...], "version": 1}`. Each record is keyed by its
//! user-friendly address.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tonvault_storage::{WalletRecord, WalletStorage};
//!
//! let storage = WalletStorage::new("password", "/tmp/wallets.enc");
//! storage.add_wallet(
//!     WalletRecord::new("EQDtFpEwcFAEcRe5mLVh2N6C0x-_hJEM7W61_JLnSF74p4q2").with_label("main"),
//! )?;
//!
//! let main = storage.get_wallet("MAIN", false)?;
//! assert!(main.is_some());
//! # Ok::<(), tonvault_error::VaultError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod paths;
pub mod record;
pub mod storage;

pub use record::{
    VaultDocument, WalletPatch, WalletRecord, WalletVersion, SECRET_FIELDS, VAULT_FORMAT_VERSION,
};
pub use storage::WalletStorage;

pub use tonvault_error::{Result, VaultError};
