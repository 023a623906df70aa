//! Encrypted wallet vault

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use crate::paths;
use crate::record::{VaultDocument, WalletPatch, WalletRecord};
use tonvault_crypto::{decrypt_json, encrypt_json};
use tonvault_error::{Result, VaultError};

/// Password-protected store of wallet records in a single file.
///
/// Every method reads and decrypts the whole file, and every mutation
/// re-encrypts and rewrites it. There is no locking: concurrent writers
/// race and the last one wins.
pub struct WalletStorage {
    password: Zeroizing<String>,
    path: PathBuf,
}

impl WalletStorage {
    /// Opens the vault at `path`. Nothing is read until the first call.
    pub fn new(password: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            password: Zeroizing::new(password.into()),
            path: path.into(),
        }
    }

    /// Opens the vault at the default location
    pub fn open_default(password: impl Into<String>) -> Result<Self> {
        Ok(Self::new(password, paths::default_vault_path()?))
    }

    /// Vault file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true once the vault file has been written
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads and decrypts the vault.
    ///
    /// A missing file is an empty vault. Anything else that goes wrong,
    /// including a wrong password, is [`VaultError::DecryptionFailed`].
    pub fn load(&self) -> Result<VaultDocument> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "vault file missing, starting empty");
            return Ok(VaultDocument::default());
        }

        let doc = fs::read_to_string(&self.path)
            .map_err(VaultError::from)
            .and_then(|encoded| decrypt_json::<VaultDocument>(encoded.trim(), &self.password))
            .map_err(|e| VaultError::DecryptionFailed(format!("Failed to decrypt wallets: {e}")))?;

        debug!(path = %self.path.display(), wallets = doc.wallets.len(), "vault loaded");
        Ok(doc)
    }

    /// Encrypts and writes the whole vault, then restricts it to the owner.
    pub fn save(&self, doc: &VaultDocument) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let encoded = encrypt_json(doc, &self.password)?;
        fs::write(&self.path, encoded).map_err(|e| {
            VaultError::IoError(format!("Failed to save wallets to {}: {e}", self.path.display()))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            if let Err(e) = fs::set_permissions(&self.path, perms) {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not set vault permissions to 0600"
                );
            }
        }

        debug!(path = %self.path.display(), wallets = doc.wallets.len(), "vault saved");
        Ok(())
    }

    /// Appends a wallet. Fails with [`VaultError::WalletExists`] if the
    /// address is already stored.
    pub fn add_wallet(&self, record: WalletRecord) -> Result<()> {
        let mut doc = self.load()?;
        if doc.position_by_address(&record.address).is_some() {
            return Err(VaultError::WalletExists(record.address));
        }

        debug!(label = %record.label, "adding wallet");
        doc.wallets.push(record);
        self.save(&doc)
    }

    /// Returns all wallets, without secrets unless `include_secrets`
    pub fn get_wallets(&self, include_secrets: bool) -> Result<Vec<WalletRecord>> {
        let doc = self.load()?;
        Ok(if include_secrets {
            doc.wallets
        } else {
            doc.wallets.iter().map(WalletRecord::redacted).collect()
        })
    }

    /// Finds a wallet by label (case-insensitive) or by address in any format.
    ///
    /// `Ok(None)` means no match; a vault that cannot be opened is an error.
    pub fn get_wallet(
        &self,
        identifier: &str,
        include_secrets: bool,
    ) -> Result<Option<WalletRecord>> {
        let found = self
            .get_wallets(include_secrets)?
            .into_iter()
            .find(|w| w.matches(identifier));
        debug!(found = found.is_some(), "wallet lookup");
        Ok(found)
    }

    /// Applies `patch` to the first wallet whose label or exact address
    /// matches, saves, and returns the updated record without secrets.
    pub fn update_wallet(&self, identifier: &str, patch: WalletPatch) -> Result<WalletRecord> {
        let mut doc = self.load()?;
        let index = doc
            .position_exact(identifier)
            .ok_or_else(|| VaultError::WalletNotFound(identifier.to_string()))?;

        patch.apply(&mut doc.wallets[index]);
        let updated = doc.wallets[index].redacted();
        self.save(&doc)?;
        Ok(updated)
    }

    /// Removes the first wallet whose label or exact address matches and
    /// returns it without secrets.
    pub fn remove_wallet(&self, identifier: &str) -> Result<WalletRecord> {
        let mut doc = self.load()?;
        let index = doc
            .position_exact(identifier)
            .ok_or_else(|| VaultError::WalletNotFound(identifier.to_string()))?;

        let removed = doc.wallets.remove(index);
        self.save(&doc)?;
        debug!(label = %removed.label, "wallet removed");
        Ok(removed.redacted())
    }
}

impl fmt::Debug for WalletStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletStorage")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ADDRESS: &str = "EQDtFpEwcFAEcRe5mLVh2N6C0x-_hJEM7W61_JLnSF74p4q2";

    fn storage(dir: &TempDir, password: &str) -> WalletStorage {
        WalletStorage::new(password, dir.path().join("wallets.enc"))
    }

    #[test]
    fn test_load_missing_is_empty_and_does_not_create() {
        let dir = TempDir::new().unwrap();
        let s = storage(&dir, "pw");
        let doc = s.load().unwrap();
        assert!(doc.wallets.is_empty());
        assert_eq!(doc.version, 1);
        assert!(!s.exists());
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let s = WalletStorage::new("pw", dir.path().join("nested/deeper/wallets.enc"));
        s.add_wallet(WalletRecord::new(ADDRESS)).unwrap();
        assert!(s.exists());
    }

    #[test]
    fn test_update_returns_redacted() {
        let dir = TempDir::new().unwrap();
        let s = storage(&dir, "pw");
        s.add_wallet(
            WalletRecord::new(ADDRESS)
                .with_label("main")
                .with_keys("pub", "priv"),
        )
        .unwrap();

        let updated = s.update_wallet("MAIN", WalletPatch::new().label("cold")).unwrap();
        assert_eq!(updated.label, "cold");
        assert!(updated.private_key.is_none());

        // Secrets stay in the vault
        let stored = s.get_wallet("cold", true).unwrap().unwrap();
        assert_eq!(stored.private_key.as_deref(), Some("priv"));
    }

    #[test]
    fn test_debug_hides_password() {
        let dir = TempDir::new().unwrap();
        let s = storage(&dir, "hunter2");
        assert!(!format!("{:?}", s).contains("hunter2"));
    }
}
