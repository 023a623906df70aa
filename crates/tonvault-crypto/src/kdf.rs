//! Password key derivation

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Number of SHA-256 applications. Changing it makes existing vaults unreadable.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Derived key length (AES-256)
pub const KEY_LEN: usize = 32;

/// Derives an AES-256 key from `password` and `salt`.
///
/// The first round hashes `utf8(password) || salt`; every following round
/// hashes the previous digest, for [`KDF_ITERATIONS`] rounds in total.
pub fn derive_key(password: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);

    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    key.copy_from_slice(&hasher.finalize());

    for _ in 1..KDF_ITERATIONS {
        let next = Sha256::digest(&key[..]);
        key.copy_from_slice(&next);
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salt() -> [u8; 16] {
        let mut salt = [0u8; 16];
        for (i, b) in salt.iter_mut().enumerate() {
            *b = i as u8;
        }
        salt
    }

    #[test]
    fn test_known_keys() {
        assert_eq!(
            hex::encode(*derive_key("test_password", &salt())),
            "dc2eb7fafbc5c3ac8c6dd76b8b3b0866e77aac0e1b30d51ca523d59bae293af1"
        );
        assert_eq!(
            hex::encode(*derive_key("", &salt())),
            "661a97862c362b9219ba057f03bdd15ae659a5eba5b69712e3a257f4544ce841"
        );
        assert_eq!(
            hex::encode(*derive_key("пароль🔑", &salt())),
            "83970e38a79b9086fee4877fa52611fb0e0c23d95feea140b0190d59356e723e"
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(*derive_key("pw", b"salt"), *derive_key("pw", b"salt"));
    }

    #[test]
    fn test_salt_and_password_matter() {
        let base = derive_key("pw", b"salt-a");
        assert_ne!(*base, *derive_key("pw", b"salt-b"));
        assert_ne!(*base, *derive_key("pw2", b"salt-a"));
    }
}
