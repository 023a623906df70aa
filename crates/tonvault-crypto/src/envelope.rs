//! AES-256-CBC envelope and its JSON/base64 wrappers

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::kdf::derive_key;
use tonvault_error::{Result, VaultError};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Salt length in bytes
pub const SALT_LEN: usize = 16;
/// IV length in bytes (one AES block)
pub const IV_LEN: usize = 16;
/// Bytes preceding the ciphertext
pub const HEADER_LEN: usize = SALT_LEN + IV_LEN;

const BLOCK_LEN: usize = 16;

/// Encrypts `plaintext` under `password` into `salt || iv || ciphertext`.
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    encrypt_with(plaintext, password, &salt, &iv)
}

pub(crate) fn encrypt_with(
    plaintext: &[u8],
    password: &str,
    salt: &[u8; SALT_LEN],
    iv: &[u8; IV_LEN],
) -> Result<Vec<u8>> {
    let key = derive_key(password, salt);
    let cipher = Aes256CbcEnc::new_from_slices(&key[..], iv)
        .map_err(|e| VaultError::KeyDerivationError(e.to_string()))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut blob = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    blob.extend_from_slice(salt);
    blob.extend_from_slice(iv);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypts an envelope produced by [`encrypt`].
///
/// A blob shorter than the salt and IV header is [`VaultError::InvalidCiphertext`].
/// A wrong password, a bad padding, or a ciphertext body that is empty or
/// not block aligned is [`VaultError::DecryptionFailed`].
pub fn decrypt(blob: &[u8], password: &str) -> Result<Vec<u8>> {
    if blob.len() < HEADER_LEN {
        return Err(VaultError::InvalidCiphertext(format!(
            "expected at least {} bytes, got {}",
            HEADER_LEN,
            blob.len()
        )));
    }

    let (salt, rest) = blob.split_at(SALT_LEN);
    let (iv, ciphertext) = rest.split_at(IV_LEN);
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(VaultError::DecryptionFailed(format!(
            "ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_LEN
        )));
    }

    let key = derive_key(password, salt);
    let cipher = Aes256CbcDec::new_from_slices(&key[..], iv)
        .map_err(|e| VaultError::KeyDerivationError(e.to_string()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| VaultError::DecryptionFailed("invalid padding (wrong password?)".into()))
}

/// Serializes `value` to JSON, encrypts it and returns standard base64.
pub fn encrypt_json<T: Serialize + ?Sized>(value: &T, password: &str) -> Result<String> {
    let json = Zeroizing::new(serde_json::to_vec(value)?);
    let blob = encrypt(&json, password)?;
    Ok(STANDARD.encode(blob))
}

/// Reverses [`encrypt_json`].
///
/// Bad base64 is [`VaultError::InvalidCiphertext`]; plaintext that is not
/// the expected JSON is [`VaultError::DecryptionFailed`].
pub fn decrypt_json<T: DeserializeOwned>(encoded: &str, password: &str) -> Result<T> {
    let blob = STANDARD.decode(encoded.trim())?;
    let json = Zeroizing::new(decrypt(&blob, password)?);
    serde_json::from_slice(&json)
        .map_err(|e| VaultError::DecryptionFailed(format!("decrypted data is not valid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const PASSWORD: &str = "test_password";

    fn fixed_salt_iv() -> ([u8; SALT_LEN], [u8; IV_LEN]) {
        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        for i in 0..16 {
            salt[i] = i as u8;
            iv[i] = 16 + i as u8;
        }
        (salt, iv)
    }

    // Produced independently with a reference AES-256-CBC implementation
    const KNOWN_BLOB: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f\
                              6a3dd9ac1b512c1d908b332468153fa32a8da37b0ef0130454e65b3b865fab59";

    #[test]
    fn test_known_envelope() {
        let (salt, iv) = fixed_salt_iv();
        let blob = encrypt_with(br#"{"hello":"world"}"#, PASSWORD, &salt, &iv).unwrap();
        assert_eq!(hex::encode(&blob), KNOWN_BLOB);
    }

    #[test]
    fn test_decrypt_known_envelope() {
        let blob = hex::decode(KNOWN_BLOB).unwrap();
        assert_eq!(decrypt(&blob, PASSWORD).unwrap(), br#"{"hello":"world"}"#);

        let value: Value = decrypt_json(&STANDARD.encode(&blob), PASSWORD).unwrap();
        assert_eq!(value, json!({"hello": "world"}));
    }

    #[test]
    fn test_roundtrip() {
        let blob = encrypt(b"secret data", PASSWORD).unwrap();
        assert_eq!(decrypt(&blob, PASSWORD).unwrap(), b"secret data");
    }

    #[test]
    fn test_layout() {
        let blob = encrypt(b"", PASSWORD).unwrap();
        // Empty input still pads to one full block
        assert_eq!(blob.len(), HEADER_LEN + BLOCK_LEN);

        let blob = encrypt(&[7u8; 16], PASSWORD).unwrap();
        assert_eq!(blob.len(), HEADER_LEN + 2 * BLOCK_LEN);
    }

    #[test]
    fn test_fresh_salt_and_iv() {
        let a = encrypt(b"same", PASSWORD).unwrap();
        let b = encrypt(b"same", PASSWORD).unwrap();
        assert_ne!(a, b);
        assert_ne!(a[..SALT_LEN], b[..SALT_LEN]);
        assert_ne!(a[SALT_LEN..HEADER_LEN], b[SALT_LEN..HEADER_LEN]);
    }

    #[test]
    fn test_short_blob_is_invalid_ciphertext() {
        let err = decrypt(&[0u8; 31], PASSWORD).unwrap_err();
        assert!(matches!(err, VaultError::InvalidCiphertext(_)));
    }

    #[test]
    fn test_unaligned_body_is_decryption_failure() {
        let err = decrypt(&[0u8; HEADER_LEN], PASSWORD).unwrap_err();
        assert!(matches!(err, VaultError::DecryptionFailed(_)));

        let err = decrypt(&[0u8; HEADER_LEN + 5], PASSWORD).unwrap_err();
        assert!(matches!(err, VaultError::DecryptionFailed(_)));
    }

    #[test]
    fn test_json_wrong_password() {
        let encoded = encrypt_json(&json!({"wallets": [], "version": 1}), PASSWORD).unwrap();
        let err = decrypt_json::<Value>(&encoded, "wrong").unwrap_err();
        assert!(err.is_authentication_failure());
    }

    #[test]
    fn test_json_bad_base64() {
        let err = decrypt_json::<Value>("!!! not base64 !!!", PASSWORD).unwrap_err();
        assert!(matches!(err, VaultError::InvalidCiphertext(_)));
    }

    #[test]
    fn test_json_preserves_unicode() {
        let value = json!({"label": "Кошелёк 💎", "note": "日本語"});
        let encoded = encrypt_json(&value, PASSWORD).unwrap();
        let decoded: Value = decrypt_json(&encoded, PASSWORD).unwrap();
        assert_eq!(decoded, value);
    }
}
