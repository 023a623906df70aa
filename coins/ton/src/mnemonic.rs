//! TON mnemonics.
//!
//! TON reuses the BIP-39 English wordlist but not its checksum. A phrase is
//! valid when the PBKDF2 "seed version" derived from its HMAC entropy starts
//! with a zero byte. Keys come from a second PBKDF2 run with the
//! "TON default seed" salt:
//!
//! - entropy = HMAC-SHA512(key = phrase, msg = password)
//! - validity: PBKDF2-HMAC-SHA512(entropy, "TON seed version", 390)[0] == 0
//! - seed: PBKDF2-HMAC-SHA512(entropy, "TON default seed", 100000)[..32]

use bip39::Language;
use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2;
use rand::rngs::OsRng;
use rand::Rng;
use sha2::Sha512;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, Zeroizing};

use crate::TonError;

/// Number of words in a TON mnemonic
pub const MNEMONIC_WORD_COUNT: usize = 24;

const PBKDF_ITERATIONS: u32 = 100_000;
const SEED_VERSION_SALT: &[u8] = b"TON seed version";
const DEFAULT_SEED_SALT: &[u8] = b"TON default seed";

/// A validated 24-word TON mnemonic. Words are wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    words: Vec<String>,
}

impl Mnemonic {
    /// Generates a fresh mnemonic from the OS RNG
    pub fn generate() -> Result<Self, TonError> {
        let wordlist = Language::English.word_list();
        let mut rng = OsRng;

        loop {
            let words = (0..MNEMONIC_WORD_COUNT)
                .map(|_| wordlist[rng.gen_range(0..wordlist.len())].to_string())
                .collect();
            let candidate = Self { words };
            // Roughly one candidate in 256 has a basic seed
            if candidate.is_basic_seed()? {
                return Ok(candidate);
            }
        }
    }

    /// Parses a space separated phrase.
    ///
    /// Surrounding and repeated whitespace is ignored and words are
    /// lower-cased before validation.
    pub fn parse(phrase: &str) -> Result<Self, TonError> {
        Self::from_words(phrase.split_whitespace().map(str::to_owned).collect())
    }

    /// Validates an already split word list
    pub fn from_words(words: Vec<String>) -> Result<Self, TonError> {
        let words: Vec<String> = words
            .into_iter()
            .map(|word| word.trim().to_lowercase())
            .collect();

        if words.len() != MNEMONIC_WORD_COUNT {
            return Err(TonError::InvalidMnemonic(format!(
                "TON mnemonic must be {} words, got {}",
                MNEMONIC_WORD_COUNT,
                words.len()
            )));
        }

        let wordlist = Language::English.word_list();
        if let Some(position) = words
            .iter()
            .position(|word| !wordlist.contains(&word.as_str()))
        {
            return Err(TonError::InvalidMnemonic(format!(
                "word #{} is not in the wordlist",
                position + 1
            )));
        }

        let mnemonic = Self { words };
        if !mnemonic.is_basic_seed()? {
            return Err(TonError::InvalidMnemonic(
                "checksum does not match a TON seed".to_string(),
            ));
        }
        Ok(mnemonic)
    }

    /// Returns true if `phrase` is a valid TON mnemonic
    pub fn is_valid(phrase: &str) -> bool {
        Self::parse(phrase).is_ok()
    }

    /// The normalized words
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The normalized phrase, words joined by single spaces
    pub fn phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.words.join(" "))
    }

    /// Derives the Ed25519 key pair for this mnemonic
    pub fn to_key_pair(&self) -> Result<TonKeyPair, TonError> {
        let entropy = self.entropy()?;
        let mut seed = Zeroizing::new([0u8; 64]);
        pbkdf2::<Hmac<Sha512>>(&entropy[..], DEFAULT_SEED_SALT, PBKDF_ITERATIONS, &mut seed[..])
            .map_err(|e| TonError::KeyDerivation(e.to_string()))?;

        let mut secret = [0u8; 32];
        secret.copy_from_slice(&seed[..32]);
        let signing_key = SigningKey::from_bytes(&secret);
        secret.zeroize();

        Ok(TonKeyPair { signing_key })
    }

    fn entropy(&self) -> Result<Zeroizing<[u8; 64]>, TonError> {
        let phrase = self.phrase();
        let mut mac = <Hmac<Sha512> as Mac>::new_from_slice(phrase.as_bytes())
            .map_err(|e| TonError::KeyDerivation(e.to_string()))?;
        // No mnemonic password
        mac.update(b"");

        let mut entropy = Zeroizing::new([0u8; 64]);
        entropy.copy_from_slice(&mac.finalize().into_bytes());
        Ok(entropy)
    }

    fn is_basic_seed(&self) -> Result<bool, TonError> {
        let entropy = self.entropy()?;
        let mut seed = Zeroizing::new([0u8; 64]);
        let rounds = (PBKDF_ITERATIONS / 256).max(1);
        pbkdf2::<Hmac<Sha512>>(&entropy[..], SEED_VERSION_SALT, rounds, &mut seed[..])
            .map_err(|e| TonError::KeyDerivation(e.to_string()))?;
        Ok(seed[0] == 0)
    }
}

impl Drop for Mnemonic {
    fn drop(&mut self) {
        self.words.zeroize();
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic([REDACTED; {} words])", self.words.len())
    }
}

impl FromStr for Mnemonic {
    type Err = TonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Ed25519 key pair derived from a [`Mnemonic`]
pub struct TonKeyPair {
    signing_key: SigningKey,
}

impl TonKeyPair {
    /// Returns the public key bytes
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Returns the public key as hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key())
    }

    /// Returns the 64-byte secret key (seed followed by public key) as hex.
    /// ⚠️ Handle with care!
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        let keypair = Zeroizing::new(self.signing_key.to_keypair_bytes());
        Zeroizing::new(hex::encode(&keypair[..]))
    }
}

impl fmt::Debug for TonKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TonKeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}
