//! Key derivation and authenticated encryption for product tokens.

use std::fmt;

use aes_gcm_siv::aead::{Aead, KeyInit};
use aes_gcm_siv::{Aes256GcmSiv, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

/// Length of the derived AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of an AES-GCM-SIV nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Length of the authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// BLAKE3 key-derivation context. Changing it invalidates every printed code.
const KDF_CONTEXT: &str = "logitrack-qr 2025-01-01 product token encryption key";

/// Derive the 256-bit token key from a passphrase.
#[must_use]
pub fn derive_key(passphrase: &str) -> [u8; KEY_LEN] {
    blake3::derive_key(KDF_CONTEXT, passphrase.as_bytes())
}

/// A sealed payload: the random nonce plus ciphertext and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Nonce used for this payload.
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the authentication tag appended.
    pub ciphertext: Vec<u8>,
}

/// AES-256-GCM-SIV keyed with a passphrase-derived key.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256GcmSiv,
}

impl fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCipher").finish_non_exhaustive()
    }
}

impl TokenCipher {
    /// Create a cipher from a passphrase.
    #[must_use]
    pub fn from_passphrase(passphrase: &str) -> Self {
        let key = derive_key(passphrase);
        Self {
            cipher: Aes256GcmSiv::new(Key::<Aes256GcmSiv>::from_slice(&key)),
        }
    }

    /// Encrypt a plaintext under a fresh random nonce.
    ///
    /// # Errors
    ///
    /// Returns the AEAD error if the plaintext exceeds the cipher's length
    /// limit.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Sealed, aes_gcm_siv::Error> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self.cipher.encrypt(Nonce::from_slice(&nonce), plaintext)?;
        Ok(Sealed { nonce, ciphertext })
    }

    /// Decrypt and authenticate a sealed payload.
    ///
    /// # Errors
    ///
    /// Returns the AEAD error if the key is wrong or any byte of the nonce or
    /// ciphertext was altered.
    pub fn open(&self, sealed: &Sealed) -> Result<Vec<u8>, aes_gcm_siv::Error> {
        self.cipher
            .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_is_deterministic() {
        assert_eq!(derive_key("secret"), derive_key("secret"));
        assert_ne!(derive_key("secret"), derive_key("Secret"));
    }

    #[test]
    fn test_seal_then_open() {
        let cipher = TokenCipher::from_passphrase("secret");
        let sealed = cipher.seal(b"pallet of widgets").unwrap();

        assert_eq!(sealed.ciphertext.len(), b"pallet of widgets".len() + TAG_LEN);
        assert_eq!(cipher.open(&sealed).unwrap(), b"pallet of widgets");
    }

    #[test]
    fn test_seal_uses_fresh_nonces() {
        let cipher = TokenCipher::from_passphrase("secret");
        let a = cipher.seal(b"same").unwrap();
        let b = cipher.seal(b"same").unwrap();
        assert_ne!(a.nonce, b.nonce);
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let sealed = TokenCipher::from_passphrase("one").seal(b"data").unwrap();
        assert!(TokenCipher::from_passphrase("two").open(&sealed).is_err());
    }

    #[test]
    fn test_open_detects_tampering() {
        let cipher = TokenCipher::from_passphrase("secret");
        let mut sealed = cipher.seal(b"quantity: 120").unwrap();
        sealed.ciphertext[0] ^= 0x01;
        assert!(cipher.open(&sealed).is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let cipher = TokenCipher::from_passphrase("secret");
        assert_eq!(format!("{cipher:?}"), "TokenCipher { .. }");
    }
}
