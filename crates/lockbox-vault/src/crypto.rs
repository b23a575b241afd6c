// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field encryption: AES-256-CBC under a PBKDF2-derived key.
//!
//! Every call to [`CipherEngine::encrypt`] draws a fresh 16-byte salt and a
//! fresh 16-byte IV from the system CSPRNG. The output blob is
//! `base64(salt ∥ iv ∥ ciphertext)`, self-contained so that any blob can be
//! decrypted with nothing but the master password.
//!
//! Plaintext is padded with PKCS#7, so values ending in spaces survive a
//! round-trip. Blobs written with the older trailing-space padding can still
//! be read when legacy padding is enabled.

use aes::Aes256;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use lockbox_config::VaultConfig;
use lockbox_core::LockboxError;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use tracing::trace;

use crate::kdf::{self, KeyDerivation, SALT_LEN};

/// IV length in bytes (one AES block).
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Bytes preceding the ciphertext in a decoded blob.
pub const HEADER_LEN: usize = SALT_LEN + IV_LEN;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// The decoded form of one encrypted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherBlob {
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
}

impl CipherBlob {
    /// Serialize as `base64(salt ∥ iv ∥ ciphertext)`.
    pub fn encode(&self) -> String {
        let mut raw = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        raw.extend_from_slice(&self.salt);
        raw.extend_from_slice(&self.iv);
        raw.extend_from_slice(&self.ciphertext);
        STANDARD.encode(raw)
    }

    /// Parse a stored blob, splitting at the fixed 16/16 offsets.
    pub fn decode(encoded: &str) -> Result<Self, LockboxError> {
        let raw = STANDARD
            .decode(encoded.trim())
            .map_err(|e| LockboxError::Decryption(format!("invalid base64: {e}")))?;

        if raw.len() < HEADER_LEN {
            return Err(LockboxError::Decryption(format!(
                "blob is {} bytes, shorter than the {HEADER_LEN}-byte header",
                raw.len()
            )));
        }

        let (salt, rest) = raw.split_at(SALT_LEN);
        let (iv, ciphertext) = rest.split_at(IV_LEN);
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(LockboxError::Decryption(format!(
                "ciphertext length {} is not a multiple of {BLOCK_LEN}",
                ciphertext.len()
            )));
        }

        let mut blob = Self {
            salt: [0u8; SALT_LEN],
            iv: [0u8; IV_LEN],
            ciphertext: ciphertext.to_vec(),
        };
        blob.salt.copy_from_slice(salt);
        blob.iv.copy_from_slice(iv);
        Ok(blob)
    }
}

/// Stateless encrypt/decrypt of text fields with the master password.
#[derive(Debug, Clone, Copy, Default)]
pub struct CipherEngine {
    kdf: KeyDerivation,
    legacy_padding: bool,
}

impl CipherEngine {
    pub fn new(kdf: KeyDerivation) -> Self {
        Self {
            kdf,
            legacy_padding: false,
        }
    }

    /// Engine using the iteration count and padding mode from `config`.
    pub fn from_config(config: &VaultConfig) -> Result<Self, LockboxError> {
        Ok(Self::new(KeyDerivation::new(config.kdf_iterations)?)
            .with_legacy_padding(config.accept_legacy_padding))
    }

    /// Also accept blobs padded with trailing spaces on decrypt.
    pub fn with_legacy_padding(mut self, enabled: bool) -> Self {
        self.legacy_padding = enabled;
        self
    }

    /// Encrypt `plaintext` into a fresh, self-describing blob.
    pub fn encrypt(&self, plaintext: &str, password: &SecretString) -> Result<String, LockboxError> {
        let salt = kdf::generate_salt()?;
        let mut iv = [0u8; IV_LEN];
        SystemRandom::new()
            .fill(&mut iv)
            .map_err(|_| LockboxError::Internal("failed to generate random IV".to_string()))?;

        let key = self.kdf.derive_key(password.expose_secret().as_bytes(), &salt);
        let ciphertext = Aes256CbcEnc::new_from_slices(key.as_slice(), &iv)
            .map_err(|e| LockboxError::Internal(format!("invalid AES-256-CBC key/IV: {e}")))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        trace!(len = ciphertext.len(), "field encrypted");
        Ok(CipherBlob {
            salt,
            iv,
            ciphertext,
        }
        .encode())
    }

    /// Decrypt a blob produced by [`encrypt`](Self::encrypt).
    ///
    /// There is no MAC, so a wrong password surfaces as a padding or UTF-8
    /// failure, both reported as [`LockboxError::Decryption`].
    pub fn decrypt(&self, blob: &str, password: &SecretString) -> Result<String, LockboxError> {
        let blob = CipherBlob::decode(blob)?;
        let key = self.kdf.derive_key(password.expose_secret().as_bytes(), &blob.salt);
        let decryptor = || {
            Aes256CbcDec::new_from_slices(key.as_slice(), &blob.iv)
                .map_err(|e| LockboxError::Internal(format!("invalid AES-256-CBC key/IV: {e}")))
        };

        let plaintext = match decryptor()?.decrypt_padded_vec_mut::<Pkcs7>(&blob.ciphertext) {
            Ok(plaintext) => plaintext,
            Err(_) if self.legacy_padding => {
                let mut padded = decryptor()?
                    .decrypt_padded_vec_mut::<NoPadding>(&blob.ciphertext)
                    .map_err(|_| LockboxError::Decryption("invalid block length".to_string()))?;
                let kept = padded.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
                padded.truncate(kept);
                padded
            }
            Err(_) => {
                return Err(LockboxError::Decryption(
                    "invalid padding -- wrong master password or corrupted data".to_string(),
                ));
            }
        };

        String::from_utf8(plaintext).map_err(|_| {
            LockboxError::Decryption(
                "plaintext is not valid UTF-8 -- wrong master password or corrupted data"
                    .to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CipherEngine {
        CipherEngine::new(KeyDerivation::new(1_000).unwrap())
    }

    fn pw(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    /// Encrypt with the space padding older vaults used.
    fn legacy_encrypt(engine: &CipherEngine, plaintext: &str, password: &str) -> String {
        let salt = [9u8; SALT_LEN];
        let iv = [7u8; IV_LEN];
        let mut padded = plaintext.as_bytes().to_vec();
        while padded.len() % BLOCK_LEN != 0 {
            padded.push(b' ');
        }
        let key = engine.kdf.derive_key(password.as_bytes(), &salt);
        let ciphertext = Aes256CbcEnc::new_from_slices(key.as_slice(), &iv)
            .unwrap()
            .encrypt_padded_vec_mut::<NoPadding>(&padded);
        CipherBlob {
            salt,
            iv,
            ciphertext,
        }
        .encode()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let e = engine();
        let blob = e.encrypt("Pw12345!", &pw("master")).unwrap();
        assert_eq!(e.decrypt(&blob, &pw("master")).unwrap(), "Pw12345!");
    }

    #[test]
    fn trailing_spaces_survive_roundtrip() {
        let e = engine();
        let blob = e.encrypt("ends with spaces   ", &pw("master")).unwrap();
        assert_eq!(e.decrypt(&blob, &pw("master")).unwrap(), "ends with spaces   ");
    }

    #[test]
    fn empty_and_block_aligned_plaintexts_roundtrip() {
        let e = engine();
        for plaintext in ["", "exactly16bytes!!", "ünïcødé ✓ notes"] {
            let blob = e.encrypt(plaintext, &pw("k")).unwrap();
            assert_eq!(e.decrypt(&blob, &pw("k")).unwrap(), plaintext);
        }
    }

    #[test]
    fn encrypting_twice_gives_different_blobs() {
        let e = engine();
        let a = CipherBlob::decode(&e.encrypt("same", &pw("k")).unwrap()).unwrap();
        let b = CipherBlob::decode(&e.encrypt("same", &pw("k")).unwrap()).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn blob_layout_is_salt_iv_ciphertext() {
        let blob = engine().encrypt("hello", &pw("k")).unwrap();
        let raw = STANDARD.decode(&blob).unwrap();
        // 5 bytes of plaintext pad to a single block.
        assert_eq!(raw.len(), HEADER_LEN + BLOCK_LEN);

        let blob = engine().encrypt("sixteen byte str", &pw("k")).unwrap();
        // Block-aligned input gains a full padding block.
        assert_eq!(STANDARD.decode(&blob).unwrap().len(), HEADER_LEN + 2 * BLOCK_LEN);
    }

    #[test]
    fn wrong_password_fails_with_decryption_error() {
        let e = engine();
        let blob = e.encrypt("secret data", &pw("right")).unwrap();
        let err = e.decrypt(&blob, &pw("wrong")).unwrap_err();
        assert!(matches!(err, LockboxError::Decryption(_)), "got {err:?}");
    }

    #[test]
    fn wrong_iteration_count_fails() {
        let blob = engine().encrypt("secret data", &pw("k")).unwrap();
        let other = CipherEngine::new(KeyDerivation::new(1_001).unwrap());
        assert!(other.decrypt(&blob, &pw("k")).is_err());
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let err = engine().decrypt("not base64 !!!", &pw("k")).unwrap_err();
        assert!(matches!(err, LockboxError::Decryption(ref m) if m.contains("base64")));
    }

    #[test]
    fn short_blob_is_rejected() {
        let short = STANDARD.encode([0u8; HEADER_LEN - 1]);
        let err = engine().decrypt(&short, &pw("k")).unwrap_err();
        assert!(matches!(err, LockboxError::Decryption(ref m) if m.contains("header")));
    }

    #[test]
    fn unaligned_ciphertext_is_rejected() {
        let odd = STANDARD.encode([0u8; HEADER_LEN + 5]);
        assert!(CipherBlob::decode(&odd).is_err());
    }

    #[test]
    fn header_only_blob_fails_without_legacy_padding() {
        let empty = STANDARD.encode([0u8; HEADER_LEN]);
        assert!(engine().decrypt(&empty, &pw("k")).is_err());
    }

    #[test]
    fn legacy_space_padded_blob_reads_when_enabled() {
        let e = engine().with_legacy_padding(true);
        let blob = legacy_encrypt(&e, "old password", "master");
        assert_eq!(e.decrypt(&blob, &pw("master")).unwrap(), "old password");
    }

    #[test]
    fn legacy_empty_field_reads_when_enabled() {
        let e = engine().with_legacy_padding(true);
        let blob = legacy_encrypt(&e, "", "master");
        assert_eq!(e.decrypt(&blob, &pw("master")).unwrap(), "");
    }

    #[test]
    fn legacy_blob_rejected_when_disabled() {
        let e = engine();
        let blob = legacy_encrypt(&e, "old password", "master");
        assert!(e.decrypt(&blob, &pw("master")).is_err());
    }

    #[test]
    fn legacy_mode_still_reads_pkcs7_blobs() {
        let e = engine().with_legacy_padding(true);
        let blob = e.encrypt("new style ", &pw("k")).unwrap();
        assert_eq!(e.decrypt(&blob, &pw("k")).unwrap(), "new style ");
    }

    #[test]
    fn engine_from_config_uses_iterations() {
        let mut config = VaultConfig::in_dir("/unused");
        config.kdf_iterations = 1_000;
        let from_config = CipherEngine::from_config(&config).unwrap();
        let blob = engine().encrypt("shared", &pw("k")).unwrap();
        assert_eq!(from_config.decrypt(&blob, &pw("k")).unwrap(), "shared");
    }
}
