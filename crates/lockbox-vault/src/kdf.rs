// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the master password.
//!
//! Each cipher blob carries its own random salt, so the same master password
//! yields an unrelated key for every encrypted field.

use std::num::NonZeroU32;

use lockbox_core::LockboxError;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Iteration count used when none is configured.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

const DEFAULT_ITERATIONS_NONZERO: NonZeroU32 = NonZeroU32::new(DEFAULT_ITERATIONS).unwrap();

/// Password-based key derivation with a fixed iteration count.
///
/// Pure: the same `(password, salt)` always produces the same key.
#[derive(Debug, Clone, Copy)]
pub struct KeyDerivation {
    iterations: NonZeroU32,
}

impl KeyDerivation {
    /// Build a deriver. Zero iterations is rejected.
    pub fn new(iterations: u32) -> Result<Self, LockboxError> {
        let iterations = NonZeroU32::new(iterations)
            .ok_or_else(|| LockboxError::Config("kdf iterations must be non-zero".to_string()))?;
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// Derive a 32-byte key from `password` and `salt`.
    ///
    /// The returned key is zeroed on drop.
    pub fn derive_key(&self, password: &[u8], salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            self.iterations,
            salt,
            password,
            key.as_mut(),
        );
        key
    }
}

impl Default for KeyDerivation {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS_NONZERO,
        }
    }
}

/// Generate a random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], LockboxError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| LockboxError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}
