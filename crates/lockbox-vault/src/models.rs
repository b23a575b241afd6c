// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault entry types.

use std::fmt;

use secrecy::SecretString;

/// A row as persisted: sensitive fields hold cipher blobs, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEntry {
    pub id: i64,
    pub website: String,
    pub username: String,
    pub encrypted_password: String,
    pub encrypted_notes: String,
}

/// A fully decrypted entry, as returned to callers.
///
/// The password stays wrapped in [`SecretString`]. `Debug` redacts both
/// the password and the notes.
pub struct VaultEntry {
    pub id: i64,
    pub website: String,
    pub username: String,
    pub password: SecretString,
    pub notes: String,
}

impl fmt::Debug for VaultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultEntry")
            .field("id", &self.id)
            .field("website", &self.website)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("notes", &"[REDACTED]")
            .finish()
    }
}
