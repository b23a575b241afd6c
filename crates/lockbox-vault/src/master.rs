// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password setup and verification.
//!
//! The master password itself is never written anywhere. The guard keeps a
//! single record holding the hex-encoded SHA-256 of the password (64
//! characters). A missing, unreadable, or malformed record means "not set":
//! a corrupted record must never lock the user out of the setup flow.

use std::io::Write;
use std::path::{Path, PathBuf};

use lockbox_config::VaultConfig;
use lockbox_core::LockboxError;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

/// Length of the hex-encoded hash stored in the record.
pub const HASH_HEX_LEN: usize = 64;

/// Owner of the master-key record.
#[derive(Debug, Clone)]
pub struct MasterKeyGuard {
    path: PathBuf,
}

impl MasterKeyGuard {
    pub fn new(config: &VaultConfig) -> Self {
        Self::at(config.master_key_path())
    }

    /// Guard for a record at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff a well-formed record exists.
    pub fn is_master_set(&self) -> bool {
        self.stored_hash().is_some()
    }

    /// Hash `password` and persist it, replacing any previous record.
    ///
    /// The write goes through a temporary file in the same directory and is
    /// renamed into place, so a crash never leaves a half-written record.
    pub fn set_master_password(&self, password: &SecretString) -> Result<(), LockboxError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let replacing = self.path.exists();
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(hash_password(password).as_bytes())?;
        tmp.as_file().sync_all()?;
        restrict_permissions(tmp.path())?;
        tmp.persist(&self.path).map_err(|e| LockboxError::Storage {
            source: Box::new(e.error),
        })?;

        if replacing {
            warn!(path = %self.path.display(), "master password replaced");
        } else {
            info!(path = %self.path.display(), "master password set");
        }
        Ok(())
    }

    /// Check `candidate` against the stored hash in constant time.
    ///
    /// Returns `false` when no usable record exists.
    pub fn verify_master_password(&self, candidate: &SecretString) -> bool {
        let Some(stored) = self.stored_hash() else {
            debug!("verification attempted without a master record");
            return false;
        };
        let Ok(stored) = hex::decode(stored) else {
            return false;
        };

        let computed = Sha256::digest(candidate.expose_secret().as_bytes());
        bool::from(computed.as_slice().ct_eq(&stored))
    }

    /// Like [`verify_master_password`](Self::verify_master_password), but
    /// distinguishes "never set up" from "wrong password".
    pub fn unlock(&self, candidate: &SecretString) -> Result<bool, LockboxError> {
        if !self.is_master_set() {
            return Err(LockboxError::NotSet);
        }
        Ok(self.verify_master_password(candidate))
    }

    /// The stored hash if the record exists and is well-formed.
    fn stored_hash(&self) -> Option<String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "master record unreadable, treating as not set");
                return None;
            }
        };

        let hash = content.trim();
        if hash.len() == HASH_HEX_LEN && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(hash.to_ascii_lowercase())
        } else {
            warn!(path = %self.path.display(), "master record malformed, treating as not set");
            None
        }
    }
}

/// Hex-encoded SHA-256 of the password.
pub fn hash_password(password: &SecretString) -> String {
    hex::encode(Sha256::digest(password.expose_secret().as_bytes()))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
