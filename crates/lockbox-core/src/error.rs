// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lockbox secrets vault.

use thiserror::Error;

/// The error type returned by every fallible Lockbox operation.
///
/// A wrong master password during login is not an error: verification
/// reports it as a plain `false`.
#[derive(Debug, Error)]
pub enum LockboxError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// No master password has been configured yet.
    #[error("no master password is set -- run `lockbox init` first")]
    NotSet,

    /// A cipher blob could not be decrypted: malformed encoding, truncated
    /// header, invalid padding, or a wrong master password.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// No vault entry carries the requested id.
    #[error("no vault entry with id {id}")]
    NotFound { id: i64 },

    /// The backing store (SQLite database or master-key file) is unavailable.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The configured uniqueness policy rejected a new entry.
    #[error("an entry for `{username}` on `{website}` already exists")]
    Duplicate { website: String, username: String },

    /// Caller input was rejected (weak password, bad generator length, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for LockboxError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage {
            source: Box::new(e),
        }
    }
}

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, LockboxError>;
