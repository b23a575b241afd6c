// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password acquisition via TTY prompt or LOCKBOX_MASTER_PASSWORD.

use lockbox_core::LockboxError;
use secrecy::{ExposeSecret, SecretString};

/// Environment variable holding the master password for non-interactive use.
pub const MASTER_PASSWORD_ENV_VAR: &str = "LOCKBOX_MASTER_PASSWORD";

/// Get the master password from the environment or an interactive prompt.
///
/// Priority:
/// 1. `LOCKBOX_MASTER_PASSWORD` (scripts, CI)
/// 2. Interactive TTY prompt via `rpassword`
pub fn get_master_password() -> Result<SecretString, LockboxError> {
    if let Some(password) = from_env() {
        return Ok(password);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let password = read("Master password: ")?;
        if password.expose_secret().is_empty() {
            return Err(LockboxError::Validation("empty master password".to_string()));
        }
        return Ok(password);
    }

    Err(no_source())
}

/// Like [`get_master_password`], but asks twice on a TTY and requires both
/// answers to match. Used for first-time setup.
pub fn get_master_password_with_confirm() -> Result<SecretString, LockboxError> {
    if let Some(password) = from_env() {
        return Ok(password);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let first = read("New master password: ")?;
        let second = read("Confirm master password: ")?;
        if first.expose_secret() != second.expose_secret() {
            return Err(LockboxError::Validation("passwords do not match".to_string()));
        }
        if first.expose_secret().is_empty() {
            return Err(LockboxError::Validation("empty master password".to_string()));
        }
        return Ok(first);
    }

    Err(no_source())
}

/// Prompt for an entry password (hidden input). Never read from the environment.
pub fn read_entry_password(prompt: &str) -> Result<SecretString, LockboxError> {
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(LockboxError::Validation(
            "no terminal to read the password from -- pass --generate instead".to_string(),
        ));
    }
    read(prompt)
}

fn from_env() -> Option<SecretString> {
    std::env::var(MASTER_PASSWORD_ENV_VAR)
        .ok()
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

fn read(prompt: &str) -> Result<SecretString, LockboxError> {
    rpassword::prompt_password(prompt)
        .map(SecretString::from)
        .map_err(|e| LockboxError::Internal(format!("failed to read password: {e}")))
}

fn no_source() -> LockboxError {
    LockboxError::Validation(format!(
        "no master password provided. Set {MASTER_PASSWORD_ENV_VAR} or run interactively."
    ))
}
