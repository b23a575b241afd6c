// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password strength heuristics for the front-end.
//!
//! These are advisory checks the caller applies before setup or insert;
//! the store itself never enforces them.

use lockbox_config::model::PolicyConfig;
use lockbox_core::LockboxError;

#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_master_length: usize,
    min_entry_length: usize,
    weak_patterns: Vec<String>,
}

impl PasswordPolicy {
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            min_master_length: config.min_master_length,
            min_entry_length: config.min_entry_length,
            weak_patterns: config
                .weak_patterns
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Reject master passwords shorter than the configured minimum.
    pub fn check_master(&self, password: &str) -> Result<(), LockboxError> {
        let len = password.chars().count();
        if len < self.min_master_length {
            return Err(LockboxError::Validation(format!(
                "master password too short ({len} chars, minimum {})",
                self.min_master_length
            )));
        }
        Ok(())
    }

    /// Reject entry passwords that are short or contain a denylisted
    /// substring (case-insensitive).
    pub fn check_entry(&self, password: &str) -> Result<(), LockboxError> {
        let len = password.chars().count();
        if len < self.min_entry_length {
            return Err(LockboxError::Validation(format!(
                "password is weak: {len} chars, minimum {}",
                self.min_entry_length
            )));
        }

        let lowered = password.to_lowercase();
        if let Some(pattern) = self.weak_patterns.iter().find(|p| lowered.contains(p.as_str())) {
            return Err(LockboxError::Validation(format!(
                "password is weak: contains `{pattern}`"
            )));
        }
        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}
