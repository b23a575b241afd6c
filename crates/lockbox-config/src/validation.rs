// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{LockboxConfig, MIN_KDF_ITERATIONS};

/// Shortest password the generator may be configured to produce.
pub const MIN_GENERATOR_LENGTH: usize = 6;

/// Longest password the generator will produce.
pub const MAX_GENERATOR_LENGTH: usize = 1024;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &LockboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.general.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "general.log_level `{}` is not one of {}",
            config.general.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let vault = &config.vault;
    if vault.data_dir.trim().is_empty() {
        fail("vault.data_dir must not be empty".to_string());
    }
    if vault.master_key_file.trim().is_empty() {
        fail("vault.master_key_file must not be empty".to_string());
    }
    if vault.database_file.trim().is_empty() {
        fail("vault.database_file must not be empty".to_string());
    }
    if !vault.master_key_file.trim().is_empty() && vault.master_key_file == vault.database_file {
        fail("vault.master_key_file and vault.database_file must differ".to_string());
    }
    if vault.kdf_iterations < MIN_KDF_ITERATIONS {
        fail(format!(
            "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
            vault.kdf_iterations
        ));
    }

    let mut seen = HashSet::new();
    for field in &vault.enforce_unique_on {
        if !seen.insert(field) {
            fail(format!(
                "vault.enforce_unique_on lists {field:?} more than once"
            ));
        }
    }

    if config.policy.min_master_length == 0 {
        fail("policy.min_master_length must be at least 1".to_string());
    }
    if config.policy.weak_patterns.iter().any(|p| p.is_empty()) {
        fail("policy.weak_patterns must not contain empty strings".to_string());
    }

    let length = config.generator.default_length;
    if !(MIN_GENERATOR_LENGTH..=MAX_GENERATOR_LENGTH).contains(&length) {
        fail(format!(
            "generator.default_length must be between {MIN_GENERATOR_LENGTH} and {MAX_GENERATOR_LENGTH}, got {length}"
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
