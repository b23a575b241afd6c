// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Lockbox secrets vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a typo in a config
//! file is reported at startup instead of being silently ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Minimum PBKDF2 iteration count accepted by validation.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Top-level Lockbox configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LockboxConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Vault location, key derivation, and storage policy.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Password strength heuristics applied by the front-end.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Random password generator settings.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl LockboxConfig {
    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// A field the store can enforce uniqueness on when adding entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueField {
    Website,
    Username,
}

/// Vault configuration, passed explicitly into the master-key guard and the
/// entry store so nothing depends on ambient global paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Directory holding the master-key record and the vault database.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File name of the master-key record, relative to `data_dir`.
    #[serde(default = "default_master_key_file")]
    pub master_key_file: String,

    /// File name of the SQLite vault database, relative to `data_dir`.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// PBKDF2-HMAC-SHA256 iteration count (default: 100000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Accept blobs written with trailing-space padding when PKCS#7
    /// unpadding fails.
    #[serde(default)]
    pub accept_legacy_padding: bool,

    /// Fields that must be unique together when adding an entry.
    /// An empty list disables duplicate rejection.
    #[serde(default = "default_enforce_unique_on")]
    pub enforce_unique_on: Vec<UniqueField>,
}

impl VaultConfig {
    /// Config rooted at `dir`, with every other setting at its default.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: dir.as_ref().display().to_string(),
            ..Self::default()
        }
    }

    /// Full path of the master-key record.
    pub fn master_key_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.master_key_file)
    }

    /// Full path of the vault database.
    pub fn database_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.database_file)
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            master_key_file: default_master_key_file(),
            database_file: default_database_file(),
            kdf_iterations: default_kdf_iterations(),
            accept_legacy_padding: false,
            enforce_unique_on: default_enforce_unique_on(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::config_dir()
        .map(|d| d.join("lockbox"))
        .unwrap_or_else(|| PathBuf::from(".lockbox"))
        .display()
        .to_string()
}

fn default_master_key_file() -> String {
    "master.key".to_string()
}

fn default_database_file() -> String {
    "vault.db".to_string()
}

fn default_kdf_iterations() -> u32 {
    MIN_KDF_ITERATIONS
}

fn default_enforce_unique_on() -> Vec<UniqueField> {
    vec![UniqueField::Website, UniqueField::Username]
}

/// Password strength heuristics.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Minimum master password length at setup.
    #[serde(default = "default_min_master_length")]
    pub min_master_length: usize,

    /// Minimum length of a stored entry password.
    #[serde(default = "default_min_entry_length")]
    pub min_entry_length: usize,

    /// Case-insensitive substrings that mark an entry password as weak.
    #[serde(default = "default_weak_patterns")]
    pub weak_patterns: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_master_length: default_min_master_length(),
            min_entry_length: default_min_entry_length(),
            weak_patterns: default_weak_patterns(),
        }
    }
}

fn default_min_master_length() -> usize {
    6
}

fn default_min_entry_length() -> usize {
    8
}

fn default_weak_patterns() -> Vec<String> {
    ["123", "password", "qwerty", "asdf", "zxcv", "abc"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Random password generator settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Length used when no explicit length is requested.
    #[serde(default = "default_generator_length")]
    pub default_length: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_length: default_generator_length(),
        }
    }
}

fn default_generator_length() -> usize {
    12
}
