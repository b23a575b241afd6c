// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./lockbox.toml` > `<config_dir>/lockbox/lockbox.toml` >
//! `/etc/lockbox/lockbox.toml`, with `LOCKBOX_*` environment variables
//! overriding all files.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LockboxConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/lockbox/lockbox.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "lockbox.toml";

/// Per-user config file under the platform config directory, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lockbox").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lockbox/lockbox.toml`
/// 3. `<config_dir>/lockbox/lockbox.toml`
/// 4. `./lockbox.toml`
/// 5. `LOCKBOX_*` environment variables
pub fn load_config() -> Result<LockboxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LockboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<LockboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `LOCKBOX_*` environment provider.
///
/// Only the first underscore after a section name becomes a dot:
/// `LOCKBOX_VAULT_KDF_ITERATIONS` maps to `vault.kdf_iterations`, not
/// `vault.kdf.iterations`. `LOCKBOX_MASTER_PASSWORD` belongs to the
/// passphrase prompt and is not a config key.
fn env_provider() -> Env {
    Env::prefixed("LOCKBOX_")
        .ignore(&["master_password"])
        .map(|key| section_key(key.as_str()).into())
}

const SECTIONS: &[&str] = &["general", "vault", "policy", "generator"];

/// Turn a prefix-stripped env key into a dotted config path.
///
/// Figment hands the key over in its original case, so it is lowercased
/// before the section prefix is matched.
fn section_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
