// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Lockbox configuration system.

use figment::Jail;
use lockbox_config::diagnostic::ConfigError;
use lockbox_config::model::{LockboxConfig, UniqueField};
use lockbox_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

#[test]
fn full_toml_deserializes_into_lockbox_config() {
    let toml = r#"
[general]
log_level = "debug"

[vault]
data_dir = "/tmp/lockbox-it"
master_key_file = "key.hash"
database_file = "entries.db"
kdf_iterations = 250000
accept_legacy_padding = true
enforce_unique_on = ["website"]

[policy]
min_master_length = 10
min_entry_length = 12
weak_patterns = ["letmein"]

[generator]
default_length = 20
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.vault.data_dir, "/tmp/lockbox-it");
    assert_eq!(
        config.vault.master_key_path(),
        std::path::PathBuf::from("/tmp/lockbox-it/key.hash")
    );
    assert_eq!(
        config.vault.database_path(),
        std::path::PathBuf::from("/tmp/lockbox-it/entries.db")
    );
    assert_eq!(config.vault.kdf_iterations, 250_000);
    assert!(config.vault.accept_legacy_padding);
    assert_eq!(config.vault.enforce_unique_on, vec![UniqueField::Website]);
    assert_eq!(config.policy.min_master_length, 10);
    assert_eq!(config.policy.min_entry_length, 12);
    assert_eq!(config.policy.weak_patterns, vec!["letmein"]);
    assert_eq!(config.generator.default_length, 20);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.vault.master_key_file, "master.key");
    assert_eq!(config.vault.database_file, "vault.db");
    assert_eq!(config.vault.kdf_iterations, 100_000);
    assert!(!config.vault.accept_legacy_padding);
    assert_eq!(
        config.vault.enforce_unique_on,
        vec![UniqueField::Website, UniqueField::Username]
    );
    assert_eq!(config.policy.min_master_length, 6);
    assert_eq!(config.policy.min_entry_length, 8);
    assert_eq!(config.policy.weak_patterns.len(), 6);
    assert_eq!(config.generator.default_length, 12);
}

#[test]
fn unknown_vault_key_is_rejected() {
    let toml = r#"
[vault]
kdf_iteration = 200000
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("kdf_iteration"),
        "error should mention the unknown field, got: {err_str}"
    );
}

#[test]
fn unknown_key_diagnostic_suggests_correction() {
    let toml = r#"
[vault]
kdf_iteration = 200000
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "kdf_iteration");
            assert_eq!(suggestion.as_deref(), Some("kdf_iterations"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_unique_field_is_rejected() {
    let toml = r#"
[vault]
enforce_unique_on = ["email"]
"#;

    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[generator]
default_length = "long"
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key.contains("default_length")),
        "got {:?}",
        errors
    );
}

#[test]
fn validation_runs_after_parsing() {
    let toml = r#"
[vault]
kdf_iterations = 10
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn env_var_overrides_kdf_iterations() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[vault]
kdf_iterations = 150000
"#,
        )?;
        jail.set_env("LOCKBOX_VAULT_KDF_ITERATIONS", "300000");

        let config = load_config_from_path(std::path::Path::new("custom.toml"))?;
        assert_eq!(config.vault.kdf_iterations, 300_000);
        Ok(())
    });
}

#[test]
fn env_var_maps_underscored_keys_to_one_section() {
    Jail::expect_with(|jail| {
        jail.set_env("LOCKBOX_POLICY_MIN_ENTRY_LENGTH", "16");
        jail.set_env("LOCKBOX_GENERAL_LOG_LEVEL", "warn");

        let config = load_config_from_path(std::path::Path::new("absent.toml"))?;
        assert_eq!(config.policy.min_entry_length, 16);
        assert_eq!(config.general.log_level, "warn");
        Ok(())
    });
}

#[test]
fn master_password_env_var_is_not_a_config_key() {
    Jail::expect_with(|jail| {
        jail.set_env("LOCKBOX_MASTER_PASSWORD", "hunter22");

        let config = load_config_from_path(std::path::Path::new("absent.toml"))?;
        assert_eq!(config.general.log_level, "info");
        Ok(())
    });
}

#[test]
fn effective_config_round_trips_through_toml() {
    let mut config = LockboxConfig::default();
    config.vault.data_dir = "/srv/lockbox".to_string();
    config.vault.enforce_unique_on = vec![UniqueField::Username];

    let rendered = config.to_toml_string().unwrap();
    let reparsed = load_config_from_str(&rendered).unwrap();
    assert_eq!(reparsed.vault.data_dir, "/srv/lockbox");
    assert_eq!(reparsed.vault.enforce_unique_on, vec![UniqueField::Username]);
}
