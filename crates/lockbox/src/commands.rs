// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand dispatch and the vault-facing command handlers.
//!
//! Every command that reads or writes entries verifies the master password
//! first. The password is then handed to each store call; nothing derived
//! from it outlives the command.

use lockbox_config::LockboxConfig;
use lockbox_core::LockboxError;
use lockbox_vault::prompt::{self, read_entry_password};
use lockbox_vault::{
    MasterKeyGuard, PasswordPolicy, VaultEntry, VaultStore, generate_password, mask_secret,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::{AddArgs, Commands, PasswordArgs, UpdateArgs};

/// Run one parsed subcommand against the loaded configuration.
pub fn execute(command: Commands, config: &LockboxConfig) -> Result<(), LockboxError> {
    match command {
        Commands::Init { force } => {
            let master = prompt::get_master_password_with_confirm()?;
            init(config, &master, force)?;
            println!(
                "Master password set. Vault: {}",
                config.vault.database_path().display()
            );
            Ok(())
        }
        Commands::Status { plain } => crate::status::run_status(config, plain),
        Commands::Generate { length } => {
            let length = length.unwrap_or(config.generator.default_length);
            println!("{}", generate_password(length)?);
            Ok(())
        }
        Commands::Config => {
            let toml = config
                .to_toml_string()
                .map_err(|e| LockboxError::Internal(format!("failed to render config: {e}")))?;
            print!("{toml}");
            Ok(())
        }
        Commands::Add(args) => {
            let (vault, master) = Vault::open_unlocked(config)?;
            let password = new_entry_password(&args.password, config)?;
            let id = vault.add(&args, &password, &master)?;
            println!("Added entry {id} for {} on {}.", args.username, args.website);
            Ok(())
        }
        Commands::List { reveal } => {
            let (vault, master) = Vault::open_unlocked(config)?;
            let entries = vault.store.list_entries(&master)?;
            print!("{}", format_entries(&entries, reveal));
            Ok(())
        }
        Commands::Show { id, reveal } => {
            let (vault, master) = Vault::open_unlocked(config)?;
            let entry = vault.store.get_entry(id, &master)?;
            print!("{}", format_entry(&entry, reveal));
            Ok(())
        }
        Commands::Update(args) => {
            let (vault, master) = Vault::open_unlocked(config)?;
            let password = if args.new_password || args.password.generate {
                Some(new_entry_password(&args.password, config)?)
            } else {
                None
            };
            vault.update(&args, password.as_ref(), &master)?;
            println!("Updated entry {}.", args.id);
            Ok(())
        }
        Commands::Delete { id } => {
            let (vault, _master) = Vault::open_unlocked(config)?;
            vault.store.delete_entry(id)?;
            println!("Deleted entry {id}.");
            Ok(())
        }
    }
}

/// First-time setup, or replacement of the master password with `force`.
pub fn init(config: &LockboxConfig, master: &SecretString, force: bool) -> Result<(), LockboxError> {
    let guard = MasterKeyGuard::new(&config.vault);
    if guard.is_master_set() && !force {
        return Err(LockboxError::Validation(
            "a master password is already set -- pass --force to replace it".to_string(),
        ));
    }
    PasswordPolicy::new(&config.policy).check_master(master.expose_secret())?;

    let store = VaultStore::new(&config.vault)?;
    store.initialize()?;
    let existing = store.count_entries()?;
    if existing > 0 {
        warn!(
            entries = existing,
            "existing entries stay encrypted under the previous master password"
        );
    }

    guard.set_master_password(master)
}

/// An opened vault whose master password has been checked.
pub struct Vault {
    guard: MasterKeyGuard,
    store: VaultStore,
    policy: PasswordPolicy,
}

impl Vault {
    pub fn open(config: &LockboxConfig) -> Result<Self, LockboxError> {
        let store = VaultStore::new(&config.vault)?;
        store.initialize()?;
        Ok(Self {
            guard: MasterKeyGuard::new(&config.vault),
            store,
            policy: PasswordPolicy::new(&config.policy),
        })
    }

    fn open_unlocked(config: &LockboxConfig) -> Result<(Self, SecretString), LockboxError> {
        let vault = Self::open(config)?;
        let master = vault.unlock(prompt::get_master_password()?)?;
        Ok((vault, master))
    }

    /// Hand back `candidate` if it matches the stored master password.
    pub fn unlock(&self, candidate: SecretString) -> Result<SecretString, LockboxError> {
        if self.guard.unlock(&candidate)? {
            debug!("master password verified");
            Ok(candidate)
        } else {
            Err(LockboxError::Validation("incorrect master password".to_string()))
        }
    }

    pub fn add(
        &self,
        args: &AddArgs,
        password: &SecretString,
        master: &SecretString,
    ) -> Result<i64, LockboxError> {
        require_field("website", &args.website)?;
        require_field("username", &args.username)?;
        require_field("password", password.expose_secret())?;
        if !args.password.allow_weak {
            self.policy.check_entry(password.expose_secret())?;
        }

        if self.store.entry_exists(&args.website, &args.username)? {
            warn!(
                website = %args.website,
                username = %args.username,
                "an entry for this account already exists"
            );
        }

        let id = self.store.add_entry(
            &args.website,
            &args.username,
            password.expose_secret(),
            &args.notes,
            master,
        )?;
        info!(id, website = %args.website, "entry added");
        Ok(id)
    }

    /// Apply the given edits on top of the current entry. Fields left out
    /// keep their current value, the password included.
    pub fn update(
        &self,
        args: &UpdateArgs,
        new_password: Option<&SecretString>,
        master: &SecretString,
    ) -> Result<(), LockboxError> {
        let current = self.store.get_entry(args.id, master)?;

        let website = args.website.as_deref().unwrap_or(&current.website);
        let username = args.username.as_deref().unwrap_or(&current.username);
        let notes = args.notes.as_deref().unwrap_or(&current.notes);
        require_field("website", website)?;
        require_field("username", username)?;

        let password = match new_password {
            Some(password) => {
                require_field("password", password.expose_secret())?;
                if !args.password.allow_weak {
                    self.policy.check_entry(password.expose_secret())?;
                }
                password.expose_secret()
            }
            None => current.password.expose_secret(),
        };

        self.store
            .update_password(args.id, website, username, password, notes, master)?;
        info!(id = args.id, "entry updated");
        Ok(())
    }
}

/// Generate or prompt for a new entry password.
fn new_entry_password(
    args: &PasswordArgs,
    config: &LockboxConfig,
) -> Result<SecretString, LockboxError> {
    if args.generate {
        let length = args.length.unwrap_or(config.generator.default_length);
        return generate_password(length).map(SecretString::from);
    }

    let first = read_entry_password("Entry password: ")?;
    let second = read_entry_password("Confirm entry password: ")?;
    if first.expose_secret() != second.expose_secret() {
        return Err(LockboxError::Validation("passwords do not match".to_string()));
    }
    Ok(first)
}

fn require_field(name: &str, value: &str) -> Result<(), LockboxError> {
    if value.trim().is_empty() {
        return Err(LockboxError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}

fn shown_password(entry: &VaultEntry, reveal: bool) -> String {
    let password = entry.password.expose_secret();
    if reveal {
        password.to_string()
    } else {
        mask_secret(password)
    }
}

/// Render entries as an aligned table, one row per entry.
pub fn format_entries(entries: &[VaultEntry], reveal: bool) -> String {
    if entries.is_empty() {
        return "The vault is empty.\n".to_string();
    }

    let site_width = column_width("WEBSITE", entries.iter().map(|e| e.website.as_str()));
    let user_width = column_width("USERNAME", entries.iter().map(|e| e.username.as_str()));

    let mut out = format!(
        "{:>4}  {:<site_width$}  {:<user_width$}  PASSWORD\n",
        "ID", "WEBSITE", "USERNAME"
    );
    for entry in entries {
        out.push_str(&format!(
            "{:>4}  {:<site_width$}  {:<user_width$}  {}\n",
            entry.id,
            entry.website,
            entry.username,
            shown_password(entry, reveal)
        ));
    }
    out
}

/// Render one entry, notes included.
pub fn format_entry(entry: &VaultEntry, reveal: bool) -> String {
    let mut out = format!(
        "Id:       {}\nWebsite:  {}\nUsername: {}\nPassword: {}\n",
        entry.id,
        entry.website,
        entry.username,
        shown_password(entry, reveal)
    );
    if !entry.notes.is_empty() {
        out.push_str(&format!("Notes:    {}\n", entry.notes));
    }
    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_config::VaultConfig;
    use tempfile::TempDir;

    fn pw(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn test_config() -> (TempDir, LockboxConfig) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LockboxConfig::default();
        config.vault = VaultConfig::in_dir(dir.path());
        config.vault.kdf_iterations = 1_000;
        (dir, config)
    }

    fn add_args(website: &str, username: &str) -> AddArgs {
        AddArgs {
            website: website.to_string(),
            username: username.to_string(),
            notes: "n".to_string(),
            password: PasswordArgs::default(),
        }
    }

    fn unlocked(config: &LockboxConfig) -> (Vault, SecretString) {
        init(config, &pw("master-pw"), false).unwrap();
        let vault = Vault::open(config).unwrap();
        let master = vault.unlock(pw("master-pw")).unwrap();
        (vault, master)
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let (_dir, config) = test_config();
        init(&config, &pw("master-pw"), false).unwrap();

        let err = init(&config, &pw("other-pw"), false).unwrap_err();
        assert!(err.to_string().contains("--force"));

        init(&config, &pw("other-pw"), true).unwrap();
        let vault = Vault::open(&config).unwrap();
        assert!(vault.unlock(pw("other-pw")).is_ok());
    }

    #[test]
    fn init_enforces_master_length() {
        let (_dir, config) = test_config();
        let err = init(&config, &pw("abc"), false).unwrap_err();
        assert!(matches!(err, LockboxError::Validation(_)));
        assert!(!MasterKeyGuard::new(&config.vault).is_master_set());
    }

    #[test]
    fn unlock_rejects_wrong_password_and_missing_setup() {
        let (_dir, config) = test_config();
        let vault = Vault::open(&config).unwrap();
        assert!(matches!(
            vault.unlock(pw("anything")),
            Err(LockboxError::NotSet)
        ));

        init(&config, &pw("master-pw"), false).unwrap();
        let err = vault.unlock(pw("wrong-pw")).unwrap_err();
        assert!(err.to_string().contains("incorrect master password"));
    }

    #[test]
    fn add_rejects_weak_password_unless_allowed() {
        let (_dir, config) = test_config();
        let (vault, master) = unlocked(&config);

        let mut args = add_args("site.com", "bob");
        assert!(vault.add(&args, &pw("short"), &master).is_err());
        assert!(vault.add(&args, &pw("myqwertykeys"), &master).is_err());

        args.password.allow_weak = true;
        let id = vault.add(&args, &pw("short"), &master).unwrap();
        assert_eq!(vault.store.get_entry(id, &master).unwrap().password.expose_secret(), "short");
    }

    #[test]
    fn add_requires_fields() {
        let (_dir, config) = test_config();
        let (vault, master) = unlocked(&config);

        let err = vault.add(&add_args(" ", "bob"), &pw("Str0ng!Pass"), &master).unwrap_err();
        assert!(err.to_string().contains("website"));
        let err = vault.add(&add_args("site.com", "bob"), &pw(""), &master).unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn add_reports_duplicates() {
        let (_dir, config) = test_config();
        let (vault, master) = unlocked(&config);

        vault.add(&add_args("site.com", "bob"), &pw("Str0ng!Pass"), &master).unwrap();
        let err = vault
            .add(&add_args("site.com", "bob"), &pw("Other!Pass9"), &master)
            .unwrap_err();
        assert!(matches!(err, LockboxError::Duplicate { .. }));
    }

    #[test]
    fn update_keeps_unspecified_fields() {
        let (_dir, config) = test_config();
        let (vault, master) = unlocked(&config);
        let id = vault.add(&add_args("site.com", "bob"), &pw("Str0ng!Pass"), &master).unwrap();

        let args = UpdateArgs {
            id,
            username: Some("alice".to_string()),
            ..UpdateArgs::default()
        };
        vault.update(&args, None, &master).unwrap();

        let entry = vault.store.get_entry(id, &master).unwrap();
        assert_eq!(entry.website, "site.com");
        assert_eq!(entry.username, "alice");
        assert_eq!(entry.password.expose_secret(), "Str0ng!Pass");
        assert_eq!(entry.notes, "n");
    }

    #[test]
    fn update_checks_new_password_strength() {
        let (_dir, config) = test_config();
        let (vault, master) = unlocked(&config);
        let id = vault.add(&add_args("site.com", "bob"), &pw("Str0ng!Pass"), &master).unwrap();

        let args = UpdateArgs {
            id,
            new_password: true,
            ..UpdateArgs::default()
        };
        assert!(vault.update(&args, Some(&pw("password1")), &master).is_err());
        vault.update(&args, Some(&pw("N3w!Secret")), &master).unwrap();
        assert_eq!(
            vault.store.get_entry(id, &master).unwrap().password.expose_secret(),
            "N3w!Secret"
        );
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (_dir, config) = test_config();
        let (vault, master) = unlocked(&config);
        let args = UpdateArgs {
            id: 42,
            ..UpdateArgs::default()
        };
        assert!(matches!(
            vault.update(&args, None, &master),
            Err(LockboxError::NotFound { id: 42 })
        ));
    }

    #[test]
    fn generated_entry_password_has_requested_length() {
        let (_dir, config) = test_config();
        let args = PasswordArgs {
            generate: true,
            length: Some(20),
            allow_weak: false,
        };
        let password = new_entry_password(&args, &config).unwrap();
        assert_eq!(password.expose_secret().chars().count(), 20);
    }

    #[test]
    fn oversized_generated_password_is_rejected() {
        let (_dir, config) = test_config();
        let args = PasswordArgs {
            generate: true,
            length: Some(usize::MAX),
            allow_weak: false,
        };
        assert!(matches!(
            new_entry_password(&args, &config),
            Err(LockboxError::Validation(_))
        ));
    }

    fn entry(id: i64, website: &str, password: &str, notes: &str) -> VaultEntry {
        VaultEntry {
            id,
            website: website.to_string(),
            username: "bob".to_string(),
            password: pw(password),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn table_masks_passwords_by_default() {
        let entries = vec![entry(1, "site.com", "abc", ""), entry(2, "example.org", "xy", "")];

        let masked = format_entries(&entries, false);
        assert!(masked.starts_with("  ID  WEBSITE"));
        assert!(masked.contains("•••"));
        assert!(!masked.contains("abc"));

        let revealed = format_entries(&entries, true);
        assert!(revealed.contains("abc"));
        assert_eq!(revealed.lines().count(), 3);
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(format_entries(&[], false), "The vault is empty.\n");
    }

    #[test]
    fn single_entry_shows_notes_only_when_present() {
        assert!(format_entry(&entry(1, "site.com", "abc", "work"), false).contains("Notes:    work"));
        assert!(!format_entry(&entry(1, "site.com", "abc", ""), false).contains("Notes"));
    }
}
