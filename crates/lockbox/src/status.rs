// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox status` command implementation.
//!
//! Reports where the vault lives, whether first-time setup has run, and how
//! many entries the database holds. Never asks for the master password.

use std::io::IsTerminal;

use lockbox_config::LockboxConfig;
use lockbox_core::LockboxError;
use lockbox_vault::{MasterKeyGuard, VaultStore};

/// Outcome of a single status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
        }
    }
}

/// Run the `lockbox status` command.
///
/// With `--plain`, or when stdout is not a TTY, prints without color.
pub fn run_status(config: &LockboxConfig, plain: bool) -> Result<(), LockboxError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = collect_checks(config);

    println!();
    println!("  lockbox status");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_line(result, use_color));
    }
    println!();

    if results.iter().any(|r| r.status == CheckStatus::Fail) {
        return Err(LockboxError::Internal("vault is not usable".to_string()));
    }
    Ok(())
}

/// Gather every check without printing anything.
pub fn collect_checks(config: &LockboxConfig) -> Vec<CheckResult> {
    vec![
        check_master(config),
        check_database(config),
        CheckResult::new(
            "key derivation",
            CheckStatus::Pass,
            format!(
                "PBKDF2-HMAC-SHA256, {} iterations",
                config.vault.kdf_iterations
            ),
        ),
    ]
}

fn check_master(config: &LockboxConfig) -> CheckResult {
    let guard = MasterKeyGuard::new(&config.vault);
    if guard.is_master_set() {
        CheckResult::new(
            "master password",
            CheckStatus::Pass,
            format!("set ({})", guard.path().display()),
        )
    } else {
        CheckResult::new(
            "master password",
            CheckStatus::Warn,
            "not set -- run `lockbox init`",
        )
    }
}

fn check_database(config: &LockboxConfig) -> CheckResult {
    let path = config.vault.database_path();
    if !path.exists() {
        return CheckResult::new(
            "database",
            CheckStatus::Warn,
            format!("{} does not exist yet", path.display()),
        );
    }

    let counted = VaultStore::new(&config.vault).and_then(|store| store.count_entries());
    match counted {
        Ok(n) => {
            let word = if n == 1 { "entry" } else { "entries" };
            CheckResult::new(
                "database",
                CheckStatus::Pass,
                format!("{n} {word} ({})", path.display()),
            )
        }
        Err(e) => CheckResult::new("database", CheckStatus::Fail, e.to_string()),
    }
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red()),
        };
        format!("    {symbol} {:<18} {message}", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!("    {tag} {:<18} {}", result.name, result.message)
    }
}
