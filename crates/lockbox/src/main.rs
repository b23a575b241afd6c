// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lockbox - a local secrets vault gated by a single master password.
//!
//! This is the binary entry point.

mod commands;
mod status;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Lockbox - a local secrets vault gated by a single master password.
#[derive(Parser, Debug)]
#[command(name = "lockbox", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard lookup.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set the master password (first-time setup).
    Init {
        /// Replace an existing master password. Entries encrypted under the
        /// old password become unreadable.
        #[arg(long)]
        force: bool,
    },
    /// Show vault location, setup state, and entry count.
    Status {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Add a credential.
    Add(AddArgs),
    /// List all credentials.
    List {
        /// Print passwords instead of masking them.
        #[arg(long)]
        reveal: bool,
    },
    /// Show one credential.
    Show {
        id: i64,
        /// Print the password instead of masking it.
        #[arg(long)]
        reveal: bool,
    },
    /// Edit a credential in place.
    Update(UpdateArgs),
    /// Delete a credential.
    Delete { id: i64 },
    /// Print a random password.
    Generate {
        /// Number of characters (default from config, minimum 6).
        #[arg(short, long)]
        length: Option<usize>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

/// Password source shared by `add` and `update`.
#[derive(Args, Debug, Clone, Default)]
pub struct PasswordArgs {
    /// Generate a random password instead of prompting for one.
    #[arg(long)]
    pub generate: bool,

    /// Length of the generated password.
    #[arg(long, requires = "generate")]
    pub length: Option<usize>,

    /// Store the password even if it fails the strength checks.
    #[arg(long)]
    pub allow_weak: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    pub website: String,
    pub username: String,

    #[arg(long, default_value = "")]
    pub notes: String,

    #[command(flatten)]
    pub password: PasswordArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    pub id: i64,

    #[arg(long)]
    pub website: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Prompt for a new password (otherwise the current one is kept).
    #[arg(long, conflicts_with = "generate")]
    pub new_password: bool,

    #[command(flatten)]
    pub password: PasswordArgs,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => lockbox_config::load_and_validate_path(path),
        None => lockbox_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            lockbox_config::render_errors(&errors);
            std::process::exit(2);
        }
    };

    init_tracing(&config.general.log_level);

    if let Err(e) = commands::execute(cli.command, &config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Install the stderr fmt subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lockbox={log_level},lockbox_vault={log_level},lockbox_config={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
