// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed entry store.
//!
//! Website and username are stored in clear for lookup and listing; password
//! and notes are stored only as cipher blobs. Every read decrypts and every
//! write encrypts with the master password supplied for that call, which the
//! store never keeps.
//!
//! Each operation opens its own connection and releases it before
//! returning. Writers from other processes are not coordinated beyond
//! SQLite's default locking.

use std::path::{Path, PathBuf};

use lockbox_config::{UniqueField, VaultConfig};
use lockbox_core::LockboxError;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::crypto::CipherEngine;
use crate::models::{EncryptedEntry, VaultEntry};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS passwords (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        website  TEXT NOT NULL,
        username TEXT NOT NULL,
        password TEXT NOT NULL,
        notes    TEXT
    );
";

const SELECT_COLUMNS: &str = "SELECT id, website, username, password, notes FROM passwords";

/// CRUD over vault entries with transparent field encryption.
#[derive(Debug, Clone)]
pub struct VaultStore {
    db_path: PathBuf,
    cipher: CipherEngine,
    unique_on: Vec<UniqueField>,
}

impl VaultStore {
    /// Store at `config.database_path()`, honoring the configured key
    /// derivation, padding mode, and uniqueness policy.
    pub fn new(config: &VaultConfig) -> Result<Self, LockboxError> {
        Ok(Self {
            db_path: config.database_path(),
            cipher: CipherEngine::from_config(config)?,
            unique_on: config.enforce_unique_on.clone(),
        })
    }

    /// Store at an explicit path with no uniqueness policy.
    pub fn with_cipher(db_path: impl Into<PathBuf>, cipher: CipherEngine) -> Self {
        Self {
            db_path: db_path.into(),
            cipher,
            unique_on: Vec::new(),
        }
    }

    /// Replace the uniqueness policy applied by [`add_entry`](Self::add_entry).
    pub fn with_unique_on(mut self, fields: Vec<UniqueField>) -> Self {
        self.unique_on = fields;
        self
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection, LockboxError> {
        Connection::open(&self.db_path).map_err(db_err)
    }

    /// Create the database file and table if missing. Safe on every startup.
    pub fn initialize(&self) -> Result<(), LockboxError> {
        if let Some(dir) = self.db_path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        self.connect()?.execute_batch(SCHEMA).map_err(db_err)?;
        info!(path = %self.db_path.display(), "vault store initialized");
        Ok(())
    }

    /// Exact, case-sensitive match on both website and username.
    pub fn entry_exists(&self, website: &str, username: &str) -> Result<bool, LockboxError> {
        self.connect()?
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM passwords WHERE website = ?1 AND username = ?2)",
                params![website, username],
                |row| row.get(0),
            )
            .map_err(db_err)
    }

    /// Number of stored entries. Needs no master password.
    pub fn count_entries(&self) -> Result<i64, LockboxError> {
        self.connect()?
            .query_row("SELECT COUNT(*) FROM passwords", [], |row| row.get(0))
            .map_err(db_err)
    }

    /// Encrypt password and notes independently and insert a new entry.
    ///
    /// Returns the id assigned by the database. Fails with
    /// [`LockboxError::Duplicate`] when the uniqueness policy matches an
    /// existing entry.
    pub fn add_entry(
        &self,
        website: &str,
        username: &str,
        password: &str,
        notes: &str,
        master: &SecretString,
    ) -> Result<i64, LockboxError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction().map_err(db_err)?;
        if is_duplicate(&tx, &self.unique_on, website, username).map_err(db_err)? {
            return Err(LockboxError::Duplicate {
                website: website.to_string(),
                username: username.to_string(),
            });
        }

        let encrypted_password = self.cipher.encrypt(password, master)?;
        let encrypted_notes = self.cipher.encrypt(notes, master)?;
        tx.execute(
            "INSERT INTO passwords (website, username, password, notes) VALUES (?1, ?2, ?3, ?4)",
            params![website, username, encrypted_password, encrypted_notes],
        )
        .map_err(db_err)?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(db_err)?;

        debug!(id, website = %website, "entry added");
        Ok(id)
    }

    /// Every entry, decrypted, ordered by id.
    ///
    /// A single blob that fails to decrypt fails the whole listing, so a
    /// wrong master password never yields partially garbled results.
    pub fn list_entries(&self, master: &SecretString) -> Result<Vec<VaultEntry>, LockboxError> {
        let rows = self.encrypted_entries()?;
        let entries = rows
            .into_iter()
            .map(|row| self.decrypt_entry(row, master))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|_| warn!("listing aborted: an entry failed to decrypt"))?;
        debug!(count = entries.len(), "entries listed");
        Ok(entries)
    }

    /// One decrypted entry by id.
    pub fn get_entry(&self, id: i64, master: &SecretString) -> Result<VaultEntry, LockboxError> {
        let row = self
            .connect()?
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_entry,
            )
            .optional()
            .map_err(db_err)?
            .ok_or(LockboxError::NotFound { id })?;
        self.decrypt_entry(row, master)
    }

    /// Overwrite an entry in place, re-encrypting both sensitive fields with
    /// fresh salt and IV.
    ///
    /// The uniqueness policy is not re-checked on update.
    pub fn update_password(
        &self,
        id: i64,
        website: &str,
        username: &str,
        password: &str,
        notes: &str,
        master: &SecretString,
    ) -> Result<(), LockboxError> {
        let encrypted_password = self.cipher.encrypt(password, master)?;
        let encrypted_notes = self.cipher.encrypt(notes, master)?;

        let changed = self
            .connect()?
            .execute(
                "UPDATE passwords SET website = ?1, username = ?2, password = ?3, notes = ?4 WHERE id = ?5",
                params![website, username, encrypted_password, encrypted_notes, id],
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(LockboxError::NotFound { id });
        }

        debug!(id, "entry updated");
        Ok(())
    }

    /// Remove an entry. Unknown ids are a no-op.
    pub fn delete_entry(&self, id: i64) -> Result<(), LockboxError> {
        let removed = self
            .connect()?
            .execute("DELETE FROM passwords WHERE id = ?1", params![id])
            .map_err(db_err)?;
        debug!(id, removed, "entry delete");
        Ok(())
    }

    fn encrypted_entries(&self) -> Result<Vec<EncryptedEntry>, LockboxError> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .map_err(db_err)?;
        let rows = stmt.query_map([], row_to_entry).map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    fn decrypt_entry(
        &self,
        row: EncryptedEntry,
        master: &SecretString,
    ) -> Result<VaultEntry, LockboxError> {
        let password = self.cipher.decrypt(&row.encrypted_password, master)?;
        let notes = if row.encrypted_notes.is_empty() {
            String::new()
        } else {
            self.cipher.decrypt(&row.encrypted_notes, master)?
        };
        Ok(VaultEntry {
            id: row.id,
            website: row.website,
            username: row.username,
            password: SecretString::from(password),
            notes,
        })
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<EncryptedEntry> {
    Ok(EncryptedEntry {
        id: row.get(0)?,
        website: row.get(1)?,
        username: row.get(2)?,
        encrypted_password: row.get(3)?,
        // `notes` is nullable in the schema.
        encrypted_notes: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

/// Whether an existing row matches `website`/`username` on every field in
/// `unique_on`. An empty policy never matches.
fn is_duplicate(
    conn: &Connection,
    unique_on: &[UniqueField],
    website: &str,
    username: &str,
) -> rusqlite::Result<bool> {
    if unique_on.is_empty() {
        return Ok(false);
    }

    let (clauses, values): (Vec<&str>, Vec<&str>) = unique_on
        .iter()
        .map(|field| match field {
            UniqueField::Website => ("website = ?", website),
            UniqueField::Username => ("username = ?", username),
        })
        .unzip();
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM passwords WHERE {})",
        clauses.join(" AND ")
    );
    conn.query_row(&sql, params_from_iter(values), |row| row.get(0))
}

fn db_err(e: rusqlite::Error) -> LockboxError {
    LockboxError::Storage {
        source: Box::new(e),
    }
}

/// Mask a password for display: one bullet per character.
pub fn mask_secret(value: &str) -> String {
    "•".repeat(value.chars().count())
}
