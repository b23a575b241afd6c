// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptographic and persistence core of the Lockbox secrets vault.
//!
//! - [`MasterKeyGuard`] hashes and verifies the master password.
//! - [`KeyDerivation`] turns the master password and a per-blob salt into an
//!   AES-256 key with PBKDF2-HMAC-SHA256.
//! - [`CipherEngine`] encrypts individual fields into self-contained blobs.
//! - [`VaultStore`] keeps entries in SQLite, encrypting on write and
//!   decrypting on read with the master password passed to each call.

pub mod crypto;
pub mod generator;
pub mod kdf;
pub mod master;
pub mod models;
pub mod policy;
pub mod prompt;
pub mod store;

pub use crypto::{CipherBlob, CipherEngine};
pub use generator::generate_password;
pub use kdf::KeyDerivation;
pub use master::MasterKeyGuard;
pub use models::{EncryptedEntry, VaultEntry};
pub use policy::PasswordPolicy;
pub use prompt::{get_master_password, get_master_password_with_confirm};
pub use store::{VaultStore, mask_secret};
