// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types shared by every Lockbox crate.
//!
//! Holds the error taxonomy used by the vault, configuration, and CLI layers.

pub mod error;

pub use error::{LockboxError, Result};
