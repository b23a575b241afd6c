// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation.

use lockbox_config::validation::{MAX_GENERATOR_LENGTH, MIN_GENERATOR_LENGTH};
use lockbox_core::LockboxError;
use rand::Rng;
use rand::rngs::OsRng;

/// Shortest password the generator will produce.
pub const MIN_LENGTH: usize = MIN_GENERATOR_LENGTH;

/// Longest password the generator will produce.
pub const MAX_LENGTH: usize = MAX_GENERATOR_LENGTH;

/// ASCII letters, digits, and ASCII punctuation.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz\
ABCDEFGHIJKLMNOPQRSTUVWXYZ\
0123456789\
!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// A password of `length` characters drawn uniformly from [`ALPHABET`]
/// using the operating system RNG.
pub fn generate_password(length: usize) -> Result<String, LockboxError> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(LockboxError::Validation(format!(
            "password length must be between {MIN_LENGTH} and {MAX_LENGTH}, got {length}"
        )));
    }

    let mut rng = OsRng;
    Ok((0..length)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect())
}
