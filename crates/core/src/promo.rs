//! Promo code normalization, format rules and generation.
//!
//! Codes are compared case-insensitively: both admin-created and
//! user-submitted codes pass through [`normalize`] before touching the
//! database, so the unique index sees one canonical spelling.

use std::sync::LazyLock;

use rand::Rng;

use crate::error::CoreError;

/// Uppercase alphanumerics in hyphen-separated groups, 4 to 32 chars.
static CODE_FORMAT: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Z0-9]+(-[A-Z0-9]+)*$").expect("valid regex"));

/// Characters used for generated codes. 0/O and 1/I/L are left out so
/// codes survive being read over the phone.
const ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";

const GROUPS: usize = 3;
const GROUP_LEN: usize = 4;

pub const MIN_LEN: usize = 4;
pub const MAX_LEN: usize = 32;

pub fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

pub fn validate_format(code: &str) -> Result<(), CoreError> {
    if code.len() < MIN_LEN || code.len() > MAX_LEN {
        return Err(CoreError::Validation(format!(
            "promo code must be {MIN_LEN}-{MAX_LEN} characters"
        )));
    }
    if !CODE_FORMAT.is_match(code) {
        return Err(CoreError::Validation(
            "promo code may only contain letters, digits and hyphens".into(),
        ));
    }
    Ok(())
}

/// Generates a fresh code like `7M2K-9PQ4-XH3T`. Uniqueness is enforced
/// by the database, not here; the caller retries on collision.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut code = String::with_capacity(GROUPS * (GROUP_LEN + 1) - 1);
    for group in 0..GROUPS {
        if group > 0 {
            code.push('-');
        }
        for _ in 0..GROUP_LEN {
            let idx = rng.random_range(0..ALPHABET.len());
            code.push(ALPHABET[idx] as char);
        }
    }
    code
}
