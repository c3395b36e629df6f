//! Short code generation and custom alias validation.
//!
//! Random codes are a base-62 rendering of a uniformly random `u64`,
//! most significant digit first and without padding, so their length
//! varies between 1 and 11 characters. Generation never consults the
//! store; uniqueness is checked by the caller.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::AppError;

/// Base-62 alphabet: digits, lowercase, uppercase.
const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Longest accepted custom alias.
pub const MAX_ALIAS_LENGTH: usize = 32;

/// Characters allowed in a custom alias.
static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("alias pattern is valid"));

/// Aliases that would shadow service routes.
const RESERVED_ALIASES: &[&str] = &["api", "health"];

/// Source of candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random short code.
pub fn generate_code() -> String {
    encode_base62(rand::random::<u64>())
}

/// Encodes `value` in base 62, most significant digit first.
///
/// ```ignore
/// assert_eq!(encode_base62(0), "0");
/// assert_eq!(encode_base62(61), "Z");
/// assert_eq!(encode_base62(62), "10");
/// ```
pub fn encode_base62(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(11);
    while value > 0 {
        digits.push(ALPHABET[(value % 62) as usize]);
        value /= 62;
    }
    digits.reverse();

    // ALPHABET is pure ASCII.
    digits.into_iter().map(char::from).collect()
}

/// Validates a caller-supplied alias.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::InvalidAlias`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() || alias.len() > MAX_ALIAS_LENGTH {
        return Err(AppError::InvalidAlias(format!(
            "must be 1-{MAX_ALIAS_LENGTH} characters, got {}",
            alias.len()
        )));
    }

    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::InvalidAlias(
            "only letters, digits, '-' and '_' are allowed".to_string(),
        ));
    }

    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(AppError::InvalidAlias(format!("'{alias}' is reserved")));
    }

    Ok(())
}
