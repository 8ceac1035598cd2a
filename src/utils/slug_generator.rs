//! Slug generation and validation utilities.
//!
//! Generated slugs draw from a 62-symbol alphabet using OS entropy and
//! rejection sampling, so every symbol is equally likely at every position.
//! Operator-supplied slugs go through [`validate_custom_slug`] instead.

use std::collections::HashSet;

/// Symbols a generated slug is made of.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default number of random symbols in a slug (~47.6 bits of entropy).
pub const DEFAULT_SLUG_LENGTH: usize = 8;

/// Candidates tried before giving up on finding a free slug.
pub const MAX_ATTEMPTS: usize = 10;

/// Largest multiple of 62 that fits in a byte. Bytes at or above it are
/// discarded so that `byte % 62` is uniform.
const ACCEPT_LIMIT: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Random bytes requested from the OS per refill.
const ENTROPY_CHUNK: usize = 64;

/// Paths served by the router itself; a slug must never shadow them.
pub const RESERVED_SLUGS: &[&str] = &["api", "health", "admin", "static", "dashboard"];

/// Errors produced while generating or validating slugs.
#[derive(Debug, thiserror::Error)]
pub enum SlugError {
    #[error("no free slug found after {attempts} attempts")]
    Exhausted { attempts: usize },

    #[error("slug length must be at least 1")]
    ZeroLength,

    #[error("entropy source failed: {0}")]
    Entropy(String),

    #[error("{0}")]
    InvalidCustom(String),
}

/// Generates a random slug of `length` symbols using OS entropy.
///
/// # Errors
///
/// Returns [`SlugError::Entropy`] if the OS random source fails and
/// [`SlugError::ZeroLength`] for a zero length.
pub fn random_slug(length: usize) -> Result<String, SlugError> {
    random_slug_with(length, &mut os_fill)
}

/// Generates `prefix` + random symbols that are neither in `existing` nor reserved.
///
/// `existing` is only read. The caller owns the authoritative set and must
/// record the returned slug once it has been persisted.
///
/// # Errors
///
/// Returns [`SlugError::Exhausted`] after [`MAX_ATTEMPTS`] collisions. With
/// the default length this is practically unreachable, but a saturated set
/// (short lengths, tests) will hit it instead of looping forever.
pub fn generate_unique(
    existing: &HashSet<String>,
    prefix: &str,
    length: usize,
) -> Result<String, SlugError> {
    generate_unique_with(existing, prefix, length, &mut os_fill)
}

fn os_fill(buffer: &mut [u8]) -> Result<(), SlugError> {
    getrandom::fill(buffer).map_err(|e| SlugError::Entropy(e.to_string()))
}

fn generate_unique_with<F>(
    existing: &HashSet<String>,
    prefix: &str,
    length: usize,
    fill: &mut F,
) -> Result<String, SlugError>
where
    F: FnMut(&mut [u8]) -> Result<(), SlugError>,
{
    for _ in 0..MAX_ATTEMPTS {
        let candidate = format!("{prefix}{}", random_slug_with(length, fill)?);

        if !existing.contains(&candidate) && !RESERVED_SLUGS.contains(&candidate.as_str()) {
            return Ok(candidate);
        }
    }

    Err(SlugError::Exhausted {
        attempts: MAX_ATTEMPTS,
    })
}

fn random_slug_with<F>(length: usize, fill: &mut F) -> Result<String, SlugError>
where
    F: FnMut(&mut [u8]) -> Result<(), SlugError>,
{
    if length == 0 {
        return Err(SlugError::ZeroLength);
    }

    let mut slug = String::with_capacity(length);
    let mut buffer = [0u8; ENTROPY_CHUNK];

    while slug.len() < length {
        fill(&mut buffer)?;

        for &byte in buffer.iter().filter(|&&b| b < ACCEPT_LIMIT) {
            slug.push(ALPHABET[usize::from(byte) % ALPHABET.len()] as char);
            if slug.len() == length {
                break;
            }
        }
    }

    Ok(slug)
}

/// Validates an operator-supplied slug.
///
/// # Rules
///
/// - Length: 4-64 characters
/// - Allowed characters: ASCII letters, digits, hyphens
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved path
///
/// # Errors
///
/// Returns [`SlugError::InvalidCustom`] describing the first violated rule.
pub fn validate_custom_slug(slug: &str) -> Result<(), SlugError> {
    if slug.len() < 4 || slug.len() > 64 {
        return Err(SlugError::InvalidCustom(format!(
            "Custom slug must be 4-64 characters, got {}",
            slug.len()
        )));
    }

    if !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(SlugError::InvalidCustom(
            "Custom slug can only contain letters, digits, and hyphens".to_string(),
        ));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(SlugError::InvalidCustom(
            "Custom slug cannot start or end with a hyphen".to_string(),
        ));
    }

    if RESERVED_SLUGS.contains(&slug.to_ascii_lowercase().as_str()) {
        return Err(SlugError::InvalidCustom("This slug is reserved".to_string()));
    }

    Ok(())
}
