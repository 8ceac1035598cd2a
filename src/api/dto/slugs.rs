//! DTOs for the slug allocation endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::SlugNamespace;
use crate::utils::slug_generator::DEFAULT_SLUG_LENGTH;

/// Compiled regex for slug prefixes.
static PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]{0,16}$").expect("prefix pattern is valid"));

/// Request for a new slug.
///
/// With `custom` set, that slug is reserved as-is and `prefix`/`length` are
/// ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct SlugRequest {
    #[serde(default)]
    pub namespace: SlugNamespace,

    #[serde(default)]
    #[validate(regex(path = "*PREFIX_REGEX", message = "prefix must match [a-z0-9-]{0,16}"))]
    pub prefix: String,

    #[serde(default = "default_length")]
    #[validate(range(min = 4, max = 32))]
    pub length: usize,

    pub custom: Option<String>,
}

fn default_length() -> usize {
    DEFAULT_SLUG_LENGTH
}

/// Reserved slug.
#[derive(Debug, Serialize)]
pub struct SlugResponse {
    pub slug: String,
    pub namespace: SlugNamespace,
}
