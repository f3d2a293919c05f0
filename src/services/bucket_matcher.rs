//! Bucket name normalization and lookup.
//!
//! Two separate rules live here and must not be merged:
//! - dedup matching compares names lower-cased with all whitespace removed;
//! - reserved-name protection is a case-insensitive exact comparison.

use crate::models::bucket::Bucket;

/// Bucket created for every user on first use.
pub const DEFAULT_BUCKET_NAME: &str = "Others";

/// Names that can be neither renamed nor deleted.
pub const RESERVED_BUCKET_NAMES: &[&str] = &[DEFAULT_BUCKET_NAME];

/// Dedup key: lower-case, whitespace removed.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// First bucket (in list order) whose name normalizes to the same key as `name`.
pub fn find_matching<'a>(name: &str, buckets: &'a [Bucket]) -> Option<&'a Bucket> {
    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return None;
    }
    buckets.iter().find(|b| normalize_name(&b.name) == wanted)
}

/// True for reserved default names, compared case-insensitively without
/// touching whitespace.
pub fn is_protected(name: &str) -> bool {
    RESERVED_BUCKET_NAMES
        .iter()
        .any(|reserved| reserved.to_lowercase() == name.to_lowercase())
}
