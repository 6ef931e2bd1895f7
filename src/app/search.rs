//! In-memory substring filtering for the /search endpoints.
//!
//! The handlers load the bounded working set (at most 1000 rows) through
//! the repository and filter it here. Keeping all matching in this
//! module means an index-backed implementation can replace it without
//! touching callers.

pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True when any of the fields contains the needle, case-insensitively.
pub fn matches_any_ci(fields: &[&str], needle: &str) -> bool {
    fields.iter().any(|f| contains_ci(f, needle))
}
