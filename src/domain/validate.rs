//! Field-level constraint checks shared by the create/update payloads.

use crate::domain::error::ApiError;
use chrono::{DateTime, Utc};

/// Non-empty text with a maximum length in characters.
pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

pub fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ApiError> {
    if value < min || value > max {
        return Err(ApiError::Validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

pub fn check_positive(field: &str, value: f64) -> Result<(), ApiError> {
    if !(value > 0.0) {
        return Err(ApiError::Validation(format!("{field} must be greater than 0")));
    }
    Ok(())
}

/// Enforced only when the timestamp is supplied on create/update, never
/// retroactively against stored rows.
pub fn check_not_future(field: &str, value: &DateTime<Utc>) -> Result<(), ApiError> {
    if *value > Utc::now() {
        return Err(ApiError::Validation(format!("{field} cannot be in the future")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn rejects_empty_and_overlong_text() {
        assert!(require_text("name", "Chile", 100).is_ok());
        assert!(require_text("name", "", 100).is_err());
        assert!(require_text("name", "   ", 100).is_err());
        assert!(require_text("name", &"x".repeat(101), 100).is_err());
        assert!(require_text("name", &"x".repeat(100), 100).is_ok());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(check_range("age", 0, 0, 150).is_ok());
        assert!(check_range("age", 150, 0, 150).is_ok());
        assert!(check_range("age", -1, 0, 150).is_err());
        assert!(check_range("age", 151, 0, 150).is_err());
    }

    #[test]
    fn price_must_be_strictly_positive() {
        assert!(check_positive("price", 0.01).is_ok());
        assert!(check_positive("price", 0.0).is_err());
        assert!(check_positive("price", -5.0).is_err());
        assert!(check_positive("price", f64::NAN).is_err());
    }

    #[test]
    fn future_timestamps_are_rejected() {
        let past = Utc::now() - Duration::hours(1);
        let future = Utc::now() + Duration::hours(1);
        assert!(check_not_future("sale_date", &past).is_ok());
        assert!(check_not_future("sale_date", &future).is_err());
    }
}
