use crate::domain::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use utoipa::IntoParams;

/// Pagination for list endpoints: skip >= 0, 1 <= limit <= 1000.
/// Bounds are enforced by the repository.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Number of records to skip.
    #[serde(default)]
    pub skip: i64,
    /// Number of records to return (1-1000).
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for ListParams {
    fn default() -> Self {
        Self { skip: 0, limit: default_limit() }
    }
}

/// Decodes a `row_to_json` record into its typed response shape.
pub fn decode<T: DeserializeOwned>(record: JsonValue) -> Result<T, ApiError> {
    serde_json::from_value(record)
        .map_err(|e| ApiError::Validation(format!("malformed record: {e}")))
}

pub fn decode_all<T: DeserializeOwned>(records: Vec<JsonValue>) -> Result<Vec<T>, ApiError> {
    records.into_iter().map(decode).collect()
}

/// Search terms must be at least two characters.
pub fn check_search_term(field: &str, value: &str) -> Result<(), ApiError> {
    if value.chars().count() < 2 {
        return Err(ApiError::Validation(format!(
            "{field} must be at least 2 characters"
        )));
    }
    Ok(())
}
