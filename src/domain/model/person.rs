use crate::domain::error::ApiError;
use crate::domain::model::country::CountryResponse;
use crate::domain::model::patch::Patch;
use crate::domain::validate;
use crate::storage::repo::FieldChange;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub country_id: Option<i64>,
}

/// Flat person plus the eagerly-loaded country (absent when the person has
/// no country or the reference dangles).
#[derive(Debug, Serialize, ToSchema)]
pub struct PersonWithCountry {
    #[serde(flatten)]
    pub person: PersonResponse,
    pub country: Option<CountryResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePerson {
    pub first_name: String,
    pub last_name: String,
    /// Age in years (0-150).
    pub age: i32,
    /// Optional reference to an existing country.
    #[serde(default)]
    pub country_id: Option<i64>,
}

impl CreatePerson {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate::require_text("first_name", &self.first_name, 100)?;
        validate::require_text("last_name", &self.last_name, 100)?;
        validate::check_range("age", self.age as i64, 0, 150)
    }

    pub fn into_row(self) -> Map<String, JsonValue> {
        let mut row = Map::new();
        row.insert("first_name".to_string(), json!(self.first_name));
        row.insert("last_name".to_string(), json!(self.last_name));
        row.insert("age".to_string(), json!(self.age));
        if let Some(country_id) = self.country_id {
            row.insert("country_id".to_string(), json!(country_id));
        }
        row
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePerson {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub first_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub last_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub age: Patch<i32>,
    /// Explicit `null` detaches the person from its country.
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub country_id: Patch<i64>,
}

impl UpdatePerson {
    pub fn into_changes(self) -> Result<Vec<FieldChange>, ApiError> {
        let mut changes = Vec::new();
        match self.first_name {
            Patch::Absent => {}
            Patch::Null => {
                return Err(ApiError::Validation("first_name cannot be null".to_string()))
            }
            Patch::Value(v) => {
                validate::require_text("first_name", &v, 100)?;
                changes.push(FieldChange::set("first_name", json!(v)));
            }
        }
        match self.last_name {
            Patch::Absent => {}
            Patch::Null => {
                return Err(ApiError::Validation("last_name cannot be null".to_string()))
            }
            Patch::Value(v) => {
                validate::require_text("last_name", &v, 100)?;
                changes.push(FieldChange::set("last_name", json!(v)));
            }
        }
        match self.age {
            Patch::Absent => {}
            Patch::Null => return Err(ApiError::Validation("age cannot be null".to_string())),
            Patch::Value(v) => {
                validate::check_range("age", v as i64, 0, 150)?;
                changes.push(FieldChange::set("age", json!(v)));
            }
        }
        match self.country_id {
            Patch::Absent => {}
            Patch::Null => changes.push(FieldChange::clear("country_id")),
            Patch::Value(v) => changes.push(FieldChange::set("country_id", json!(v))),
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_out_of_range_age() {
        let p = CreatePerson {
            first_name: "Ana".to_string(),
            last_name: "Diaz".to_string(),
            age: 151,
            country_id: None,
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn omitted_country_id_is_left_out_of_the_row() {
        let p = CreatePerson {
            first_name: "Ana".to_string(),
            last_name: "Diaz".to_string(),
            age: 30,
            country_id: None,
        };
        assert!(!p.into_row().contains_key("country_id"));
    }

    #[test]
    fn null_country_id_clears_the_column() {
        let upd: UpdatePerson = serde_json::from_str(r#"{"country_id": null}"#).unwrap();
        let changes = upd.into_changes().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].column, "country_id");
        assert!(changes[0].value.is_null());
    }

    #[test]
    fn null_first_name_is_rejected() {
        let upd: UpdatePerson = serde_json::from_str(r#"{"first_name": null}"#).unwrap();
        assert!(upd.into_changes().is_err());
    }
}
