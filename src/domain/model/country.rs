use crate::domain::error::ApiError;
use crate::domain::model::patch::Patch;
use crate::domain::validate;
use crate::storage::repo::FieldChange;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CountryResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCountry {
    /// Country name, unique.
    pub name: String,
}

impl CreateCountry {
    // Uniqueness is left to the schema constraint; only shape is checked here.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate::require_text("name", &self.name, 100)
    }

    pub fn into_row(self) -> Map<String, JsonValue> {
        let mut row = Map::new();
        row.insert("name".to_string(), json!(self.name));
        row
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCountry {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
}

impl UpdateCountry {
    pub fn into_changes(self) -> Result<Vec<FieldChange>, ApiError> {
        let mut changes = Vec::new();
        match self.name {
            Patch::Absent => {}
            Patch::Null => return Err(ApiError::Validation("name cannot be null".to_string())),
            Patch::Value(name) => {
                validate::require_text("name", &name, 100)?;
                changes.push(FieldChange::set("name", json!(name)));
            }
        }
        Ok(changes)
    }
}
