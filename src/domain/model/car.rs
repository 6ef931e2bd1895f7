use crate::domain::error::ApiError;
use crate::domain::model::patch::Patch;
use crate::domain::model::sale::SaleResponse;
use crate::domain::validate;
use crate::storage::repo::FieldChange;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CarResponse {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub chassis_number: String,
}

/// Flat car plus all sales recorded against it.
#[derive(Debug, Serialize, ToSchema)]
pub struct CarWithSales {
    #[serde(flatten)]
    pub car: CarResponse,
    pub sales: Vec<SaleResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCar {
    pub brand: String,
    pub model: String,
    /// Fabrication year (1900-2025).
    pub year: i32,
    /// Unique chassis identification number.
    pub chassis_number: String,
}

impl CreateCar {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate::require_text("brand", &self.brand, 100)?;
        validate::require_text("model", &self.model, 100)?;
        validate::check_range("year", self.year as i64, 1900, 2025)?;
        validate::require_text("chassis_number", &self.chassis_number, 50)
    }

    pub fn into_row(self) -> Map<String, JsonValue> {
        let mut row = Map::new();
        row.insert("brand".to_string(), json!(self.brand));
        row.insert("model".to_string(), json!(self.model));
        row.insert("year".to_string(), json!(self.year));
        row.insert("chassis_number".to_string(), json!(self.chassis_number));
        row
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCar {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub brand: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub model: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub year: Patch<i32>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub chassis_number: Patch<String>,
}

impl UpdateCar {
    pub fn into_changes(self) -> Result<Vec<FieldChange>, ApiError> {
        let mut changes = Vec::new();
        match self.brand {
            Patch::Absent => {}
            Patch::Null => return Err(ApiError::Validation("brand cannot be null".to_string())),
            Patch::Value(v) => {
                validate::require_text("brand", &v, 100)?;
                changes.push(FieldChange::set("brand", json!(v)));
            }
        }
        match self.model {
            Patch::Absent => {}
            Patch::Null => return Err(ApiError::Validation("model cannot be null".to_string())),
            Patch::Value(v) => {
                validate::require_text("model", &v, 100)?;
                changes.push(FieldChange::set("model", json!(v)));
            }
        }
        match self.year {
            Patch::Absent => {}
            Patch::Null => return Err(ApiError::Validation("year cannot be null".to_string())),
            Patch::Value(v) => {
                validate::check_range("year", v as i64, 1900, 2025)?;
                changes.push(FieldChange::set("year", json!(v)));
            }
        }
        match self.chassis_number {
            Patch::Absent => {}
            Patch::Null => {
                return Err(ApiError::Validation("chassis_number cannot be null".to_string()))
            }
            Patch::Value(v) => {
                validate::require_text("chassis_number", &v, 50)?;
                changes.push(FieldChange::set("chassis_number", json!(v)));
            }
        }
        Ok(changes)
    }
}
