use crate::domain::error::ApiError;
use crate::domain::model::car::CarResponse;
use crate::domain::model::patch::Patch;
use crate::domain::validate;
use crate::storage::repo::FieldChange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaleResponse {
    pub id: i64,
    pub buyer_name: String,
    pub price: f64,
    pub car_id: i64,
    pub sale_date: DateTime<Utc>,
}

/// Flat sale plus the car it references (absent only if the reference
/// dangles, which the schema normally prevents).
#[derive(Debug, Serialize, ToSchema)]
pub struct SaleWithCar {
    #[serde(flatten)]
    pub sale: SaleResponse,
    pub car: Option<CarResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSale {
    pub buyer_name: String,
    /// Sale price, strictly positive.
    pub price: f64,
    /// Reference to the car sold (required).
    pub car_id: i64,
    /// Defaults to the creation time when omitted.
    #[serde(default)]
    pub sale_date: Option<DateTime<Utc>>,
}

impl CreateSale {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate::require_text("buyer_name", &self.buyer_name, 200)?;
        validate::check_positive("price", self.price)?;
        if let Some(date) = &self.sale_date {
            validate::check_not_future("sale_date", date)?;
        }
        Ok(())
    }

    pub fn into_row(self) -> Map<String, JsonValue> {
        let mut row = Map::new();
        row.insert("buyer_name".to_string(), json!(self.buyer_name));
        row.insert("price".to_string(), json!(self.price));
        row.insert("car_id".to_string(), json!(self.car_id));
        // Omitted sale_date falls through to the column default (now()).
        if let Some(date) = self.sale_date {
            row.insert("sale_date".to_string(), json!(date));
        }
        row
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSale {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub buyer_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub price: Patch<f64>,
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub car_id: Patch<i64>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub sale_date: Patch<DateTime<Utc>>,
}

impl UpdateSale {
    pub fn into_changes(self) -> Result<Vec<FieldChange>, ApiError> {
        let mut changes = Vec::new();
        match self.buyer_name {
            Patch::Absent => {}
            Patch::Null => {
                return Err(ApiError::Validation("buyer_name cannot be null".to_string()))
            }
            Patch::Value(v) => {
                validate::require_text("buyer_name", &v, 200)?;
                changes.push(FieldChange::set("buyer_name", json!(v)));
            }
        }
        match self.price {
            Patch::Absent => {}
            Patch::Null => return Err(ApiError::Validation("price cannot be null".to_string())),
            Patch::Value(v) => {
                validate::check_positive("price", v)?;
                changes.push(FieldChange::set("price", json!(v)));
            }
        }
        match self.car_id {
            Patch::Absent => {}
            Patch::Null => return Err(ApiError::Validation("car_id cannot be null".to_string())),
            Patch::Value(v) => changes.push(FieldChange::set("car_id", json!(v))),
        }
        match self.sale_date {
            Patch::Absent => {}
            Patch::Null => {
                return Err(ApiError::Validation("sale_date cannot be null".to_string()))
            }
            Patch::Value(v) => {
                validate::check_not_future("sale_date", &v)?;
                changes.push(FieldChange::set("sale_date", json!(v)));
            }
        }
        Ok(changes)
    }
}
