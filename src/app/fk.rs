//! Cross-entity existence checks, run before a write that carries a
//! foreign id.
//!
//! These checks are advisory: they produce a friendly 400 before the
//! insert/update is attempted. The schema-level foreign keys remain the
//! real guarantee against a racing delete.

use crate::domain::error::ApiError;
use crate::storage::entity::{CARS, COUNTRIES};
use crate::storage::repo::Repo;
use sqlx::PgPool;

pub async fn ensure_country_exists(pool: &PgPool, country_id: i64) -> Result<(), ApiError> {
    match Repo::new(pool, &COUNTRIES).get_by_id(country_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::Validation(format!(
            "Country with id {country_id} not found"
        ))),
    }
}

pub async fn ensure_car_exists(pool: &PgPool, car_id: i64) -> Result<(), ApiError> {
    match Repo::new(pool, &CARS).get_by_id(car_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::Validation(format!("Car with id {car_id} not found"))),
    }
}
