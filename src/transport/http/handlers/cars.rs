use crate::app::search;
use crate::domain::error::ApiError;
use crate::domain::model::{
    CarResponse, CarWithSales, CreateCar, Patch, SaleResponse, UpdateCar,
};
use crate::storage::entity::{CARS, SALES};
use crate::storage::repo::{Repo, MAX_LIMIT};
use crate::transport::http::error::ErrorBody;
use crate::transport::http::handlers::common::{
    check_search_term, decode, decode_all, ListParams,
};
use crate::transport::http::types::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

#[utoipa::path(
    post,
    path = "/cars",
    request_body = CreateCar,
    responses(
        (status = 201, description = "Car created", body = CarResponse),
        (status = 400, description = "Validation failure or duplicate chassis", body = ErrorBody)
    )
)]
pub async fn create_car(
    State(state): State<AppState>,
    Json(body): Json<CreateCar>,
) -> Result<(StatusCode, Json<CarResponse>), ApiError> {
    body.validate()?;
    let repo = Repo::new(&state.pool, &CARS);
    // Defensive uniqueness check before the insert; the schema constraint
    // still backs it up against races.
    if repo
        .find_one_text_eq("chassis_number", &body.chassis_number)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(format!(
            "Car with chassis_number '{}' already exists",
            body.chassis_number
        )));
    }
    let row = repo.create(&body.into_row()).await?;
    Ok((StatusCode::CREATED, Json(decode(row)?)))
}

#[utoipa::path(
    get,
    path = "/cars",
    params(ListParams),
    responses(
        (status = 200, description = "Cars page", body = [CarResponse]),
        (status = 400, description = "Invalid pagination", body = ErrorBody)
    )
)]
pub async fn list_cars(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CarResponse>>, ApiError> {
    let rows = Repo::new(&state.pool, &CARS)
        .list(params.skip, params.limit)
        .await?;
    Ok(Json(decode_all(rows)?))
}

#[utoipa::path(
    get,
    path = "/cars/{id}",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car found", body = CarResponse),
        (status = 404, description = "Car not found", body = ErrorBody)
    )
)]
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CarResponse>, ApiError> {
    let row = Repo::new(&state.pool, &CARS)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car", id))?;
    Ok(Json(decode(row)?))
}

#[utoipa::path(
    put,
    path = "/cars/{id}",
    params(("id" = i64, Path, description = "Car id")),
    request_body = UpdateCar,
    responses(
        (status = 200, description = "Car updated", body = CarResponse),
        (status = 400, description = "Validation failure or duplicate chassis", body = ErrorBody),
        (status = 404, description = "Car not found", body = ErrorBody)
    )
)]
pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCar>,
) -> Result<Json<CarResponse>, ApiError> {
    let repo = Repo::new(&state.pool, &CARS);
    // A changed chassis number must not collide with another car.
    if let Patch::Value(chassis) = &body.chassis_number {
        if let Some(existing) = repo.find_one_text_eq("chassis_number", chassis).await? {
            let existing: CarResponse = decode(existing)?;
            if existing.id != id {
                return Err(ApiError::Conflict(format!(
                    "Car with chassis_number '{chassis}' already exists"
                )));
            }
        }
    }
    let changes = body.into_changes()?;
    let row = repo
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Car", id))?;
    Ok(Json(decode(row)?))
}

#[utoipa::path(
    delete,
    path = "/cars/{id}",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 204, description = "Car deleted"),
        (status = 400, description = "Car still referenced by sales", body = ErrorBody),
        (status = 404, description = "Car not found", body = ErrorBody)
    )
)]
pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    // Deletion is restricted while sales reference the car; the FK
    // violation surfaces as a conflict.
    if !Repo::new(&state.pool, &CARS).delete(id).await? {
        return Err(ApiError::not_found("Car", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/cars/chassis/{value}",
    params(("value" = String, Path, description = "Chassis number, exact match")),
    responses(
        (status = 200, description = "Car found", body = CarResponse),
        (status = 404, description = "No car with that chassis number", body = ErrorBody)
    )
)]
pub async fn get_car_by_chassis(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<Json<CarResponse>, ApiError> {
    let row = Repo::new(&state.pool, &CARS)
        .find_one_text_eq("chassis_number", &value)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Car with chassis_number '{value}' not found"))
        })?;
    Ok(Json(decode(row)?))
}

#[utoipa::path(
    get,
    path = "/cars/{id}/with-sales",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car with its sales inlined", body = CarWithSales),
        (status = 404, description = "Car not found", body = ErrorBody)
    )
)]
pub async fn get_car_with_sales(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CarWithSales>, ApiError> {
    let row = Repo::new(&state.pool, &CARS)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car", id))?;
    let car: CarResponse = decode(row)?;
    let sales: Vec<SaleResponse> = decode_all(
        Repo::new(&state.pool, &SALES)
            .find_all_i64_eq("car_id", id)
            .await?,
    )?;
    Ok(Json(CarWithSales { car, sales }))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CarSearchParams {
    /// Brand fragment (at least 2 characters when present).
    #[serde(default)]
    pub brand: Option<String>,
    /// Model fragment (at least 2 characters when present).
    #[serde(default)]
    pub model: Option<String>,
}

#[utoipa::path(
    get,
    path = "/cars/search",
    params(CarSearchParams),
    responses(
        (status = 200, description = "Matching cars", body = [CarResponse]),
        (status = 400, description = "Invalid search term", body = ErrorBody)
    )
)]
pub async fn search_cars(
    State(state): State<AppState>,
    Query(params): Query<CarSearchParams>,
) -> Result<Json<Vec<CarResponse>>, ApiError> {
    if let Some(brand) = &params.brand {
        check_search_term("brand", brand)?;
    }
    if let Some(model) = &params.model {
        check_search_term("model", model)?;
    }
    let rows = Repo::new(&state.pool, &CARS).list(0, MAX_LIMIT).await?;
    let cars: Vec<CarResponse> = decode_all(rows)?;
    let matches = cars
        .into_iter()
        .filter(|car| {
            let brand_ok = params
                .brand
                .as_deref()
                .map_or(true, |b| search::contains_ci(&car.brand, b));
            let model_ok = params
                .model
                .as_deref()
                .map_or(true, |m| search::contains_ci(&car.model, m));
            brand_ok && model_ok
        })
        .collect();
    Ok(Json(matches))
}
