use crate::app::{fk, search};
use crate::domain::error::ApiError;
use crate::domain::model::{
    CarResponse, CreateSale, Patch, SaleResponse, SaleWithCar, UpdateSale,
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
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

#[utoipa::path(
    post,
    path = "/sales",
    request_body = CreateSale,
    responses(
        (status = 201, description = "Sale created", body = SaleResponse),
        (status = 400, description = "Validation or reference failure", body = ErrorBody)
    )
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(body): Json<CreateSale>,
) -> Result<(StatusCode, Json<SaleResponse>), ApiError> {
    body.validate()?;
    fk::ensure_car_exists(&state.pool, body.car_id).await?;
    let row = Repo::new(&state.pool, &SALES).create(&body.into_row()).await?;
    Ok((StatusCode::CREATED, Json(decode(row)?)))
}

#[utoipa::path(
    get,
    path = "/sales",
    params(ListParams),
    responses(
        (status = 200, description = "Sales page", body = [SaleResponse]),
        (status = 400, description = "Invalid pagination", body = ErrorBody)
    )
)]
pub async fn list_sales(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SaleResponse>>, ApiError> {
    let rows = Repo::new(&state.pool, &SALES)
        .list(params.skip, params.limit)
        .await?;
    Ok(Json(decode_all(rows)?))
}

#[utoipa::path(
    get,
    path = "/sales/{id}",
    params(("id" = i64, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale found", body = SaleResponse),
        (status = 404, description = "Sale not found", body = ErrorBody)
    )
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SaleResponse>, ApiError> {
    let row = Repo::new(&state.pool, &SALES)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", id))?;
    Ok(Json(decode(row)?))
}

#[utoipa::path(
    put,
    path = "/sales/{id}",
    params(("id" = i64, Path, description = "Sale id")),
    request_body = UpdateSale,
    responses(
        (status = 200, description = "Sale updated", body = SaleResponse),
        (status = 400, description = "Validation or reference failure", body = ErrorBody),
        (status = 404, description = "Sale not found", body = ErrorBody)
    )
)]
pub async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateSale>,
) -> Result<Json<SaleResponse>, ApiError> {
    if let Patch::Value(car_id) = &body.car_id {
        fk::ensure_car_exists(&state.pool, *car_id).await?;
    }
    let changes = body.into_changes()?;
    let row = Repo::new(&state.pool, &SALES)
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", id))?;
    Ok(Json(decode(row)?))
}

#[utoipa::path(
    delete,
    path = "/sales/{id}",
    params(("id" = i64, Path, description = "Sale id")),
    responses(
        (status = 204, description = "Sale deleted"),
        (status = 404, description = "Sale not found", body = ErrorBody)
    )
)]
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !Repo::new(&state.pool, &SALES).delete(id).await? {
        return Err(ApiError::not_found("Sale", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/sales/car/{car_id}",
    params(("car_id" = i64, Path, description = "Car id")),
    responses(
        (status = 200, description = "Sales for the car", body = [SaleResponse]),
        (status = 404, description = "Car not found", body = ErrorBody)
    )
)]
pub async fn get_sales_by_car(
    State(state): State<AppState>,
    Path(car_id): Path<i64>,
) -> Result<Json<Vec<SaleResponse>>, ApiError> {
    if Repo::new(&state.pool, &CARS).get_by_id(car_id).await?.is_none() {
        return Err(ApiError::not_found("Car", car_id));
    }
    let rows = Repo::new(&state.pool, &SALES)
        .find_all_i64_eq("car_id", car_id)
        .await?;
    Ok(Json(decode_all(rows)?))
}

#[utoipa::path(
    get,
    path = "/sales/buyer/{name}",
    params(("name" = String, Path, description = "Buyer name fragment, case-insensitive")),
    responses(
        (status = 200, description = "Sales whose buyer matches", body = [SaleResponse])
    )
)]
pub async fn get_sales_by_buyer(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<SaleResponse>>, ApiError> {
    // This lookup is pushed to SQL (ILIKE), unlike the /search endpoints.
    let rows = Repo::new(&state.pool, &SALES)
        .find_all_text_ilike("buyer_name", &name)
        .await?;
    Ok(Json(decode_all(rows)?))
}

#[utoipa::path(
    get,
    path = "/sales/{id}/with-car",
    params(("id" = i64, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale with its car inlined", body = SaleWithCar),
        (status = 404, description = "Sale not found", body = ErrorBody)
    )
)]
pub async fn get_sale_with_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SaleWithCar>, ApiError> {
    let row = Repo::new(&state.pool, &SALES)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", id))?;
    let sale: SaleResponse = decode(row)?;
    let car = Repo::new(&state.pool, &CARS)
        .get_by_id(sale.car_id)
        .await?
        .map(decode::<CarResponse>)
        .transpose()?;
    Ok(Json(SaleWithCar { sale, car }))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SaleSearchParams {
    /// Buyer name fragment (at least 2 characters when present).
    #[serde(default)]
    pub buyer: Option<String>,
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
    /// Inclusive lower bound on sale_date (RFC3339).
    #[serde(default)]
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on sale_date (RFC3339).
    #[serde(default)]
    pub date_to: Option<DateTime<Utc>>,
}

#[utoipa::path(
    get,
    path = "/sales/search",
    params(SaleSearchParams),
    responses(
        (status = 200, description = "Matching sales", body = [SaleResponse]),
        (status = 400, description = "Invalid search term", body = ErrorBody)
    )
)]
pub async fn search_sales(
    State(state): State<AppState>,
    Query(params): Query<SaleSearchParams>,
) -> Result<Json<Vec<SaleResponse>>, ApiError> {
    if let Some(buyer) = &params.buyer {
        check_search_term("buyer", buyer)?;
    }
    let rows = Repo::new(&state.pool, &SALES).list(0, MAX_LIMIT).await?;
    let sales: Vec<SaleResponse> = decode_all(rows)?;
    let matches = sales
        .into_iter()
        .filter(|sale| {
            let buyer_ok = params
                .buyer
                .as_deref()
                .map_or(true, |b| search::contains_ci(&sale.buyer_name, b));
            let price_ok = params.price_min.map_or(true, |min| sale.price >= min)
                && params.price_max.map_or(true, |max| sale.price <= max);
            let date_ok = params.date_from.map_or(true, |from| sale.sale_date >= from)
                && params.date_to.map_or(true, |to| sale.sale_date <= to);
            buyer_ok && price_ok && date_ok
        })
        .collect();
    Ok(Json(matches))
}
