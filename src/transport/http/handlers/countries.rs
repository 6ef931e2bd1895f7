use crate::app::search;
use crate::domain::error::ApiError;
use crate::domain::model::{CountryResponse, CreateCountry, UpdateCountry};
use crate::storage::entity::COUNTRIES;
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
    path = "/countries",
    request_body = CreateCountry,
    responses(
        (status = 201, description = "Country created", body = CountryResponse),
        (status = 400, description = "Validation or uniqueness failure", body = ErrorBody)
    )
)]
pub async fn create_country(
    State(state): State<AppState>,
    Json(body): Json<CreateCountry>,
) -> Result<(StatusCode, Json<CountryResponse>), ApiError> {
    body.validate()?;
    // Name uniqueness is enforced by the schema constraint only; a
    // violation surfaces as 400 via the conflict mapping.
    let row = Repo::new(&state.pool, &COUNTRIES).create(&body.into_row()).await?;
    Ok((StatusCode::CREATED, Json(decode(row)?)))
}

#[utoipa::path(
    get,
    path = "/countries",
    params(ListParams),
    responses(
        (status = 200, description = "Countries page", body = [CountryResponse]),
        (status = 400, description = "Invalid pagination", body = ErrorBody)
    )
)]
pub async fn list_countries(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CountryResponse>>, ApiError> {
    let rows = Repo::new(&state.pool, &COUNTRIES)
        .list(params.skip, params.limit)
        .await?;
    Ok(Json(decode_all(rows)?))
}

#[utoipa::path(
    get,
    path = "/countries/{id}",
    params(("id" = i64, Path, description = "Country id")),
    responses(
        (status = 200, description = "Country found", body = CountryResponse),
        (status = 404, description = "Country not found", body = ErrorBody)
    )
)]
pub async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CountryResponse>, ApiError> {
    let row = Repo::new(&state.pool, &COUNTRIES)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Country", id))?;
    Ok(Json(decode(row)?))
}

#[utoipa::path(
    put,
    path = "/countries/{id}",
    params(("id" = i64, Path, description = "Country id")),
    request_body = UpdateCountry,
    responses(
        (status = 200, description = "Country updated", body = CountryResponse),
        (status = 400, description = "Validation failure", body = ErrorBody),
        (status = 404, description = "Country not found", body = ErrorBody)
    )
)]
pub async fn update_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCountry>,
) -> Result<Json<CountryResponse>, ApiError> {
    let changes = body.into_changes()?;
    let row = Repo::new(&state.pool, &COUNTRIES)
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Country", id))?;
    Ok(Json(decode(row)?))
}

#[utoipa::path(
    delete,
    path = "/countries/{id}",
    params(("id" = i64, Path, description = "Country id")),
    responses(
        (status = 204, description = "Country deleted"),
        (status = 404, description = "Country not found", body = ErrorBody)
    )
)]
pub async fn delete_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    // People referencing this country are detached by the schema
    // (ON DELETE SET NULL).
    if !Repo::new(&state.pool, &COUNTRIES).delete(id).await? {
        return Err(ApiError::not_found("Country", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CountrySearchParams {
    /// Name fragment to search for (at least 2 characters).
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/countries/search",
    params(CountrySearchParams),
    responses(
        (status = 200, description = "Matching countries", body = [CountryResponse]),
        (status = 400, description = "Invalid search term", body = ErrorBody)
    )
)]
pub async fn search_countries(
    State(state): State<AppState>,
    Query(params): Query<CountrySearchParams>,
) -> Result<Json<Vec<CountryResponse>>, ApiError> {
    check_search_term("name", &params.name)?;
    let rows = Repo::new(&state.pool, &COUNTRIES).list(0, MAX_LIMIT).await?;
    let countries: Vec<CountryResponse> = decode_all(rows)?;
    let matches = countries
        .into_iter()
        .filter(|c| search::contains_ci(&c.name, &params.name))
        .collect();
    Ok(Json(matches))
}
