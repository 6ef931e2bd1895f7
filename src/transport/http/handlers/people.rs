use crate::app::{fk, search};
use crate::domain::error::ApiError;
use crate::domain::model::{
    CountryResponse, CreatePerson, Patch, PersonResponse, PersonWithCountry, UpdatePerson,
};
use crate::storage::entity::{COUNTRIES, PEOPLE};
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
use sqlx::PgPool;
use utoipa::IntoParams;

#[utoipa::path(
    post,
    path = "/people",
    request_body = CreatePerson,
    responses(
        (status = 201, description = "Person created", body = PersonResponse),
        (status = 400, description = "Validation or reference failure", body = ErrorBody)
    )
)]
pub async fn create_person(
    State(state): State<AppState>,
    Json(body): Json<CreatePerson>,
) -> Result<(StatusCode, Json<PersonResponse>), ApiError> {
    body.validate()?;
    if let Some(country_id) = body.country_id {
        fk::ensure_country_exists(&state.pool, country_id).await?;
    }
    let row = Repo::new(&state.pool, &PEOPLE).create(&body.into_row()).await?;
    Ok((StatusCode::CREATED, Json(decode(row)?)))
}

#[utoipa::path(
    get,
    path = "/people",
    params(ListParams),
    responses(
        (status = 200, description = "People page", body = [PersonResponse]),
        (status = 400, description = "Invalid pagination", body = ErrorBody)
    )
)]
pub async fn list_people(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PersonResponse>>, ApiError> {
    let rows = Repo::new(&state.pool, &PEOPLE)
        .list(params.skip, params.limit)
        .await?;
    Ok(Json(decode_all(rows)?))
}

#[utoipa::path(
    get,
    path = "/people/{id}",
    params(("id" = i64, Path, description = "Person id")),
    responses(
        (status = 200, description = "Person found", body = PersonResponse),
        (status = 404, description = "Person not found", body = ErrorBody)
    )
)]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PersonResponse>, ApiError> {
    let row = Repo::new(&state.pool, &PEOPLE)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Person", id))?;
    Ok(Json(decode(row)?))
}

#[utoipa::path(
    put,
    path = "/people/{id}",
    params(("id" = i64, Path, description = "Person id")),
    request_body = UpdatePerson,
    responses(
        (status = 200, description = "Person updated", body = PersonResponse),
        (status = 400, description = "Validation or reference failure", body = ErrorBody),
        (status = 404, description = "Person not found", body = ErrorBody)
    )
)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePerson>,
) -> Result<Json<PersonResponse>, ApiError> {
    if let Patch::Value(country_id) = &body.country_id {
        fk::ensure_country_exists(&state.pool, *country_id).await?;
    }
    let changes = body.into_changes()?;
    let row = Repo::new(&state.pool, &PEOPLE)
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Person", id))?;
    Ok(Json(decode(row)?))
}

#[utoipa::path(
    delete,
    path = "/people/{id}",
    params(("id" = i64, Path, description = "Person id")),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 404, description = "Person not found", body = ErrorBody)
    )
)]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !Repo::new(&state.pool, &PEOPLE).delete(id).await? {
        return Err(ApiError::not_found("Person", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Second lookup for the expanded shape; a missing country is simply
/// omitted, never an error.
async fn expand_country(
    pool: &PgPool,
    person: PersonResponse,
) -> Result<PersonWithCountry, ApiError> {
    let country = match person.country_id {
        Some(country_id) => Repo::new(pool, &COUNTRIES)
            .get_by_id(country_id)
            .await?
            .map(decode::<CountryResponse>)
            .transpose()?,
        None => None,
    };
    Ok(PersonWithCountry { person, country })
}

#[utoipa::path(
    get,
    path = "/people/{id}/with-country",
    params(("id" = i64, Path, description = "Person id")),
    responses(
        (status = 200, description = "Person with country inlined", body = PersonWithCountry),
        (status = 404, description = "Person not found", body = ErrorBody)
    )
)]
pub async fn get_person_with_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PersonWithCountry>, ApiError> {
    let row = Repo::new(&state.pool, &PEOPLE)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Person", id))?;
    let person: PersonResponse = decode(row)?;
    Ok(Json(expand_country(&state.pool, person).await?))
}

#[utoipa::path(
    get,
    path = "/people/with-country",
    params(ListParams),
    responses(
        (status = 200, description = "People page with countries inlined", body = [PersonWithCountry]),
        (status = 400, description = "Invalid pagination", body = ErrorBody)
    )
)]
pub async fn list_people_with_country(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PersonWithCountry>>, ApiError> {
    let rows = Repo::new(&state.pool, &PEOPLE)
        .list(params.skip, params.limit)
        .await?;
    let people: Vec<PersonResponse> = decode_all(rows)?;
    let mut expanded = Vec::with_capacity(people.len());
    for person in people {
        expanded.push(expand_country(&state.pool, person).await?);
    }
    Ok(Json(expanded))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PersonSearchParams {
    /// Name fragment matched against first or last name (at least 2 characters).
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/people/search",
    params(PersonSearchParams),
    responses(
        (status = 200, description = "Matching people", body = [PersonResponse]),
        (status = 400, description = "Invalid search term", body = ErrorBody)
    )
)]
pub async fn search_people(
    State(state): State<AppState>,
    Query(params): Query<PersonSearchParams>,
) -> Result<Json<Vec<PersonResponse>>, ApiError> {
    check_search_term("name", &params.name)?;
    let rows = Repo::new(&state.pool, &PEOPLE).list(0, MAX_LIMIT).await?;
    let people: Vec<PersonResponse> = decode_all(rows)?;
    let matches = people
        .into_iter()
        .filter(|p| search::matches_any_ci(&[&p.first_name, &p.last_name], &params.name))
        .collect();
    Ok(Json(matches))
}
