use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::api::envelope::FormatOptions;
use crate::api::standard_payload::resolve_wrap_preference;
use crate::database::stores::{CityStore, ProvinceStore};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::filter::{parse_filter_string, CITIES_REGISTRY};
use crate::handlers::{pagination_meta, respond, respond_with, WrapQuery};
use crate::pagination::{clamp_page, clamp_per_page};
use crate::services::initiate::build_cities_initiate_content;
use crate::validation::{
    check_classification, check_max_length, check_optional_max_length, FieldErrors,
};

const DEFAULT_PER_PAGE: i64 = 25;
const MAX_PER_PAGE: i64 = 100;
const DEFAULT_CLASSIFICATION: &str = "city";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCitiesQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub filter: Option<String>,
    pub province_id: Option<String>,
    pub standard_payload: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateCitiesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub filter: Option<String>,
    pub standard_payload: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityRequest {
    pub province_id: Option<i32>,
    pub code: String,
    pub name: String,
    pub classification: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCityRequest {
    pub province_id: Option<i32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub classification: Option<String>,
}

/// GET /api/cities
pub async fn list(Query(query): Query<ListCitiesQuery>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let page = clamp_page(query.page.as_deref());
    let per_page = clamp_per_page(query.per_page.as_deref(), DEFAULT_PER_PAGE, MAX_PER_PAGE);
    let clauses =
        parse_filter_string(query.filter.as_deref().unwrap_or_default(), &CITIES_REGISTRY);
    // Unparseable provinceId values are ignored rather than rejected.
    let province_id = query
        .province_id
        .as_deref()
        .and_then(|s| s.trim().parse::<i32>().ok());
    let (cities, total) = CityStore::list(pool, &clauses, province_id, page, per_page).await?;
    let cities = CityStore::with_province(pool, cities).await?;

    let mut options =
        FormatOptions::with_wrap(resolve_wrap_preference(query.standard_payload.as_deref()));
    options.meta = Some(pagination_meta(total, per_page, page));
    respond_with(cities, options)
}

/// GET /api/cities/initiate
pub async fn initiate(Query(query): Query<InitiateCitiesQuery>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let content = build_cities_initiate_content(
        pool,
        query.page.as_deref(),
        query.limit.as_deref(),
        query.filter.as_deref(),
    )
    .await?;
    respond(
        content,
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )
}

/// GET /api/cities/:id
pub async fn show(
    Path(id): Path<i32>,
    Query(query): Query<WrapQuery>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let city = CityStore::find_required(pool, id).await?;
    let mut cities = CityStore::with_province(pool, vec![city]).await?;
    let city = cities
        .pop()
        .ok_or_else(|| ApiError::internal_server_error("Failed to load city"))?;
    respond(
        city,
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )
}

/// POST /api/cities
pub async fn create(
    Query(query): Query<WrapQuery>,
    Json(body): Json<CreateCityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = FieldErrors::new();
    if body.province_id.is_none() {
        errors.push("provinceId", "Must be a number");
    }
    check_max_length(&mut errors, "code", &body.code, 16);
    check_max_length(&mut errors, "name", &body.name, 255);
    check_classification(&mut errors, body.classification.as_deref());
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;
    let province_id = body.province_id.unwrap_or_default();
    ProvinceStore::find_required(pool, province_id).await?;

    let code = body.code.trim();
    let name = body.name.trim();
    check_conflicts(pool, province_id, code, name, None).await?;

    let classification = body
        .classification
        .as_deref()
        .unwrap_or(DEFAULT_CLASSIFICATION);
    let city = CityStore::create(pool, province_id, code, name, classification).await?;
    tracing::info!(city_id = city.id, province_id, "city created");

    let response = respond(
        city,
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )?;
    Ok((StatusCode::CREATED, response))
}

/// PUT /api/cities/:id
pub async fn update(
    Path(id): Path<i32>,
    Query(query): Query<WrapQuery>,
    Json(body): Json<UpdateCityRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::new();
    check_optional_max_length(&mut errors, "code", body.code.as_deref(), 16);
    check_optional_max_length(&mut errors, "name", body.name.as_deref(), 255);
    check_classification(&mut errors, body.classification.as_deref());
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;
    let existing = CityStore::find_required(pool, id).await?;

    // Uniqueness is scoped to the province the city will end up in.
    let target_province_id = match body.province_id {
        Some(province_id) => {
            ProvinceStore::find_required(pool, province_id).await?;
            province_id
        }
        None => existing.province_id,
    };

    let code = body.code.as_deref().map(|s| s.trim().to_string());
    let name = body.name.as_deref().map(|s| s.trim().to_string());

    let code_taken = match code.as_deref() {
        Some(code) => CityStore::code_in_use(pool, target_province_id, code, Some(id)).await?,
        None => false,
    };
    let name_taken = match name.as_deref() {
        Some(name) => CityStore::name_in_use(pool, target_province_id, name, Some(id)).await?,
        None => false,
    };
    conflict_message(code_taken, name_taken)?;

    let city = CityStore::update(
        pool,
        id,
        body.province_id,
        code,
        name,
        body.classification.clone(),
    )
    .await?;
    respond(
        city,
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )
}

/// DELETE /api/cities/:id
pub async fn destroy(Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    let pool = DatabaseManager::pool().await?;
    CityStore::delete(pool, id).await?;
    tracing::info!(city_id = id, "city deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn check_conflicts(
    pool: &PgPool,
    province_id: i32,
    code: &str,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<(), ApiError> {
    let code_taken = CityStore::code_in_use(pool, province_id, code, exclude_id).await?;
    let name_taken = CityStore::name_in_use(pool, province_id, name, exclude_id).await?;
    conflict_message(code_taken, name_taken)
}

fn conflict_message(code_taken: bool, name_taken: bool) -> Result<(), ApiError> {
    match (code_taken, name_taken) {
        (true, true) => Err(ApiError::conflict(
            "City code or name already exists in this province",
        )),
        (true, false) => Err(ApiError::conflict(
            "City code already exists in this province",
        )),
        (false, true) => Err(ApiError::conflict(
            "City name already exists in this province",
        )),
        (false, false) => Ok(()),
    }
}
