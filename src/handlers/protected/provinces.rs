use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::api::envelope::FormatOptions;
use crate::api::standard_payload::resolve_wrap_preference;
use crate::database::models::ProvinceWithCities;
use crate::database::stores::ProvinceStore;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::filter::{parse_filter_string, PROVINCES_REGISTRY};
use crate::handlers::{pagination_meta, respond, respond_with, WrapQuery};
use crate::pagination::{clamp_page, clamp_per_page};
use crate::services::initiate::build_provinces_initiate_content;
use crate::validation::{check_max_length, check_optional_max_length, FieldErrors};

const DEFAULT_PER_PAGE: i64 = 25;
const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProvincesQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub filter: Option<String>,
    pub with_cities: Option<String>,
    pub standard_payload: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateProvincesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub filter: Option<String>,
    pub standard_payload: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProvinceRequest {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProvinceRequest {
    pub code: Option<String>,
    pub name: Option<String>,
}

fn truthy(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

/// GET /api/provinces
pub async fn list(Query(query): Query<ListProvincesQuery>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let page = clamp_page(query.page.as_deref());
    let per_page = clamp_per_page(query.per_page.as_deref(), DEFAULT_PER_PAGE, MAX_PER_PAGE);
    let clauses =
        parse_filter_string(query.filter.as_deref().unwrap_or_default(), &PROVINCES_REGISTRY);
    let (provinces, total) = ProvinceStore::list(pool, &clauses, page, per_page).await?;

    let mut options =
        FormatOptions::with_wrap(resolve_wrap_preference(query.standard_payload.as_deref()));
    options.meta = Some(pagination_meta(total, per_page, page));

    if truthy(query.with_cities.as_deref()) {
        let provinces = ProvinceStore::with_cities(pool, provinces).await?;
        respond_with(provinces, options)
    } else {
        respond_with(provinces, options)
    }
}

/// GET /api/provinces/initiate
pub async fn initiate(
    Query(query): Query<InitiateProvincesQuery>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let content = build_provinces_initiate_content(
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

/// GET /api/provinces/:id
pub async fn show(
    Path(id): Path<i32>,
    Query(query): Query<WrapQuery>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let province = ProvinceStore::find_required(pool, id).await?;
    let cities = ProvinceStore::cities_for(pool, &[province.id]).await?;
    respond(
        ProvinceWithCities { province, cities },
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )
}

/// POST /api/provinces
pub async fn create(
    Query(query): Query<WrapQuery>,
    Json(body): Json<CreateProvinceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = FieldErrors::new();
    check_max_length(&mut errors, "code", &body.code, 16);
    check_max_length(&mut errors, "name", &body.name, 255);
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;
    let code = body.code.trim();
    let name = body.name.trim();
    check_conflicts(pool, code, name, None).await?;

    let province = ProvinceStore::create(pool, code, name).await?;
    tracing::info!(province_id = province.id, "province created");

    let response = respond(
        province,
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )?;
    Ok((StatusCode::CREATED, response))
}

/// PUT /api/provinces/:id
pub async fn update(
    Path(id): Path<i32>,
    Query(query): Query<WrapQuery>,
    Json(body): Json<UpdateProvinceRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::new();
    check_optional_max_length(&mut errors, "code", body.code.as_deref(), 16);
    check_optional_max_length(&mut errors, "name", body.name.as_deref(), 255);
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;
    ProvinceStore::find_required(pool, id).await?;

    let code = body.code.as_deref().map(|s| s.trim().to_string());
    let name = body.name.as_deref().map(|s| s.trim().to_string());

    let code_taken = match code.as_deref() {
        Some(code) => ProvinceStore::code_in_use(pool, code, Some(id)).await?,
        None => false,
    };
    let name_taken = match name.as_deref() {
        Some(name) => ProvinceStore::name_in_use(pool, name, Some(id)).await?,
        None => false,
    };
    conflict_message(code_taken, name_taken)?;

    let province = ProvinceStore::update(pool, id, code, name).await?;
    respond(
        province,
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )
}

/// DELETE /api/provinces/:id
pub async fn destroy(Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    let pool = DatabaseManager::pool().await?;
    ProvinceStore::delete(pool, id).await?;
    tracing::info!(province_id = id, "province deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn check_conflicts(
    pool: &sqlx::PgPool,
    code: &str,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<(), ApiError> {
    let code_taken = ProvinceStore::code_in_use(pool, code, exclude_id).await?;
    let name_taken = ProvinceStore::name_in_use(pool, name, exclude_id).await?;
    conflict_message(code_taken, name_taken)
}

fn conflict_message(code_taken: bool, name_taken: bool) -> Result<(), ApiError> {
    match (code_taken, name_taken) {
        (true, true) => Err(ApiError::conflict("Province code or name already exists")),
        (true, false) => Err(ApiError::conflict("Province code already exists")),
        (false, true) => Err(ApiError::conflict("Province name already exists")),
        (false, false) => Ok(()),
    }
}
