use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::api::envelope::FormatOptions;
use crate::api::standard_payload::resolve_wrap_preference;
use crate::auth::hash_password;
use crate::database::stores::UserStore;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::filter::{parse_filter_string, USERS_REGISTRY};
use crate::handlers::{pagination_meta, respond, respond_with, WrapQuery};
use crate::pagination::{clamp_page, clamp_per_page};
use crate::services::initiate::build_users_initiate_content;
use crate::validation::{
    check_email, check_optional_max_length, check_password, normalize_email, FieldErrors,
};

const DEFAULT_PER_PAGE: i64 = 10;
const MAX_PER_PAGE: i64 = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub filter: Option<String>,
    pub standard_payload: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub filter: Option<String>,
    pub standard_payload: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

/// GET /api/users
pub async fn list(Query(query): Query<ListUsersQuery>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let page = clamp_page(query.page.as_deref());
    let per_page = clamp_per_page(query.per_page.as_deref(), DEFAULT_PER_PAGE, MAX_PER_PAGE);
    let clauses =
        parse_filter_string(query.filter.as_deref().unwrap_or_default(), &USERS_REGISTRY);
    let (users, total) = UserStore::list(pool, &clauses, page, per_page).await?;

    let mut options =
        FormatOptions::with_wrap(resolve_wrap_preference(query.standard_payload.as_deref()));
    options.meta = Some(pagination_meta(total, per_page, page));
    respond_with(users, options)
}

/// GET /api/users/initiate
pub async fn initiate(Query(query): Query<InitiateUsersQuery>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let content = build_users_initiate_content(
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

/// GET /api/users/:id
pub async fn show(
    Path(id): Path<i32>,
    Query(query): Query<WrapQuery>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let user = UserStore::find_required(pool, id).await?;
    respond(
        user,
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )
}

/// POST /api/users
pub async fn create(
    Query(query): Query<WrapQuery>,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, &body.email);
    check_password(&mut errors, &body.password);
    check_optional_max_length(&mut errors, "fullName", body.full_name.as_deref(), 255);
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;
    let email = normalize_email(&body.email);
    if UserStore::email_in_use(pool, &email, None).await? {
        return Err(ApiError::conflict("Email already in use"));
    }

    let digest = hash_password(&body.password);
    let full_name = body.full_name.map(|name| name.trim().to_string());
    let user = UserStore::create(pool, full_name, &email, &digest).await?;
    tracing::info!(user_id = user.id, "user created");

    let response = respond(
        user,
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )?;
    Ok((StatusCode::CREATED, response))
}

/// PUT /api/users/:id
pub async fn update(
    Path(id): Path<i32>,
    Query(query): Query<WrapQuery>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::new();
    if let Some(email) = body.email.as_deref() {
        check_email(&mut errors, email);
    }
    if let Some(password) = body.password.as_deref() {
        check_password(&mut errors, password);
    }
    check_optional_max_length(&mut errors, "fullName", body.full_name.as_deref(), 255);
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;
    UserStore::find_required(pool, id).await?;

    let email = body.email.as_deref().map(normalize_email);
    if let Some(email) = email.as_deref() {
        if UserStore::email_in_use(pool, email, Some(id)).await? {
            return Err(ApiError::conflict("Email already in use"));
        }
    }

    let digest = body.password.as_deref().map(hash_password);
    let full_name = body.full_name.map(|name| name.trim().to_string());
    let user = UserStore::update(pool, id, full_name, email, digest).await?;
    respond(
        user,
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )
}

/// DELETE /api/users/:id
pub async fn destroy(Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    let pool = DatabaseManager::pool().await?;
    UserStore::delete(pool, id).await?;
    tracing::info!(user_id = id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
