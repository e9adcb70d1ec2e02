use axum::{extract::Query, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::standard_payload::resolve_wrap_preference;
use crate::auth::{generate_jwt, verify_password, Claims};
use crate::database::stores::UserStore;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::{respond, WrapQuery};
use crate::validation::{
    check_email, check_optional_max_length, check_password, normalize_email, FieldErrors,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub device_name: Option<String>,
}

/// POST /login
///
/// Exchanges credentials for a bearer token. Lookup and password mismatch
/// both answer with the same 401 so callers cannot probe for accounts.
pub async fn login(
    Query(query): Query<WrapQuery>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, &body.email);
    check_password(&mut errors, &body.password);
    check_optional_max_length(&mut errors, "deviceName", body.device_name.as_deref(), 255);
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;
    let email = normalize_email(&body.email);
    let user = UserStore::find_by_email(pool, &email)
        .await?
        .filter(|user| verify_password(&body.password, &user.password))
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let claims = Claims::new(&user, body.device_name.clone());
    let expires_at = claims.exp;
    let token = generate_jwt(claims).map_err(|e| {
        tracing::error!("Failed to sign access token: {}", e);
        ApiError::internal_server_error("Failed to generate token")
    })?;

    tracing::info!(user_id = user.id, "user logged in");

    respond(
        json!({
            "token": {
                "type": "bearer",
                "name": body.device_name.as_deref().unwrap_or("api-token"),
                "token": token,
                "expires_at": expires_at,
            },
            "user": user,
        }),
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )
}
