use axum::{extract::Query, Json};
use serde_json::Value;

use crate::api::standard_payload::resolve_wrap_preference;
use crate::database::stores::ProvinceStore;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::{respond, WrapQuery};

/// GET /geo/tree
///
/// Full province list with their cities embedded, for clients that want the
/// whole hierarchy in one call.
pub async fn tree(Query(query): Query<WrapQuery>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let provinces = ProvinceStore::tree(pool).await?;
    respond(
        provinces,
        resolve_wrap_preference(query.standard_payload.as_deref()),
    )
}
