// HTTP handlers, grouped by authentication tier: public routes need no
// token, protected routes sit behind the JWT middleware.
pub mod protected;
pub mod public;

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::envelope::{self, FormatOptions};
use crate::config;
use crate::error::ApiError;

/// Query parameters shared by endpoints that only care about envelope
/// wrapping.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapQuery {
    pub standard_payload: Option<String>,
}

/// Serializes `content` and wraps it in the standard response envelope.
///
/// `wrap` comes from the request's `standardPayload` query parameter; `None`
/// defers to the configured default.
pub fn respond<T: Serialize>(content: T, wrap: Option<bool>) -> Result<Json<Value>, ApiError> {
    respond_with(content, FormatOptions::with_wrap(wrap))
}

/// Same as [`respond`] but with full control over the envelope fields.
pub fn respond_with<T: Serialize>(
    content: T,
    options: FormatOptions,
) -> Result<Json<Value>, ApiError> {
    let value = serde_json::to_value(content).map_err(|e| {
        tracing::error!("Failed to serialize response content: {}", e);
        ApiError::internal_server_error("Failed to serialize response")
    })?;
    Ok(Json(envelope::format(
        value,
        options,
        &config::config().api_response,
    )))
}

/// Listing metadata in the shape clients page through.
pub fn pagination_meta(total: i64, per_page: i64, current_page: i64) -> Value {
    let last_page = if total == 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    };
    json!({
        "total": total,
        "perPage": per_page,
        "currentPage": current_page,
        "lastPage": last_page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_meta_shape() {
        let meta = pagination_meta(45, 10, 2);
        assert_eq!(meta["total"], 45);
        assert_eq!(meta["perPage"], 10);
        assert_eq!(meta["currentPage"], 2);
        assert_eq!(meta["lastPage"], 5);
    }

    #[test]
    fn pagination_meta_rounds_up_and_floors_at_one() {
        assert_eq!(pagination_meta(41, 10, 1)["lastPage"], 5);
        assert_eq!(pagination_meta(40, 10, 1)["lastPage"], 4);
        assert_eq!(pagination_meta(0, 10, 1)["lastPage"], 1);
    }
}
