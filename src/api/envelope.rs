// Standard response envelope
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::ApiResponseConfig;

/// Per-call overrides for the standard response envelope.
///
/// Every field is optional; unset fields fall back to the process-level
/// `ApiResponseConfig` or the documented defaults.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Overrides the process-level wrap default for this response.
    pub wrap: Option<bool>,
    pub request_id: Option<String>,
    pub version: Option<String>,
    pub timestamp: Option<String>,
    pub success: Option<bool>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub detail: Option<Value>,
    pub meta: Option<Value>,
    pub other: Option<Value>,
    pub root_key: Option<String>,
}

impl FormatOptions {
    pub fn wrapped() -> Self {
        Self {
            wrap: Some(true),
            ..Self::default()
        }
    }

    pub fn with_wrap(wrap: Option<bool>) -> Self {
        Self {
            wrap,
            ..Self::default()
        }
    }
}

/// Format a response body according to the envelope contract.
///
/// When wrapping is disabled the content passes through unchanged. When
/// enabled, the content is nested as `payload.data.content` inside a
/// header/status/other structure under the configured root key.
pub fn format(content: Value, options: FormatOptions, config: &ApiResponseConfig) -> Value {
    let wrap = options.wrap.unwrap_or(config.use_standard_payload);
    if !wrap {
        return content;
    }

    let request_id = options
        .request_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let version = options
        .version
        .unwrap_or_else(|| config.default_version.clone());
    let timestamp = options
        .timestamp
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

    let status = json!({
        "success": options.success.unwrap_or(true),
        "code": options.code.unwrap_or_else(|| "OK".to_string()),
        "message": options
            .message
            .unwrap_or_else(|| "Request processed successfully".to_string()),
        "detail": options.detail.unwrap_or(Value::Null),
    });

    let root_key = options.root_key.unwrap_or_else(|| config.root_key.clone());

    json!({
        root_key: {
            "header": {
                "request_id": request_id,
                "version": version,
                "timestamp": timestamp,
            },
            "payload": {
                "status": status,
                "data": {
                    "meta": options.meta.unwrap_or(Value::Null),
                    "content": content,
                },
                "other": options.other.unwrap_or(Value::Null),
            },
        }
    })
}
