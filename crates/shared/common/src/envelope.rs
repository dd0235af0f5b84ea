//! Uniform response envelope.
//!
//! Every operation answers `{ status, message?, <entity>? }`. The payload is
//! keyed by entity name (`dropshipper`, `products`, ...) and flattened next to
//! the status flag.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Envelope {
    /// Successful envelope with no message
    pub fn ok() -> Self {
        Self {
            status: true,
            message: None,
            payload: Map::new(),
        }
    }

    /// Successful envelope carrying a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: Some(message.into()),
            payload: Map::new(),
        }
    }

    /// Failed envelope
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: Some(message.into()),
            payload: Map::new(),
        }
    }

    /// Attach `value` under `key`.
    pub fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> AppResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::internal(format!("Failed to serialize {}: {}", key, e)))?;
        self.payload.insert(key.to_string(), value);
        Ok(self)
    }

    /// Wrap an operation result, keying the success payload by entity name.
    pub fn from_result<T: Serialize>(key: &str, result: AppResult<T>) -> Self {
        match result.and_then(|value| Envelope::ok().with(key, &value)) {
            Ok(envelope) => envelope,
            Err(err) => Envelope::from(&err),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

impl From<&AppError> for Envelope {
    fn from(err: &AppError) -> Self {
        let mut envelope = Envelope::failure(err.user_message());
        envelope
            .payload
            .insert("code".to_string(), Value::String(err.code().to_string()));
        envelope
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = if self.status {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, Json(self)).into_response()
    }
}
