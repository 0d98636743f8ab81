//! Response envelope.
//!
//! Every response carries a `success` flag plus exactly one named
//! payload key (`users`, `tasks`, `task`, `profile`, `token`, `msg` or
//! `errors`). Callers rely on this one-key-plus-flag contract.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// A successful response envelope with a single payload key.
#[derive(Debug)]
pub struct Envelope {
    status: StatusCode,
    key: &'static str,
    value: Value,
}

impl Envelope {
    fn new<T: Serialize>(status: StatusCode, key: &'static str, payload: T) -> Self {
        let value = serde_json::to_value(payload).unwrap_or(Value::Null);
        Self { status, key, value }
    }

    /// 200 with the given payload key.
    pub fn ok<T: Serialize>(key: &'static str, payload: T) -> Self {
        Self::new(StatusCode::OK, key, payload)
    }

    /// 201 with the given payload key.
    pub fn created<T: Serialize>(key: &'static str, payload: T) -> Self {
        Self::new(StatusCode::CREATED, key, payload)
    }

    /// 200 with a `msg` payload.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::ok("msg", message.into())
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let body = json!({
            "success": true,
            self.key: self.value,
        });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_flag_and_single_key() {
        let envelope = Envelope::ok("tasks", vec!["a", "b"]);
        let body = json!({
            "success": true,
            envelope.key: envelope.value,
        });
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["success"], true);
        assert!(object.contains_key("tasks"));
    }
}
