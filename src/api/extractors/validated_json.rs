//! Validated extractors - Combine deserialization with validation.
//!
//! Field-level syntactic checks run here, before any service logic.
//! Validation failures answer 422 with an `errors` payload key.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::errors::AppError;

/// JSON body extractor that validates after deserializing.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()).into_response())?;

        value.validate().map_err(validation_response)?;

        Ok(ValidatedJson(value))
    }
}

/// Query string extractor that validates after deserializing.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.to_string()).into_response())?;

        value.validate().map_err(validation_response)?;

        Ok(ValidatedQuery(value))
    }
}

/// Render field errors under the `errors` payload key.
fn validation_response(errors: validator::ValidationErrors) -> Response {
    let fields: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
                .collect();
            (field.to_string(), json!(messages))
        })
        .collect();

    let body = json!({
        "success": false,
        "errors": fields,
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}
