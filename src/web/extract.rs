//! Extractors that report request-shape problems as [`AppError::Validation`].

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// JSON body, parsed with the path of the offending field kept for the error.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation("body", rejection.body_text()))?;

        parse_json(&bytes).map(ValidJson)
    }
}

/// Only JSON objects are accepted. A repeated key keeps its last value.
pub fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|err| AppError::validation("body", without_position(&err)))?;

    if !document.is_object() {
        return Err(AppError::validation(
            "body",
            "Input should be a valid dictionary",
        ));
    }

    serde_path_to_error::deserialize(document).map_err(|err| {
        let reason = without_position(err.inner());
        AppError::validation(field_name(&err), reason)
    })
}

/// Dotted path to the field, the missing field's name, or `body` when the
/// document as a whole is unusable.
fn field_name(err: &serde_path_to_error::Error<serde_json::Error>) -> String {
    let path = err.path().to_string();
    if path != "." {
        return path;
    }

    err.inner()
        .to_string()
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
        .map(str::to_string)
        .unwrap_or_else(|| "body".to_string())
}

fn without_position(err: &serde_json::Error) -> String {
    let text = err.to_string();
    match text.rfind(" at line ") {
        Some(idx) => text[..idx].to_string(),
        None => text,
    }
}

/// The `{id}` segment of `/property/{id}`.
pub struct PropertyId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for PropertyId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation("property_id", rejection.body_text()))?;

        Ok(PropertyId(id))
    }
}

pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation("query", rejection.body_text()))?;

        Ok(ValidQuery(value))
    }
}
