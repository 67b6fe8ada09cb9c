//! Custom Axum extractors
//!
//! Both reject with [`ApiError::Validation`] so malformed input is a 400
//! with the usual `{"error": ...}` body instead of axum's plain-text
//! rejections.

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// Extract a numeric id from the last path segment
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::InvalidId { value: String::new() }))?;

        let id = raw
            .parse::<i64>()
            .map_err(|_| ApiError::Validation(ValidationError::InvalidId { value: raw.clone() }))?;

        Ok(Self(id))
    }
}

/// JSON body whose rejection is a validation error
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::InvalidBody {
                reason: rejection.body_text(),
            })
        })?;

        Ok(Self(value))
    }
}
