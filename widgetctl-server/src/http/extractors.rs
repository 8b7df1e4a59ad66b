//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::{Deserialize, Deserializer};

use super::error::ApiError;
use crate::models::ValidationError;

/// JSON body whose rejections render as 400 `{"error": ...}`.
///
/// Plain `Json` answers 415/422 with a text body; clients of this API
/// expect every malformed request to be a 400 in the common error shape.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::Body {
                reason: rejection.body_text(),
            })
        })?;
        Ok(Self(value))
    }
}

/// Deserialize a field so that an explicit `null` stays distinguishable
/// from an absent key.
///
/// Use with `#[serde(default, deserialize_with = "present")]` on an
/// `Option<T>`: absent gives `None`, anything present (null included) gives
/// `Some(..)`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
