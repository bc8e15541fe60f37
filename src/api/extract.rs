//! Request extractors that report failures as [`PortalError`].
//!
//! Axum's stock `Json` and `Path` rejections answer with plain text. These
//! wrappers route every malformed request through the JSON error body.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::domain::EventId;
use crate::error::PortalError;

/// JSON request body; parse failures become [`PortalError::InvalidRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PortalError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Event id taken from the `{id}` path segment.
///
/// A segment that is not a UUID cannot name a stored event, so it is
/// reported as [`PortalError::EventNotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPath(pub EventId);

impl<S> FromRequestParts<S> for EventPath
where
    S: Send + Sync,
{
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        raw.parse::<uuid::Uuid>()
            .map(|uuid| Self(EventId::from_uuid(uuid)))
            .map_err(|_| PortalError::event_not_found(raw))
    }
}

impl From<JsonRejection> for PortalError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for PortalError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}
