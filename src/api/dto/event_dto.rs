//! Event-related response DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::EventId;

/// Response body for `POST /events` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateEventResponse {
    /// Identifier assigned by the store.
    pub id: EventId,
}
