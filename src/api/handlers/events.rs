//! Event handlers: list, create, delete, register.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::CreateEventResponse;
use crate::api::extract::{ApiJson, EventPath};
use crate::app_state::AppState;
use crate::domain::{Event, NewEvent, RegistrantData, Registration};
use crate::error::{ErrorResponse, PortalError};

/// `GET /events`: List every event.
///
/// # Errors
///
/// Returns [`PortalError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns all events with their identifiers, in store order.",
    responses(
        (status = 200, description = "All events", body = Vec<Event>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, PortalError> {
    let events = state.portal_service.get_events().await?;
    Ok(Json(events))
}

/// `POST /events`: Create an event.
///
/// # Errors
///
/// Returns [`PortalError::NotConfigured`] in demo mode or
/// [`PortalError::InvalidRequest`] on out-of-bounds attributes.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create an event",
    description = "Stores a new event with zero registrations and a server timestamp.",
    request_body = NewEvent,
    responses(
        (status = 201, description = "Event created", body = CreateEventResponse),
        (status = 400, description = "Malformed body or invalid attributes", body = ErrorResponse),
        (status = 503, description = "Store not configured", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewEvent>,
) -> Result<impl IntoResponse, PortalError> {
    let id = state.portal_service.add_event(new).await?;
    Ok((StatusCode::CREATED, Json(CreateEventResponse { id })))
}

/// `DELETE /events/:id`: Delete an event. Registrations are kept.
///
/// # Errors
///
/// Returns [`PortalError::EventNotFound`] if the event does not exist or the
/// id is not a UUID.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Hard-deletes the event. Registrations referencing it are not removed.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 503, description = "Store not configured", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    EventPath(id): EventPath,
) -> Result<impl IntoResponse, PortalError> {
    state.portal_service.delete_event(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /events/:id/registrations`: Register for an event.
///
/// # Errors
///
/// Returns [`PortalError::EventNotFound`], [`PortalError::CapacityExceeded`],
/// [`PortalError::TransactionAborted`] or [`PortalError::NotConfigured`].
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/registrations",
    tag = "Registrations",
    summary = "Register for an event",
    description = "Atomically checks capacity, records the registration and increments the event's registered count.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = RegistrantData,
    responses(
        (status = 201, description = "Registration committed", body = Registration),
        (status = 400, description = "Malformed body or invalid attributes", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Event is full", body = ErrorResponse),
        (status = 503, description = "Store not configured or transaction aborted", body = ErrorResponse),
    )
)]
pub async fn register_for_event(
    State(state): State<AppState>,
    EventPath(id): EventPath,
    ApiJson(registrant): ApiJson<RegistrantData>,
) -> Result<impl IntoResponse, PortalError> {
    let registration = state
        .portal_service
        .register_user_for_event(id, registrant)
        .await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", delete(delete_event))
        .route("/events/{id}/registrations", post(register_for_event))
}
