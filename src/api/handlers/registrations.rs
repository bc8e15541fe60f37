//! Registration listing and dashboard handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::RegistrationView;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, PortalError};
use crate::service::DashboardSummary;

/// `GET /registrations`: List every registration with avatar details.
///
/// # Errors
///
/// Returns [`PortalError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/v1/registrations",
    tag = "Registrations",
    summary = "List registrations",
    description = "Returns all registrations, including those whose event was deleted.",
    responses(
        (status = 200, description = "All registrations", body = Vec<RegistrationView>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_registrations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, PortalError> {
    let registrations = state.portal_service.get_registrations().await?;
    let views: Vec<RegistrationView> = registrations
        .into_iter()
        .map(RegistrationView::from)
        .collect();
    Ok(Json(views))
}

/// `GET /dashboard`: Aggregate counts over events and registrations.
///
/// # Errors
///
/// Returns [`PortalError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Registrations",
    summary = "Dashboard summary",
    description = "Totals for events, registrations, capacity and open seats.",
    responses(
        (status = 200, description = "Summary", body = DashboardSummary),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, PortalError> {
    let summary = state.portal_service.dashboard().await?;
    Ok(Json(summary))
}

/// Registration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/registrations", get(list_registrations))
        .route("/dashboard", get(dashboard))
}
