//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{CreateEventResponse, RegistrationView};
use super::handlers::{events, registrations, system};
use crate::domain::{Event, EventId, ExtraFields, NewEvent, RegistrantData, Registration, RegistrationId};
use crate::error::{ErrorBody, ErrorResponse};
use crate::service::DashboardSummary;
use crate::store::StoreMode;

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "campus-events",
        description = "College event portal: event listing, admin management and capacity-safe registration."
    ),
    paths(
        events::list_events,
        events::create_event,
        events::delete_event,
        events::register_for_event,
        registrations::list_registrations,
        registrations::dashboard,
        system::health_handler,
    ),
    components(schemas(
        Event,
        EventId,
        NewEvent,
        ExtraFields,
        Registration,
        RegistrationId,
        RegistrantData,
        RegistrationView,
        CreateEventResponse,
        DashboardSummary,
        StoreMode,
        system::HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Events", description = "Event listing and admin management"),
        (name = "Registrations", description = "Registration transaction and participant lists"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;
