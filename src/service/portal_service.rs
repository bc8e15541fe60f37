//! Portal service: event management, listings and registration.

use std::sync::Arc;

use futures_util::future::try_join;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Event, EventId, NewEvent, RegistrantData, Registration};
use crate::error::PortalError;
use crate::store::{DocumentStore, StoreMode};

/// Aggregate counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Number of events.
    pub total_events: usize,
    /// Number of registrations, including those for deleted events.
    pub total_registrations: usize,
    /// Sum of event capacities.
    pub total_capacity: u64,
    /// Sum of open seats across events.
    pub seats_remaining: u64,
    /// Events with no seats left.
    pub full_events: usize,
}

impl DashboardSummary {
    /// Computes the summary from event and registration snapshots.
    #[must_use]
    pub fn from_snapshot(events: &[Event], registrations: &[Registration]) -> Self {
        Self {
            total_events: events.len(),
            total_registrations: registrations.len(),
            total_capacity: events.iter().map(|e| u64::from(e.capacity)).sum(),
            seats_remaining: events.iter().map(|e| u64::from(e.seats_remaining())).sum(),
            full_events: events.iter().filter(|e| e.is_full()).count(),
        }
    }
}

/// Orchestration layer over a [`DocumentStore`].
///
/// The store is fixed at construction; no operation inspects the
/// configuration again.
#[derive(Debug, Clone)]
pub struct PortalService {
    store: Arc<dyn DocumentStore>,
}

impl PortalService {
    /// Creates a new `PortalService`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Returns the mode of the underlying store.
    #[must_use]
    pub fn mode(&self) -> StoreMode {
        self.store.mode()
    }

    /// Lists all events.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn get_events(&self) -> Result<Vec<Event>, PortalError> {
        self.store
            .list_events()
            .await
            .inspect_err(|err| tracing::error!(error = %err, "failed to list events"))
    }

    /// Lists all registrations.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn get_registrations(&self) -> Result<Vec<Registration>, PortalError> {
        self.store
            .list_registrations()
            .await
            .inspect_err(|err| tracing::error!(error = %err, "failed to list registrations"))
    }

    /// Creates an event and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] if the extension map is out
    /// of bounds, [`PortalError::NotConfigured`] in demo mode, or a store
    /// failure.
    pub async fn add_event(&self, new: NewEvent) -> Result<EventId, PortalError> {
        let result = match new.validate() {
            Ok(()) => self.store.create_event(new).await,
            Err(err) => Err(err),
        };
        match &result {
            Ok(event_id) => tracing::info!(%event_id, "event created"),
            Err(err) => tracing::warn!(error = %err, "event creation failed"),
        }
        result
    }

    /// Deletes an event. Existing registrations are kept.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::EventNotFound`], [`PortalError::NotConfigured`]
    /// in demo mode, or a store failure.
    pub async fn delete_event(&self, event_id: EventId) -> Result<(), PortalError> {
        let result = self.store.delete_event(event_id).await;
        match &result {
            Ok(()) => tracing::info!(%event_id, "event deleted"),
            Err(err) => tracing::warn!(%event_id, error = %err, "event deletion failed"),
        }
        result
    }

    /// Registers a person for an event through the atomic transaction.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`], [`PortalError::EventNotFound`],
    /// [`PortalError::CapacityExceeded`], [`PortalError::TransactionAborted`],
    /// [`PortalError::NotConfigured`] in demo mode, or a store failure.
    pub async fn register_user_for_event(
        &self,
        event_id: EventId,
        registrant: RegistrantData,
    ) -> Result<Registration, PortalError> {
        let result = match registrant.validate() {
            Ok(()) => self.store.register(event_id, registrant).await,
            Err(err) => Err(err),
        };
        match &result {
            Ok(registration) => tracing::info!(
                %event_id,
                registration_id = %registration.id,
                "registration committed"
            ),
            Err(err) => tracing::warn!(%event_id, error = %err, "registration failed"),
        }
        result
    }

    /// Fetches events and registrations concurrently and summarises them.
    ///
    /// # Errors
    ///
    /// Propagates the first store failure.
    pub async fn dashboard(&self) -> Result<DashboardSummary, PortalError> {
        let (events, registrations) =
            try_join(self.get_events(), self.get_registrations()).await?;
        Ok(DashboardSummary::from_snapshot(&events, &registrations))
    }
}
