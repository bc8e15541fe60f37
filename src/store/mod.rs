//! Store layer: the document store contract and its implementations.
//!
//! [`DocumentStore`] is the single interface the service talks to. The
//! concrete store is chosen once at startup by [`open`]:
//!
//! - [`PostgresStore`] when every required connection attribute is set,
//! - [`DemoStore`] otherwise (static dataset, all writes rejected).
//!
//! [`MemoryStore`] implements the same contract in process and backs the
//! test suite.

pub mod demo;
pub mod demo_data;
pub mod memory;
pub mod postgres;
pub mod retry;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

pub use demo::DemoStore;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use retry::{Attempt, RetryPolicy, run_optimistic};

use crate::config::PortalConfig;
use crate::domain::{Event, EventId, NewEvent, RegistrantData, Registration};
use crate::error::PortalError;

/// Whether the service talks to a live store or serves the demo dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StoreMode {
    /// Backed by a configured database.
    Live,
    /// Static dataset; writes fail with [`PortalError::NotConfigured`].
    Demo,
}

impl StoreMode {
    /// Lowercase label used in logs and the health endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event and registration collections with an atomic registration
/// transaction.
///
/// Implementations must guarantee that [`DocumentStore::register`] either
/// creates exactly one registration and increments the event counter by
/// exactly one, or does neither, and that `registered` never exceeds
/// `capacity` under any interleaving of concurrent calls.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Which mode this store represents.
    fn mode(&self) -> StoreMode;

    /// Returns every event, in store-determined order.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::PersistenceError`] on backend failure.
    async fn list_events(&self) -> Result<Vec<Event>, PortalError>;

    /// Returns every registration, in store-determined order.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::PersistenceError`] on backend failure.
    async fn list_registrations(&self) -> Result<Vec<Registration>, PortalError>;

    /// Stores a new event with `registered = 0` and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NotConfigured`] in demo mode, or a
    /// persistence error.
    async fn create_event(&self, new: NewEvent) -> Result<EventId, PortalError>;

    /// Hard-deletes an event. Its registrations are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::EventNotFound`] if no such event exists,
    /// [`PortalError::NotConfigured`] in demo mode, or a persistence error.
    async fn delete_event(&self, id: EventId) -> Result<(), PortalError>;

    /// Runs the registration transaction for `event_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::EventNotFound`], [`PortalError::CapacityExceeded`],
    /// [`PortalError::TransactionAborted`] when conflict retries run out,
    /// [`PortalError::NotConfigured`] in demo mode, or a persistence error.
    async fn register(
        &self,
        event_id: EventId,
        registrant: RegistrantData,
    ) -> Result<Registration, PortalError>;
}

/// Opens the store selected by `config`.
///
/// Falls back to [`DemoStore`] when a required connection attribute is
/// missing, logging the missing keys once.
///
/// # Errors
///
/// Returns [`PortalError::PersistenceError`] if the database is configured
/// but cannot be reached or migrated.
pub async fn open(config: &PortalConfig) -> Result<Arc<dyn DocumentStore>, PortalError> {
    if !config.store.is_configured() {
        tracing::warn!(
            missing = %config.store.missing_keys().join(", "),
            "store connection attributes missing; running in demo mode"
        );
        return Ok(Arc::new(DemoStore::new()));
    }

    let store = PostgresStore::connect(&config.store, config.retry.clone()).await?;
    tracing::info!(host = ?config.store.host, database = ?config.store.database, "connected to live store");
    Ok(Arc::new(store))
}
