//! Store used when no live connection is configured.

use async_trait::async_trait;

use super::demo_data::{demo_events, demo_registrations};
use super::{DocumentStore, StoreMode};
use crate::domain::{Event, EventId, NewEvent, RegistrantData, Registration};
use crate::error::PortalError;

/// Serves the fixed demo dataset and rejects every write.
///
/// Never performs I/O. Writes fail with [`PortalError::NotConfigured`]
/// before touching any state.
#[derive(Debug, Clone)]
pub struct DemoStore {
    events: Vec<Event>,
    registrations: Vec<Registration>,
}

impl DemoStore {
    /// Creates a store over the built-in dataset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: demo_events(),
            registrations: demo_registrations(),
        }
    }
}

impl Default for DemoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for DemoStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Demo
    }

    async fn list_events(&self) -> Result<Vec<Event>, PortalError> {
        Ok(self.events.clone())
    }

    async fn list_registrations(&self) -> Result<Vec<Registration>, PortalError> {
        Ok(self.registrations.clone())
    }

    async fn create_event(&self, _new: NewEvent) -> Result<EventId, PortalError> {
        Err(PortalError::not_configured("creating events"))
    }

    async fn delete_event(&self, _id: EventId) -> Result<(), PortalError> {
        Err(PortalError::not_configured("deleting events"))
    }

    async fn register(
        &self,
        _event_id: EventId,
        _registrant: RegistrantData,
    ) -> Result<Registration, PortalError> {
        Err(PortalError::not_configured("registration"))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio_test::assert_ok;

    use super::*;

    #[tokio::test]
    async fn reads_return_fixed_dataset() {
        let store = DemoStore::new();
        let events = assert_ok!(store.list_events().await);
        assert_eq!(events, demo_events());
        let registrations = assert_ok!(store.list_registrations().await);
        assert_eq!(registrations, demo_registrations());
        assert_eq!(store.mode(), StoreMode::Demo);
    }

    #[tokio::test]
    async fn writes_fail_without_changing_state() {
        let store = DemoStore::new();
        let Some(first) = demo_events().into_iter().next() else {
            panic!("demo dataset has events");
        };

        let created = store.create_event(NewEvent::new("Nope", 5)).await;
        assert!(matches!(created, Err(PortalError::NotConfigured(_))));

        let deleted = store.delete_event(first.id).await;
        assert!(matches!(deleted, Err(PortalError::NotConfigured(_))));

        let registered = store.register(first.id, RegistrantData::default()).await;
        assert!(matches!(registered, Err(PortalError::NotConfigured(_))));

        let events = assert_ok!(store.list_events().await);
        assert_eq!(events, demo_events());
        let registrations = assert_ok!(store.list_registrations().await);
        assert_eq!(registrations.len(), demo_registrations().len());
    }
}
