//! Volatile in-process document store with optimistic concurrency.
//!
//! Each event carries a version that is bumped on every counter change.
//! A registration reads `(registered, capacity, version)` under a shared
//! lock, checks capacity with the lock released, then commits under the
//! exclusive lock only if the version is still the one it read. The
//! registration insert and the counter increment happen under that same
//! exclusive lock, so readers never see one without the other.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::retry::{Attempt, RetryPolicy, run_optimistic};
use super::{DocumentStore, StoreMode};
use crate::domain::{
    Event, EventId, NewEvent, RegistrantData, Registration, RegistrationId, check_capacity,
};
use crate::error::PortalError;

#[derive(Debug)]
struct VersionedEvent {
    event: Event,
    version: u64,
}

#[derive(Debug, Default)]
struct Documents {
    events: BTreeMap<EventId, VersionedEvent>,
    registrations: Vec<Registration>,
}

/// Snapshot of the fields the registration transaction reads.
#[derive(Debug, Clone, Copy)]
struct ReadSet {
    registered: u32,
    capacity: u32,
    version: u64,
}

/// In-process [`DocumentStore`] reporting [`StoreMode::Live`].
#[derive(Debug)]
pub struct MemoryStore {
    docs: RwLock<Documents>,
    retry: RetryPolicy,
}

impl MemoryStore {
    /// Creates an empty store with the given retry budget.
    #[must_use]
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            docs: RwLock::new(Documents::default()),
            retry,
        }
    }

    /// Inserts a fully formed event, keeping its `registered` value.
    ///
    /// Used to seed fixtures; regular creation goes through
    /// [`DocumentStore::create_event`].
    pub async fn insert_event(&self, event: Event) {
        let mut docs = self.docs.write().await;
        docs.events.insert(
            event.id,
            VersionedEvent {
                event,
                version: 0,
            },
        );
    }

    /// Returns a single event by ID.
    pub async fn get_event(&self, id: EventId) -> Option<Event> {
        let docs = self.docs.read().await;
        docs.events.get(&id).map(|entry| entry.event.clone())
    }

    async fn read_set(&self, event_id: EventId) -> Option<ReadSet> {
        let docs = self.docs.read().await;
        docs.events.get(&event_id).map(|entry| ReadSet {
            registered: entry.event.registered,
            capacity: entry.event.capacity,
            version: entry.version,
        })
    }

    async fn commit(
        &self,
        event_id: EventId,
        expected_version: u64,
        registrant: &RegistrantData,
    ) -> Attempt<Registration> {
        let mut docs = self.docs.write().await;
        let Some(entry) = docs.events.get_mut(&event_id) else {
            // Deleted after the read.
            return Attempt::Conflict;
        };
        if entry.version != expected_version {
            return Attempt::Conflict;
        }
        entry.event.registered = entry.event.registered.saturating_add(1);
        entry.version = entry.version.wrapping_add(1);

        let registration = Registration {
            id: RegistrationId::new(),
            event_id,
            registrant: registrant.clone(),
            registered_at: Utc::now(),
        };
        docs.registrations.push(registration.clone());
        Attempt::Committed(registration)
    }

    async fn try_register(
        &self,
        event_id: EventId,
        registrant: &RegistrantData,
    ) -> Result<Attempt<Registration>, PortalError> {
        let read = self
            .read_set(event_id)
            .await
            .ok_or_else(|| PortalError::event_not_found(event_id))?;
        check_capacity(read.registered, read.capacity)?;
        Ok(self.commit(event_id, read.version, registrant).await)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Live
    }

    async fn list_events(&self) -> Result<Vec<Event>, PortalError> {
        let docs = self.docs.read().await;
        Ok(docs
            .events
            .values()
            .map(|entry| entry.event.clone())
            .collect())
    }

    async fn list_registrations(&self) -> Result<Vec<Registration>, PortalError> {
        let docs = self.docs.read().await;
        Ok(docs.registrations.clone())
    }

    async fn create_event(&self, new: NewEvent) -> Result<EventId, PortalError> {
        let id = EventId::new();
        self.insert_event(Event::from_new(id, new, Utc::now())).await;
        Ok(id)
    }

    async fn delete_event(&self, id: EventId) -> Result<(), PortalError> {
        let mut docs = self.docs.write().await;
        docs.events
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortalError::event_not_found(id))
    }

    async fn register(
        &self,
        event_id: EventId,
        registrant: RegistrantData,
    ) -> Result<Registration, PortalError> {
        let registrant = &registrant;
        run_optimistic(&self.retry, move |attempt| {
            tracing::trace!(%event_id, attempt, "registration attempt");
            self.try_register(event_id, registrant)
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio_test::{assert_err, assert_ok};

    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 50,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    async fn seeded(capacity: u32, registered: u32) -> (MemoryStore, EventId) {
        let store = MemoryStore::new(policy());
        let mut event = Event::from_new(EventId::new(), NewEvent::new("Seminar", capacity), Utc::now());
        event.registered = registered;
        let id = event.id;
        store.insert_event(event).await;
        (store, id)
    }

    #[tokio::test]
    async fn full_event_is_rejected_without_side_effects() {
        let (store, id) = seeded(2, 2).await;
        let err = assert_err!(store.register(id, RegistrantData::default()).await);
        assert!(matches!(err, PortalError::CapacityExceeded));

        let Some(event) = store.get_event(id).await else {
            panic!("event exists");
        };
        assert_eq!(event.registered, 2);
        assert!(assert_ok!(store.list_registrations().await).is_empty());
    }

    #[tokio::test]
    async fn last_seat_is_taken() {
        let (store, id) = seeded(2, 1).await;
        let registration = assert_ok!(
            store
                .register(id, RegistrantData::named("Ada", "ada@college.edu"))
                .await
        );
        assert_eq!(registration.event_id, id);

        let Some(event) = store.get_event(id).await else {
            panic!("event exists");
        };
        assert_eq!(event.registered, 2);
        let registrations = assert_ok!(store.list_registrations().await);
        assert_eq!(registrations.len(), 1);
        assert!(registrations.iter().all(|r| r.id == registration.id));
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let store = MemoryStore::new(policy());
        let missing = EventId::new();
        let err = assert_err!(store.register(missing, RegistrantData::default()).await);
        assert!(matches!(err, PortalError::EventNotFound(ref id) if *id == missing.to_string()));
        assert!(assert_ok!(store.list_registrations().await).is_empty());
    }

    #[tokio::test]
    async fn stale_version_conflicts() {
        let (store, id) = seeded(5, 0).await;
        let Some(read) = store.read_set(id).await else {
            panic!("event exists");
        };
        assert_ok!(store.register(id, RegistrantData::default()).await);

        let outcome = store.commit(id, read.version, &RegistrantData::default()).await;
        assert!(matches!(outcome, Attempt::Conflict));
        assert_eq!(assert_ok!(store.list_registrations().await).len(), 1);
    }

    #[tokio::test]
    async fn delete_between_read_and_commit_ends_not_found() {
        let (store, id) = seeded(5, 0).await;
        let Some(read) = store.read_set(id).await else {
            panic!("event exists");
        };
        assert_ok!(store.delete_event(id).await);

        let outcome = store.commit(id, read.version, &RegistrantData::default()).await;
        assert!(matches!(outcome, Attempt::Conflict));
        let err = assert_err!(store.register(id, RegistrantData::default()).await);
        assert!(matches!(err, PortalError::EventNotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_never_overfill() {
        let (store, id) = seeded(10, 0).await;
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for n in 0..40 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .register(id, RegistrantData::named(format!("student {n}"), "s@college.edu"))
                    .await
            }));
        }

        let mut committed = 0;
        for handle in handles {
            match handle.await {
                Ok(Ok(_)) => committed += 1,
                Ok(Err(PortalError::CapacityExceeded | PortalError::TransactionAborted { .. })) => {}
                Ok(Err(other)) => panic!("unexpected error: {other}"),
                Err(join) => panic!("task failed: {join}"),
            }
        }

        let Some(event) = store.get_event(id).await else {
            panic!("event exists");
        };
        let registrations = assert_ok!(store.list_registrations().await);
        assert!(event.registered <= event.capacity);
        assert_eq!(committed, 10);
        assert_eq!(event.registered as usize, committed);
        assert_eq!(registrations.len(), committed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn two_racers_for_one_seat() {
        let (store, id) = seeded(1, 0).await;
        let store = Arc::new(store);

        let a = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.register(id, RegistrantData::named("A", "a@college.edu")).await }
        });
        let b = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.register(id, RegistrantData::named("B", "b@college.edu")).await }
        });
        let (Ok(a), Ok(b)) = (a.await, b.await) else {
            panic!("tasks panicked");
        };

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            outcomes
                .iter()
                .filter(|r| matches!(r, Err(PortalError::CapacityExceeded)))
                .count(),
            1
        );
        let Some(event) = store.get_event(id).await else {
            panic!("event exists");
        };
        assert_eq!(event.registered, 1);
    }

    #[tokio::test]
    async fn delete_leaves_registrations() {
        let (store, id) = seeded(3, 0).await;
        assert_ok!(store.register(id, RegistrantData::default()).await);
        assert_ok!(store.delete_event(id).await);

        assert!(assert_ok!(store.list_events().await).is_empty());
        assert_eq!(assert_ok!(store.list_registrations().await).len(), 1);
        let err = assert_err!(store.delete_event(id).await);
        assert!(matches!(err, PortalError::EventNotFound(_)));
    }

    #[tokio::test]
    async fn create_event_starts_at_zero() {
        let store = MemoryStore::default();
        let id = assert_ok!(store.create_event(NewEvent::new("Robotics", 12)).await);
        let Some(event) = store.get_event(id).await else {
            panic!("event exists");
        };
        assert_eq!(event.registered, 0);
        assert_eq!(event.capacity, 12);
        assert_eq!(store.mode(), StoreMode::Live);
    }
}
