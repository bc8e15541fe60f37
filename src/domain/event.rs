//! Event documents and the capacity rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, ExtraFields};
use crate::error::PortalError;

/// A college event as stored, with its identifier merged in.
///
/// `registered` starts at 0 and is only ever incremented by the
/// registration transaction. `0 <= registered <= capacity` holds after
/// every committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Store-assigned identifier.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Calendar date as entered by the organiser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Start time as entered by the organiser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Venue or room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Category label (e.g. `"Technical"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Organising club or department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    /// Banner image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Maximum number of registrations, fixed at creation.
    pub capacity: u32,
    /// Number of registrations committed so far.
    pub registered: u32,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Any other top-level attribute supplied at creation.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Event {
    /// Builds the stored form of `new` with `registered = 0`.
    #[must_use]
    pub fn from_new(id: EventId, new: NewEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            date: new.date,
            time: new.time,
            venue: new.venue,
            category: new.category,
            organizer: new.organizer,
            image_url: new.image_url,
            capacity: new.capacity,
            registered: 0,
            created_at,
            extra: new.extra,
        }
    }

    /// Seats still open.
    #[must_use]
    pub const fn seats_remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.registered)
    }

    /// Returns `true` if no further registration can be accepted.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.registered >= self.capacity
    }
}

/// Attributes supplied by an admin when creating an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    /// Event title.
    pub title: String,
    /// Long-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Calendar date.
    #[serde(default)]
    pub date: Option<String>,
    /// Start time.
    #[serde(default)]
    pub time: Option<String>,
    /// Venue or room.
    #[serde(default)]
    pub venue: Option<String>,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Organising club or department.
    #[serde(default)]
    pub organizer: Option<String>,
    /// Banner image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Registration ceiling; 0 when omitted.
    #[serde(default)]
    pub capacity: u32,
    /// Any other top-level attribute, kept as-is.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Keys the stored event sets itself.
const EVENT_KEYS: [&str; 3] = ["id", "registered", "createdAt"];

impl NewEvent {
    /// Creates a request with just a title and capacity.
    #[must_use]
    pub fn new(title: impl Into<String>, capacity: u32) -> Self {
        Self {
            title: title.into(),
            capacity,
            ..Self::default()
        }
    }

    /// Validates the bounded extension map.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] if `extra` is out of bounds or
    /// tries to set `registered`, `id` or `createdAt`.
    pub fn validate(&self) -> Result<(), PortalError> {
        self.extra.validate()?;
        self.extra.reject_reserved(&EVENT_KEYS)
    }
}

/// Rejects a registration when `registered` has reached `capacity`.
///
/// # Errors
///
/// Returns [`PortalError::CapacityExceeded`] when the event is full.
pub fn check_capacity(registered: u32, capacity: u32) -> Result<(), PortalError> {
    if registered >= capacity {
        return Err(PortalError::CapacityExceeded);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn from_new_starts_unregistered() {
        let event = Event::from_new(EventId::new(), NewEvent::new("Hackathon", 3), Utc::now());
        assert_eq!(event.registered, 0);
        assert_eq!(event.capacity, 3);
        assert_eq!(event.seats_remaining(), 3);
        assert!(!event.is_full());
    }

    #[test]
    fn zero_capacity_is_always_full() {
        assert!(matches!(
            check_capacity(0, 0),
            Err(PortalError::CapacityExceeded)
        ));
    }

    #[test]
    fn capacity_boundary() {
        assert!(check_capacity(1, 2).is_ok());
        assert!(check_capacity(2, 2).is_err());
        assert!(check_capacity(3, 2).is_err());
    }

    #[test]
    fn new_event_defaults_capacity_to_zero() {
        let Ok(new) = serde_json::from_str::<NewEvent>(r#"{"title":"Quiz Night"}"#) else {
            panic!("valid payload");
        };
        assert_eq!(new.capacity, 0);
        assert!(new.extra.is_empty());
    }

    #[test]
    fn unknown_attributes_land_in_extra() {
        let payload = r#"{"title":"Expo","capacity":5,"dressCode":"formal"}"#;
        let Ok(new) = serde_json::from_str::<NewEvent>(payload) else {
            panic!("valid payload");
        };
        assert_eq!(new.extra.get("dressCode"), Some("formal"));
        assert!(new.validate().is_ok());

        let event = Event::from_new(EventId::new(), new, Utc::now());
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json.get("dressCode").and_then(|v| v.as_str()), Some("formal"));
    }

    #[test]
    fn registered_cannot_be_supplied_on_create() {
        let payload = r#"{"title":"Expo","capacity":5,"registered":"5"}"#;
        let Ok(new) = serde_json::from_str::<NewEvent>(payload) else {
            panic!("valid payload");
        };
        assert!(matches!(new.validate(), Err(PortalError::InvalidRequest(_))));
    }

    #[test]
    fn serializes_camel_case_with_id() {
        let event = Event::from_new(EventId::new(), NewEvent::new("Expo", 10), Utc::now());
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert!(json.get("id").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("description").is_none());
    }
}
