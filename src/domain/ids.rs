//! Type-safe document identifiers.
//!
//! [`EventId`] and [`RegistrationId`] wrap a [`uuid::Uuid`] so that event
//! and registration identifiers cannot be confused with each other. Both are
//! assigned by the store on creation and immutable thereafter.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Creates an identifier from an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

document_id!(
    /// Unique identifier of an [`super::Event`].
    EventId
);

document_id!(
    /// Unique identifier of a [`super::Registration`].
    RegistrationId
);

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(EventId::new(), EventId::new());
        assert_ne!(RegistrationId::new(), RegistrationId::new());
    }

    #[test]
    fn display_is_uuid_format() {
        let id = EventId::new();
        let s = format!("{id}");
        assert_eq!(s.len(), 36);
        assert!(s.contains('-'));
    }

    #[test]
    fn serializes_as_bare_string() {
        let uuid = uuid::Uuid::from_u128(7);
        let Ok(json) = serde_json::to_string(&EventId::from_uuid(uuid)) else {
            panic!("serialization failed");
        };
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn from_uuid_keeps_value() {
        let uuid = uuid::Uuid::new_v4();
        assert_eq!(*RegistrationId::from_uuid(uuid).as_uuid(), uuid);
        assert_eq!(uuid::Uuid::from(RegistrationId::from(uuid)), uuid);
    }
}
