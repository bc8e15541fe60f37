//! Domain layer: identifiers, documents and the capacity rule.
//!
//! Events and registrations are plain records; every invariant on them is
//! enforced by the store implementations in [`crate::store`].

pub mod avatar;
pub mod event;
pub mod extra_fields;
pub mod ids;
pub mod registration;

pub use event::{Event, NewEvent, check_capacity};
pub use extra_fields::ExtraFields;
pub use ids::{EventId, RegistrationId};
pub use registration::{RegistrantData, Registration};
