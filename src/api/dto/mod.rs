//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies reuse the domain records ([`crate::domain::NewEvent`],
//! [`crate::domain::RegistrantData`]); the types here only add
//! response-side shaping.

pub mod event_dto;
pub mod registration_dto;

pub use event_dto::*;
pub use registration_dto::*;
