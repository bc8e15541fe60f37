//! Service layer: the operations exposed to the view layer.
//!
//! [`PortalService`] validates input, delegates to the configured
//! [`crate::store::DocumentStore`], and logs each failure once before
//! returning it unchanged.

pub mod portal_service;

pub use portal_service::{DashboardSummary, PortalService};
