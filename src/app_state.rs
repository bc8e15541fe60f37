//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::PortalService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Portal service for all business logic.
    pub portal_service: Arc<PortalService>,
}

impl AppState {
    /// Wraps a service for sharing across handlers.
    #[must_use]
    pub fn new(portal_service: PortalService) -> Self {
        Self {
            portal_service: Arc::new(portal_service),
        }
    }
}
