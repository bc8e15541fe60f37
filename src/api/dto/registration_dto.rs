//! Registration listing DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Registration;
use crate::domain::avatar::{avatar_url, initials};

/// A registration with avatar details for participant lists.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationView {
    /// The stored registration.
    #[serde(flatten)]
    pub registration: Registration,
    /// Registrant initials, when a name was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    /// Avatar image URL, when a name was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<Registration> for RegistrationView {
    fn from(registration: Registration) -> Self {
        let name = registration
            .registrant
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty());
        let initials = name.map(initials);
        let avatar_url = name.map(avatar_url);
        Self {
            registration,
            initials,
            avatar_url,
        }
    }
}
