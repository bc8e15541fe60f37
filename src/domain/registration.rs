//! Registration documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, ExtraFields, RegistrationId};
use crate::error::PortalError;

/// Attributes supplied by the person registering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantData {
    /// Full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact e-mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// College roll or student number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Year of study.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Any other top-level form field, kept as-is.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Keys a registration record or its listing view sets itself.
const REGISTRATION_KEYS: [&str; 5] = ["id", "eventId", "registeredAt", "initials", "avatarUrl"];

impl RegistrantData {
    /// Creates registrant data carrying only a name and e-mail.
    #[must_use]
    pub fn named(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Validates the bounded extension map.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] if `extra` is out of bounds or
    /// shadows a key the stored registration sets.
    pub fn validate(&self) -> Result<(), PortalError> {
        self.extra.validate()?;
        self.extra.reject_reserved(&REGISTRATION_KEYS)
    }
}

/// A committed registration linking a registrant to an event.
///
/// Never updated or deleted; deleting the event leaves it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Store-assigned identifier.
    pub id: RegistrationId,
    /// Event registered for.
    pub event_id: EventId,
    /// Registrant attributes.
    #[serde(flatten)]
    pub registrant: RegistrantData,
    /// Server-assigned commit timestamp.
    pub registered_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn flattens_registrant_fields() {
        let registration = Registration {
            id: RegistrationId::new(),
            event_id: EventId::new(),
            registrant: RegistrantData::named("Ada", "ada@college.edu"),
            registered_at: Utc::now(),
        };
        let json = serde_json::to_value(&registration).unwrap_or_default();
        assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("Ada"));
        assert!(json.get("eventId").is_some());
        assert!(json.get("registeredAt").is_some());
        assert!(json.get("registrant").is_none());
    }

    #[test]
    fn unknown_keys_are_kept_in_extra() {
        let payload = r#"{"name":"Lin","studentId":"CS-042","team":"blue","tshirt":"M"}"#;
        let Ok(data) = serde_json::from_str::<RegistrantData>(payload) else {
            panic!("valid payload");
        };
        assert_eq!(data.student_id.as_deref(), Some("CS-042"));
        assert_eq!(data.extra.get("team"), Some("blue"));
        assert_eq!(data.extra.get("tshirt"), Some("M"));
        assert_eq!(data.extra.len(), 2);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn extra_keys_serialize_at_top_level() {
        let registration = Registration {
            id: RegistrationId::new(),
            event_id: EventId::new(),
            registrant: RegistrantData {
                extra: [("team".to_string(), "blue".to_string())].into_iter().collect(),
                ..RegistrantData::named("Lin", "lin@college.edu")
            },
            registered_at: Utc::now(),
        };
        let json = serde_json::to_value(&registration).unwrap_or_default();
        assert_eq!(json.get("team").and_then(|v| v.as_str()), Some("blue"));
        assert!(json.get("extra").is_none());

        let Ok(back) = serde_json::from_value::<Registration>(json) else {
            panic!("round trip");
        };
        assert_eq!(back, registration);
    }

    #[test]
    fn too_many_unknown_keys_are_rejected() {
        let fields: Vec<String> = (0..20).map(|i| format!(r#""field{i}":"x""#)).collect();
        let payload = format!("{{\"name\":\"Lin\",{}}}", fields.join(","));
        let Ok(data) = serde_json::from_str::<RegistrantData>(&payload) else {
            panic!("valid payload");
        };
        assert!(matches!(data.validate(), Err(PortalError::InvalidRequest(_))));
    }

    #[test]
    fn non_string_unknown_values_fail_to_parse() {
        let payload = r#"{"name":"Lin","guests":3}"#;
        assert!(serde_json::from_str::<RegistrantData>(payload).is_err());
    }

    #[test]
    fn reserved_keys_are_rejected() {
        let payload = r#"{"name":"Lin","eventId":"spoofed"}"#;
        let Ok(data) = serde_json::from_str::<RegistrantData>(payload) else {
            panic!("valid payload");
        };
        assert!(matches!(data.validate(), Err(PortalError::InvalidRequest(_))));
    }
}
