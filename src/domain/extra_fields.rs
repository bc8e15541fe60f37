//! Bounded extension map for attributes without a named field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PortalError;

/// Maximum number of extension entries on one record.
pub const MAX_EXTRA_FIELDS: usize = 16;
/// Maximum length of an extension key, in characters.
pub const MAX_EXTRA_KEY_LEN: usize = 64;
/// Maximum length of an extension value, in characters.
pub const MAX_EXTRA_VALUE_LEN: usize = 1024;

/// Free-form string attributes attached to an event or registration.
///
/// Records flatten it, so every top-level key without a named field lands
/// here and values must be strings.
/// The map is bounded; [`ExtraFields::validate`] rejects oversized input
/// instead of truncating it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ExtraFields(BTreeMap<String, String>);

impl ExtraFields {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an attribute, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks the entry count and key/value lengths.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] naming the first violated bound.
    pub fn validate(&self) -> Result<(), PortalError> {
        if self.0.len() > MAX_EXTRA_FIELDS {
            return Err(PortalError::InvalidRequest(format!(
                "too many extra fields: {} (max {MAX_EXTRA_FIELDS})",
                self.0.len()
            )));
        }
        for (key, value) in &self.0 {
            let key_len = key.chars().count();
            if key_len == 0 || key_len > MAX_EXTRA_KEY_LEN {
                return Err(PortalError::InvalidRequest(format!(
                    "extra field key must be 1..={MAX_EXTRA_KEY_LEN} characters"
                )));
            }
            if value.chars().count() > MAX_EXTRA_VALUE_LEN {
                return Err(PortalError::InvalidRequest(format!(
                    "extra field `{key}` exceeds {MAX_EXTRA_VALUE_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

impl ExtraFields {
    /// Rejects entries whose key collides with a field the record sets itself.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] naming the first reserved key found.
    pub fn reject_reserved(&self, reserved: &[&str]) -> Result<(), PortalError> {
        match reserved.iter().find(|key| self.0.contains_key(**key)) {
            Some(key) => Err(PortalError::InvalidRequest(format!(
                "field `{key}` is set by the server"
            ))),
            None => Ok(()),
        }
    }
}

impl FromIterator<(String, String)> for ExtraFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_is_valid() {
        assert!(ExtraFields::new().validate().is_ok());
    }

    #[test]
    fn rejects_too_many_entries() {
        let fields: ExtraFields = (0..=MAX_EXTRA_FIELDS)
            .map(|i| (format!("k{i}"), "v".to_string()))
            .collect();
        assert!(matches!(
            fields.validate(),
            Err(PortalError::InvalidRequest(_))
        ));
    }

    #[test]
    fn rejects_empty_key_and_long_value() {
        let mut fields = ExtraFields::new();
        fields.insert("", "x");
        assert!(fields.validate().is_err());

        let mut fields = ExtraFields::new();
        fields.insert("bio", "x".repeat(MAX_EXTRA_VALUE_LEN + 1));
        assert!(fields.validate().is_err());
    }

    #[test]
    fn deserializes_from_plain_object() {
        let fields: ExtraFields =
            serde_json::from_str(r#"{"tshirt":"M","diet":"veg"}"#).unwrap_or_default();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("tshirt"), Some("M"));
    }
}
