//! Error taxonomy mapping
//!
//! Converts a validation-error payload into a field-keyed error map, and
//! resolves the message shown next to a field.

use crate::envelope::ValidationEnvelope;
use indexmap::IndexMap;

/// Field-keyed error map: field name -> error code -> message
///
/// Built fresh on every classification; a later classification fully
/// replaces the prior error state for the fields it mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorMap {
    entries: IndexMap<String, IndexMap<String, String>>,
}

impl FieldErrorMap {
    /// Create an empty map ("clear all errors")
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an optional validation payload
    ///
    /// Absent payload or an empty errors array produces the clear-all map.
    /// Later entries win on a `(field, code)` collision. Never fails.
    #[must_use]
    pub fn from_payload(payload: Option<&ValidationEnvelope>) -> Self {
        let mut map = Self::new();
        let Some(payload) = payload else {
            return map;
        };
        for error in &payload.errors {
            map.entries
                .entry(error.field.clone())
                .or_default()
                .insert(error.code.clone(), error.message.clone());
        }
        map
    }

    /// Errors for one field, in payload order
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&IndexMap<String, String>> {
        self.entries.get(field)
    }

    /// Whether the map carries no errors
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over fields and their error tables
    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexMap<String, String>)> {
        self.entries.iter()
    }
}

/// Message resolution for inline display
///
/// Resolution order for a `(field, code)` pair: a custom message configured
/// for that exact pair, else the message the server sent, else the default
/// configured for the code, else the generic fallback.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    /// Custom messages keyed by `field.code`
    custom: IndexMap<String, String>,
    /// Default messages keyed by code
    defaults: IndexMap<String, String>,
    /// Generic fallback
    fallback: String,
}

impl MessageCatalog {
    /// Create an empty catalog with the generic fallback
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom message for one field+code pair
    #[inline]
    #[must_use]
    pub fn with_custom(
        mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.custom
            .insert(format!("{}.{}", field.into(), code.into()), message.into());
        self
    }

    /// Register a default message for one code
    #[inline]
    #[must_use]
    pub fn with_default(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.defaults.insert(code.into(), message.into());
        self
    }

    /// Resolve the message to display for a field error
    #[must_use]
    pub fn resolve(&self, field: &str, code: &str, server_message: Option<&str>) -> String {
        if let Some(message) = self.custom.get(&format!("{field}.{code}")) {
            return message.clone();
        }
        if let Some(message) = server_message {
            if !message.is_empty() {
                return message.to_string();
            }
        }
        if let Some(message) = self.defaults.get(code) {
            return message.clone();
        }
        self.fallback.clone()
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            custom: IndexMap::new(),
            defaults: IndexMap::new(),
            fallback: "This field has an error.".to_string(),
        }
    }
}
