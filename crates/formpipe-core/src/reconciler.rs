//! Form reconciliation
//!
//! Keeps a caller-owned [`FormState`] consistent with the last saved
//! [`Record`]: pristine/dirty detection, restore/reset, button-enablement
//! booleans, and field-error injection. The record is never mutated here;
//! reconciliation only reads it and writes into the form.

use crate::taxonomy::FieldErrorMap;
use crate::types::Record;
use indexmap::IndexMap;
use serde_json::Value;

/// Mutable form-like structure owned by the caller (UI layer)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: IndexMap<String, Value>,
    errors: IndexMap<String, IndexMap<String, String>>,
    valid: bool,
    touched: bool,
}

impl FormState {
    /// Create a form exposing the given fields, all initially null
    #[must_use]
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: fields
                .into_iter()
                .map(|f| (f.into(), Value::Null))
                .collect(),
            errors: IndexMap::new(),
            valid: true,
            touched: false,
        }
    }

    /// Current value of a field
    #[inline]
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Set a field value (user edit); marks the form touched
    pub fn set_value(&mut self, field: &str, value: Value) {
        if let Some(slot) = self.values.get_mut(field) {
            *slot = value;
            self.touched = true;
        }
    }

    /// Names of the fields this form exposes
    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Whether the form exposes a field
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Whether the form has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overall validity flag
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Set the overall validity flag (caller-side validators)
    #[inline]
    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// Whether the user has interacted with the form
    #[inline]
    #[must_use]
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Errors currently shown for a field
    #[inline]
    #[must_use]
    pub fn field_errors(&self, field: &str) -> Option<&IndexMap<String, String>> {
        self.errors.get(field)
    }

    /// Whether any field shows an error
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Copy into `form` the subset of keys shared by the form and `data`
///
/// The write is a full reset, not a patch: errors clear, the form becomes
/// valid and untouched.
pub fn update_form(form: &mut FormState, data: &Record) {
    for (field, slot) in &mut form.values {
        if let Some(value) = data.get(field) {
            *slot = value.clone();
        }
    }
    form.errors.clear();
    form.valid = true;
    form.touched = false;
}

/// No-op when `data` is absent, otherwise identical to [`update_form`]
pub fn restore_form(form: &mut FormState, data: Option<&Record>) {
    if let Some(data) = data {
        update_form(form, data);
    }
}

/// Whether the form exactly matches the last saved record
///
/// Always false when `last_saved` is absent or the form exposes no fields.
/// Otherwise deep-equality over the intersection of the form's key set and
/// the record's key set; extra fields on either side are ignored.
#[must_use]
pub fn is_pristine(form: &FormState, last_saved: Option<&Record>) -> bool {
    let Some(last_saved) = last_saved else {
        return false;
    };
    if form.is_empty() {
        return false;
    }
    form.values.iter().all(|(field, value)| {
        last_saved
            .get(field)
            .map_or(true, |saved| saved == value)
    })
}

/// Whether the save action should be disabled
#[inline]
#[must_use]
pub fn is_save_disabled(form: &FormState, last_saved: Option<&Record>, in_progress: bool) -> bool {
    !form.valid || is_pristine(form, last_saved) || in_progress
}

/// Whether the reset action should be disabled
#[inline]
#[must_use]
pub fn is_reset_disabled(form: &FormState, last_saved: Option<&Record>, in_progress: bool) -> bool {
    is_pristine(form, last_saved) || in_progress
}

/// Apply a field error map to the form
///
/// An empty map clears all errors. Otherwise each mentioned field gets its
/// error table replaced; fields the map does not mention keep whatever they
/// were showing. Field names the form does not expose degrade to a no-op.
pub fn set_errors(form: &mut FormState, map: &FieldErrorMap) {
    if map.is_empty() {
        form.errors.clear();
        form.valid = true;
        return;
    }
    for (field, codes) in map.iter() {
        if form.contains(field) {
            form.errors.insert(field.clone(), codes.clone());
        }
    }
    form.valid = form.errors.is_empty();
}
