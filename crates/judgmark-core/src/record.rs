//! Ordered field → value mapping produced by one extraction.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::schema::{FIELD_SCHEMA, schema_position};

/// Extracted fields in the order the model returned them.
///
/// Values are plain strings; a field the document does not mention normally
/// carries [`EMPTY_VALUE`](crate::EMPTY_VALUE). Inserting a key that is already
/// present replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    fields: Vec<(String, String)>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a value. Returns the previous value, if any.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.fields.push((field, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `[field, value]` rows, as shown in the table and written to CSV.
    pub fn rows(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Schema fields with no entry in this result, in schema order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        FIELD_SCHEMA
            .iter()
            .copied()
            .filter(|f| self.get(f).is_none())
            .collect()
    }

    /// Copy of this result re-ordered to schema order. Non-schema keys keep
    /// their relative order after all schema fields.
    pub fn sorted_by_schema(&self) -> Self {
        let mut fields = self.fields.clone();
        fields.sort_by_key(|(k, _)| schema_position(k).unwrap_or(usize::MAX));
        Self { fields }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<(String, String)> for ExtractionResult {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (k, v) in iter {
            result.insert(k, v);
        }
        result
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
