use crate::types::{MultipartField, RequestBody};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A captured field: a bare string, or every value in encounter order when
/// the name repeats (or a multi-select has two or more selections).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Single(s) => Some(s),
            FieldValue::Multiple(_) => None,
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            FieldValue::Single(s) => vec![s.as_str()],
            FieldValue::Multiple(v) => v.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            FieldValue::Single(first) => {
                let first = std::mem::take(first);
                *self = FieldValue::Multiple(vec![first, value]);
            }
            FieldValue::Multiple(values) => values.push(value),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Single(s.to_string())
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(v: Vec<&str>) -> Self {
        FieldValue::Multiple(v.into_iter().map(String::from).collect())
    }
}

/// The plain key/value view of a form at the moment of one event.
///
/// Keys are kept sorted by name, not in form order: iteration, serialized
/// JSON, the `form:captured` detail and multipart conversion all list fields
/// alphabetically. Values under one name keep their encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot {
    fields: BTreeMap<String, FieldValue>,
}

impl FormSnapshot {
    /// Build a snapshot from the form encoding plus the multi-select pass.
    ///
    /// Encoded entries accumulate: first sighting stores a scalar, the second
    /// promotes it to a list, later ones append. Each multi-select with at
    /// least one selection then overwrites its name: one selection becomes a
    /// scalar, two or more a list. A multi-select with nothing selected
    /// leaves the name untouched.
    pub fn build<E, S>(entries: E, multi_selects: S) -> Self
    where
        E: IntoIterator<Item = (String, String)>,
        S: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut fields: BTreeMap<String, FieldValue> = BTreeMap::new();
        for (name, value) in entries {
            match fields.get_mut(&name) {
                Some(existing) => existing.push(value),
                None => {
                    fields.insert(name, FieldValue::Single(value));
                }
            }
        }

        for (name, mut selected) in multi_selects {
            match selected.len() {
                0 => {}
                1 => {
                    fields.insert(name, FieldValue::Single(selected.remove(0)));
                }
                _ => {
                    fields.insert(name, FieldValue::Multiple(selected));
                }
            }
        }

        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn to_json(&self) -> Value {
        let map = self
            .fields
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    FieldValue::Single(s) => Value::String(s.clone()),
                    FieldValue::Multiple(list) => {
                        Value::Array(list.iter().cloned().map(Value::String).collect())
                    }
                };
                (k.clone(), value)
            })
            .collect();
        Value::Object(map)
    }

    /// One text part per value, repeated names kept as repeated parts.
    pub fn to_multipart(&self) -> Vec<MultipartField> {
        self.fields
            .iter()
            .flat_map(|(name, value)| {
                value
                    .values()
                    .into_iter()
                    .map(move |v| MultipartField::text(name.clone(), v))
            })
            .collect()
    }
}

impl From<FormSnapshot> for RequestBody {
    fn from(snapshot: FormSnapshot) -> Self {
        RequestBody::Json(snapshot.to_json())
    }
}
