//! Field values of fixture rows.
//!
//! Scalar columns stay as raw JSON values. Fields that name an association
//! are re-read as a [`RefValue`], where every string leaf is a reference to
//! another row and every other leaf is literal data.

use crate::error::CoreResult;
use crate::names::RowName;
use serde_json::Value;
use std::collections::BTreeMap;

/// A row's field map as read from a fixture file.
pub type FieldMap = serde_json::Map<String, Value>;

/// Value of an association field.
#[derive(Debug, Clone, PartialEq)]
pub enum RefValue {
    /// Non-string leaf, passed through verbatim
    Scalar(Value),
    /// Name of another fixture row
    Reference(RowName),
    /// Ordered sequence
    Collection(Vec<RefValue>),
    /// Mapping, e.g. a join-table payload `{ tag: red, weight: 3 }`
    Structured(BTreeMap<String, RefValue>),
}

impl RefValue {
    /// Read a raw field value as an association value.
    ///
    /// Every string leaf becomes a [`RowName`], including leaves inside a
    /// structured payload. An empty string is therefore rejected here with
    /// `EmptyName` when tasks are built, rather than surfacing later as an
    /// unresolved reference.
    pub fn from_json(value: &Value) -> CoreResult<Self> {
        match value {
            Value::String(s) => Ok(RefValue::Reference(RowName::parse(s.as_str())?)),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<CoreResult<Vec<_>>>()
                .map(RefValue::Collection),
            Value::Object(map) => map
                .iter()
                .map(|(key, v)| Ok((key.clone(), Self::from_json(v)?)))
                .collect::<CoreResult<BTreeMap<_, _>>>()
                .map(RefValue::Structured),
            other => Ok(RefValue::Scalar(other.clone())),
        }
    }

    /// True when the field held an ordered collection.
    pub fn is_multi(&self) -> bool {
        matches!(self, RefValue::Collection(_))
    }

    /// True for a single reference or a list made only of references.
    ///
    /// Flat values are attached as plain handles; anything else is a
    /// structured payload.
    pub fn is_flat(&self) -> bool {
        match self {
            RefValue::Reference(_) => true,
            RefValue::Collection(items) => {
                items.iter().all(|v| matches!(v, RefValue::Reference(_)))
            }
            RefValue::Scalar(_) | RefValue::Structured(_) => false,
        }
    }

    /// Every row name referenced anywhere in the value, depth-first.
    pub fn dependencies(&self) -> Vec<RowName> {
        let mut out = Vec::new();
        self.collect_dependencies(&mut out);
        out
    }

    fn collect_dependencies(&self, out: &mut Vec<RowName>) {
        match self {
            RefValue::Scalar(_) => {}
            RefValue::Reference(name) => out.push(name.clone()),
            RefValue::Collection(items) => {
                for item in items {
                    item.collect_dependencies(out);
                }
            }
            RefValue::Structured(map) => {
                for item in map.values() {
                    item.collect_dependencies(out);
                }
            }
        }
    }

    /// Rebuild the raw value with every reference replaced by `resolve(name)`.
    pub fn try_substitute<E, F>(&self, resolve: &mut F) -> Result<Value, E>
    where
        F: FnMut(&RowName) -> Result<Value, E>,
    {
        match self {
            RefValue::Scalar(v) => Ok(v.clone()),
            RefValue::Reference(name) => resolve(name),
            RefValue::Collection(items) => items
                .iter()
                .map(|item| item.try_substitute(resolve))
                .collect::<Result<Vec<_>, E>>()
                .map(Value::Array),
            RefValue::Structured(map) => {
                let mut out = FieldMap::new();
                for (key, item) in map {
                    out.insert(key.clone(), item.try_substitute(resolve)?);
                }
                Ok(Value::Object(out))
            }
        }
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
