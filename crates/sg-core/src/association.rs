//! Association metadata and the per-row association resolver.
//!
//! The resolver is a pure transformation: it splits a row's fields into
//! scalar column data and association descriptors, using whatever
//! [`AssociationLookup`] the storage adapter supplies for the row's model.

use crate::entity::EntityHandle;
use crate::error::CoreResult;
use crate::names::{ModelName, RowName};
use crate::value::{FieldMap, RefValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of relationship between two models.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssociationKind {
    /// Foreign-key column on the owning row
    BelongsTo,
    /// Rows linked through a join table
    BelongsToMany,
    /// Foreign-key column on each target row
    HasMany,
    /// Foreign-key column on a single target row
    HasOne,
    /// A kind this engine does not know how to apply
    Unknown(String),
}

impl From<String> for AssociationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "belongsTo" => AssociationKind::BelongsTo,
            "belongsToMany" => AssociationKind::BelongsToMany,
            "hasMany" => AssociationKind::HasMany,
            "hasOne" => AssociationKind::HasOne,
            _ => AssociationKind::Unknown(s),
        }
    }
}

impl From<AssociationKind> for String {
    fn from(kind: AssociationKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationKind::BelongsTo => write!(f, "belongsTo"),
            AssociationKind::BelongsToMany => write!(f, "belongsToMany"),
            AssociationKind::HasMany => write!(f, "hasMany"),
            AssociationKind::HasOne => write!(f, "hasOne"),
            AssociationKind::Unknown(kind) => write!(f, "{}", kind),
        }
    }
}

/// Join table used by a belongsToMany association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinTable {
    /// Join table name
    pub table: String,

    /// Column holding the owning row's id
    pub source_key: String,

    /// Column holding the attached row's id
    pub target_key: String,
}

/// A declared association of one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Association {
    /// Declared association name
    pub name: String,

    /// Alternative field name accepted in fixtures
    #[serde(default)]
    pub alias: Option<String>,

    /// Relationship kind
    pub kind: AssociationKind,

    /// Model on the other side
    pub target: ModelName,

    /// belongsTo: column on this model; hasMany/hasOne: column on the target
    #[serde(default)]
    pub foreign_key: Option<String>,

    /// belongsToMany join table
    #[serde(default)]
    pub through: Option<JoinTable>,
}

impl Association {
    /// Whether `field` names this association, by declared name or alias.
    pub fn answers_to(&self, field: &str) -> bool {
        self.name == field || self.alias.as_deref() == Some(field)
    }
}

/// Name-to-association lookup for one model.
///
/// Implemented once per storage backend's model metadata.
pub trait AssociationLookup: Send + Sync {
    /// Association answering to `field`, if any.
    fn resolve(&self, field: &str) -> Option<&Association>;
}

/// One association field of a fixture row, resolved against its model.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationDescriptor {
    /// Field name as written in the fixture
    pub field: String,

    /// Adapter metadata for the association
    pub association: Association,

    /// Whether the field held an ordered collection
    pub is_multi: bool,

    /// Row names the field refers to, in order of appearance
    pub dependencies: Vec<RowName>,

    /// The raw field value, kept for deep substitution at attach time
    pub value: RefValue,
}

impl AssociationDescriptor {
    /// Relationship kind shortcut
    pub fn kind(&self) -> &AssociationKind {
        &self.association.kind
    }
}

/// What an attach/set call receives for one association.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachPayload {
    /// Flat references: the resolved handles, in fixture order
    Handles(Vec<EntityHandle>),
    /// Rich payload: the raw value with every reference replaced by the
    /// referenced row's identity
    Structured(Value),
}

/// Splits rows of one model into scalar data and association descriptors.
pub struct AssociationResolver<'a> {
    lookup: &'a dyn AssociationLookup,
}

impl<'a> AssociationResolver<'a> {
    /// Create a resolver over a model's association lookup
    pub fn new(lookup: &'a dyn AssociationLookup) -> Self {
        Self { lookup }
    }

    /// Resolve one field; `None` when the field is a plain column.
    pub fn resolve(&self, field: &str, value: &Value) -> CoreResult<Option<AssociationDescriptor>> {
        let Some(association) = self.lookup.resolve(field) else {
            return Ok(None);
        };

        let value = RefValue::from_json(value)?;
        Ok(Some(AssociationDescriptor {
            field: field.to_string(),
            association: association.clone(),
            is_multi: value.is_multi(),
            dependencies: value.dependencies(),
            value,
        }))
    }

    /// Partition a row into scalar data (association fields removed) and
    /// its association descriptors, in field order.
    pub fn partition(&self, row: &FieldMap) -> CoreResult<(FieldMap, Vec<AssociationDescriptor>)> {
        let mut data = row.clone();
        let mut associations = Vec::new();

        for (field, value) in row {
            if let Some(descriptor) = self.resolve(field, value)? {
                data.remove(field);
                associations.push(descriptor);
            }
        }

        Ok((data, associations))
    }
}

#[cfg(test)]
#[path = "association_test.rs"]
mod tests;
