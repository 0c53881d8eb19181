//! Error types for model mapping

use thiserror::Error;

use crate::schema::ItemType;

/// Errors raised while translating between configuration models and wire records
#[derive(Debug, Error)]
pub enum MappingError {
    /// A JSON-encoded configuration value could not be decoded
    #[error("Invalid JSON in '{field}': {source}")]
    InvalidJson {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// An array element does not match the blueprint's declared item type
    #[error("Array property '{property}' item {index}: expected {expected}, got {found}")]
    ItemTypeMismatch {
        property: String,
        index: usize,
        expected: ItemType,
        found: &'static str,
    },

    /// The same property name appears in more than one typed container
    #[error("Property '{property}' is declared in more than one property group")]
    DuplicateProperty { property: String },

    /// An array property declaration sets more than one item group
    #[error("Array property '{property}' sets more than one of {groups:?}")]
    ConflictingItems {
        property: String,
        groups: Vec<&'static str>,
    },

    /// A declared default or enum value does not match the property type
    #[error("Property '{property}' has a {field} that is not a {expected}")]
    InvalidDeclaration {
        property: String,
        field: &'static str,
        expected: &'static str,
    },

    /// An aggregation spec this provider cannot express
    #[error("Aggregation property '{property}' uses unsupported {calculation_by}/{func}")]
    UnsupportedAggregation {
        property: String,
        calculation_by: String,
        func: String,
    },

    /// A many-relation contains something other than an identifier
    #[error("Relation '{relation}' item {index} is not an entity identifier")]
    RelationItemType { relation: String, index: usize },

    /// A relation value is neither an identifier nor a list of identifiers
    #[error("Relation '{relation}' has unsupported value of type {found}")]
    InvalidRelation {
        relation: String,
        found: &'static str,
    },
}

impl MappingError {
    pub(crate) fn invalid_json(field: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidJson {
            field: field.into(),
            source,
        }
    }
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;
