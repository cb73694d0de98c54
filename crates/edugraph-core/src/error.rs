use thiserror::Error;

use crate::entity::{EntityKind, Property, ValueType};
use crate::ingest::CoercionError;
use crate::relationship::RelationType;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed field {field}: {source}")]
    MalformedField {
        field: String,
        #[source]
        source: CoercionError,
    },

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Property {property} expects a {expected} literal, got {found}")]
    PropertyType {
        property: Property,
        expected: ValueType,
        found: ValueType,
    },

    #[error("Relation {relation} cannot link {subject} to {object}")]
    InvalidRelation {
        relation: RelationType,
        subject: EntityKind,
        object: EntityKind,
    },

    #[error("Self-referential relationship not allowed")]
    SelfReference,

    #[error("Invalid join key: {0}")]
    InvalidJoinKey(String),

    #[error("Invalid malformed-field policy: {0}")]
    InvalidPolicy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    #[must_use]
    pub fn malformed(field: impl Into<String>, source: CoercionError) -> Self {
        Self::MalformedField {
            field: field.into(),
            source,
        }
    }

    /// True for data-quality failures that only affect the record being processed.
    #[must_use]
    pub const fn is_record_local(&self) -> bool {
        matches!(self, Self::MalformedField { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
