//! Statements of the output graph.
//!
//! Subjects are canonical tokens of entities; serializers expand them against
//! the configured namespace.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entity::{EntityKind, Literal, Property};
use crate::relationship::RelationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum Predicate {
    /// `rdf:type`: class membership or course instance to course type.
    Type,
    Relation(RelationType),
    Property(Property),
}

impl Predicate {
    /// Local name within the namespace, `None` for `rdf:type`.
    #[must_use]
    pub const fn local_name(&self) -> Option<&'static str> {
        match self {
            Self::Type => None,
            Self::Relation(r) => Some(r.as_str()),
            Self::Property(p) => Some(p.as_str()),
        }
    }
}

impl From<RelationType> for Predicate {
    fn from(relation: RelationType) -> Self {
        match relation {
            RelationType::InstanceOf => Self::Type,
            other => Self::Relation(other),
        }
    }
}

impl From<Property> for Predicate {
    fn from(property: Property) -> Self {
        Self::Property(property)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Term {
    /// Another entity, by canonical token.
    Resource(Arc<str>),
    Class(EntityKind),
    Literal(Literal),
}

impl Term {
    pub fn resource(token: impl AsRef<str>) -> Self {
        Self::Resource(Arc::from(token.as_ref()))
    }

    #[must_use]
    pub fn as_resource(&self) -> Option<&str> {
        match self {
            Self::Resource(token) => Some(token),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Arc<str>,
    pub predicate: Predicate,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl AsRef<str>, predicate: impl Into<Predicate>, object: Term) -> Self {
        Self {
            subject: Arc::from(subject.as_ref()),
            predicate: predicate.into(),
            object,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_of_maps_to_rdf_type() {
        assert_eq!(Predicate::from(RelationType::InstanceOf), Predicate::Type);
        assert_eq!(Predicate::Type.local_name(), None);
        assert_eq!(
            Predicate::from(RelationType::HasCourse).local_name(),
            Some("hasCourse")
        );
        assert_eq!(
            Predicate::from(Property::LastAdmittedGrade).local_name(),
            Some("lastAdmittedGrade")
        );
    }

    #[test]
    fn test_triples_compare_structurally() {
        let a = Triple::new("Universidade_A", RelationType::HasCourse, Term::resource("x"));
        let b = Triple::new("Universidade_A", RelationType::HasCourse, Term::resource("x"));
        assert_eq!(a, b);
    }
}
