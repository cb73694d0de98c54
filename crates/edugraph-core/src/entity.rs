use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::ingest::{CanonicalId, EntityHandle};
use crate::relationship::RelationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Institution,
    Course,
    Degree,
    ScientificArea,
    District,
    County,
}

impl EntityKind {
    pub const ALL: [Self; 6] = [
        Self::Institution,
        Self::Course,
        Self::Degree,
        Self::ScientificArea,
        Self::District,
        Self::County,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Institution => "institution",
            Self::Course => "course",
            Self::Degree => "degree",
            Self::ScientificArea => "scientific_area",
            Self::District => "district",
            Self::County => "county",
        }
    }

    /// Local name of the class this kind is typed as in the output graph.
    #[must_use]
    pub const fn class_name(&self) -> &'static str {
        match self {
            Self::Institution => "Institution",
            Self::Course => "Course",
            Self::Degree => "Degree",
            Self::ScientificArea => "ScientificArea",
            Self::District => "District",
            Self::County => "County",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "institution" => Ok(Self::Institution),
            "course" => Ok(Self::Course),
            "degree" => Ok(Self::Degree),
            "scientific_area" => Ok(Self::ScientificArea),
            "district" => Ok(Self::District),
            "county" => Ok(Self::County),
            _ => Err(format!("unknown entity kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Integer,
    Float,
}

impl ValueType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
        }
    }

    /// XSD datatype local name.
    #[must_use]
    pub const fn xsd_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of literal-valued attributes an entity can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    // Institution
    InstitutionName,
    InstitutionCode,
    Address,
    PostalCode,

    // Course
    CourseName,
    CourseCode,
    AvailableSlots,
    LastAdmittedGrade,

    // Classification
    DegreeName,
    ScientificAreaCode,
    ScientificAreaName,

    // Location
    DistrictName,
    CountyName,
}

impl Property {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InstitutionName => "institutionName",
            Self::InstitutionCode => "institutionCode",
            Self::Address => "address",
            Self::PostalCode => "postalCode",
            Self::CourseName => "courseName",
            Self::CourseCode => "courseCode",
            Self::AvailableSlots => "availableSlots",
            Self::LastAdmittedGrade => "lastAdmittedGrade",
            Self::DegreeName => "degreeName",
            Self::ScientificAreaCode => "scientificAreaCode",
            Self::ScientificAreaName => "scientificAreaName",
            Self::DistrictName => "districtName",
            Self::CountyName => "countyName",
        }
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::InstitutionCode | Self::AvailableSlots | Self::ScientificAreaCode => {
                ValueType::Integer
            }
            Self::LastAdmittedGrade => ValueType::Float,
            _ => ValueType::String,
        }
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed scalar value.
///
/// Floats compare and hash by bit pattern so literals can live in hashed sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    String(Arc<str>),
    Integer(i64),
    Float(f64),
}

impl Literal {
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Integer(_) => ValueType::Integer,
            Self::Float(_) => ValueType::Float,
        }
    }

    /// Lexical form used by serializers. Integral floats keep a trailing `.0`.
    #[must_use]
    pub fn lexical(&self) -> String {
        match self {
            Self::String(s) => s.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.1}"),
            Self::Float(f) => f.to_string(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::String(s) => s.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: CanonicalId,
    kind: EntityKind,
    properties: BTreeMap<Property, Literal>,
    relations: Vec<(RelationType, EntityHandle)>,
}

impl Entity {
    #[must_use]
    pub const fn new(kind: EntityKind, id: CanonicalId) -> Self {
        Self {
            id,
            kind,
            properties: BTreeMap::new(),
            relations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &CanonicalId {
        &self.id
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Stores `value` unless the property is already set. Returns whether it was written.
    pub fn set_property(&mut self, property: Property, value: Literal) -> crate::Result<bool> {
        if value.value_type() != property.value_type() {
            return Err(crate::Error::PropertyType {
                property,
                expected: property.value_type(),
                found: value.value_type(),
            });
        }

        if self.properties.contains_key(&property) {
            return Ok(false);
        }

        self.properties.insert(property, value);
        Ok(true)
    }

    #[must_use]
    pub fn property(&self, property: Property) -> Option<&Literal> {
        self.properties.get(&property)
    }

    pub fn properties(&self) -> impl Iterator<Item = (Property, &Literal)> {
        self.properties.iter().map(|(p, v)| (*p, v))
    }

    pub fn related(&self, relation: RelationType) -> impl Iterator<Item = EntityHandle> + '_ {
        self.relations
            .iter()
            .filter(move |(r, _)| *r == relation)
            .map(|(_, h)| *h)
    }

    pub fn relations(&self) -> impl Iterator<Item = (RelationType, EntityHandle)> + '_ {
        self.relations.iter().copied()
    }

    pub(crate) fn push_relation(&mut self, relation: RelationType, object: EntityHandle) {
        self.relations.push((relation, object));
    }
}
