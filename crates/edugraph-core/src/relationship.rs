use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    // Offering
    HasCourse,
    InstanceOf,

    // Classification
    AwardsDegree,
    HasScientificArea,

    // Location
    PartOfDistrict,
    LocatedInDistrict,
    LocatedInCounty,
}

impl RelationType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HasCourse => "hasCourse",
            Self::InstanceOf => "instanceOf",
            Self::AwardsDegree => "awardsDegree",
            Self::HasScientificArea => "hasScientificArea",
            Self::PartOfDistrict => "partOfDistrict",
            Self::LocatedInDistrict => "locatedInDistrict",
            Self::LocatedInCounty => "locatedInCounty",
        }
    }

    /// Subject and object kinds this relation may connect.
    #[must_use]
    pub const fn endpoints(&self) -> (EntityKind, EntityKind) {
        match self {
            Self::HasCourse => (EntityKind::Institution, EntityKind::Course),
            Self::InstanceOf => (EntityKind::Course, EntityKind::Course),
            Self::AwardsDegree => (EntityKind::Course, EntityKind::Degree),
            Self::HasScientificArea => (EntityKind::Course, EntityKind::ScientificArea),
            Self::PartOfDistrict => (EntityKind::County, EntityKind::District),
            Self::LocatedInDistrict => (EntityKind::Institution, EntityKind::District),
            Self::LocatedInCounty => (EntityKind::Institution, EntityKind::County),
        }
    }

    /// Functional relations hold at most one object per subject.
    #[must_use]
    pub const fn is_functional(&self) -> bool {
        !matches!(self, Self::HasCourse)
    }

    /// Whether the subject's kind `subject` and the object's kind `object` fit this relation.
    #[must_use]
    pub fn accepts(&self, subject: EntityKind, object: EntityKind) -> bool {
        self.endpoints() == (subject, object)
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hasCourse" => Ok(Self::HasCourse),
            "instanceOf" => Ok(Self::InstanceOf),
            "awardsDegree" => Ok(Self::AwardsDegree),
            "hasScientificArea" => Ok(Self::HasScientificArea),
            "partOfDistrict" => Ok(Self::PartOfDistrict),
            "locatedInDistrict" => Ok(Self::LocatedInDistrict),
            "locatedInCounty" => Ok(Self::LocatedInCounty),
            _ => Err(format!("unknown relation: {s}")),
        }
    }
}
