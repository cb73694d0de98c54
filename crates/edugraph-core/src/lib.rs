pub mod config;
pub mod entity;
pub mod error;
pub mod format;
pub mod ingest;
pub mod relationship;
pub mod source;
pub mod storage;
pub mod triple;

pub use config::{BuildConfig, CourseColumns, JoinKey, LocationColumns, MalformedPolicy, Namespace};
pub use entity::{Entity, EntityKind, Literal, Property, ValueType};
pub use error::{Error, Result};
pub use format::{GraphFormat, NTriples, Turtle};
pub use ingest::{
    BuildReport, BuildStats, BuiltGraph, CanonicalId, Collision, CollisionKind, EntityHandle,
    EntityRegistry, GraphAssembler, LiteralCoercer, LocationIndex, RecordOutcome,
};
pub use relationship::RelationType;
pub use source::{CsvSource, Record, RowSource};
pub use storage::TripleStore;
pub use triple::{Predicate, Term, Triple};
