mod coerce;
mod location;
mod normalizer;
mod pipeline;
mod registry;

pub use coerce::{CoercionError, CoercionResult, LiteralCoercer, DEFAULT_SENTINEL};
pub use location::{Location, LocationIndex, LocationKey};
pub use normalizer::{
    normalize_name, CanonicalId, COMPOSITE_SEPARATOR, JOIN_CHAR, QUALIFIER_SEPARATOR, STRIPPED,
};
pub use pipeline::{
    BuildReport, BuildStats, BuiltGraph, CourseRow, GraphAssembler, RecordFailure, RecordOutcome,
    ScientificAreaRow, SkippedRecord,
};
pub use registry::{Collision, CollisionKind, EntityHandle, EntityRegistry, Resolved};
