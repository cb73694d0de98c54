use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::coerce::LiteralCoercer;
use super::location::{LocationIndex, LocationKey};
use super::normalizer::CanonicalId;
use super::registry::{Collision, EntityHandle, EntityRegistry, Resolved};
use crate::config::{BuildConfig, CourseColumns, MalformedPolicy};
use crate::entity::{Entity, EntityKind, Literal, Property};
use crate::relationship::RelationType;
use crate::source::{Record, RowSource};
use crate::storage::TripleStore;
use crate::triple::{Predicate, Term, Triple};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ScientificAreaRow {
    pub name: String,
    pub code: Option<i64>,
}

/// One vacancy-table row with every field already coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRow {
    pub institution: String,
    pub institution_code: Option<i64>,
    pub course: String,
    pub course_code: Option<String>,
    pub degree: Option<String>,
    pub scientific_area: Option<ScientificAreaRow>,
    pub available_slots: Option<i64>,
    pub last_admitted_grade: Option<f64>,
    /// Institution code usable for the location join; `None` for the sentinel.
    institution_join_code: Option<i64>,
    institution_id: CanonicalId,
    course_type_id: CanonicalId,
    course_instance_id: CanonicalId,
}

impl CourseRow {
    /// Validates and coerces `record`. Fails with `MissingRequiredField` when the
    /// institution or course name is unusable and with `MalformedField` when a
    /// numeric field holds anything but a number or the sentinel.
    pub fn parse(
        record: &Record,
        columns: &CourseColumns,
        coercer: &LiteralCoercer,
    ) -> Result<Self> {
        let required = |column: &String| {
            record
                .present(column)
                .map(|v| coercer.as_string(v))
                .filter(|v| CanonicalId::from_name(v).is_some())
                .ok_or_else(|| Error::MissingRequiredField(column.clone()))
        };
        let integer = |column: &String| {
            record
                .present(column)
                .map(|v| coercer.as_integer(v))
                .transpose()
                .map_err(|e| Error::malformed(column, e))
        };
        let text = |column: &String| record.present(column).map(|v| coercer.as_string(v));

        let institution = required(&columns.institution_name)?;
        let course = required(&columns.course_name)?;

        let institution_code = integer(&columns.institution_code)?;
        let institution_join_code = institution_code.filter(|_| {
            !record
                .present(&columns.institution_code)
                .is_some_and(|raw| coercer.is_sentinel(raw))
        });
        let course_code = text(&columns.course_code);
        let scientific_area_code = integer(&columns.scientific_area_code)?;
        let available_slots = integer(&columns.available_slots)?;
        let last_admitted_grade = record
            .present(&columns.last_admitted_grade)
            .map(|v| coercer.as_float(v))
            .transpose()
            .map_err(|e| Error::malformed(&columns.last_admitted_grade, e))?;

        let scientific_area =
            text(&columns.scientific_area_name).map(|name| ScientificAreaRow {
                name,
                code: scientific_area_code,
            });

        let institution_id = CanonicalId::from_name(&institution)
            .ok_or_else(|| Error::MissingRequiredField(columns.institution_name.clone()))?;
        let course_id = CanonicalId::from_name(&course)
            .ok_or_else(|| Error::MissingRequiredField(columns.course_name.clone()))?;
        let course_type_id = course_code
            .as_deref()
            .and_then(|code| CanonicalId::composite(&[course.as_str(), code]))
            .unwrap_or(course_id);
        let course_instance_id =
            CanonicalId::composite(&[institution.as_str(), course.as_str()])
                .ok_or_else(|| Error::MissingRequiredField(columns.course_name.clone()))?;

        Ok(Self {
            institution,
            institution_code,
            course,
            course_code,
            degree: text(&columns.degree),
            scientific_area,
            available_slots,
            last_admitted_grade,
            institution_join_code,
            institution_id,
            course_type_id,
            course_instance_id,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Built {
        institution: EntityHandle,
        course: EntityHandle,
    },
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub records_seen: usize,
    pub records_built: usize,
    pub records_skipped: usize,
    pub records_failed: usize,
    pub institutions_located: usize,
    pub counties_without_district: usize,
    pub triples: usize,
    pub entities: BTreeMap<EntityKind, usize>,
}

impl BuildStats {
    #[must_use]
    pub fn total_entities(&self) -> usize {
        self.entities.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub stats: BuildStats,
    pub skipped: Vec<SkippedRecord>,
    pub failures: Vec<RecordFailure>,
    pub collisions: Vec<Collision>,
}

/// Result of one build: the deduplicated entities and the triples derived from them.
#[derive(Debug)]
pub struct BuiltGraph {
    pub registry: EntityRegistry,
    pub store: TripleStore,
    pub report: BuildReport,
}

/// Turns vacancy records into entities and triples, one record at a time.
///
/// Owns all graph state for a single build; create a new assembler per run.
pub struct GraphAssembler {
    config: BuildConfig,
    coercer: LiteralCoercer,
    locations: LocationIndex,
    registry: EntityRegistry,
    store: TripleStore,
    report: BuildReport,
}

impl GraphAssembler {
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self {
            coercer: LiteralCoercer::new(&config.sentinel),
            locations: LocationIndex::new(config.join_key),
            registry: EntityRegistry::new(),
            store: TripleStore::new(),
            report: BuildReport::default(),
            config,
        }
    }

    #[must_use]
    pub fn with_locations(mut self, locations: LocationIndex) -> Self {
        self.locations = locations;
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn store(&self) -> &TripleStore {
        &self.store
    }

    /// Processes one record. A record missing its institution or course name is
    /// skipped; a malformed numeric field fails the record before anything is written.
    pub fn process_record(&mut self, record: &Record) -> Result<RecordOutcome> {
        let index = self.report.stats.records_seen;
        self.report.stats.records_seen += 1;

        let row = match CourseRow::parse(record, &self.config.columns, &self.coercer) {
            Ok(row) => row,
            Err(Error::MissingRequiredField(field)) => {
                tracing::debug!(index, %field, "Skipping record without required field");
                self.report.stats.records_skipped += 1;
                self.report.skipped.push(SkippedRecord { index, field });
                return Ok(RecordOutcome::Skipped);
            }
            Err(e) => {
                self.report.stats.records_failed += 1;
                return Err(e);
            }
        };

        let outcome = self.apply(&row)?;
        self.report.stats.records_built += 1;
        tracing::debug!(
            index,
            institution = %row.institution,
            course = %row.course,
            "Record built"
        );
        Ok(outcome)
    }

    /// Runs every record through [`Self::process_record`], honouring the
    /// configured malformed-field policy, and returns the finished graph.
    pub fn build<I>(mut self, records: I) -> Result<BuiltGraph>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        for record in records {
            let record = record?;
            let index = self.report.stats.records_seen;

            match self.process_record(&record) {
                Ok(_) => {}
                Err(e)
                    if e.is_record_local()
                        && self.config.on_malformed == MalformedPolicy::Report =>
                {
                    tracing::warn!(index, error = %e, "Record rejected");
                    let field = match &e {
                        Error::MalformedField { field, .. } => Some(field.clone()),
                        _ => None,
                    };
                    self.report.failures.push(RecordFailure {
                        index,
                        field,
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(self.finish())
    }

    pub fn build_from<S: RowSource + ?Sized>(self, source: &S) -> Result<BuiltGraph> {
        let records = source.records()?;
        self.build(records)
    }

    #[must_use]
    pub fn finish(mut self) -> BuiltGraph {
        let stats = &mut self.report.stats;
        stats.triples = self.store.len();
        stats.entities = EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, self.registry.count(kind)))
            .collect();
        self.report.collisions = self.registry.collisions().to_vec();

        tracing::info!(
            seen = stats.records_seen,
            built = stats.records_built,
            skipped = stats.records_skipped,
            failed = stats.records_failed,
            entities = stats.total_entities(),
            triples = stats.triples,
            collisions = self.report.collisions.len(),
            "Graph build finished"
        );

        BuiltGraph {
            registry: self.registry,
            store: self.store,
            report: self.report,
        }
    }

    fn apply(&mut self, row: &CourseRow) -> Result<RecordOutcome> {
        let institution = self.resolve(EntityKind::Institution, &row.institution_id, true, |e| {
            e.set_property(Property::InstitutionName, Literal::string(&row.institution))?;
            if let Some(code) = row.institution_code {
                e.set_property(Property::InstitutionCode, Literal::Integer(code))?;
            }
            Ok(())
        })?;

        let course_type = self.resolve(EntityKind::Course, &row.course_type_id, true, |e| {
            e.set_property(Property::CourseName, Literal::string(&row.course))?;
            if let Some(code) = &row.course_code {
                e.set_property(Property::CourseCode, Literal::string(code))?;
            }
            Ok(())
        })?;
        let course = self.resolve(EntityKind::Course, &row.course_instance_id, false, |_| Ok(()))?;

        self.relate(course.handle, RelationType::InstanceOf, course_type.handle)?;
        self.relate(institution.handle, RelationType::HasCourse, course.handle)?;

        if let Some(slots) = row.available_slots {
            self.set_property(course.handle, Property::AvailableSlots, Literal::Integer(slots))?;
        }

        if let Some((name, id)) = named(row.degree.as_deref()) {
            let degree = self.resolve(EntityKind::Degree, &id, true, |e| {
                e.set_property(Property::DegreeName, Literal::string(name))?;
                Ok(())
            })?;
            self.relate(course_type.handle, RelationType::AwardsDegree, degree.handle)?;
        }

        if let Some(area) = &row.scientific_area {
            if let Some((name, id)) = named(Some(&area.name)) {
                let resolved = self.resolve(EntityKind::ScientificArea, &id, true, |e| {
                    e.set_property(Property::ScientificAreaName, Literal::string(name))?;
                    if let Some(code) = area.code {
                        e.set_property(Property::ScientificAreaCode, Literal::Integer(code))?;
                    }
                    Ok(())
                })?;
                self.relate(course_type.handle, RelationType::HasScientificArea, resolved.handle)?;
            }
        }

        if let Some(grade) = row.last_admitted_grade {
            self.set_property(course.handle, Property::LastAdmittedGrade, Literal::Float(grade))?;
        }

        if institution.is_new {
            self.locate(
                institution.handle,
                row.institution_join_code,
                &row.institution_id,
            )?;
        }

        Ok(RecordOutcome::Built {
            institution: institution.handle,
            course: course.handle,
        })
    }

    fn locate(
        &mut self,
        institution: EntityHandle,
        code: Option<i64>,
        id: &CanonicalId,
    ) -> Result<()> {
        let Some(key) = LocationKey::for_institution(self.locations.join_key(), code, id) else {
            return Ok(());
        };
        let Some(location) = self.locations.get(&key).cloned() else {
            tracing::debug!(institution = id.source(), "No location row for institution");
            return Ok(());
        };
        self.report.stats.institutions_located += 1;

        if let Some(address) = &location.address {
            self.set_property(institution, Property::Address, Literal::string(address))?;
        }
        if let Some(postal_code) = &location.postal_code {
            self.set_property(institution, Property::PostalCode, Literal::string(postal_code))?;
        }

        let mut district = None;
        if let Some((name, id)) = named(location.district.as_deref()) {
            let resolved = self.resolve(EntityKind::District, &id, true, |e| {
                e.set_property(Property::DistrictName, Literal::string(name))?;
                Ok(())
            })?;
            self.relate(institution, RelationType::LocatedInDistrict, resolved.handle)?;
            district = Some((name, resolved.handle));
        }

        if let Some(county_name) = location.county.as_deref() {
            let Some((district_name, district_handle)) = district else {
                tracing::warn!(
                    institution = id.source(),
                    county = county_name,
                    "County without district left unlinked"
                );
                self.report.stats.counties_without_district += 1;
                return Ok(());
            };

            if let Some(county_id) = CanonicalId::composite(&[district_name, county_name]) {
                let county = self.resolve(EntityKind::County, &county_id, true, |e| {
                    e.set_property(Property::CountyName, Literal::string(county_name))?;
                    Ok(())
                })?;
                self.relate(county.handle, RelationType::PartOfDistrict, district_handle)?;
                self.relate(institution, RelationType::LocatedInCounty, county.handle)?;
            }
        }

        Ok(())
    }

    /// Registry lookup that also emits the triples of a newly created entity.
    /// `classed` entities get an `rdf:type` to their kind's class.
    fn resolve<F>(
        &mut self,
        kind: EntityKind,
        id: &CanonicalId,
        classed: bool,
        build: F,
    ) -> Result<Resolved>
    where
        F: FnOnce(&mut Entity) -> Result<()>,
    {
        let resolved = self.registry.get_or_create(kind, id.clone(), build)?;
        if !resolved.is_new {
            return Ok(resolved);
        }

        let entity = self.registry.get(resolved.handle);
        let subject = entity.id().token_arc();
        if classed {
            self.store.add(Triple {
                subject: subject.clone(),
                predicate: Predicate::Type,
                object: Term::Class(kind),
            });
        }
        for (property, value) in entity.properties() {
            self.store.add(Triple {
                subject: subject.clone(),
                predicate: Predicate::Property(property),
                object: Term::Literal(value.clone()),
            });
        }

        Ok(resolved)
    }

    fn set_property(
        &mut self,
        handle: EntityHandle,
        property: Property,
        value: Literal,
    ) -> Result<()> {
        if self.registry.set_property(handle, property, value.clone())? {
            let subject = self.registry.get(handle).id().token_arc();
            self.store.add(Triple {
                subject,
                predicate: Predicate::Property(property),
                object: Term::Literal(value),
            });
        }
        Ok(())
    }

    fn relate(
        &mut self,
        subject: EntityHandle,
        relation: RelationType,
        object: EntityHandle,
    ) -> Result<()> {
        if self.registry.relate(subject, relation, object)? {
            let subject = self.registry.get(subject).id().token_arc();
            let object = self.registry.get(object).id().token_arc();
            self.store.add(Triple {
                subject,
                predicate: relation.into(),
                object: Term::Resource(object),
            });
        }
        Ok(())
    }
}

fn named(value: Option<&str>) -> Option<(&str, CanonicalId)> {
    let value = value?;
    CanonicalId::from_name(value).map(|id| (value, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JoinKey;
    use crate::ingest::Location;

    fn course_record(institution: &str, course: &str) -> Record {
        Record::new()
            .with("Nome da Instituição", institution)
            .with("Código Instit.", "100")
            .with("Nome do Curso", course)
            .with("Código Curso", "9001")
            .with("Grau", "Licenciatura")
            .with("Área Científica", "1")
            .with("Nome da Área Científica", "Engenharias")
    }

    fn slots_of(graph: &GraphAssembler, course: EntityHandle) -> Option<&Literal> {
        graph.registry().get(course).property(Property::AvailableSlots)
    }

    #[test]
    fn test_parse_requires_names() {
        let columns = CourseColumns::default();
        let coercer = LiteralCoercer::default();

        let blank = course_record("  ", "Engenharia");
        assert!(matches!(
            CourseRow::parse(&blank, &columns, &coercer),
            Err(Error::MissingRequiredField(f)) if f == "Nome da Instituição"
        ));

        let absent = Record::new().with("Nome da Instituição", "Universidade A");
        assert!(matches!(
            CourseRow::parse(&absent, &columns, &coercer),
            Err(Error::MissingRequiredField(f)) if f == "Nome do Curso"
        ));

        let only_punctuation = course_record("Universidade A", "...");
        assert!(CourseRow::parse(&only_punctuation, &columns, &coercer).is_err());
    }

    #[test]
    fn test_parse_builds_scoped_identifiers() {
        let row = CourseRow::parse(
            &course_record("Universidade A", "Engenharia Civil"),
            &CourseColumns::default(),
            &LiteralCoercer::default(),
        )
        .unwrap();

        assert_eq!(row.institution_id.token(), "Universidade_A");
        assert_eq!(row.course_type_id.token(), "Engenharia_Civil.9001");
        assert_eq!(row.course_instance_id.token(), "Universidade_A.Engenharia_Civil");
        assert_eq!(row.institution_code, Some(100));
        assert_eq!(
            row.scientific_area,
            Some(ScientificAreaRow {
                name: "Engenharias".into(),
                code: Some(1),
            })
        );
    }

    #[test]
    fn test_course_type_without_code_uses_name() {
        let record = course_record("Universidade A", "Medicina").with("Código Curso", "");
        let row = CourseRow::parse(&record, &CourseColumns::default(), &LiteralCoercer::default())
            .unwrap();
        assert_eq!(row.course_type_id.token(), "Medicina");
        assert_eq!(row.course_code, None);
    }

    #[test]
    fn test_skipped_record_is_counted_not_failed() {
        let mut graph = GraphAssembler::new(BuildConfig::default());
        let outcome = graph.process_record(&Record::new()).unwrap();

        assert_eq!(outcome, RecordOutcome::Skipped);
        let built = graph.finish();
        assert_eq!(built.report.stats.records_skipped, 1);
        assert_eq!(built.report.stats.records_failed, 0);
        assert_eq!(built.report.skipped[0].index, 0);
        assert!(built.store.is_empty());
    }

    #[test]
    fn test_presence_distinction_for_slots() {
        let mut graph = GraphAssembler::new(BuildConfig::default());

        let RecordOutcome::Built { course: absent, .. } = graph
            .process_record(&course_record("Universidade A", "Engenharia"))
            .unwrap()
        else {
            panic!("record should build");
        };
        let RecordOutcome::Built { course: blank, .. } = graph
            .process_record(&course_record("Universidade A", "Direito").with("Vagas 2024", " "))
            .unwrap()
        else {
            panic!("record should build");
        };
        let RecordOutcome::Built { course: sentinel, .. } = graph
            .process_record(&course_record("Universidade A", "Medicina").with("Vagas 2024", "---"))
            .unwrap()
        else {
            panic!("record should build");
        };

        assert_eq!(slots_of(&graph, absent), None);
        assert_eq!(slots_of(&graph, blank), None);
        assert_eq!(slots_of(&graph, sentinel), Some(&Literal::Integer(0)));
    }

    #[test]
    fn test_malformed_record_leaves_no_partial_entities() {
        let mut graph = GraphAssembler::new(BuildConfig::default());
        graph
            .process_record(&course_record("Universidade A", "Engenharia"))
            .unwrap();
        let entities_before = graph.registry().len();
        let triples_before = graph.store().len();

        let bad = course_record("Universidade B", "Medicina").with("Vagas 2024", "muitas");
        let err = graph.process_record(&bad).unwrap_err();

        assert!(matches!(err, Error::MalformedField { ref field, .. } if field == "Vagas 2024"));
        assert_eq!(graph.registry().len(), entities_before);
        assert_eq!(graph.store().len(), triples_before);
        assert!(graph.registry().find(EntityKind::Institution, "Universidade_B").is_none());
    }

    #[test]
    fn test_build_aborts_on_malformed_by_default() {
        let records = vec![
            Ok(course_record("Universidade A", "Engenharia").with("Vagas 2024", "abc")),
            Ok(course_record("Universidade A", "Medicina")),
        ];
        let err = GraphAssembler::new(BuildConfig::default())
            .build(records)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedField { .. }));
    }

    #[test]
    fn test_build_reports_malformed_when_configured() {
        let config = BuildConfig::default().with_malformed_policy(MalformedPolicy::Report);
        let records = vec![
            Ok(course_record("Universidade A", "Engenharia").with("Vagas 2024", "abc")),
            Ok(course_record("Universidade A", "Medicina")),
        ];
        let built = GraphAssembler::new(config).build(records).unwrap();

        assert_eq!(built.report.stats.records_failed, 1);
        assert_eq!(built.report.stats.records_built, 1);
        assert_eq!(built.report.failures.len(), 1);
        assert_eq!(built.report.failures[0].index, 0);
        assert_eq!(built.report.failures[0].field.as_deref(), Some("Vagas 2024"));
        assert!(built
            .registry
            .find(EntityKind::Course, "Universidade_A.Engenharia")
            .is_none());
    }

    #[test]
    fn test_degree_and_area_attach_to_course_type() {
        let mut graph = GraphAssembler::new(BuildConfig::default());
        graph
            .process_record(&course_record("Universidade A", "Engenharia"))
            .unwrap();
        let built = graph.finish();

        let course_type = built.registry.find(EntityKind::Course, "Engenharia.9001").unwrap();
        let instance = built
            .registry
            .find(EntityKind::Course, "Universidade_A.Engenharia")
            .unwrap();

        let type_entity = built.registry.get(course_type);
        assert_eq!(type_entity.related(RelationType::AwardsDegree).count(), 1);
        assert_eq!(type_entity.related(RelationType::HasScientificArea).count(), 1);

        let instance_entity = built.registry.get(instance);
        assert_eq!(instance_entity.related(RelationType::AwardsDegree).count(), 0);
        assert_eq!(
            instance_entity
                .related(RelationType::InstanceOf)
                .collect::<Vec<_>>(),
            vec![course_type]
        );

        let area = built.registry.find(EntityKind::ScientificArea, "Engenharias").unwrap();
        assert_eq!(
            built.registry.get(area).property(Property::ScientificAreaCode),
            Some(&Literal::Integer(1))
        );
    }

    #[test]
    fn test_blank_degree_writes_nothing() {
        let mut graph = GraphAssembler::new(BuildConfig::default());
        graph
            .process_record(&course_record("Universidade A", "Engenharia").with("Grau", ""))
            .unwrap();
        assert_eq!(graph.registry().count(EntityKind::Degree), 0);
    }

    fn located(location: Location) -> GraphAssembler {
        let mut index = LocationIndex::new(JoinKey::Code);
        index.insert(LocationKey::Code(100), location);
        GraphAssembler::new(BuildConfig::default()).with_locations(index)
    }

    #[test]
    fn test_location_fold_links_county_through_district() {
        let mut graph = located(Location {
            address: Some("Rua Direita 1".into()),
            postal_code: Some("1000-001".into()),
            district: Some("Lisboa".into()),
            county: Some("Lisboa".into()),
        });
        graph
            .process_record(&course_record("Universidade A", "Engenharia"))
            .unwrap();
        graph
            .process_record(&course_record("Universidade A", "Medicina"))
            .unwrap();
        let built = graph.finish();

        assert_eq!(built.report.stats.institutions_located, 1);
        let inst = built.registry.find(EntityKind::Institution, "Universidade_A").unwrap();
        let district = built.registry.find(EntityKind::District, "Lisboa").unwrap();
        let county = built.registry.find(EntityKind::County, "Lisboa.Lisboa").unwrap();

        let inst_entity = built.registry.get(inst);
        assert_eq!(
            inst_entity.property(Property::PostalCode),
            Some(&Literal::string("1000-001"))
        );
        assert_eq!(
            inst_entity.related(RelationType::LocatedInDistrict).collect::<Vec<_>>(),
            vec![district]
        );
        assert_eq!(
            inst_entity.related(RelationType::LocatedInCounty).collect::<Vec<_>>(),
            vec![county]
        );
        assert_eq!(
            built
                .registry
                .get(county)
                .related(RelationType::PartOfDistrict)
                .collect::<Vec<_>>(),
            vec![district]
        );

        let county_position = built
            .store
            .all()
            .position(|t| t.predicate == Predicate::Relation(RelationType::PartOfDistrict))
            .unwrap();
        let link_position = built
            .store
            .all()
            .position(|t| t.predicate == Predicate::Relation(RelationType::LocatedInCounty))
            .unwrap();
        assert!(county_position < link_position);
    }

    #[test]
    fn test_county_without_district_is_not_linked() {
        let mut graph = located(Location {
            county: Some("Sintra".into()),
            ..Location::default()
        });
        graph
            .process_record(&course_record("Universidade A", "Engenharia"))
            .unwrap();
        let built = graph.finish();

        assert_eq!(built.report.stats.counties_without_district, 1);
        assert_eq!(built.registry.count(EntityKind::County), 0);
    }

    #[test]
    fn test_location_lookup_by_name() {
        let config = BuildConfig::default().with_join_key(JoinKey::Name);
        let mut index = LocationIndex::new(JoinKey::Name);
        let id = CanonicalId::from_name("Universidade A").unwrap();
        index.insert(
            LocationKey::for_institution(JoinKey::Name, None, &id).unwrap(),
            Location {
                district: Some("Porto".into()),
                ..Location::default()
            },
        );

        let mut graph = GraphAssembler::new(config).with_locations(index);
        graph
            .process_record(&course_record("Universidade A", "Engenharia"))
            .unwrap();
        assert_eq!(graph.registry().count(EntityKind::District), 1);
    }

    #[test]
    fn test_sentinel_institution_code_never_joins() {
        let mut index = LocationIndex::new(JoinKey::Code);
        index.insert(
            LocationKey::Code(0),
            Location {
                district: Some("Faro".into()),
                ..Location::default()
            },
        );
        let mut graph = GraphAssembler::new(BuildConfig::default()).with_locations(index);

        let record = course_record("Universidade A", "Engenharia").with("Código Instit.", "---");
        let RecordOutcome::Built { institution, .. } = graph.process_record(&record).unwrap()
        else {
            panic!("record should build");
        };
        let built = graph.finish();

        assert_eq!(
            built.registry.get(institution).property(Property::InstitutionCode),
            Some(&Literal::Integer(0))
        );
        assert_eq!(built.report.stats.institutions_located, 0);
        assert_eq!(built.registry.count(EntityKind::District), 0);
    }

    #[test]
    fn test_shared_token_across_kinds_gets_distinct_subjects() {
        let record = course_record("Universidade A", "Enfermagem")
            .with("Código Curso", "")
            .with("Nome da Área Científica", "Enfermagem");
        let mut graph = GraphAssembler::new(BuildConfig::default());
        graph.process_record(&record).unwrap();
        let built = graph.finish();

        let course_type = built.registry.find(EntityKind::Course, "Enfermagem").unwrap();
        let area = built
            .registry
            .find(EntityKind::ScientificArea, "Enfermagem")
            .unwrap();
        assert_eq!(built.registry.get(course_type).id().token(), "Enfermagem");
        assert_eq!(
            built.registry.get(area).id().token(),
            "Enfermagem:ScientificArea"
        );
        assert_eq!(built.report.collisions.len(), 1);

        for triple in built.store.all() {
            assert_ne!(triple.object.as_resource(), Some(&*triple.subject));
        }
        let mut classes: std::collections::HashMap<&str, usize> =
            std::collections::HashMap::new();
        for triple in built.store.all() {
            if matches!(triple.object, Term::Class(_)) {
                *classes.entry(&*triple.subject).or_default() += 1;
            }
        }
        assert!(classes.values().all(|&count| count == 1));
    }
}
