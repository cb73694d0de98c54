use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ingest::DEFAULT_SENTINEL;

/// Base IRI and prefix resources are minted under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespace {
    pub base: String,
    pub prefix: String,
}

impl Default for Namespace {
    fn default() -> Self {
        Self {
            base: "http://example.org/education#".to_string(),
            prefix: "edu".to_string(),
        }
    }
}

impl Namespace {
    #[must_use]
    pub fn iri(&self, local: &str) -> String {
        format!("{}{}", self.base, local)
    }
}

/// Which location-table column identifies an institution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    #[default]
    Code,
    Name,
}

impl std::str::FromStr for JoinKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "code" => Ok(Self::Code),
            "name" => Ok(Self::Name),
            other => Err(crate::Error::InvalidJoinKey(other.to_string())),
        }
    }
}

/// What a build does when a record holds a malformed numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Stop the build and return the error.
    #[default]
    Abort,
    /// Drop the record, list it in the build report and continue.
    Report,
}

impl std::str::FromStr for MalformedPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "abort" => Ok(Self::Abort),
            "report" => Ok(Self::Report),
            other => Err(crate::Error::InvalidPolicy(other.to_string())),
        }
    }
}

/// Column headers of the vacancy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseColumns {
    pub institution_name: String,
    pub institution_code: String,
    pub course_name: String,
    pub course_code: String,
    pub degree: String,
    pub scientific_area_code: String,
    pub scientific_area_name: String,
    pub available_slots: String,
    pub last_admitted_grade: String,
}

impl Default for CourseColumns {
    fn default() -> Self {
        Self {
            institution_name: "Nome da Instituição".to_string(),
            institution_code: "Código Instit.".to_string(),
            course_name: "Nome do Curso".to_string(),
            course_code: "Código Curso".to_string(),
            degree: "Grau".to_string(),
            scientific_area_code: "Área Científica".to_string(),
            scientific_area_name: "Nome da Área Científica".to_string(),
            available_slots: "Vagas 2024".to_string(),
            last_admitted_grade: "Nota último colocado 1ª Fase 2023 (cont. geral)".to_string(),
        }
    }
}

/// Column headers of the institution location table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationColumns {
    pub institution_code: String,
    pub institution_name: String,
    pub address: String,
    pub postal_code: String,
    pub district: String,
    pub county: String,
}

impl Default for LocationColumns {
    fn default() -> Self {
        Self {
            institution_code: "Código do Estabelecimento".to_string(),
            institution_name: "Nome do Estabelecimento".to_string(),
            address: "Morada".to_string(),
            postal_code: "Código Postal".to_string(),
            district: "Distrito".to_string(),
            county: "Concelho".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub namespace: Namespace,
    pub sentinel: String,
    pub join_key: JoinKey,
    pub on_malformed: MalformedPolicy,
    pub columns: CourseColumns,
    pub location_columns: LocationColumns,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            namespace: Namespace::default(),
            sentinel: DEFAULT_SENTINEL.to_string(),
            join_key: JoinKey::default(),
            on_malformed: MalformedPolicy::default(),
            columns: CourseColumns::default(),
            location_columns: LocationColumns::default(),
        }
    }
}

impl BuildConfig {
    pub fn from_toml(text: &str) -> crate::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    #[must_use]
    pub fn with_join_key(mut self, join_key: JoinKey) -> Self {
        self.join_key = join_key;
        self
    }

    #[must_use]
    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = BuildConfig::from_toml("").unwrap();
        assert_eq!(config, BuildConfig::default());
        assert_eq!(config.sentinel, "---");
        assert_eq!(config.join_key, JoinKey::Code);
        assert_eq!(config.on_malformed, MalformedPolicy::Abort);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = BuildConfig::from_toml(
            r#"
join_key = "name"
on_malformed = "report"

[columns]
available_slots = "Vagas 2025"

[namespace]
prefix = "ed"
"#,
        )
        .unwrap();

        assert_eq!(config.join_key, JoinKey::Name);
        assert_eq!(config.on_malformed, MalformedPolicy::Report);
        assert_eq!(config.columns.available_slots, "Vagas 2025");
        assert_eq!(config.columns.course_name, "Nome do Curso");
        assert_eq!(config.namespace.prefix, "ed");
        assert_eq!(config.namespace.base, "http://example.org/education#");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = BuildConfig::from_toml("join_key = \"postcode\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_parse_join_key_and_policy() {
        assert_eq!("name".parse::<JoinKey>().unwrap(), JoinKey::Name);
        assert!("postcode".parse::<JoinKey>().is_err());
        assert_eq!(
            "report".parse::<MalformedPolicy>().unwrap(),
            MalformedPolicy::Report
        );
        assert!("ignore".parse::<MalformedPolicy>().is_err());
    }

    #[test]
    fn test_namespace_iri() {
        let ns = Namespace::default();
        assert_eq!(ns.iri("Universidade_A"), "http://example.org/education#Universidade_A");
    }
}
