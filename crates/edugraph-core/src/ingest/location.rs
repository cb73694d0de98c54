use std::collections::HashMap;
use std::sync::Arc;

use super::coerce::LiteralCoercer;
use super::normalizer::CanonicalId;
use crate::config::{BuildConfig, JoinKey};
use crate::source::{Record, RowSource};

/// Key an institution is looked up by in the location table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocationKey {
    Code(i64),
    /// Canonical token of the institution name.
    Name(Arc<str>),
}

impl LocationKey {
    /// Key for an institution under `join_key`, if it has the needed attribute.
    /// `code` must already exclude the sentinel, which never joins.
    #[must_use]
    pub fn for_institution(
        join_key: JoinKey,
        code: Option<i64>,
        name: &CanonicalId,
    ) -> Option<Self> {
        match join_key {
            JoinKey::Code => code.map(Self::Code),
            JoinKey::Name => Some(Self::Name(name.token_arc())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub district: Option<String>,
    pub county: Option<String>,
}

impl Location {
    fn from_record(record: &Record, config: &BuildConfig, coercer: &LiteralCoercer) -> Self {
        let columns = &config.location_columns;
        let field = |name: &str| record.present(name).map(|v| coercer.as_string(v));
        Self {
            address: field(&columns.address),
            postal_code: field(&columns.postal_code),
            district: field(&columns.district),
            county: field(&columns.county),
        }
    }
}

/// Location rows indexed by the configured join key.
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    join_key: JoinKey,
    by_key: HashMap<LocationKey, Location>,
}

impl LocationIndex {
    #[must_use]
    pub fn new(join_key: JoinKey) -> Self {
        Self {
            join_key,
            by_key: HashMap::new(),
        }
    }

    /// Builds the index from location records. Rows without a usable key,
    /// including a sentinel code, are skipped; a malformed code is an error.
    /// The first row for a key wins.
    pub fn from_records<I>(records: I, config: &BuildConfig) -> crate::Result<Self>
    where
        I: IntoIterator<Item = crate::Result<Record>>,
    {
        let coercer = LiteralCoercer::new(&config.sentinel);
        let columns = &config.location_columns;
        let mut index = Self::new(config.join_key);

        for (row, record) in records.into_iter().enumerate() {
            let record = record?;
            let key = match config.join_key {
                JoinKey::Code => match record.present(&columns.institution_code) {
                    Some(raw) if coercer.is_sentinel(raw) => None,
                    Some(raw) => Some(LocationKey::Code(
                        coercer
                            .as_integer(raw)
                            .map_err(|e| crate::Error::malformed(&columns.institution_code, e))?,
                    )),
                    None => None,
                },
                JoinKey::Name => record
                    .present(&columns.institution_name)
                    .and_then(CanonicalId::from_name)
                    .map(|id| LocationKey::Name(id.token_arc())),
            };

            let Some(key) = key else {
                tracing::debug!(row, "Location row without join key skipped");
                continue;
            };

            if !index.insert(key, Location::from_record(&record, config, &coercer)) {
                tracing::debug!(row, "Duplicate location key, keeping first row");
            }
        }

        Ok(index)
    }

    pub fn from_source<S: RowSource + ?Sized>(
        source: &S,
        config: &BuildConfig,
    ) -> crate::Result<Self> {
        Self::from_records(source.records()?, config)
    }

    /// Returns false and keeps the existing entry if `key` is already present.
    pub fn insert(&mut self, key: LocationKey, location: Location) -> bool {
        if self.by_key.contains_key(&key) {
            return false;
        }
        self.by_key.insert(key, location);
        true
    }

    #[must_use]
    pub fn get(&self, key: &LocationKey) -> Option<&Location> {
        self.by_key.get(key)
    }

    #[must_use]
    pub const fn join_key(&self) -> JoinKey {
        self.join_key
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
