use std::sync::Arc;
use thiserror::Error;

use crate::entity::ValueType;

/// Marker the vacancy tables use for "not applicable".
pub const DEFAULT_SENTINEL: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("expected {expected}, found {value:?}")]
    NotNumeric { value: String, expected: ValueType },
    #[error("{value:?} is outside the {expected} range")]
    OutOfRange { value: String, expected: ValueType },
}

pub type CoercionResult<T> = Result<T, CoercionError>;

/// Converts raw cell text into typed values.
///
/// The sentinel token becomes a typed zero; any other non-numeric text is an error.
#[derive(Debug, Clone)]
pub struct LiteralCoercer {
    sentinel: Arc<str>,
}

impl LiteralCoercer {
    pub fn new(sentinel: impl AsRef<str>) -> Self {
        Self {
            sentinel: Arc::from(sentinel.as_ref().trim()),
        }
    }

    #[must_use]
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    #[must_use]
    pub fn is_sentinel(&self, raw: &str) -> bool {
        raw.trim() == &*self.sentinel
    }

    #[must_use]
    pub fn as_string(&self, raw: &str) -> String {
        raw.trim().to_string()
    }

    /// Accepts integer text directly and float text such as `"123.0"` by truncation.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn as_integer(&self, raw: &str) -> CoercionResult<i64> {
        let value = raw.trim();
        if value == &*self.sentinel {
            return Ok(0);
        }
        if let Ok(i) = value.parse::<i64>() {
            return Ok(i);
        }

        let f = parse_finite(value, ValueType::Integer)?;
        let truncated = f.trunc();
        if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
            return Err(CoercionError::OutOfRange {
                value: value.to_string(),
                expected: ValueType::Integer,
            });
        }
        Ok(truncated as i64)
    }

    pub fn as_float(&self, raw: &str) -> CoercionResult<f64> {
        let value = raw.trim();
        if value == &*self.sentinel {
            return Ok(0.0);
        }
        parse_finite(value, ValueType::Float)
    }
}

impl Default for LiteralCoercer {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINEL)
    }
}

fn parse_finite(value: &str, expected: ValueType) -> CoercionResult<f64> {
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        _ => Err(CoercionError::NotNumeric {
            value: value.to_string(),
            expected,
        }),
    }
}
