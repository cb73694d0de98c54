//! Derivation of canonical resource identifiers from free-text names.
//!
//! Normalization replaces inner whitespace with [`JOIN_CHAR`] and strips the
//! characters in [`STRIPPED`]. Case and diacritics are kept. The mapping is
//! lossy: `"Escola Sup. A"` and `"Escola Sup A"` produce the same token. The
//! registry reports such merges as collisions instead of hiding them.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub const JOIN_CHAR: char = '_';

/// Punctuation removed from names: comma, period, ordinal markers, colon, semicolon.
pub const STRIPPED: [char; 6] = [',', '.', 'º', 'ª', ':', ';'];

/// Joins the parts of a composite identifier. Always stripped from parts,
/// so a composite token can never equal a simple one.
pub const COMPOSITE_SEPARATOR: char = '.';

/// Separates a token from the kind qualifier appended on cross-kind clashes.
/// Also always stripped, so qualified tokens are disjoint from all others.
pub const QUALIFIER_SEPARATOR: char = ':';

#[must_use]
pub fn normalize_name(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .map(|c| if c.is_whitespace() { JOIN_CHAR } else { c })
        .collect()
}

/// A normalized identifier plus the source text it was derived from.
///
/// Equality and hashing use the token only.
#[derive(Debug, Clone)]
pub struct CanonicalId {
    token: Arc<str>,
    source: Arc<str>,
}

impl CanonicalId {
    /// Returns `None` when the name normalizes to nothing.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let token = normalize_name(name);
        if token.is_empty() {
            return None;
        }
        Some(Self {
            token: Arc::from(token),
            source: Arc::from(name.trim()),
        })
    }

    /// Builds a scoped identifier such as an institution's offering of a course.
    /// Every part must normalize to a non-empty token.
    #[must_use]
    pub fn composite(parts: &[&str]) -> Option<Self> {
        let mut tokens = Vec::with_capacity(parts.len());
        for part in parts {
            let token = normalize_name(part);
            if token.is_empty() {
                return None;
            }
            tokens.push(token);
        }
        if tokens.is_empty() {
            return None;
        }

        let source = parts.iter().map(|p| p.trim()).collect::<Vec<_>>().join(" / ");
        Some(Self {
            token: Arc::from(tokens.join(&COMPOSITE_SEPARATOR.to_string())),
            source: Arc::from(source),
        })
    }

    /// Same source text, token suffixed with `qualifier`.
    #[must_use]
    pub fn qualified(&self, qualifier: &str) -> Self {
        Self {
            token: Arc::from(format!("{}{QUALIFIER_SEPARATOR}{qualifier}", self.token)),
            source: Arc::clone(&self.source),
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn token_arc(&self) -> Arc<str> {
        Arc::clone(&self.token)
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.token.contains(COMPOSITE_SEPARATOR)
    }
}

impl PartialEq for CanonicalId {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for CanonicalId {}

impl Hash for CanonicalId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

impl std::fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Universidade A"), "Universidade_A");
        assert_eq!(
            normalize_name("Escola Superior Náutica Infante D. Henrique"),
            "Escola_Superior_Náutica_Infante_D_Henrique"
        );
        assert_eq!(normalize_name("Ciclo: 1º; 2ª, fim."), "Ciclo_1_2_fim");
        assert_eq!(normalize_name("  Saúde  "), "Saúde");
    }

    #[test]
    fn test_normalize_preserves_case_and_diacritics() {
        assert_ne!(normalize_name("Saúde"), normalize_name("Saude"));
        assert_ne!(normalize_name("medicina"), normalize_name("Medicina"));
    }

    #[test]
    fn test_normalize_is_lossy_for_stripped_characters() {
        // Known collision: names differing only in stripped punctuation.
        assert_eq!(normalize_name("Escola Sup. A"), normalize_name("Escola Sup A"));
    }

    #[test]
    fn test_empty_names_yield_no_identifier() {
        assert!(CanonicalId::from_name("").is_none());
        assert!(CanonicalId::from_name("   ").is_none());
        assert!(CanonicalId::from_name(".;:").is_none());
        assert!(CanonicalId::composite(&["Universidade A", ""]).is_none());
        assert!(CanonicalId::composite(&[]).is_none());
    }

    #[test]
    fn test_composite_identifier() {
        let id = CanonicalId::composite(&["Universidade A", "Engenharia Civil"]).unwrap();
        assert_eq!(id.token(), "Universidade_A.Engenharia_Civil");
        assert_eq!(id.source(), "Universidade A / Engenharia Civil");
        assert!(id.is_composite());
    }

    #[test]
    fn test_composite_never_equals_simple_token() {
        let simple = CanonicalId::from_name("Universidade A. Engenharia").unwrap();
        let composite = CanonicalId::composite(&["Universidade A", "Engenharia"]).unwrap();
        assert!(!simple.is_composite());
        assert_ne!(simple, composite);
    }

    #[test]
    fn test_qualified_token_is_disjoint() {
        let id = CanonicalId::from_name("Enfermagem").unwrap();
        let qualified = id.qualified("ScientificArea");
        assert_eq!(qualified.token(), "Enfermagem:ScientificArea");
        assert_eq!(qualified.source(), "Enfermagem");
        assert_ne!(qualified, id);
        assert_ne!(CanonicalId::from_name("Enfermagem:ScientificArea").unwrap(), qualified);
    }

    #[test]
    fn test_equality_ignores_source_text() {
        let a = CanonicalId::from_name("Escola Sup. A").unwrap();
        let b = CanonicalId::from_name("Escola Sup A").unwrap();
        assert_eq!(a, b);
        assert_ne!(a.source(), b.source());
    }
}
