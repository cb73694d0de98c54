use std::collections::HashSet;

use crate::entity::EntityKind;
use crate::triple::{Predicate, Term, Triple};

/// Set of triples that remembers insertion order for serialization.
#[derive(Debug, Clone, Default)]
pub struct TripleStore {
    seen: HashSet<Triple>,
    order: Vec<Triple>,
}

impl TripleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `triple` unless an identical one is present. Returns whether it was new.
    pub fn add(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        self.seen.insert(triple.clone());
        self.order.push(triple);
        true
    }

    pub fn insert(
        &mut self,
        subject: impl AsRef<str>,
        predicate: impl Into<Predicate>,
        object: Term,
    ) -> bool {
        self.add(Triple::new(subject, predicate, object))
    }

    /// All triples in insertion order. Can be called any number of times.
    pub fn all(&self) -> std::slice::Iter<'_, Triple> {
        self.order.iter()
    }

    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.seen.contains(triple)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn objects<'a>(
        &'a self,
        subject: &'a str,
        predicate: Predicate,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.order
            .iter()
            .filter(move |t| &*t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn subjects_of_class(&self, kind: EntityKind) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .filter(move |t| t.predicate == Predicate::Type && t.object == Term::Class(kind))
            .map(|t| &*t.subject)
    }

    pub fn into_triples(self) -> Vec<Triple> {
        self.order
    }
}

impl<'a> IntoIterator for &'a TripleStore {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.all()
    }
}
