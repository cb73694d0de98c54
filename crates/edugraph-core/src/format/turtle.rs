//! Turtle output, the format the graph is published in.
//!
//! ```turtle
//! @prefix edu: <http://example.org/education#> .
//!
//! edu:Universidade_A a edu:Institution ;
//!     edu:institutionName "Universidade A" ;
//!     edu:hasCourse edu:Universidade_A.Engenharia .
//! ```

use std::collections::HashMap;
use std::io::Write;

use super::{escape_iri, escape_literal, RDF_NS, XSD_NS};
use crate::config::Namespace;
use crate::entity::Literal;
use crate::storage::TripleStore;
use crate::triple::{Predicate, Term, Triple};
use crate::Result;

pub struct Turtle;

impl Turtle {
    /// Writes prefixes, then one block per subject in order of first appearance.
    pub fn write<W: Write>(
        store: &TripleStore,
        namespace: &Namespace,
        mut writer: W,
    ) -> Result<()> {
        writeln!(
            writer,
            "@prefix {}: <{}> .",
            namespace.prefix,
            escape_iri(&namespace.base)
        )?;
        writeln!(writer, "@prefix rdf: <{RDF_NS}> .")?;
        writeln!(writer, "@prefix xsd: <{XSD_NS}> .")?;

        let mut order: Vec<&str> = Vec::new();
        let mut by_subject: HashMap<&str, Vec<&Triple>> = HashMap::new();
        for triple in store {
            let subject = &*triple.subject;
            by_subject
                .entry(subject)
                .or_insert_with(|| {
                    order.push(subject);
                    Vec::new()
                })
                .push(triple);
        }

        for subject in order {
            let Some(triples) = by_subject.get(subject) else {
                continue;
            };
            writeln!(writer)?;
            write!(writer, "{}", resource(namespace, subject))?;
            for (i, triple) in triples.iter().enumerate() {
                let predicate = predicate(namespace, triple.predicate);
                let object = object(namespace, &triple.object);
                if i == 0 {
                    write!(writer, " {predicate} {object}")?;
                } else {
                    write!(writer, " ;\n    {predicate} {object}")?;
                }
            }
            writeln!(writer, " .")?;
        }

        Ok(())
    }

    pub fn to_string(store: &TripleStore, namespace: &Namespace) -> Result<String> {
        let mut buf = Vec::new();
        Self::write(store, namespace, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Prefixed name when `local` is a valid Turtle local name, full IRI otherwise.
fn resource(namespace: &Namespace, local: &str) -> String {
    if is_valid_local_name(local) {
        format!("{}:{}", namespace.prefix, local)
    } else {
        format!("<{}>", escape_iri(&namespace.iri(local)))
    }
}

fn predicate(namespace: &Namespace, predicate: Predicate) -> String {
    predicate
        .local_name()
        .map_or_else(|| "a".to_string(), |local| resource(namespace, local))
}

fn object(namespace: &Namespace, term: &Term) -> String {
    match term {
        Term::Resource(token) => resource(namespace, token),
        Term::Class(kind) => resource(namespace, kind.class_name()),
        Term::Literal(literal) => self::literal(literal),
    }
}

fn literal(literal: &Literal) -> String {
    match literal {
        Literal::String(s) => format!("\"{}\"", escape_literal(s)),
        Literal::Integer(i) => i.to_string(),
        Literal::Float(_) => format!(
            "\"{}\"^^xsd:{}",
            literal.lexical(),
            literal.value_type().xsd_name()
        ),
    }
}

/// Letters, digits, `_` and `-`, with `.` allowed inside but not at either end.
fn is_valid_local_name(s: &str) -> bool {
    let (Some(first), Some(last)) = (s.chars().next(), s.chars().last()) else {
        return false;
    };
    if first == '-' || first == '.' || last == '.' {
        return false;
    }
    s.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || (c.is_alphabetic() && c >= '\u{00C0}')
            || matches!(c, '_' | '-' | '.')
    })
}
