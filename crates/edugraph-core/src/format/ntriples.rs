//! N-Triples output: one `<subject> <predicate> <object> .` line per triple.

use std::io::Write;

use super::{escape_iri, escape_literal, RDF_NS, XSD_NS};
use crate::config::Namespace;
use crate::entity::Literal;
use crate::storage::TripleStore;
use crate::triple::{Predicate, Term};
use crate::Result;

pub struct NTriples;

impl NTriples {
    pub fn write<W: Write>(
        store: &TripleStore,
        namespace: &Namespace,
        mut writer: W,
    ) -> Result<()> {
        for triple in store {
            writeln!(
                writer,
                "{} {} {} .",
                iri(&namespace.iri(&triple.subject)),
                predicate(namespace, triple.predicate),
                object(namespace, &triple.object)
            )?;
        }
        Ok(())
    }

    pub fn to_string(store: &TripleStore, namespace: &Namespace) -> Result<String> {
        let mut buf = Vec::new();
        Self::write(store, namespace, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn iri(full: &str) -> String {
    format!("<{}>", escape_iri(full))
}

fn predicate(namespace: &Namespace, predicate: Predicate) -> String {
    match predicate.local_name() {
        Some(local) => iri(&namespace.iri(local)),
        None => iri(&format!("{RDF_NS}type")),
    }
}

fn object(namespace: &Namespace, term: &Term) -> String {
    match term {
        Term::Resource(token) => iri(&namespace.iri(token)),
        Term::Class(kind) => iri(&namespace.iri(kind.class_name())),
        Term::Literal(Literal::String(s)) => format!("\"{}\"", escape_literal(s)),
        Term::Literal(literal) => format!(
            "\"{}\"^^<{XSD_NS}{}>",
            literal.lexical(),
            literal.value_type().xsd_name()
        ),
    }
}
