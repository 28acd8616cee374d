//! Constant `NamedNodeRef`s for the OWL and SKOS terms the editor writes.
//!
//! RDF, RDFS and XSD terms come from [`oxrdf::vocab`].

use oxrdf::NamedNodeRef;

pub mod owl {
    use super::NamedNodeRef;

    pub const ONTOLOGY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
    pub const IMPORTS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#imports");
    pub const CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const THING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Thing");
    pub const NOTHING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Nothing");
    pub const NAMED_INDIVIDUAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#NamedIndividual");
    pub const OBJECT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    pub const DATATYPE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    pub const ANNOTATION_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AnnotationProperty");
    pub const RESTRICTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Restriction");
    pub const ON_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onProperty");
    pub const SOME_VALUES_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#someValuesFrom");
    pub const HAS_VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#hasValue");
    pub const UNION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#unionOf");
    pub const EQUIVALENT_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentClass");

    pub const NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";
}

pub mod skos {
    use super::NamedNodeRef;

    pub const DEFINITION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#definition");
    pub const ALT_LABEL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#altLabel");

    pub const NAMESPACE: &str = "http://www.w3.org/2004/02/skos/core#";
}

/// Namespaces whose terms are vocabulary, never user classes.
pub const BUILTIN_NAMESPACES: [&str; 4] = [
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
    "http://www.w3.org/2000/01/rdf-schema#",
    owl::NAMESPACE,
    "http://www.w3.org/2001/XMLSchema#",
];

/// Returns `true` for RDF, RDFS, OWL and XSD terms.
#[must_use]
pub fn is_builtin(node: NamedNodeRef<'_>) -> bool {
    BUILTIN_NAMESPACES
        .iter()
        .any(|namespace| node.as_str().starts_with(namespace))
}

/// Prefixes emitted when serializing a document.
pub const PREFIXES: [(&str, &str); 5] = [
    ("rdf", BUILTIN_NAMESPACES[0]),
    ("rdfs", BUILTIN_NAMESPACES[1]),
    ("owl", owl::NAMESPACE),
    ("xsd", BUILTIN_NAMESPACES[3]),
    ("skos", skos::NAMESPACE),
];
