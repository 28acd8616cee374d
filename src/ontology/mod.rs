//! Ontology construction and identifier management.
//!
//! [`OntologyStore`] owns the RDF graph of an OWL ontology and is the single
//! place where axioms are written. Builders borrow the store mutably for one
//! operation at a time:
//!
//! * [`TaxonomyBuilder`] adds classes and subclass edges,
//! * [`IndividualBuilder`] mints named individuals,
//! * [`RelationBuilder`] wires object and data properties, dispatching on the
//!   [`EntityKind`] of the endpoints,
//! * [`AnnotationBuilder`] attaches labels and SKOS annotations.
//!
//! [`OntologyQuery`] answers hierarchy and label queries through a
//! [`ReasoningOracle`].

pub mod annotations;
pub mod entities;
pub mod individuals;
pub mod query;
pub mod reasoner;
pub mod relations;
pub mod store;
pub mod taxonomy;
pub mod value_objects;
pub mod vocab;

pub use annotations::{strip_accents, AnnotationBuilder};
pub use entities::{AnnotationProperty, Axiom, ClassExpression, Entity, EntityKind};
pub use individuals::IndividualBuilder;
pub use query::OntologyQuery;
pub use reasoner::{ReasoningOracle, StructuralReasoner};
pub use relations::RelationBuilder;
pub use store::{format_for, OntologySummary, OntologyStore};
pub use taxonomy::TaxonomyBuilder;
pub use value_objects::{datatype, literal, Datatype, Iri, IriError, UnknownDatatype};
