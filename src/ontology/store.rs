use std::{
    collections::BTreeSet,
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Graph, NamedNodeRef, TermRef, TripleRef};
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    annotations::AnnotationBuilder,
    entities::{Axiom, EntityKind},
    individuals::IndividualBuilder,
    query::OntologyQuery,
    relations::RelationBuilder,
    taxonomy::TaxonomyBuilder,
    value_objects::Iri,
    vocab::{self, owl, PREFIXES},
};
use crate::{Error, Result};

/// Mutable OWL ontology backed by an in-memory RDF graph.
///
/// Every mutation goes through [`OntologyStore::add_axiom`]; builders borrow
/// the store exclusively for the duration of an operation.
#[derive(Clone, Debug)]
pub struct OntologyStore {
    iri: Iri,
    namespace: String,
    graph: Graph,
}

impl OntologyStore {
    /// Creates an empty ontology whose identifier is minted under `namespace`.
    pub fn create(namespace: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        let mut store = Self {
            iri: Iri::new(namespace.as_str())?,
            namespace,
            graph: Graph::new(),
        };
        store.iri = store.mint_iri()?;
        store.insert_header();
        info!(ontology = %store.iri, namespace = %store.namespace, "ontology_created");
        Ok(store)
    }

    /// Loads an ontology document, picking the syntax from the file extension.
    pub fn open(path: impl AsRef<Path>, namespace: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let format = format_for(path)?;
        let file = File::open(path).map_err(|err| Error::load(path, err))?;
        let store = Self::parse(BufReader::new(file), format, namespace.into(), path)?;
        info!(
            path = %path.display(),
            ontology = %store.iri,
            triples = store.graph.len(),
            "ontology_loaded"
        );
        Ok(store)
    }

    /// Loads an ontology document from an arbitrary reader.
    pub fn read_from(
        reader: impl Read,
        format: RdfFormat,
        namespace: impl Into<String>,
    ) -> Result<Self> {
        Self::parse(reader, format, namespace.into(), Path::new("<reader>"))
    }

    fn parse(reader: impl Read, format: RdfFormat, namespace: String, path: &Path) -> Result<Self> {
        Iri::new(namespace.as_str())?;
        let parser = RdfParser::from_format(format)
            .with_base_iri(namespace.as_str())
            .map_err(|err| Error::load(path, err))?;

        let mut graph = Graph::new();
        for quad in parser.for_reader(reader) {
            let quad = quad.map_err(|err| Error::load(path, err))?;
            graph.insert(TripleRef::new(&quad.subject, &quad.predicate, &quad.object));
        }

        let header = graph
            .subjects_for_predicate_object(rdf::TYPE, owl::ONTOLOGY)
            .find_map(named)
            .map(Iri::from);

        let mut store = Self {
            iri: Iri::new(namespace.as_str())?,
            namespace,
            graph,
        };
        match header {
            Some(iri) => store.iri = iri,
            None => {
                store.iri = store.mint_iri()?;
                store.insert_header();
                debug!(ontology = %store.iri, "ontology_header_minted");
            }
        }
        Ok(store)
    }

    /// Writes the whole document, picking the syntax from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = format_for(path)?;
        let file = File::create(path).map_err(|err| Error::io(path, err))?;
        let mut writer = self
            .write_to(BufWriter::new(file), format)
            .map_err(|err| Error::io(path, err))?;
        writer.flush().map_err(|err| Error::io(path, err))?;
        info!(path = %path.display(), triples = self.graph.len(), "ontology_saved");
        Ok(())
    }

    /// Serializes the document into `writer` and hands the writer back.
    pub fn write_to<W: Write>(&self, writer: W, format: RdfFormat) -> io::Result<W> {
        let mut serializer = RdfSerializer::from_format(format);
        for (prefix, namespace) in PREFIXES {
            serializer = serializer
                .with_prefix(prefix, namespace)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        }
        let mut writer = serializer.for_writer(writer);
        for triple in &self.graph {
            writer.serialize_triple(triple)?;
        }
        writer.finish()
    }

    /// Returns the ontology identifier.
    #[must_use]
    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    /// Returns the namespace new identifiers are minted under.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Read-only access to the underlying triples.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns `true` when the identifier occurs anywhere in the document.
    #[must_use]
    pub fn contains_in_signature(&self, iri: &Iri) -> bool {
        let node = iri.as_named_node();
        self.graph.triples_for_subject(node).next().is_some()
            || self.graph.triples_for_object(node).next().is_some()
            || self.graph.triples_for_predicate(node).next().is_some()
    }

    /// Tags an identifier as class, individual or unknown.
    ///
    /// An identifier used both ways (punning) is tagged as an individual.
    #[must_use]
    pub fn kind_of(&self, iri: &Iri) -> EntityKind {
        let node = iri.as_named_node();
        if self.is_individual_node(node) {
            EntityKind::Individual
        } else if self.is_class_node(node) {
            EntityKind::Class
        } else {
            EntityKind::Unknown
        }
    }

    /// Returns `true` when the identifier is used as a class anywhere in the
    /// document, including as the `rdf:type` of another resource.
    #[must_use]
    pub fn is_class(&self, iri: &Iri) -> bool {
        self.is_class_node(iri.as_named_node())
    }

    /// Returns `true` when the identifier is a declared named individual or
    /// is typed with a class.
    #[must_use]
    pub fn is_individual(&self, iri: &Iri) -> bool {
        self.is_individual_node(iri.as_named_node())
    }

    /// Returns every named class in the signature.
    #[must_use]
    pub fn classes(&self) -> BTreeSet<Iri> {
        let declared = [owl::CLASS, rdfs::CLASS].into_iter().flat_map(|class_type| {
            self.graph
                .subjects_for_predicate_object(rdf::TYPE, class_type)
                .filter_map(named)
        });
        let hierarchy = self
            .graph
            .triples_for_predicate(rdfs::SUB_CLASS_OF)
            .flat_map(|triple| [named(triple.subject), named(triple.object)])
            .flatten();
        let instantiated = self
            .graph
            .triples_for_predicate(rdf::TYPE)
            .filter_map(|triple| named(triple.object))
            .filter(|node| !vocab::is_builtin(*node));
        declared
            .chain(hierarchy)
            .chain(instantiated)
            .map(Iri::from)
            .collect()
    }

    /// Returns every named individual in the signature.
    #[must_use]
    pub fn individuals(&self) -> BTreeSet<Iri> {
        self.graph
            .triples_for_predicate(rdf::TYPE)
            .filter_map(|triple| named(triple.subject))
            .filter(|node| self.is_individual_node(*node))
            .map(Iri::from)
            .collect()
    }

    /// Returns the `rdfs:label` values attached to an identifier.
    #[must_use]
    pub fn labels(&self, iri: &Iri) -> Vec<String> {
        self.annotation_values(iri, rdfs::LABEL)
    }

    /// Returns the literal values of an annotation property on an identifier.
    #[must_use]
    pub fn annotation_values(&self, iri: &Iri, property: NamedNodeRef<'_>) -> Vec<String> {
        self.graph
            .objects_for_subject_predicate(iri.as_named_node(), property)
            .filter_map(|object| match object {
                TermRef::Literal(literal) => Some(literal.value().to_owned()),
                _ => None,
            })
            .collect()
    }

    /// Mints `prefix` + a random 128-bit token not yet used in the document.
    pub fn generate_unique_iri(&self, prefix: &str) -> Result<Iri> {
        self.first_unused(prefix, || Uuid::new_v4().to_string())
    }

    /// Mints a fresh identifier under the configured namespace.
    pub fn mint_iri(&self) -> Result<Iri> {
        self.generate_unique_iri(&self.namespace)
    }

    fn first_unused(&self, prefix: &str, mut token: impl FnMut() -> String) -> Result<Iri> {
        loop {
            let candidate = Iri::new(format!("{prefix}{}", token()))?;
            if !self.contains_in_signature(&candidate) && candidate != self.iri {
                debug!(iri = %candidate, "iri_minted");
                return Ok(candidate);
            }
            debug!(iri = %candidate, "iri_collision_retry");
        }
    }

    /// Adds an axiom together with the declarations of its signature.
    ///
    /// Returns `true` when at least one new triple was written.
    pub fn add_axiom(&mut self, axiom: Axiom) -> bool {
        let mut added = 0usize;
        for triple in axiom.to_triples(&self.iri) {
            if self.graph.insert(&triple) {
                added += 1;
            }
        }
        debug!(axiom = axiom.kind_name(), triples = added, "axiom_added");
        added > 0
    }

    /// Adds an `owl:imports` declaration to the ontology header.
    pub fn import_ontology(&mut self, iri: &Iri) {
        self.add_axiom(Axiom::Import(iri.clone()));
    }

    /// Counts of the declared entities, for reporting.
    #[must_use]
    pub fn summary(&self) -> OntologySummary {
        OntologySummary::from(self)
    }

    /// Borrows the store for class hierarchy edits.
    pub fn taxonomy(&mut self) -> TaxonomyBuilder<'_> {
        TaxonomyBuilder::new(self)
    }

    /// Borrows the store for individual creation.
    pub fn individuals_builder(&mut self) -> IndividualBuilder<'_> {
        IndividualBuilder::new(self)
    }

    /// Borrows the store for property and restriction edits.
    pub fn relations(&mut self) -> RelationBuilder<'_> {
        RelationBuilder::new(self)
    }

    /// Borrows the store for annotation edits.
    pub fn annotations(&mut self) -> AnnotationBuilder<'_> {
        AnnotationBuilder::new(self)
    }

    /// Read-only reasoning queries over the current state.
    #[must_use]
    pub fn query(&self) -> OntologyQuery<'_> {
        OntologyQuery::new(self)
    }

    fn insert_header(&mut self) {
        self.graph.insert(TripleRef::new(
            self.iri.as_named_node(),
            rdf::TYPE,
            owl::ONTOLOGY,
        ));
    }

    fn has_type(&self, node: NamedNodeRef<'_>, class_type: NamedNodeRef<'_>) -> bool {
        self.graph
            .contains(TripleRef::new(node, rdf::TYPE, class_type))
    }

    fn is_class_node(&self, node: NamedNodeRef<'_>) -> bool {
        node == owl::THING
            || self.has_type(node, owl::CLASS)
            || self.has_type(node, rdfs::CLASS)
            || self
                .graph
                .objects_for_subject_predicate(node, rdfs::SUB_CLASS_OF)
                .next()
                .is_some()
            || self
                .graph
                .subjects_for_predicate_object(rdfs::SUB_CLASS_OF, node)
                .next()
                .is_some()
            || (!vocab::is_builtin(node)
                && self
                    .graph
                    .subjects_for_predicate_object(rdf::TYPE, node)
                    .next()
                    .is_some())
    }

    fn is_individual_node(&self, node: NamedNodeRef<'_>) -> bool {
        if self.has_type(node, owl::NAMED_INDIVIDUAL) {
            return true;
        }
        self.graph
            .objects_for_subject_predicate(node, rdf::TYPE)
            .filter_map(named)
            .any(|class_type| self.is_class_node(class_type))
    }
}

/// Summary DTO describing the size of an ontology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OntologySummary {
    /// Identifier of the ontology.
    pub iri: Iri,
    /// Number of named classes.
    pub class_count: usize,
    /// Number of named individuals.
    pub individual_count: usize,
    /// Number of object property declarations.
    pub object_property_count: usize,
    /// Number of data property declarations.
    pub data_property_count: usize,
    /// Number of stored triples.
    pub triple_count: usize,
}

impl From<&OntologyStore> for OntologySummary {
    fn from(store: &OntologyStore) -> Self {
        let declared = |property_type: NamedNodeRef<'static>| {
            store
                .graph
                .subjects_for_predicate_object(rdf::TYPE, property_type)
                .count()
        };
        Self {
            iri: store.iri.clone(),
            class_count: store.classes().len(),
            individual_count: store.individuals().len(),
            object_property_count: declared(owl::OBJECT_PROPERTY),
            data_property_count: declared(owl::DATATYPE_PROPERTY),
            triple_count: store.graph.len(),
        }
    }
}

pub(crate) fn named<'a>(term: impl Into<TermRef<'a>>) -> Option<NamedNodeRef<'a>> {
    match term.into() {
        TermRef::NamedNode(node) => Some(node),
        _ => None,
    }
}

/// Maps a document path to its RDF syntax.
pub fn format_for(path: &Path) -> Result<RdfFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "owl" | "rdf" | "xml" => Ok(RdfFormat::RdfXml),
        "ttl" => Ok(RdfFormat::Turtle),
        "nt" => Ok(RdfFormat::NTriples),
        "nq" => Ok(RdfFormat::NQuads),
        _ => Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use oxrdfio::RdfFormat;

    use super::{format_for, OntologyStore};
    use crate::ontology::entities::{AnnotationProperty, Axiom, ClassExpression, Entity, EntityKind};
    use crate::ontology::value_objects::{literal, Iri};
    use crate::ontology::vocab::owl;
    use crate::Error;

    const NS: &str = "http://ex.org/";

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    #[test]
    fn create_mints_ontology_iri_under_namespace() {
        let store = OntologyStore::create(NS).expect("create");
        assert!(store.iri().is_in_namespace(NS));
        assert_ne!(store.iri().as_str(), NS);
        assert!(store.contains_in_signature(store.iri()));
    }

    #[test]
    fn create_rejects_invalid_namespace() {
        let err = OntologyStore::create("not a namespace").expect_err("invalid namespace");
        assert!(matches!(err, Error::InvalidIri(_)));
    }

    #[test]
    fn first_unused_skips_tokens_already_in_the_signature() {
        let mut store = OntologyStore::create(NS).expect("create");
        store.add_axiom(Axiom::SubClassOf {
            sub: iri("http://ex.org/taken"),
            sup: ClassExpression::Class(owl::THING.into()),
        });
        let mut tokens = vec!["fresh", "taken", "taken"];
        let minted = store
            .first_unused(NS, || tokens.pop().expect("token").to_owned())
            .expect("minted");
        assert_eq!(minted, iri("http://ex.org/fresh"));
    }

    #[test]
    fn generated_identifiers_are_pairwise_distinct() {
        let store = OntologyStore::create(NS).expect("create");
        let minted: std::collections::BTreeSet<_> = (0..256)
            .map(|_| store.mint_iri().expect("mint"))
            .collect();
        assert_eq!(minted.len(), 256);
    }

    #[test]
    fn kind_of_distinguishes_classes_and_individuals() {
        let mut store = OntologyStore::create(NS).expect("create");
        let class = iri("http://ex.org/Person");
        let individual = iri("http://ex.org/asha");
        store.add_axiom(Axiom::ClassAssertion {
            class: class.clone(),
            individual: individual.clone(),
        });
        assert_eq!(store.kind_of(&class), EntityKind::Class);
        assert_eq!(store.kind_of(&individual), EntityKind::Individual);
        assert_eq!(
            store.kind_of(&iri("http://ex.org/missing")),
            EntityKind::Unknown
        );
        assert!(store.is_class(&owl::THING.into()));
    }

    #[test]
    fn types_from_other_vocabularies_are_classes() {
        let doc = "\
<http://ex.org/asha> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://vocab.org/Doctor> .
<http://ex.org/prop> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#ObjectProperty> .
";
        let store =
            OntologyStore::read_from(doc.as_bytes(), RdfFormat::NTriples, NS).expect("load");
        let doctor = iri("http://vocab.org/Doctor");
        assert_eq!(store.kind_of(&doctor), EntityKind::Class);
        assert_eq!(store.kind_of(&iri("http://ex.org/asha")), EntityKind::Individual);
        assert_eq!(store.kind_of(&iri("http://ex.org/prop")), EntityKind::Unknown);
        assert!(store.classes().contains(&doctor));
        assert!(!store.classes().contains(&Iri::from(owl::OBJECT_PROPERTY)));
    }

    #[test]
    fn punned_identifiers_are_tagged_as_individuals() {
        let mut store = OntologyStore::create(NS).expect("create");
        let punned = iri("http://ex.org/Pune");
        store.add_axiom(Axiom::Declaration(Entity::Class(punned.clone())));
        store.add_axiom(Axiom::Declaration(Entity::NamedIndividual(punned.clone())));
        assert_eq!(store.kind_of(&punned), EntityKind::Individual);
        assert!(store.is_class(&punned));
        assert!(store.is_individual(&punned));
    }

    #[test]
    fn annotations_do_not_change_entity_kind() {
        let mut store = OntologyStore::create(NS).expect("create");
        let subject = iri("http://ex.org/loose");
        store.add_axiom(Axiom::AnnotationAssertion {
            property: AnnotationProperty::Label,
            subject: subject.clone(),
            value: literal("Loose"),
        });
        assert!(store.contains_in_signature(&subject));
        assert_eq!(store.kind_of(&subject), EntityKind::Unknown);
        assert_eq!(store.labels(&subject), vec!["Loose".to_owned()]);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(format_for(Path::new("a.owl")).ok(), Some(RdfFormat::RdfXml));
        assert_eq!(format_for(Path::new("a.TTL")).ok(), Some(RdfFormat::Turtle));
        assert_eq!(format_for(Path::new("a.nt")).ok(), Some(RdfFormat::NTriples));
        assert!(matches!(
            format_for(Path::new("a.docx")),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn turtle_round_trip_preserves_triples() {
        let mut store = OntologyStore::create(NS).expect("create");
        store.add_axiom(Axiom::SubClassOf {
            sub: iri("http://ex.org/Doctor"),
            sup: ClassExpression::ObjectSomeValuesFrom {
                property: iri("http://ex.org/treats"),
                filler: Box::new(ClassExpression::Class(iri("http://ex.org/Patient"))),
            },
        });
        let bytes = store
            .write_to(Vec::new(), RdfFormat::Turtle)
            .expect("serialize");
        let reloaded =
            OntologyStore::read_from(bytes.as_slice(), RdfFormat::Turtle, NS).expect("reload");
        assert_eq!(reloaded.iri(), store.iri());
        assert_eq!(reloaded.graph().len(), store.graph().len());
        assert!(reloaded.is_class(&iri("http://ex.org/Patient")));
    }

    #[test]
    fn malformed_documents_fail_to_load() {
        let err = OntologyStore::read_from(
            "this is not turtle".as_bytes(),
            RdfFormat::Turtle,
            NS,
        )
        .expect_err("malformed");
        assert!(matches!(err, Error::Load { .. }));
    }

    #[test]
    fn documents_without_header_get_one() {
        let doc = "<http://ex.org/A> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .\n";
        let store =
            OntologyStore::read_from(doc.as_bytes(), RdfFormat::NTriples, NS).expect("load");
        assert!(store.iri().is_in_namespace(NS));
        assert!(store.is_class(&iri("http://ex.org/A")));
    }
}
