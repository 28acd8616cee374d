use std::fmt::{self, Display, Formatter};

use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef, Term, Triple};

use super::value_objects::{Datatype, Iri};
use super::vocab::{owl, skos};

/// Kind of entity an identifier denotes inside the ontology signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The identifier is not a declared class or individual.
    Unknown,
    /// The identifier names a class.
    Class,
    /// The identifier names an individual.
    Individual,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Class => "class",
            Self::Individual => "individual",
        })
    }
}

/// A named entity that can be declared in the ontology.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Class(Iri),
    NamedIndividual(Iri),
    ObjectProperty(Iri),
    DataProperty(Iri),
    AnnotationProperty(Iri),
}

impl Entity {
    /// Returns the entity identifier.
    #[must_use]
    pub fn iri(&self) -> &Iri {
        match self {
            Self::Class(iri)
            | Self::NamedIndividual(iri)
            | Self::ObjectProperty(iri)
            | Self::DataProperty(iri)
            | Self::AnnotationProperty(iri) => iri,
        }
    }

    /// Returns the `rdf:type` object used to declare the entity.
    #[must_use]
    pub fn declaration_type(&self) -> NamedNodeRef<'static> {
        match self {
            Self::Class(_) => owl::CLASS,
            Self::NamedIndividual(_) => owl::NAMED_INDIVIDUAL,
            Self::ObjectProperty(_) => owl::OBJECT_PROPERTY,
            Self::DataProperty(_) => owl::DATATYPE_PROPERTY,
            Self::AnnotationProperty(_) => owl::ANNOTATION_PROPERTY,
        }
    }

    /// Built-in vocabulary terms are never declared.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        let iri = self.iri().as_named_node();
        match self {
            Self::Class(_) => iri == owl::THING || iri == owl::NOTHING,
            Self::AnnotationProperty(_) => iri == rdfs::LABEL || iri == rdfs::COMMENT,
            _ => false,
        }
    }

    fn declaration(&self) -> Triple {
        Triple::new(
            self.iri().as_named_node(),
            rdf::TYPE,
            self.declaration_type(),
        )
    }
}

/// Annotation properties recognised by the editor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationProperty {
    /// `rdfs:label`
    Label,
    /// `skos:definition`
    Definition,
    /// `skos:altLabel`
    AltLabel,
    /// A caller supplied annotation property.
    Custom(Iri),
}

impl AnnotationProperty {
    /// Returns the annotation property IRI.
    #[must_use]
    pub fn iri(&self) -> NamedNodeRef<'_> {
        match self {
            Self::Label => rdfs::LABEL,
            Self::Definition => skos::DEFINITION,
            Self::AltLabel => skos::ALT_LABEL,
            Self::Custom(iri) => iri.as_named_node(),
        }
    }
}

/// Class expressions that may appear on the right-hand side of an axiom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassExpression {
    /// A named class.
    Class(Iri),
    /// `property some filler`
    ObjectSomeValuesFrom {
        property: Iri,
        filler: Box<ClassExpression>,
    },
    /// `property value individual`
    ObjectHasValue { property: Iri, individual: Iri },
    /// `property value literal`
    DataHasValue { property: Iri, value: Literal },
    /// `C1 or C2 or ...`
    ObjectUnionOf(Vec<ClassExpression>),
}

impl ClassExpression {
    /// Builds a domain expression from one or more named classes.
    ///
    /// A single class stays a named class, several classes become their union.
    #[must_use]
    pub fn union_of(classes: &[Iri]) -> Self {
        match classes {
            [single] => Self::Class(single.clone()),
            many => Self::ObjectUnionOf(many.iter().cloned().map(Self::Class).collect()),
        }
    }

    fn collect_signature(&self, out: &mut Vec<Entity>) {
        match self {
            Self::Class(iri) => out.push(Entity::Class(iri.clone())),
            Self::ObjectSomeValuesFrom { property, filler } => {
                out.push(Entity::ObjectProperty(property.clone()));
                filler.collect_signature(out);
            }
            Self::ObjectHasValue {
                property,
                individual,
            } => {
                out.push(Entity::ObjectProperty(property.clone()));
                out.push(Entity::NamedIndividual(individual.clone()));
            }
            Self::DataHasValue { property, .. } => {
                out.push(Entity::DataProperty(property.clone()));
            }
            Self::ObjectUnionOf(members) => {
                for member in members {
                    member.collect_signature(out);
                }
            }
        }
    }

    /// Writes the RDF encoding of the expression and returns the node naming it.
    fn encode(&self, out: &mut Vec<Triple>) -> Term {
        match self {
            Self::Class(iri) => NamedNode::from(iri).into(),
            Self::ObjectSomeValuesFrom { property, filler } => {
                let filler = filler.encode(out);
                let node = restriction(property, out);
                out.push(Triple::new(node.clone(), owl::SOME_VALUES_FROM, filler));
                node.into()
            }
            Self::ObjectHasValue {
                property,
                individual,
            } => {
                let node = restriction(property, out);
                out.push(Triple::new(
                    node.clone(),
                    owl::HAS_VALUE,
                    individual.as_named_node(),
                ));
                node.into()
            }
            Self::DataHasValue { property, value } => {
                let node = restriction(property, out);
                out.push(Triple::new(node.clone(), owl::HAS_VALUE, value.clone()));
                node.into()
            }
            Self::ObjectUnionOf(members) => {
                let terms: Vec<Term> = members.iter().map(|member| member.encode(out)).collect();
                let list = rdf_list(terms, out);
                let node = BlankNode::default();
                out.push(Triple::new(node.clone(), rdf::TYPE, owl::CLASS));
                out.push(Triple::new(node.clone(), owl::UNION_OF, list));
                node.into()
            }
        }
    }
}

fn restriction(property: &Iri, out: &mut Vec<Triple>) -> BlankNode {
    let node = BlankNode::default();
    out.push(Triple::new(node.clone(), rdf::TYPE, owl::RESTRICTION));
    out.push(Triple::new(
        node.clone(),
        owl::ON_PROPERTY,
        property.as_named_node(),
    ));
    node
}

fn rdf_list(items: Vec<Term>, out: &mut Vec<Triple>) -> Term {
    let mut tail: Term = rdf::NIL.into();
    for item in items.into_iter().rev() {
        let cell = BlankNode::default();
        out.push(Triple::new(cell.clone(), rdf::FIRST, item));
        out.push(Triple::new(cell.clone(), rdf::REST, tail));
        tail = cell.into();
    }
    tail
}

/// A single logical fact or constraint added to the ontology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Axiom {
    Declaration(Entity),
    SubClassOf {
        sub: Iri,
        sup: ClassExpression,
    },
    ClassAssertion {
        class: Iri,
        individual: Iri,
    },
    ObjectPropertyAssertion {
        property: Iri,
        subject: Iri,
        object: Iri,
    },
    DataPropertyAssertion {
        property: Iri,
        subject: Iri,
        value: Literal,
    },
    ObjectPropertyDomain {
        property: Iri,
        domain: ClassExpression,
    },
    ObjectPropertyRange {
        property: Iri,
        range: ClassExpression,
    },
    DataPropertyDomain {
        property: Iri,
        domain: ClassExpression,
    },
    DataPropertyRange {
        property: Iri,
        range: Datatype,
    },
    AnnotationAssertion {
        property: AnnotationProperty,
        subject: Iri,
        value: Literal,
    },
    /// `owl:imports` on the ontology header.
    Import(Iri),
}

impl Axiom {
    /// Short axiom type name used in log events.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Declaration(_) => "Declaration",
            Self::SubClassOf { .. } => "SubClassOf",
            Self::ClassAssertion { .. } => "ClassAssertion",
            Self::ObjectPropertyAssertion { .. } => "ObjectPropertyAssertion",
            Self::DataPropertyAssertion { .. } => "DataPropertyAssertion",
            Self::ObjectPropertyDomain { .. } => "ObjectPropertyDomain",
            Self::ObjectPropertyRange { .. } => "ObjectPropertyRange",
            Self::DataPropertyDomain { .. } => "DataPropertyDomain",
            Self::DataPropertyRange { .. } => "DataPropertyRange",
            Self::AnnotationAssertion { .. } => "AnnotationAssertion",
            Self::Import(_) => "Import",
        }
    }

    /// Entities referenced by the axiom, built-ins excluded.
    ///
    /// Annotation subjects are plain IRIs and are not part of the signature.
    #[must_use]
    pub fn signature(&self) -> Vec<Entity> {
        let mut out = Vec::new();
        match self {
            Self::Declaration(entity) => out.push(entity.clone()),
            Self::SubClassOf { sub, sup } => {
                out.push(Entity::Class(sub.clone()));
                sup.collect_signature(&mut out);
            }
            Self::ClassAssertion { class, individual } => {
                out.push(Entity::Class(class.clone()));
                out.push(Entity::NamedIndividual(individual.clone()));
            }
            Self::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => {
                out.push(Entity::ObjectProperty(property.clone()));
                out.push(Entity::NamedIndividual(subject.clone()));
                out.push(Entity::NamedIndividual(object.clone()));
            }
            Self::DataPropertyAssertion {
                property, subject, ..
            } => {
                out.push(Entity::DataProperty(property.clone()));
                out.push(Entity::NamedIndividual(subject.clone()));
            }
            Self::ObjectPropertyDomain { property, domain } => {
                out.push(Entity::ObjectProperty(property.clone()));
                domain.collect_signature(&mut out);
            }
            Self::ObjectPropertyRange { property, range } => {
                out.push(Entity::ObjectProperty(property.clone()));
                range.collect_signature(&mut out);
            }
            Self::DataPropertyDomain { property, domain } => {
                out.push(Entity::DataProperty(property.clone()));
                domain.collect_signature(&mut out);
            }
            Self::DataPropertyRange { property, .. } => {
                out.push(Entity::DataProperty(property.clone()));
            }
            Self::AnnotationAssertion { property, .. } => {
                if let AnnotationProperty::Custom(iri) = property {
                    out.push(Entity::AnnotationProperty(iri.clone()));
                }
            }
            Self::Import(_) => {}
        }
        out.retain(|entity| !entity.is_builtin());
        out
    }

    /// Encodes the axiom, and the declarations of its signature, as RDF triples.
    #[must_use]
    pub fn to_triples(&self, ontology: &Iri) -> Vec<Triple> {
        let mut out: Vec<Triple> = self.signature().iter().map(Entity::declaration).collect();
        match self {
            Self::Declaration(_) => {}
            Self::SubClassOf { sub, sup } => {
                let sup = sup.encode(&mut out);
                out.push(Triple::new(sub.as_named_node(), rdfs::SUB_CLASS_OF, sup));
            }
            Self::ClassAssertion { class, individual } => out.push(Triple::new(
                individual.as_named_node(),
                rdf::TYPE,
                class.as_named_node(),
            )),
            Self::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => out.push(Triple::new(
                subject.as_named_node(),
                property.as_named_node(),
                object.as_named_node(),
            )),
            Self::DataPropertyAssertion {
                property,
                subject,
                value,
            } => out.push(Triple::new(
                subject.as_named_node(),
                property.as_named_node(),
                value.clone(),
            )),
            Self::ObjectPropertyDomain { property, domain }
            | Self::DataPropertyDomain { property, domain } => {
                let domain = domain.encode(&mut out);
                out.push(Triple::new(property.as_named_node(), rdfs::DOMAIN, domain));
            }
            Self::ObjectPropertyRange { property, range } => {
                let range = range.encode(&mut out);
                out.push(Triple::new(property.as_named_node(), rdfs::RANGE, range));
            }
            Self::DataPropertyRange { property, range } => out.push(Triple::new(
                property.as_named_node(),
                rdfs::RANGE,
                range.iri(),
            )),
            Self::AnnotationAssertion {
                property,
                subject,
                value,
            } => out.push(Triple::new(
                subject.as_named_node(),
                property.iri(),
                value.clone(),
            )),
            Self::Import(target) => out.push(Triple::new(
                ontology.as_named_node(),
                owl::IMPORTS,
                target.as_named_node(),
            )),
        }
        out
    }
}
