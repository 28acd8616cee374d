use oxrdf::Literal;
use tracing::{debug, info};

use super::entities::{AnnotationProperty, Axiom, ClassExpression, EntityKind};
use super::store::OntologyStore;
use super::value_objects::{literal, Datatype, Iri};
use crate::{Error, Result};

/// Creates object and data properties between existing entities.
///
/// Endpoints are classified before anything is written, so a rejected call
/// leaves the store untouched.
#[derive(Debug)]
pub struct RelationBuilder<'a> {
    store: &'a mut OntologyStore,
}

impl<'a> RelationBuilder<'a> {
    /// Borrows `store` for the duration of the edits.
    pub fn new(store: &'a mut OntologyStore) -> Self {
        Self { store }
    }

    /// Mints an object property named `name` and relates `subject` to `object`.
    ///
    /// * two individuals: a single `subject property object` assertion;
    /// * two classes: domain `subject`, range `object` and
    ///   `subject ⊑ property some object`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when an endpoint is not a class or individual,
    /// [`Error::SemanticMismatch`] when one endpoint is a class and the other
    /// an individual.
    pub fn add_object_property(&mut self, name: &str, subject: &Iri, object: &Iri) -> Result<Iri> {
        const OPERATION: &str = "add_object_property";

        let subject_kind = self.store.kind_of(subject);
        let object_kind = self.store.kind_of(object);
        match (subject_kind, object_kind) {
            (EntityKind::Unknown, _) => Err(Error::missing_entity(OPERATION, subject)),
            (_, EntityKind::Unknown) => Err(Error::missing_entity(OPERATION, object)),
            (EntityKind::Individual, EntityKind::Individual) => {
                let property = self.mint_property(name)?;
                self.assert_object_property_assertion(subject, object, &property)?;
                info!(property = %property, subject = %subject, object = %object, "object_property_asserted");
                Ok(property)
            }
            (EntityKind::Class, EntityKind::Class) => {
                let property = self.mint_property(name)?;
                self.define_schema_property(&property, std::slice::from_ref(subject), object)?;
                Ok(property)
            }
            (subject_kind, object_kind) => Err(Error::SemanticMismatch {
                operation: OPERATION,
                subject: subject.clone(),
                subject_kind,
                object: object.clone(),
                object_kind,
            }),
        }
    }

    /// Mints an object property with domain `domains` (their union when
    /// several) and range `range`, plus one existential restriction per
    /// domain class.
    pub fn add_object_property_with_range(
        &mut self,
        name: &str,
        domains: &[Iri],
        range: &Iri,
    ) -> Result<Iri> {
        const OPERATION: &str = "add_object_property_with_range";

        self.require_classes(OPERATION, domains)?;
        if !self.store.is_class(range) {
            return Err(Error::missing_class(OPERATION, range));
        }
        let property = self.mint_property(name)?;
        self.define_schema_property(&property, domains, range)?;
        Ok(property)
    }

    /// Mints a data property and attaches `value` to `subject`.
    ///
    /// Individuals receive a property assertion; classes a has-value
    /// restriction applying to all of their instances.
    pub fn add_data_property(&mut self, name: &str, subject: &Iri, value: Literal) -> Result<Iri> {
        let kind = self.store.kind_of(subject);
        if kind == EntityKind::Unknown {
            return Err(Error::missing_entity("add_data_property", subject));
        }
        let property = self.mint_property(name)?;
        if kind == EntityKind::Individual {
            self.store.add_axiom(Axiom::DataPropertyAssertion {
                property: property.clone(),
                subject: subject.clone(),
                value,
            });
        } else {
            self.assert_data_property_value(subject, value, &property)?;
        }
        info!(property = %property, subject = %subject, kind = %kind, "data_property_added");
        Ok(property)
    }

    /// Mints a data property with a class (or union) domain and a datatype
    /// range. No instance-level fact is asserted.
    pub fn add_data_property_with_range(
        &mut self,
        name: &str,
        domains: &[Iri],
        range: Datatype,
    ) -> Result<Iri> {
        self.require_classes("add_data_property_with_range", domains)?;
        let property = self.mint_property(name)?;
        self.store.add_axiom(Axiom::DataPropertyDomain {
            property: property.clone(),
            domain: ClassExpression::union_of(domains),
        });
        self.store.add_axiom(Axiom::DataPropertyRange {
            property: property.clone(),
            range,
        });
        info!(property = %property, domains = domains.len(), range = ?range, "data_property_defined");
        Ok(property)
    }

    /// `subject ⊑ property some object`, both endpoints classes.
    pub fn assert_some_values_from(&mut self, subject: &Iri, object: &Iri, property: &Iri) -> Result<()> {
        const OPERATION: &str = "assert_some_values_from";
        self.require_classes(OPERATION, &[subject.clone(), object.clone()])?;
        self.store.add_axiom(Axiom::SubClassOf {
            sub: subject.clone(),
            sup: ClassExpression::ObjectSomeValuesFrom {
                property: property.clone(),
                filler: Box::new(ClassExpression::Class(object.clone())),
            },
        });
        Ok(())
    }

    /// `class ⊑ property value individual`.
    pub fn assert_has_value(&mut self, class: &Iri, individual: &Iri, property: &Iri) -> Result<()> {
        const OPERATION: &str = "assert_has_value";
        if !self.store.is_class(class) {
            return Err(Error::missing_class(OPERATION, class));
        }
        if !self.store.is_individual(individual) {
            return Err(Error::missing_individual(OPERATION, individual));
        }
        self.store.add_axiom(Axiom::SubClassOf {
            sub: class.clone(),
            sup: ClassExpression::ObjectHasValue {
                property: property.clone(),
                individual: individual.clone(),
            },
        });
        Ok(())
    }

    /// `subject property object` between two individuals.
    pub fn assert_object_property_assertion(
        &mut self,
        subject: &Iri,
        object: &Iri,
        property: &Iri,
    ) -> Result<()> {
        const OPERATION: &str = "assert_object_property_assertion";
        for endpoint in [subject, object] {
            if !self.store.is_individual(endpoint) {
                return Err(Error::missing_individual(OPERATION, endpoint));
            }
        }
        self.store.add_axiom(Axiom::ObjectPropertyAssertion {
            property: property.clone(),
            subject: subject.clone(),
            object: object.clone(),
        });
        Ok(())
    }

    /// `class ⊑ property value literal`.
    pub fn assert_data_property_value(&mut self, class: &Iri, value: Literal, property: &Iri) -> Result<()> {
        if !self.store.is_class(class) {
            return Err(Error::missing_class("assert_data_property_value", class));
        }
        self.store.add_axiom(Axiom::SubClassOf {
            sub: class.clone(),
            sup: ClassExpression::DataHasValue {
                property: property.clone(),
                value,
            },
        });
        Ok(())
    }

    fn mint_property(&mut self, name: &str) -> Result<Iri> {
        let property = self.store.mint_iri()?;
        self.store.add_axiom(Axiom::AnnotationAssertion {
            property: AnnotationProperty::Label,
            subject: property.clone(),
            value: literal(name),
        });
        debug!(property = %property, name, "property_minted");
        Ok(property)
    }

    fn require_classes(&self, operation: &'static str, classes: &[Iri]) -> Result<()> {
        if classes.is_empty() {
            return Err(Error::EmptyDomain { operation });
        }
        match classes.iter().find(|class| !self.store.is_class(class)) {
            Some(missing) => Err(Error::missing_class(operation, missing)),
            None => Ok(()),
        }
    }

    fn define_schema_property(&mut self, property: &Iri, domains: &[Iri], range: &Iri) -> Result<()> {
        self.store.add_axiom(Axiom::ObjectPropertyDomain {
            property: property.clone(),
            domain: ClassExpression::union_of(domains),
        });
        self.store.add_axiom(Axiom::ObjectPropertyRange {
            property: property.clone(),
            range: ClassExpression::Class(range.clone()),
        });
        for domain in domains {
            self.assert_some_values_from(domain, range, property)?;
        }
        info!(property = %property, domains = domains.len(), range = %range, "object_property_defined");
        Ok(())
    }
}
