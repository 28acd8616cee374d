use tracing::debug;

use super::entities::{AnnotationProperty, Axiom, ClassExpression, EntityKind};
use super::store::OntologyStore;
use super::value_objects::{literal, Iri};
use super::vocab::owl;
use crate::{Error, Result};

/// Adds classes and subclass edges.
#[derive(Debug)]
pub struct TaxonomyBuilder<'a> {
    store: &'a mut OntologyStore,
}

impl<'a> TaxonomyBuilder<'a> {
    /// Borrows `store` for the duration of the edits.
    pub fn new(store: &'a mut OntologyStore) -> Self {
        Self { store }
    }

    /// Adds a labelled class directly under `owl:Thing`.
    pub fn add_root_class(&mut self, name: &str) -> Result<Iri> {
        self.add_sub_class(&owl::THING.into(), name)
    }

    /// Mints a class under `parent` and labels it with `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when `parent` is not a known class.
    pub fn add_sub_class(&mut self, parent: &Iri, name: &str) -> Result<Iri> {
        if !self.store.is_class(parent) {
            return Err(Error::missing_class("add_sub_class", parent));
        }
        let class = self.store.mint_iri()?;
        self.store.add_axiom(Axiom::SubClassOf {
            sub: class.clone(),
            sup: ClassExpression::Class(parent.clone()),
        });
        self.store.add_axiom(Axiom::AnnotationAssertion {
            property: AnnotationProperty::Label,
            subject: class.clone(),
            value: literal(name),
        });
        debug!(class = %class, parent = %parent, name, "class_added");
        Ok(class)
    }

    /// Adds one subclass per name, in input order.
    ///
    /// Stops at the first failure; classes added before it are kept.
    pub fn add_sub_classes<I, S>(&mut self, parent: &Iri, names: I) -> Result<Vec<Iri>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.add_sub_class(parent, name.as_ref()))
            .collect()
    }

    /// Types an existing entity: individuals get a class assertion, classes a
    /// subclass edge.
    pub fn set_type(&mut self, entity: &Iri, class: &Iri) -> Result<()> {
        if !self.store.is_class(class) {
            return Err(Error::missing_class("set_type", class));
        }
        let axiom = match self.store.kind_of(entity) {
            EntityKind::Individual => Axiom::ClassAssertion {
                class: class.clone(),
                individual: entity.clone(),
            },
            EntityKind::Class => Axiom::SubClassOf {
                sub: entity.clone(),
                sup: ClassExpression::Class(class.clone()),
            },
            EntityKind::Unknown => return Err(Error::missing_entity("set_type", entity)),
        };
        self.store.add_axiom(axiom);
        Ok(())
    }
}
