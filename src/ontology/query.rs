use std::collections::BTreeSet;

use tracing::debug;

use super::reasoner::{ReasoningOracle, StructuralReasoner};
use super::store::OntologyStore;
use super::value_objects::Iri;
use crate::{Error, Result};

/// Read-only hierarchy and label queries.
///
/// Each call builds a fresh [`StructuralReasoner`], so results always reflect
/// the current state of the store.
#[derive(Clone, Copy, Debug)]
pub struct OntologyQuery<'a> {
    store: &'a OntologyStore,
}

impl<'a> OntologyQuery<'a> {
    /// Queries over the current state of `store`.
    #[must_use]
    pub fn new(store: &'a OntologyStore) -> Self {
        Self { store }
    }

    /// All transitive subclasses of `parent`, `owl:Nothing` excluded.
    pub fn sub_classes(&self, parent: &Iri) -> Result<BTreeSet<Iri>> {
        if !self.store.is_class(parent) {
            return Err(Error::missing_class("sub_classes", parent));
        }
        let found = self.oracle().sub_classes(parent);
        debug!(class = %parent, count = found.len(), "sub_classes_resolved");
        Ok(found)
    }

    /// Direct superclasses of `class`, `owl:Nothing` excluded.
    pub fn super_classes(&self, class: &Iri) -> Result<Vec<Iri>> {
        if !self.store.is_class(class) {
            return Err(Error::missing_class("super_classes", class));
        }
        Ok(self.oracle().super_classes(class))
    }

    /// Classes carrying an `rdfs:label` that contains `needle`, ignoring case.
    #[must_use]
    pub fn classes_by_label(&self, needle: &str) -> Vec<Iri> {
        let needle = needle.to_lowercase();
        self.store
            .classes()
            .into_iter()
            .filter(|class| {
                self.store
                    .labels(class)
                    .iter()
                    .any(|label| label.to_lowercase().contains(&needle))
            })
            .collect()
    }

    fn oracle(&self) -> impl ReasoningOracle {
        StructuralReasoner::new(self.store)
    }
}
