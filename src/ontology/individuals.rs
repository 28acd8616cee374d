use tracing::debug;

use super::entities::{AnnotationProperty, Axiom, Entity};
use super::store::OntologyStore;
use super::value_objects::{literal, Iri};
use crate::{Error, Result};

/// Mints named individuals.
#[derive(Debug)]
pub struct IndividualBuilder<'a> {
    store: &'a mut OntologyStore,
}

impl<'a> IndividualBuilder<'a> {
    /// Borrows `store` for the duration of the edits.
    pub fn new(store: &'a mut OntologyStore) -> Self {
        Self { store }
    }

    /// Mints an untyped, labelled individual.
    pub fn add_individual(&mut self, name: &str) -> Result<Iri> {
        let individual = self.store.mint_iri()?;
        self.declare(&individual, name);
        debug!(individual = %individual, name, "individual_added");
        Ok(individual)
    }

    /// Mints a labelled individual asserted as an instance of `class`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when `class` is not a known class.
    pub fn add_typed_individual(&mut self, class: &Iri, name: &str) -> Result<Iri> {
        if !self.store.is_class(class) {
            return Err(Error::missing_class("add_typed_individual", class));
        }
        let individual = self.store.mint_iri()?;
        self.store.add_axiom(Axiom::ClassAssertion {
            class: class.clone(),
            individual: individual.clone(),
        });
        self.declare(&individual, name);
        debug!(individual = %individual, class = %class, name, "individual_added");
        Ok(individual)
    }

    /// Untyped bulk variant, one identifier per name in input order; stops at
    /// the first failure.
    pub fn add_individuals<I, S>(&mut self, names: I) -> Result<Vec<Iri>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.add_individual(name.as_ref()))
            .collect()
    }

    /// Typed bulk variant; stops at the first failure.
    pub fn add_typed_individuals<I, S>(&mut self, class: &Iri, names: I) -> Result<Vec<Iri>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.add_typed_individual(class, name.as_ref()))
            .collect()
    }

    /// Declares an individual under a caller supplied identifier.
    pub fn add_individual_with_iri(&mut self, individual: &Iri, label: &str) {
        self.declare(individual, label);
        debug!(individual = %individual, label, "individual_declared");
    }

    fn declare(&mut self, individual: &Iri, label: &str) {
        self.store
            .add_axiom(Axiom::Declaration(Entity::NamedIndividual(individual.clone())));
        self.store.add_axiom(Axiom::AnnotationAssertion {
            property: AnnotationProperty::Label,
            subject: individual.clone(),
            value: literal(label),
        });
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::ontology::entities::EntityKind;
    use crate::ontology::store::OntologyStore;
    use crate::ontology::value_objects::Iri;
    use crate::Error;

    fn store() -> OntologyStore {
        OntologyStore::create("http://ex.org/").expect("create")
    }

    #[rstest]
    #[case::plain(false)]
    #[case::typed(true)]
    fn individuals_are_declared_and_labelled(#[case] typed: bool) {
        let mut store = store();
        let individual = if typed {
            let person = store.taxonomy().add_root_class("Person").expect("root");
            store
                .individuals_builder()
                .add_typed_individual(&person, "Asha")
                .expect("typed")
        } else {
            store
                .individuals_builder()
                .add_individual("Asha")
                .expect("plain")
        };
        assert_eq!(store.kind_of(&individual), EntityKind::Individual);
        assert_eq!(store.labels(&individual), vec!["Asha".to_owned()]);
    }

    #[test]
    fn typed_individual_requires_known_class() {
        let mut store = store();
        let missing = Iri::new("http://ex.org/Ghost").expect("valid iri");
        let before = store.graph().len();
        let err = store
            .individuals_builder()
            .add_typed_individuals(&missing, ["a", "b"])
            .expect_err("unknown class");
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(store.graph().len(), before);
    }

    #[test]
    fn caller_supplied_iri_is_kept() {
        let mut store = store();
        let place = Iri::new("http://sws.geonames.org/1259229/").expect("valid iri");
        store.individuals_builder().add_individual_with_iri(&place, "Pune");
        assert!(store.is_individual(&place));
        assert_eq!(store.labels(&place), vec!["Pune".to_owned()]);
    }
}
