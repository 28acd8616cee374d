use tracing::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::entities::{AnnotationProperty, Axiom, Entity};
use super::store::OntologyStore;
use super::value_objects::{literal, Iri};
use crate::{Error, Result};

/// Attaches labels, SKOS definitions and alternative labels.
#[derive(Debug)]
pub struct AnnotationBuilder<'a> {
    store: &'a mut OntologyStore,
}

impl<'a> AnnotationBuilder<'a> {
    /// Borrows `store` for the duration of the edits.
    pub fn new(store: &'a mut OntologyStore) -> Self {
        Self { store }
    }

    /// Attaches an `rdfs:label` to any identifier of the signature.
    ///
    /// With `allow_accents == false` diacritics are stripped first, so
    /// `"Café"` is stored as `"Cafe"`.
    pub fn label_entity(&mut self, iri: &Iri, text: &str, allow_accents: bool) -> Result<()> {
        if !self.store.contains_in_signature(iri) {
            return Err(Error::NotFound {
                operation: "label_entity",
                iri: iri.clone(),
                expected: "entity",
            });
        }
        let text = if allow_accents {
            text.to_owned()
        } else {
            strip_accents(text)
        };
        self.annotate(AnnotationProperty::Label, iri, text);
        Ok(())
    }

    /// Adds an `rdfs:label` to a class.
    pub fn annotate_class(&mut self, class: &Iri, text: &str) -> Result<()> {
        self.annotate_known_class("annotate_class", AnnotationProperty::Label, class, text)
    }

    /// Adds a `skos:definition` to a class.
    pub fn add_skos_definition(&mut self, class: &Iri, text: &str) -> Result<()> {
        self.annotate_known_class("add_skos_definition", AnnotationProperty::Definition, class, text)
    }

    /// Adds a `skos:altLabel` to a class.
    pub fn add_skos_alt_label(&mut self, class: &Iri, text: &str) -> Result<()> {
        self.annotate_known_class("add_skos_alt_label", AnnotationProperty::AltLabel, class, text)
    }

    /// Declares a custom annotation property and labels it.
    pub fn add_annotation_property(&mut self, property: &Iri, label: &str) {
        self.store
            .add_axiom(Axiom::Declaration(Entity::AnnotationProperty(property.clone())));
        self.annotate(AnnotationProperty::Label, property, label.to_owned());
    }

    fn annotate_known_class(
        &mut self,
        operation: &'static str,
        property: AnnotationProperty,
        class: &Iri,
        text: &str,
    ) -> Result<()> {
        if !self.store.is_class(class) {
            return Err(Error::missing_class(operation, class));
        }
        self.annotate(property, class, text.to_owned());
        Ok(())
    }

    fn annotate(&mut self, property: AnnotationProperty, subject: &Iri, text: String) {
        debug!(subject = %subject, property = %property.iri(), value = %text, "annotation_added");
        self.store.add_axiom(Axiom::AnnotationAssertion {
            property,
            subject: subject.clone(),
            value: literal(text),
        });
    }
}

/// Removes combining marks after canonical decomposition.
#[must_use]
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use oxrdf::vocab::rdfs;
    use rstest::rstest;

    use super::strip_accents;
    use crate::ontology::store::OntologyStore;
    use crate::ontology::value_objects::Iri;
    use crate::ontology::vocab::skos;
    use crate::Error;

    #[rstest]
    #[case("Café", "Cafe")]
    #[case("Müller-Lüdenscheidt", "Muller-Ludenscheidt")]
    #[case("Āndhra Pradēsh", "Andhra Pradesh")]
    #[case("plain", "plain")]
    fn strips_diacritics(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_accents(input), expected);
    }

    #[rstest]
    #[case(false, "Cafe")]
    #[case(true, "Café")]
    fn label_entity_honours_accent_flag(#[case] allow_accents: bool, #[case] stored: &str) {
        let mut store = OntologyStore::create("http://ex.org/").expect("create");
        let class = store.taxonomy().add_root_class("Venue").expect("class");
        store
            .annotations()
            .label_entity(&class, "Café", allow_accents)
            .expect("label");
        assert!(store.labels(&class).contains(&stored.to_owned()));
        assert_eq!(store.annotation_values(&class, rdfs::LABEL).len(), 2);
    }

    #[test]
    fn skos_annotations_require_a_class() {
        let mut store = OntologyStore::create("http://ex.org/").expect("create");
        let asha = store.individuals_builder().add_individual("Asha").expect("individual");
        let err = store
            .annotations()
            .add_skos_definition(&asha, "A person")
            .expect_err("individuals are not classes");
        assert!(matches!(err, Error::NotFound { operation: "add_skos_definition", .. }));

        let class = store.taxonomy().add_root_class("Person").expect("class");
        store
            .annotations()
            .add_skos_alt_label(&class, "Human")
            .expect("alt label");
        assert_eq!(
            store.annotation_values(&class, skos::ALT_LABEL),
            vec!["Human".to_owned()]
        );
    }

    #[test]
    fn labels_need_a_known_identifier() {
        let mut store = OntologyStore::create("http://ex.org/").expect("create");
        let missing = Iri::new("http://ex.org/missing").expect("valid iri");
        assert!(store.annotations().label_entity(&missing, "x", true).is_err());
    }
}
