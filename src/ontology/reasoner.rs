use std::collections::{BTreeMap, BTreeSet, VecDeque};

use oxrdf::vocab::rdfs;
use oxrdf::NamedNodeRef;

use super::store::{named, OntologyStore};
use super::value_objects::Iri;
use super::vocab::owl;

/// Abstraction describing the class hierarchy queries the editor relies on.
pub trait ReasoningOracle {
    /// Returns every transitive subclass of `class`, excluding `owl:Nothing`
    /// and the classes equivalent to `class`.
    fn sub_classes(&self, class: &Iri) -> BTreeSet<Iri>;

    /// Returns the direct superclasses of `class`, excluding `owl:Nothing`.
    /// Top-level classes report `owl:Thing`.
    fn super_classes(&self, class: &Iri) -> Vec<Iri>;
}

/// Computes hierarchy closures from asserted `rdfs:subClassOf` and
/// `owl:equivalentClass` triples between named classes.
///
/// The reasoner is a snapshot: build a new one after mutating the store.
#[derive(Clone, Debug, Default)]
pub struct StructuralReasoner {
    classes: BTreeSet<Iri>,
    parents: BTreeMap<Iri, BTreeSet<Iri>>,
    children: BTreeMap<Iri, BTreeSet<Iri>>,
    equivalents: BTreeMap<Iri, BTreeSet<Iri>>,
}

impl StructuralReasoner {
    /// Snapshots the class hierarchy of `store`.
    #[must_use]
    pub fn new(store: &OntologyStore) -> Self {
        let graph = store.graph();
        let mut reasoner = Self {
            classes: store.classes(),
            ..Self::default()
        };

        for triple in graph.triples_for_predicate(rdfs::SUB_CLASS_OF) {
            if let (Some(sub), Some(sup)) = (named(triple.subject), named(triple.object)) {
                reasoner.link(sub, sup);
            }
        }
        for triple in graph.triples_for_predicate(owl::EQUIVALENT_CLASS) {
            if let (Some(left), Some(right)) = (named(triple.subject), named(triple.object)) {
                if left == right {
                    continue;
                }
                reasoner.link(left, right);
                reasoner.link(right, left);
                for (a, b) in [(left, right), (right, left)] {
                    reasoner
                        .equivalents
                        .entry(Iri::from(a))
                        .or_default()
                        .insert(Iri::from(b));
                }
            }
        }
        reasoner.merge_cycles();
        reasoner
    }

    /// Classes on a `rdfs:subClassOf` cycle are equivalent to each other.
    fn merge_cycles(&mut self) {
        let ancestors: BTreeMap<Iri, BTreeSet<Iri>> = self
            .parents
            .keys()
            .map(|class| (class.clone(), self.ancestors(class)))
            .collect();
        for (class, above) in &ancestors {
            for other in above {
                let closes_cycle = ancestors
                    .get(other)
                    .is_some_and(|back| back.contains(class));
                if other != class && closes_cycle {
                    self.equivalents
                        .entry(class.clone())
                        .or_default()
                        .insert(other.clone());
                }
            }
        }
    }

    fn ancestors(&self, class: &Iri) -> BTreeSet<Iri> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([class.clone()]);
        while let Some(current) = queue.pop_front() {
            for parent in self.parents.get(&current).into_iter().flatten() {
                if seen.insert(parent.clone()) {
                    queue.push_back(parent.clone());
                }
            }
        }
        seen
    }

    fn link(&mut self, sub: NamedNodeRef<'_>, sup: NamedNodeRef<'_>) {
        if sub == sup {
            return;
        }
        let (sub, sup) = (Iri::from(sub), Iri::from(sup));
        self.children
            .entry(sup.clone())
            .or_default()
            .insert(sub.clone());
        self.parents.entry(sub).or_default().insert(sup);
    }

    fn equivalence_class(&self, class: &Iri) -> BTreeSet<Iri> {
        let mut seen = BTreeSet::from([class.clone()]);
        let mut queue = VecDeque::from([class.clone()]);
        while let Some(current) = queue.pop_front() {
            for other in self.equivalents.get(&current).into_iter().flatten() {
                if seen.insert(other.clone()) {
                    queue.push_back(other.clone());
                }
            }
        }
        seen
    }
}

impl ReasoningOracle for StructuralReasoner {
    fn sub_classes(&self, class: &Iri) -> BTreeSet<Iri> {
        let same = self.equivalence_class(class);
        let nothing = Iri::from(owl::NOTHING);

        if class.as_named_node() == owl::THING {
            return self
                .classes
                .iter()
                .filter(|candidate| !same.contains(*candidate) && **candidate != nothing)
                .cloned()
                .collect();
        }

        let mut found = BTreeSet::new();
        let mut queue: VecDeque<Iri> = same.iter().cloned().collect();
        while let Some(current) = queue.pop_front() {
            for child in self.children.get(&current).into_iter().flatten() {
                if found.insert(child.clone()) {
                    queue.push_back(child.clone());
                }
            }
        }
        found.retain(|candidate| !same.contains(candidate) && *candidate != nothing);
        found
    }

    fn super_classes(&self, class: &Iri) -> Vec<Iri> {
        if class.as_named_node() == owl::THING {
            return Vec::new();
        }
        let same = self.equivalence_class(class);
        let thing = Iri::from(owl::THING);
        let mut direct: BTreeSet<Iri> = same
            .iter()
            .filter_map(|member| self.parents.get(member))
            .flatten()
            .filter(|parent| !same.contains(*parent) && parent.as_named_node() != owl::NOTHING)
            .cloned()
            .collect();
        if direct.len() > 1 {
            direct.remove(&thing);
        }
        if direct.is_empty() {
            vec![thing]
        } else {
            direct.into_iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rstest::rstest;

    use super::{ReasoningOracle, StructuralReasoner};
    use crate::ontology::entities::{Axiom, ClassExpression};
    use crate::ontology::store::OntologyStore;
    use crate::ontology::value_objects::Iri;
    use crate::ontology::vocab::owl;

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    fn subclass(store: &mut OntologyStore, sub: &str, sup: &str) {
        store.add_axiom(Axiom::SubClassOf {
            sub: iri(sub),
            sup: ClassExpression::Class(iri(sup)),
        });
    }

    fn hierarchy() -> OntologyStore {
        let mut store = OntologyStore::create("http://ex.org/").expect("create");
        subclass(&mut store, "http://ex.org/Doctor", "http://ex.org/Person");
        subclass(&mut store, "http://ex.org/Surgeon", "http://ex.org/Doctor");
        subclass(&mut store, "http://www.w3.org/2002/07/owl#Nothing", "http://ex.org/Surgeon");
        store
    }

    #[test]
    fn sub_classes_are_transitive_and_exclude_nothing() {
        let reasoner = StructuralReasoner::new(&hierarchy());
        assert_eq!(
            reasoner.sub_classes(&iri("http://ex.org/Person")),
            BTreeSet::from([iri("http://ex.org/Doctor"), iri("http://ex.org/Surgeon")])
        );
    }

    #[test]
    fn super_classes_are_direct_only() {
        let reasoner = StructuralReasoner::new(&hierarchy());
        assert_eq!(
            reasoner.super_classes(&iri("http://ex.org/Surgeon")),
            vec![iri("http://ex.org/Doctor")]
        );
        assert_eq!(
            reasoner.super_classes(&iri("http://ex.org/Person")),
            vec![Iri::from(owl::THING)]
        );
    }

    #[test]
    fn thing_subsumes_every_class() {
        let reasoner = StructuralReasoner::new(&hierarchy());
        let all = reasoner.sub_classes(&owl::THING.into());
        assert!(all.contains(&iri("http://ex.org/Person")));
        assert!(all.contains(&iri("http://ex.org/Surgeon")));
        assert!(!all.contains(&Iri::from(owl::NOTHING)));
        assert!(reasoner.super_classes(&owl::THING.into()).is_empty());
    }

    #[test]
    fn equivalent_classes_share_their_subclasses() {
        let doc = "\
<http://ex.org/Doctor> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://ex.org/Person> .
<http://ex.org/Nurse> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://ex.org/Human> .
<http://ex.org/Human> <http://www.w3.org/2002/07/owl#equivalentClass> <http://ex.org/Person> .
";
        let store = OntologyStore::read_from(
            doc.as_bytes(),
            oxrdfio::RdfFormat::NTriples,
            "http://ex.org/",
        )
        .expect("load");

        let reasoner = StructuralReasoner::new(&store);
        let below_person = reasoner.sub_classes(&iri("http://ex.org/Person"));
        assert_eq!(
            below_person,
            BTreeSet::from([iri("http://ex.org/Doctor"), iri("http://ex.org/Nurse")])
        );
    }
    #[rstest]
    #[case::subclass_cycle(
        "<http://ex.org/A> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://ex.org/B> .\n\
         <http://ex.org/B> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://ex.org/A> .\n"
    )]
    #[case::equivalence(
        "<http://ex.org/A> <http://www.w3.org/2002/07/owl#equivalentClass> <http://ex.org/B> .\n\
         <http://ex.org/A> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .\n"
    )]
    fn cycles_collapse_like_equivalences(#[case] doc: &str) {
        let store = OntologyStore::read_from(
            doc.as_bytes(),
            oxrdfio::RdfFormat::NTriples,
            "http://ex.org/",
        )
        .expect("load");

        let reasoner = StructuralReasoner::new(&store);
        let a = iri("http://ex.org/A");
        assert!(reasoner.sub_classes(&a).is_empty());
        assert_eq!(reasoner.super_classes(&a), vec![Iri::from(owl::THING)]);
    }

    #[test]
    fn longer_cycles_keep_outside_parents() {
        let mut store = hierarchy();
        subclass(&mut store, "http://ex.org/Person", "http://ex.org/Surgeon");
        subclass(&mut store, "http://ex.org/Person", "http://ex.org/Agent");

        let reasoner = StructuralReasoner::new(&store);
        assert_eq!(
            reasoner.super_classes(&iri("http://ex.org/Doctor")),
            vec![iri("http://ex.org/Agent")]
        );
        assert!(reasoner.sub_classes(&iri("http://ex.org/Doctor")).is_empty());
    }
}
