use std::path::PathBuf;

use ontoedit::{
    ingest::read_entities,
    ontology::{literal, vocab::owl, Iri, OntologyStore},
    Error,
};
use oxrdf::{NamedNodeRef, TripleRef};
use rstest::rstest;
use uuid::Uuid;

const NS: &str = "http://ex.org/";

fn temp_path(extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ontoedit-{}.{extension}", Uuid::new_v4()))
}

struct Populated {
    store: OntologyStore,
    person: Iri,
    doctor: Iri,
    asha: Iri,
}

fn populated() -> Populated {
    let mut store = OntologyStore::create(NS).expect("create");
    let person = store.taxonomy().add_root_class("Person").expect("person");
    let doctor = store.taxonomy().add_sub_class(&person, "Doctor").expect("doctor");
    let patient = store.taxonomy().add_sub_class(&person, "Patient").expect("patient");
    let asha = store
        .individuals_builder()
        .add_typed_individual(&doctor, "Asha")
        .expect("asha");
    store
        .relations()
        .add_object_property_with_range("treats", &[doctor.clone(), person.clone()], &patient)
        .expect("treats");
    store
        .relations()
        .add_data_property("nickname", &asha, literal("Ash"))
        .expect("nickname");
    store
        .annotations()
        .add_skos_definition(&doctor, "Licensed physician")
        .expect("definition");
    store.import_ontology(&Iri::new("http://purl.org/dc/terms/").expect("valid iri"));
    Populated {
        store,
        person,
        doctor,
        asha,
    }
}

#[rstest]
#[case::rdf_xml("owl")]
#[case::turtle("ttl")]
#[case::n_triples("nt")]
#[case::n_quads("nq")]
fn save_then_open_preserves_axioms(#[case] extension: &str) {
    let Populated {
        store,
        person,
        doctor,
        asha,
    } = populated();
    let path = temp_path(extension);
    store.save(&path).expect("saved");

    let reopened = OntologyStore::open(&path, NS).expect("reopened");
    std::fs::remove_file(&path).expect("cleanup");

    assert_eq!(reopened.iri(), store.iri());
    assert_eq!(reopened.graph().len(), store.graph().len());
    assert_eq!(reopened.summary().class_count, store.summary().class_count);
    assert!(reopened.is_individual(&asha));
    assert!(reopened
        .query()
        .sub_classes(&person)
        .expect("subclasses")
        .contains(&doctor));
    assert_eq!(reopened.labels(&asha), vec!["Asha".to_owned()]);
    assert!(reopened.graph().contains(TripleRef::new(
        reopened.iri().as_named_node(),
        owl::IMPORTS,
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/"),
    )));
}

#[test]
fn reopened_documents_keep_minting_fresh_identifiers() {
    let Populated { store, person, .. } = populated();
    let path = temp_path("ttl");
    store.save(&path).expect("saved");

    let mut reopened = OntologyStore::open(&path, NS).expect("reopened");
    let nurse = reopened
        .taxonomy()
        .add_sub_class(&person, "Nurse")
        .expect("nurse");
    reopened.save(&path).expect("saved again");
    let again = OntologyStore::open(&path, NS).expect("reopened again");
    std::fs::remove_file(&path).expect("cleanup");

    assert!(!store.contains_in_signature(&nurse));
    assert!(again.is_class(&nurse));
}

#[test]
fn individuals_typed_with_imported_classes_are_recognised() {
    let path = temp_path("ttl");
    std::fs::write(
        &path,
        "@prefix vocab: <http://vocab.org/> .\n\
         <http://ex.org/asha> a vocab:Doctor .\n\
         <http://ex.org/ravi> a vocab:Doctor .\n",
    )
    .expect("write");
    let mut store = OntologyStore::open(&path, NS).expect("opened");
    std::fs::remove_file(&path).expect("cleanup");

    let doctor = Iri::new("http://vocab.org/Doctor").expect("valid iri");
    let asha = Iri::new("http://ex.org/asha").expect("valid iri");
    let ravi = Iri::new("http://ex.org/ravi").expect("valid iri");
    assert!(store.is_class(&doctor));
    assert!(store.is_individual(&asha));

    let knows = store
        .relations()
        .add_object_property("knows", &asha, &ravi)
        .expect("assertion between individuals");
    assert!(store.graph().contains(TripleRef::new(
        asha.as_named_node(),
        knows.as_named_node(),
        ravi.as_named_node(),
    )));
    let meera = store
        .individuals_builder()
        .add_typed_individual(&doctor, "Meera")
        .expect("typed by imported class");
    assert!(store.is_individual(&meera));
}

#[test]
fn missing_and_malformed_documents_fail_to_load() {
    let missing = temp_path("owl");
    assert!(matches!(
        OntologyStore::open(&missing, NS),
        Err(Error::Load { .. })
    ));

    let malformed = temp_path("owl");
    std::fs::write(&malformed, "<rdf:RDF broken").expect("write");
    let result = OntologyStore::open(&malformed, NS);
    std::fs::remove_file(&malformed).expect("cleanup");
    assert!(matches!(result, Err(Error::Load { .. })));
}

#[test]
fn unknown_extensions_are_rejected() {
    let store = OntologyStore::create(NS).expect("create");
    let err = store.save(temp_path("docx")).expect_err("unsupported");
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
}

#[test]
fn entity_lists_feed_bulk_builders() {
    let path = temp_path("txt");
    std::fs::write(&path, "Pune\n  Nashik  \n\nNagpur\n").expect("write");
    let names = read_entities(&path, "", "").expect("names");
    std::fs::remove_file(&path).expect("cleanup");

    let mut store = OntologyStore::create(NS).expect("create");
    let city = store.taxonomy().add_root_class("City").expect("city");
    let cities = store
        .individuals_builder()
        .add_typed_individuals(&city, &names)
        .expect("cities");
    assert_eq!(cities.len(), 3);
    assert_eq!(store.labels(&cities[1]), vec!["Nashik".to_owned()]);
}
