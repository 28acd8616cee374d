//! Programmatic OWL ontology authoring.
//!
//! ```no_run
//! use ontoedit::ontology::OntologyStore;
//!
//! # fn main() -> ontoedit::Result<()> {
//! let mut store = OntologyStore::create("http://ex.org/")?;
//! let person = store.taxonomy().add_root_class("Person")?;
//! let doctor = store.taxonomy().add_sub_class(&person, "Doctor")?;
//! let asha = store.individuals_builder().add_typed_individual(&doctor, "Asha")?;
//! store.annotations().label_entity(&asha, "Āsha", false)?;
//! store.save("people.owl")?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod gazetteer;
pub mod ingest;
pub mod logger;
pub mod ontology;

pub use error::{Error, Result};
