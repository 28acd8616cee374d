//! Crate-wide error type.

use std::path::{Path, PathBuf};

use crate::{
    gazetteer::GazetteerError,
    ontology::{
        entities::EntityKind,
        value_objects::{Iri, IriError, UnknownDatatype},
    },
};

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by ontology editing, persistence and gazetteer imports.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced identifier is not declared with the required kind.
    #[error("{operation}: `{iri}` is not a known {expected}")]
    NotFound {
        operation: &'static str,
        iri: Iri,
        expected: &'static str,
    },
    /// A relation was requested between incompatible entity kinds.
    #[error(
        "{operation}: cannot relate {subject_kind} `{subject}` to {object_kind} `{object}`"
    )]
    SemanticMismatch {
        operation: &'static str,
        subject: Iri,
        subject_kind: EntityKind,
        object: Iri,
        object_kind: EntityKind,
    },
    /// A property definition was requested without any domain class.
    #[error("{operation}: at least one domain class is required")]
    EmptyDomain { operation: &'static str },
    /// The ontology document could not be read or parsed.
    #[error("failed to load ontology document `{path}`: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Reading or writing a file failed.
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A persisted lookup table could not be read or written.
    #[error("invalid lookup table `{path}`: {source}")]
    Lookup {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The file extension does not map to a known RDF syntax.
    #[error("unsupported ontology document format for `{path}`")]
    UnsupportedFormat { path: PathBuf },
    #[error(transparent)]
    InvalidIri(#[from] IriError),
    #[error(transparent)]
    UnknownDatatype(#[from] UnknownDatatype),
    /// Gazetteer lookups failed.
    #[error(transparent)]
    Network(#[from] GazetteerError),
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn missing_class(operation: &'static str, iri: &Iri) -> Self {
        Self::NotFound {
            operation,
            iri: iri.clone(),
            expected: "class",
        }
    }

    pub(crate) fn missing_individual(operation: &'static str, iri: &Iri) -> Self {
        Self::NotFound {
            operation,
            iri: iri.clone(),
            expected: "individual",
        }
    }

    pub(crate) fn missing_entity(operation: &'static str, iri: &Iri) -> Self {
        Self::NotFound {
            operation,
            iri: iri.clone(),
            expected: "class or individual",
        }
    }

    pub(crate) fn load(
        path: &Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Load {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
