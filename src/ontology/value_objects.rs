use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use oxrdf::vocab::xsd;
use oxrdf::{Literal, NamedNode, NamedNodeRef};
use thiserror::Error;

/// Value object ensuring that supplied text represents a valid IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri {
    value: String,
}

impl Iri {
    /// Validates and constructs a new [`Iri`] value object.
    ///
    /// The constructor rejects malformed identifiers so that every axiom
    /// written to the store references a well-formed named node.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        NamedNode::new(value.as_str()).map_err(|_| IriError::Invalid {
            value: value.clone(),
        })?;
        Ok(Self { value })
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Borrows the identifier as an RDF named node.
    #[must_use]
    pub fn as_named_node(&self) -> NamedNodeRef<'_> {
        NamedNodeRef::new_unchecked(&self.value)
    }

    /// Returns `true` when the identifier starts with the supplied namespace.
    #[must_use]
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        self.value.starts_with(namespace)
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for Iri {
    type Error = IriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NamedNode> for Iri {
    fn from(node: NamedNode) -> Self {
        Self {
            value: node.into_string(),
        }
    }
}

impl From<NamedNodeRef<'_>> for Iri {
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self {
            value: node.as_str().to_owned(),
        }
    }
}

impl From<&Iri> for NamedNode {
    fn from(iri: &Iri) -> Self {
        NamedNode::new_unchecked(iri.value.clone())
    }
}

/// Errors produced when validating an [`Iri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text could not be parsed as an IRI.
    #[error("invalid IRI: {value}")]
    Invalid { value: String },
}

/// Primitive datatypes accepted as data property ranges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Datatype {
    /// `xsd:date`
    Date,
    /// `xsd:string`
    String,
}

impl Datatype {
    /// Returns the XML Schema IRI of the datatype.
    #[must_use]
    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::Date => xsd::DATE,
            Self::String => xsd::STRING,
        }
    }
}

impl FromStr for Datatype {
    type Err = UnknownDatatype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("date") {
            Ok(Self::Date)
        } else if s.eq_ignore_ascii_case("string") {
            Ok(Self::String)
        } else {
            Err(UnknownDatatype(s.to_owned()))
        }
    }
}

/// Raised when a datatype name is outside the supported set.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unsupported datatype `{0}`, expected `date` or `string`")]
pub struct UnknownDatatype(pub String);

/// Resolves a datatype by name (`"date"` or `"string"`, any case).
pub fn datatype(name: &str) -> Result<Datatype, UnknownDatatype> {
    name.parse()
}

/// Builds a plain string literal.
#[must_use]
pub fn literal(value: impl Into<String>) -> Literal {
    Literal::new_simple_literal(value)
}
