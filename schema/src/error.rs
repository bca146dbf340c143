use std::error::Error;
use std::fmt;

use super::FieldKind;

///
/// Problems with a record descriptor that only show up once it is used by the decoder.
///
/// These point at a mistake in the destination type rather than in the data being read.  Descriptors generated by `#[derive(EbmlRecord)]` are checked at compile time and should never produce them.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    InvalidDefault {
        field: &'static str,
        kind: FieldKind,
        literal: &'static str,
    },
    UnknownLink {
        field: &'static str,
        link: &'static str,
    },
    KindMismatch {
        field: &'static str,
        expected: FieldKind,
        found: FieldKind,
    },
    MissingField {
        index: usize,
        name: &'static str,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::InvalidDefault { field, kind, literal } => write!(f, "Default value {:?} for field '{}' cannot be parsed as {:?}", literal, field, kind),
            SchemaError::UnknownLink { field, link } => write!(f, "Field '{}' links its default to unknown field '{}'", field, link),
            SchemaError::KindMismatch { field, expected, found } => write!(f, "Field '{}' expects {:?} data but was given {:?}", field, expected, found),
            SchemaError::MissingField { index, name } => write!(f, "Record does not provide access to field '{}' (index {})", name, index),
        }
    }
}

impl Error for SchemaError {}
