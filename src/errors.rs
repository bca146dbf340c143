use std::fmt;
use std::error::Error;

pub mod tool {
    use super::fmt;
    use super::Error;
    use std::io;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ToolError {
        ReadVintOverflow,
        ReadU64Overflow(Vec<u8>),
        ReadI64Overflow(Vec<u8>),
        ReadF64Mismatch(Vec<u8>),
    }

    impl fmt::Display for ToolError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ToolError::ReadVintOverflow => write!(f, "Unrepresentable Vint size encountered."),
                ToolError::ReadU64Overflow(arr) => write!(f, "Could not read unsigned int from array: {:?}", arr),
                ToolError::ReadI64Overflow(arr) => write!(f, "Could not read int from array: {:?}", arr),
                ToolError::ReadF64Mismatch(arr) => write!(f, "Could not read float from array: {:?}", arr),
            }
        }
    }

    impl Error for ToolError {}

    ///
    /// Errors produced while reading a vint from a stream.
    ///
    #[derive(Debug)]
    pub enum VintError {
        Tool(ToolError),
        Truncated {
            length: usize,
            read: usize,
        },
        Io {
            source: io::Error,
        },
    }

    impl fmt::Display for VintError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                VintError::Tool(problem) => write!(f, "{}", problem),
                VintError::Truncated { length, read } => write!(f, "Source ended inside a {} byte vint after {} bytes.", length, read),
                VintError::Io { source: _ } => write!(f, "Error reading vint from source."),
            }
        }
    }

    impl Error for VintError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            match self {
                VintError::Tool(problem) => Some(problem),
                VintError::Truncated { length: _, read: _ } => None,
                VintError::Io { source } => Some(source),
            }
        }
    }

    impl From<ToolError> for VintError {
        fn from(problem: ToolError) -> Self {
            VintError::Tool(problem)
        }
    }
}

pub mod element {
    use super::fmt;
    use super::Error;
    use super::tool::{ToolError, VintError};
    use std::io;

    #[derive(Debug)]
    pub enum ElementError {
        CorruptedHeader {
            parent_id: u64,
            problem: VintError,
        },
        ShortRead {
            id: u64,
            expected: u64,
            actual: u64,
        },
        OversizedScalar {
            id: u64,
            size: u64,
        },
        DataMismatch {
            id: u64,
            problem: ToolError,
        },
        ReadError {
            source: io::Error,
        },
    }

    impl fmt::Display for ElementError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ElementError::CorruptedHeader { parent_id, problem } => write!(f, "Encountered corrupted element header inside element {:#x}. {}", parent_id, problem),
                ElementError::ShortRead { id, expected, actual } => write!(f, "Element {:#x} declared {} bytes but only {} could be read.", id, expected, actual),
                ElementError::OversizedScalar { id, size } => write!(f, "Element {:#x} is {} bytes long, too long for a scalar value.", id, size),
                ElementError::DataMismatch { id, problem } => write!(f, "Data in element {:#x} does not match the expected type. {}", id, problem),
                ElementError::ReadError { source: _ } => write!(f, "Error reading from source."),
            }
        }
    }

    impl Error for ElementError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            match self {
                ElementError::CorruptedHeader { parent_id: _, problem } => Some(problem),
                ElementError::ShortRead { id: _, expected: _, actual: _ } => None,
                ElementError::OversizedScalar { id: _, size: _ } => None,
                ElementError::DataMismatch { id: _, problem } => Some(problem),
                ElementError::ReadError { source } => Some(source),
            }
        }
    }

    impl From<io::Error> for ElementError {
        fn from(source: io::Error) -> Self {
            ElementError::ReadError { source }
        }
    }
}

pub mod decoder {
    use super::fmt;
    use super::Error;
    use super::element::ElementError;
    use ebml_record_schema::SchemaError;

    #[derive(Debug)]
    pub enum DecodeError {
        Element(ElementError),
        Schema(SchemaError),
        RecursionLimit {
            limit: usize,
        },
    }

    impl fmt::Display for DecodeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                DecodeError::Element(problem) => write!(f, "{}", problem),
                DecodeError::Schema(problem) => write!(f, "Destination record is not usable. {}", problem),
                DecodeError::RecursionLimit { limit } => write!(f, "Elements are nested deeper than the configured limit of {}.", limit),
            }
        }
    }

    impl Error for DecodeError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            match self {
                DecodeError::Element(problem) => Some(problem),
                DecodeError::Schema(problem) => Some(problem),
                DecodeError::RecursionLimit { limit: _ } => None,
            }
        }
    }

    impl From<ElementError> for DecodeError {
        fn from(problem: ElementError) -> Self {
            DecodeError::Element(problem)
        }
    }

    impl From<SchemaError> for DecodeError {
        fn from(problem: SchemaError) -> Self {
            DecodeError::Schema(problem)
        }
    }
}
