//! This crate decodes [EBML][EBML] elements directly into typed records.  Its primary goal is to let a struct describe which elements it wants, and to hand control back to the caller when it reaches a payload it should handle itself.
//! 
//! [EBML][EBML] stands for Extensible Binary Meta-Language and is somewhat of a
//! binary version of XML. It's used for container formats like [WebM][webm] or
//! [MKV][mkv].
//! 
//! # Records
//! Destination types implement [`schema::EbmlRecord`], usually with `#[derive(EbmlRecord)]` (enabled by the default `derive` feature).  The [`Decoder`] reads the children of an [`Element`], stores each recognised child in the matching field, skips the rest, and finally applies declared defaults to any scalar field that was not present in the data.
//! 
//! # Known Limitations
//! This library was not built to work with an "Unknown Data Size" as defined in [RFC8794][rfc8794].  A size of all ones is treated as an ordinary (very large) size, so it will only work on datasets with known element sizes.
//! 
//! [EBML]: http://ebml.sourceforge.net/
//! [webm]: https://www.webmproject.org/
//! [mkv]: http://www.matroska.org/technical/specs/index.html
//! [rfc8794]: https://datatracker.ietf.org/doc/rfc8794/
//! 

mod errors;
mod element;
mod decoder;
mod defaults;
pub mod tools;
pub mod schema;

pub use self::element::Element;
pub use self::decoder::{Decoder, DecoderOptions, Outcome, Payload};

pub mod error {
    //!
    //! Potential errors that can occur when decoding EBML data.
    //!

    pub use super::errors::tool::{ToolError, VintError};
    pub use super::errors::element::ElementError;
    pub use super::errors::decoder::DecodeError;
    pub use ebml_record_schema::SchemaError;
}
