//!
//! Record descriptors used to decode elements into typed structs.
//!
//! Everything here is re-exported from the `ebml-record-schema` crate so that code generated by `#[derive(EbmlRecord)]` can refer to it as `ebml_record::schema::...`.
//!

pub use ebml_record_schema::empty_record;
pub use ebml_record_schema::{EbmlRecord, FieldKind, FieldMut, FieldSpec, RecordList, ScalarValue};

#[cfg(feature = "derive")]
pub use ebml_record_schema_derive::EbmlRecord;
