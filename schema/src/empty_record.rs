use super::{EbmlRecord, FieldMut, FieldSpec, ScalarValue};

///
/// A record with no fields.
///
/// Decoding into an `EmptyRecord` walks an element and discards every child.  Mostly useful for examples, tests, and for draining an element whose content is not needed.
///
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EmptyRecord;

impl EbmlRecord for EmptyRecord {
    fn fields(&self) -> &'static [FieldSpec] {
        &[]
    }

    fn field_mut(&mut self, _index: usize) -> Option<FieldMut<'_>> {
        None
    }

    fn scalar_value(&self, _index: usize) -> Option<ScalarValue> {
        None
    }
}
