//! This crate provides the record descriptors that drive the decoder in the `ebml-record` crate.
//!
//! A destination record describes itself with a static table of [`FieldSpec`]s (one per struct field, in declaration order) and hands out typed access to its fields through [`FieldMut`].  The related ebml-record-schema-derive crate generates both for a plain struct.
//!

mod error;
mod value;

///
/// Contains a record without any fields for use with examples or for discarding whole elements.
///
pub mod empty_record;

pub use error::SchemaError;
pub use value::ScalarValue;

///
/// Different kinds of destination fields understood by the decoder.
///
/// Scalar kinds ([`UnsignedInt`](FieldKind::UnsignedInt), [`Integer`](FieldKind::Integer), [`Float`](FieldKind::Float), [`Utf8`](FieldKind::Utf8)) are the only ones that take part in default resolution.
///
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum FieldKind {
    UnsignedInt,
    Integer,
    Float,
    Utf8,
    Binary,
    Record,
    RecordList,
    RecordArray,
}

impl FieldKind {
    ///
    /// Returns whether or not fields of this kind are subject to default resolution.
    ///
    pub fn is_scalar(self) -> bool {
        matches!(self, FieldKind::UnsignedInt | FieldKind::Integer | FieldKind::Float | FieldKind::Utf8)
    }
}

///
/// Static metadata for one field of a destination record.
///
/// Hand-written descriptors can be built with the `const` builder methods:
///
/// ```
/// use ebml_record_schema::{FieldKind, FieldSpec};
///
/// const FIELDS: &[FieldSpec] = &[
///     FieldSpec::new("version", FieldKind::UnsignedInt).id(0x4286).default_value("1"),
///     FieldSpec::new("read_version", FieldKind::UnsignedInt).id(0x42f7).default_link("version"),
///     FieldSpec::new("payload", FieldKind::Binary).id(0xa3).stop(),
/// ];
///
/// assert_eq!(Some(0x4286), FIELDS[0].id);
/// assert!(FIELDS[2].stop);
/// ```
///
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FieldSpec {
    /// Name of the field, used to resolve [`default_link`](FieldSpec::default_link)s.
    pub name: &'static str,
    pub kind: FieldKind,
    /// Raw element id (marker bit included) that this field is decoded from.
    pub id: Option<u64>,
    /// Decoding stops and hands control back to the caller when this field's element is reached.
    pub stop: bool,
    /// Literal default, parsed according to `kind`.
    pub default: Option<&'static str>,
    /// Name of a sibling field whose value is copied in when this field was not decoded.
    pub default_link: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            kind,
            id: None,
            stop: false,
            default: None,
            default_link: None,
        }
    }

    pub const fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub const fn stop(mut self) -> Self {
        self.stop = true;
        self
    }

    pub const fn default_value(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }

    pub const fn default_link(mut self, field: &'static str) -> Self {
        self.default_link = Some(field);
        self
    }
}

///
/// Mutable access to a single field of a record, tagged with the field's kind.
///
/// The decoder matches on this enum to decide how an element's payload is written into the field.
///
pub enum FieldMut<'a> {
    UnsignedInt(&'a mut u64),
    Integer(&'a mut i64),
    Float(&'a mut f64),
    Float32(&'a mut f32),
    Utf8(&'a mut String),
    Binary(&'a mut Vec<u8>),
    Record(&'a mut dyn EbmlRecord),
    RecordList(&'a mut dyn RecordList),

    ///
    /// Every slot of a fixed-size array, in order.
    ///
    RecordArray(Vec<&'a mut dyn EbmlRecord>),
}

impl<'a> FieldMut<'a> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldMut::UnsignedInt(_) => FieldKind::UnsignedInt,
            FieldMut::Integer(_) => FieldKind::Integer,
            FieldMut::Float(_) | FieldMut::Float32(_) => FieldKind::Float,
            FieldMut::Utf8(_) => FieldKind::Utf8,
            FieldMut::Binary(_) => FieldKind::Binary,
            FieldMut::Record(_) => FieldKind::Record,
            FieldMut::RecordList(_) => FieldKind::RecordList,
            FieldMut::RecordArray(_) => FieldKind::RecordArray,
        }
    }

    ///
    /// Stores a scalar value in the field.
    ///
    /// # Errors
    ///
    /// Hands `value` back if its kind does not match the field.  `f32` fields accept [`ScalarValue::Float`] with the precision loss of an `as` cast.
    ///
    pub fn assign(self, value: ScalarValue) -> Result<(), ScalarValue> {
        match (self, value) {
            (FieldMut::UnsignedInt(field), ScalarValue::UnsignedInt(val)) => *field = val,
            (FieldMut::Integer(field), ScalarValue::Integer(val)) => *field = val,
            (FieldMut::Float(field), ScalarValue::Float(val)) => *field = val,
            (FieldMut::Float32(field), ScalarValue::Float(val)) => *field = val as f32,
            (FieldMut::Utf8(field), ScalarValue::Utf8(val)) => *field = val,
            (_, value) => return Err(value),
        }
        Ok(())
    }
}

///
/// A growable list of records, used for fields where an element may occur any number of times.
///
pub trait RecordList {
    ///
    /// Appends a new default record to the end of the list and returns it.
    ///
    fn push_default(&mut self) -> &mut dyn EbmlRecord;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: EbmlRecord + Default> RecordList for Vec<T> {
    fn push_default(&mut self) -> &mut dyn EbmlRecord {
        let index = Vec::len(self);
        self.push(T::default());
        &mut self[index]
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

///
/// This trait describes a destination record so that EBML elements can be decoded into it.  Typically implemented on a struct with `#[derive(EbmlRecord)]`.
///
/// The descriptor returned by [`fields`](EbmlRecord::fields) must be the same static table for every instance of a type, and the indexes accepted by [`field_mut`](EbmlRecord::field_mut) and [`scalar_value`](EbmlRecord::scalar_value) are positions in that table.
///
/// ## Example
///
/// ```
/// use ebml_record_schema::{EbmlRecord, FieldKind, FieldMut, FieldSpec, ScalarValue};
///
/// #[derive(Default)]
/// struct Track {
///     number: u64,
///     name: String,
/// }
///
/// impl EbmlRecord for Track {
///     fn fields(&self) -> &'static [FieldSpec] {
///         const FIELDS: &[FieldSpec] = &[
///             FieldSpec::new("number", FieldKind::UnsignedInt).id(0xd7),
///             FieldSpec::new("name", FieldKind::Utf8).id(0x536e).default_value("unnamed"),
///         ];
///         FIELDS
///     }
///
///     fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
///         match index {
///             0 => Some(FieldMut::UnsignedInt(&mut self.number)),
///             1 => Some(FieldMut::Utf8(&mut self.name)),
///             _ => None,
///         }
///     }
///
///     fn scalar_value(&self, index: usize) -> Option<ScalarValue> {
///         match index {
///             0 => Some(ScalarValue::UnsignedInt(self.number)),
///             1 => Some(ScalarValue::Utf8(self.name.clone())),
///             _ => None,
///         }
///     }
/// }
///
/// let track = Track::default();
/// assert_eq!(Some((1, &track.fields()[1])), track.find_field(0x536e));
/// assert_eq!(Some(0), track.field_index("number"));
/// ```
///
pub trait EbmlRecord {
    ///
    /// Returns the static descriptor for this record type.
    ///
    fn fields(&self) -> &'static [FieldSpec];

    ///
    /// Returns mutable access to the field at `index` in [`fields`](EbmlRecord::fields).
    ///
    /// This function *must* return a variant matching the descriptor's [`FieldKind`] and *must* return `None` if the index is out of range.
    ///
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>>;

    ///
    /// Returns a copy of the current value of the scalar field at `index`.
    ///
    /// This function *must* return `None` if the index is out of range or the field is not scalar.
    ///
    fn scalar_value(&self, index: usize) -> Option<ScalarValue>;

    ///
    /// Finds the field decoded from the element with the given id.
    ///
    /// The first matching field wins if a descriptor maps the same id twice.
    ///
    fn find_field(&self, id: u64) -> Option<(usize, &'static FieldSpec)> {
        self.fields().iter().enumerate().find(|(_, field)| field.id == Some(id))
    }

    ///
    /// Finds the index of a field by name.
    ///
    fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|field| field.name == name)
    }
}
