use std::fmt;
use std::io::Read;

use ebml_record_schema::{EbmlRecord, FieldMut, SchemaError};

use super::defaults;
use super::element::Element;
use super::errors::decoder::DecodeError;

const DEFAULT_RECURSION_LIMIT: usize = 64;

///
/// Run-time configuration for a [`Decoder`].
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// The maximum number of nested records the decoder will descend into.
    pub recursion_limit: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

///
/// How a successful decode ended.
///
#[must_use]
pub enum Outcome<R> {
    ///
    /// Every child element was consumed and defaults were applied.
    ///
    Complete,

    ///
    /// An element mapped to a `#[stop]` field was reached.  See [`Payload`].
    ///
    PayloadReached(Payload<R>),
}

///
/// The hand-off point produced when decoding reaches a `#[stop]` field.
///
/// `element` is the element that matched the stop field; none of its payload has been read.  `rest` takes over the unread part of the element that contained it, positioned just past `element`'s header, so once `element` has been consumed, `rest.next()` returns the sibling that followed it.  When the stop field belongs to a nested record, `rest` is that nested record's element rather than the one passed to [`Decoder::decode`].  The element handle `rest` was split from has nothing left to read afterwards; its own parent continues with the next sibling as usual.
///
/// Fields decoded before the stop keep their values, and defaults have been applied at every record level that was open.
///
pub struct Payload<R> {
    pub element: Element<R>,
    pub rest: Element<R>,
}

impl<R> Outcome<R> {
    /// Returns `true` if decoding ran to the end of the element.
    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete)
    }

    /// Returns the payload if decoding stopped at a `#[stop]` field.
    pub fn into_payload(self) -> Option<Payload<R>> {
        match self {
            Outcome::Complete => None,
            Outcome::PayloadReached(payload) => Some(payload),
        }
    }
}

impl<R> fmt::Debug for Outcome<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Complete => write!(f, "Complete"),
            Outcome::PayloadReached(payload) => write!(f, "PayloadReached({:?}, rest: {:?})", payload.element, payload.rest),
        }
    }
}

///
/// Decodes EBML elements into records described by [`EbmlRecord`].
///
/// The decoder walks the children of an element.  Each child whose id matches a field of the record is decoded into that field according to the field's kind; children with unknown ids are skipped.  Running out of children is not an error - fields that were never decoded keep their value or receive their declared default.
///
/// ## Example
///
/// ```
/// use std::io::Cursor;
/// use ebml_record::{Decoder, Element};
/// use ebml_record::schema::EbmlRecord;
///
/// #[derive(EbmlRecord, Default)]
/// struct Header {
///     #[id(0x4286)]
///     version: u64,
///
///     #[id(0x4282)]
///     #[default_value("matroska")]
///     doc_type: String,
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut root = Element::root(Cursor::new(vec![0x42, 0x86, 0x81, 0x01]));
/// let mut header = Header::default();
/// let outcome = Decoder::default().decode(&mut root, &mut header)?;
///
/// assert!(outcome.is_complete());
/// assert_eq!(1, header.version);
/// assert_eq!("matroska", header.doc_type);
/// # Ok(())
/// # }
/// ```
///
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecoderOptions,
}

impl Decoder {
    /// Creates a decoder with default [`DecoderOptions`].
    pub fn new() -> Self {
        Decoder::default()
    }

    /// Creates a decoder with the given options.
    pub fn with_options(options: DecoderOptions) -> Self {
        Decoder { options }
    }

    /// The options this decoder was created with.
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    ///
    /// Decodes the children of `element` into `record`.
    ///
    /// # Errors
    ///
    /// Read and data errors from the elements are returned as [`DecodeError::Element`] and abort the whole decode.  Problems with the record's descriptor are returned as [`DecodeError::Schema`].  Reaching a `#[stop]` field is not an error - see [`Outcome::PayloadReached`].
    ///
    pub fn decode<R: Read>(&self, element: &mut Element<R>, record: &mut dyn EbmlRecord) -> Result<Outcome<R>, DecodeError> {
        self.decode_record(element, record, 0)
    }

    fn decode_record<R: Read>(&self, element: &mut Element<R>, record: &mut dyn EbmlRecord, depth: usize) -> Result<Outcome<R>, DecodeError> {
        if depth > self.options.recursion_limit {
            return Err(DecodeError::RecursionLimit { limit: self.options.recursion_limit });
        }

        let fields = record.fields();
        let mut written = vec![false; fields.len()];
        let mut outcome = Outcome::Complete;

        while let Some(mut child) = element.next()? {
            let (index, field) = match record.find_field(child.id()) {
                Some(found) => found,
                None => {
                    log::trace!("skipping unknown element {:#x} ({} bytes) in {:#x}", child.id(), child.remaining_size(), element.id());
                    child.skip()?;
                    continue;
                },
            };

            if field.stop {
                log::debug!("reached payload element {:#x} ('{}') in {:#x}", child.id(), field.name, element.id());
                outcome = Outcome::PayloadReached(Payload {
                    element: child,
                    rest: element.take(),
                });
                break;
            }

            log::trace!("decoding {:#x} into '{}'", child.id(), field.name);
            let access = record.field_mut(index).ok_or(SchemaError::MissingField { index, name: field.name })?;
            written[index] = true;
            if let Outcome::PayloadReached(payload) = self.decode_field(&mut child, access, depth)? {
                outcome = Outcome::PayloadReached(payload);
                break;
            }
        }

        defaults::resolve(record, &written)?;
        Ok(outcome)
    }

    fn decode_field<R: Read>(&self, child: &mut Element<R>, access: FieldMut<'_>, depth: usize) -> Result<Outcome<R>, DecodeError> {
        match access {
            FieldMut::Record(record) => return self.decode_record(child, record, depth + 1),
            FieldMut::RecordList(list) => return self.decode_record(child, list.push_default(), depth + 1),
            FieldMut::RecordArray(slots) => {
                for slot in slots {
                    let outcome = self.decode_record(child, slot, depth + 1)?;
                    if !outcome.is_complete() {
                        return Ok(outcome);
                    }
                }
                // An empty array never touched the element.
                child.skip()?;
            },
            FieldMut::Binary(value) => *value = child.read_all_bytes()?,
            FieldMut::Utf8(value) => *value = child.read_utf8()?,
            FieldMut::UnsignedInt(value) => *value = child.read_unsigned()?,
            FieldMut::Integer(value) => *value = child.read_signed()?,
            FieldMut::Float(value) => *value = child.read_float()?,
            FieldMut::Float32(value) => *value = child.read_float()? as f32,
        }
        Ok(Outcome::Complete)
    }
}
