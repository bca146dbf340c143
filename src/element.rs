use std::cell::RefCell;
use std::fmt;
use std::io::{self, Read};
use std::rc::Rc;

use ebml_record_schema::EbmlRecord;

use super::decoder::{Decoder, Outcome};
use super::errors::decoder::DecodeError;
use super::errors::element::ElementError;
use super::errors::tool::VintError;
use super::tools;

const UNBOUNDED: u64 = u64::MAX;

// Upper bound on the buffer reserved up front for a payload; the rest grows as data actually arrives.
const PREALLOCATION_LIMIT: u64 = 1024 * 64;

///
/// A cursor over a single EBML element, bounded to the element's declared size.
///
/// The root element is created over a byte source with [`Element::root()`] and covers the rest of that source.  Calling [`next()`](Element::next) reads one child header and returns a new `Element` restricted to exactly that child's payload.  All elements created this way share the same underlying source, so reads must happen in document order: a parent must not be read again until its current child has been fully read (for example with [`read_all_bytes()`](Element::read_all_bytes) or [`skip()`](Element::skip)) or decoded.
///
/// Because every element is bounded, a corrupted size can never make one element's reads spill into a sibling - reading past the bound is reported as a short read.  If a child declares more bytes than its parent has left, the child can only read up to the parent's end.
///
/// `Element` also implements [`std::io::Read`] over the unread part of its payload, which is handy for parsing payloads manually after decoding stopped at a `#[stop]` field.
///
/// ## Example
///
/// ```
/// use std::io::Cursor;
/// use ebml_record::Element;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // id 0x4286, size 1, value 1 followed by id 0xa3, size 2
/// let data = Cursor::new(vec![0x42, 0x86, 0x81, 0x01, 0xa3, 0x82, 0xde, 0xad]);
/// let mut root = Element::root(data);
///
/// let mut version = root.next()?.expect("first child");
/// assert_eq!(0x4286, version.id());
/// assert_eq!(1, version.read_unsigned()?);
///
/// let mut block = root.next()?.expect("second child");
/// assert_eq!(vec![0xde, 0xad], block.read_all_bytes()?);
///
/// assert!(root.next()?.is_none());
/// # Ok(())
/// # }
/// ```
///
pub struct Element<R> {
    source: Rc<RefCell<R>>,
    id: u64,
    remaining: u64,
    limit: u64,
    bounded: bool,
}

impl<R: Read> Element<R> {

    ///
    /// Creates the root element covering everything available in `source`.
    ///
    /// The root has id `0` and no declared size.
    ///
    pub fn root(source: R) -> Self {
        Element {
            source: Rc::new(RefCell::new(source)),
            id: 0,
            remaining: UNBOUNDED,
            limit: UNBOUNDED,
            bounded: false,
        }
    }

    ///
    /// The raw id of this element, marker bit included.  `0` for the root.
    ///
    pub fn id(&self) -> u64 {
        self.id
    }

    ///
    /// Number of declared bytes in this element that have not been read yet.
    ///
    /// The root reports `u64::MAX` minus whatever has been consumed, as its size is unknown.
    ///
    pub fn remaining_size(&self) -> u64 {
        self.remaining
    }

    /// Whether this is the unbounded element created by [`root()`](Element::root).
    pub fn is_root(&self) -> bool {
        !self.bounded
    }

    ///
    /// Reads the header of the next child and returns an element bounded to that child's payload.
    ///
    /// Returns `Ok(None)` once this element has no bytes left, or - for the root only - when the source is exhausted before the next header starts.  The returned child must be fully consumed before calling `next()` on `self` again.
    ///
    /// # Errors
    ///
    /// A header that is cut short, a vint with a zero first byte, a bounded element whose source ends early, and any I/O error are all reported as [`ElementError`]s.
    ///
    pub fn next(&mut self) -> Result<Option<Element<R>>, ElementError> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let parent_id = self.id;
        let id = match tools::read_vint_from(self) {
            Ok(Some((id, _))) => id,
            Ok(None) if !self.bounded => return Ok(None),
            Ok(None) => {
                return Err(ElementError::ShortRead {
                    id: self.id,
                    expected: self.remaining,
                    actual: 0,
                })
            },
            Err(problem) => return Err(corrupted_header(parent_id, problem)),
        };

        let size = match tools::read_size_from(self) {
            Ok(Some((size, _))) => size,
            Ok(None) => return Err(ElementError::CorruptedHeader { parent_id, problem: VintError::Truncated { length: 1, read: 0 } }),
            Err(problem) => return Err(corrupted_header(parent_id, problem)),
        };

        // The child's bytes belong to it from now on, so take them out of this element's budget.
        let limit = size.min(self.limit);
        self.limit -= limit;
        self.remaining = self.remaining.saturating_sub(size);

        log::trace!("element {:#x}: child {:#x} with {} bytes", parent_id, id, size);

        Ok(Some(Element {
            source: Rc::clone(&self.source),
            id,
            remaining: size,
            limit,
            bounded: true,
        }))
    }

    ///
    /// Reads the rest of this element's payload.
    ///
    /// For the root, this reads to the end of the source.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::ShortRead`] if fewer bytes than [`remaining_size()`](Element::remaining_size) are available - partial data is never returned.
    ///
    pub fn read_all_bytes(&mut self) -> Result<Vec<u8>, ElementError> {
        let expected = self.remaining;
        let mut data = Vec::with_capacity(expected.min(PREALLOCATION_LIMIT) as usize);
        self.read_to_end(&mut data)?;

        if self.bounded && (data.len() as u64) < expected {
            return Err(ElementError::ShortRead {
                id: self.id,
                expected,
                actual: data.len() as u64,
            });
        }

        Ok(data)
    }

    ///
    /// Discards the rest of this element's payload.
    ///
    /// # Errors
    ///
    /// Same as [`read_all_bytes()`](Element::read_all_bytes).
    ///
    pub fn skip(&mut self) -> Result<(), ElementError> {
        let expected = self.remaining;
        let actual = io::copy(self, &mut io::sink())?;

        if self.bounded && actual < expected {
            return Err(ElementError::ShortRead {
                id: self.id,
                expected,
                actual,
            });
        }

        Ok(())
    }

    ///
    /// Reads the payload as a big endian unsigned integer of 0 to 8 bytes.
    ///
    pub fn read_unsigned(&mut self) -> Result<u64, ElementError> {
        let data = self.read_scalar_bytes()?;
        tools::arr_to_u64(&data).map_err(|problem| ElementError::DataMismatch { id: self.id, problem })
    }

    ///
    /// Reads the payload as a big endian integer of 0 to 8 bytes.
    ///
    /// The value is not sign-extended from the payload width: `[0xff, 0xfe]` reads as `65534`.  Only a full 8 byte payload can produce a negative value.
    ///
    pub fn read_signed(&mut self) -> Result<i64, ElementError> {
        let data = self.read_scalar_bytes()?;
        let value = tools::arr_to_u64(&data).map_err(|problem| ElementError::DataMismatch { id: self.id, problem })?;
        Ok(value as i64)
    }

    ///
    /// Reads the payload as a float.  8 byte payloads are `f64`, anything shorter is read as an `f32`.
    ///
    pub fn read_float(&mut self) -> Result<f64, ElementError> {
        let data = self.read_scalar_bytes()?;
        tools::arr_to_f64(&data).map_err(|problem| ElementError::DataMismatch { id: self.id, problem })
    }

    ///
    /// Reads the payload as text.
    ///
    /// No charset validation is done: byte sequences that are not valid UTF-8 are replaced with `U+FFFD` rather than failing the read.
    ///
    pub fn read_utf8(&mut self) -> Result<String, ElementError> {
        let data = self.read_all_bytes()?;
        Ok(match String::from_utf8(data) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    ///
    /// Decodes the children of this element into `record` with a default [`Decoder`].
    ///
    pub fn decode_into(&mut self, record: &mut dyn EbmlRecord) -> Result<Outcome<R>, DecodeError> {
        Decoder::default().decode(self, record)
    }

    fn read_scalar_bytes(&mut self) -> Result<Vec<u8>, ElementError> {
        if self.remaining > 8 {
            return Err(ElementError::OversizedScalar { id: self.id, size: self.remaining });
        }
        self.read_all_bytes()
    }

    ///
    /// Moves the unread part of this element into a new handle.
    ///
    /// `self` is left with nothing to read, so only the returned handle can reach the remaining children.
    ///
    pub(crate) fn take(&mut self) -> Self {
        let rest = Element {
            source: Rc::clone(&self.source),
            id: self.id,
            remaining: self.remaining,
            limit: self.limit,
            bounded: self.bounded,
        };
        self.remaining = 0;
        self.limit = 0;
        rest
    }
}

fn corrupted_header(parent_id: u64, problem: VintError) -> ElementError {
    match problem {
        VintError::Io { source } => ElementError::ReadError { source },
        problem => ElementError::CorruptedHeader { parent_id, problem },
    }
}

impl<R: Read> Read for Element<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let max = buf.len().min(usize::try_from(self.limit).unwrap_or(usize::MAX));
        if max == 0 {
            return Ok(0);
        }

        let count = self.source.borrow_mut().read(&mut buf[..max])?;
        self.limit -= count as u64;
        self.remaining = self.remaining.saturating_sub(count as u64);
        Ok(count)
    }
}

impl<R> fmt::Debug for Element<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bounded {
            write!(f, "{{{:x} {}}}", self.id, self.remaining)
        } else {
            write!(f, "{{root}}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn root(data: &[u8]) -> Element<Cursor<Vec<u8>>> {
        Element::root(Cursor::new(data.to_vec()))
    }

    #[test]
    fn empty_source_has_no_children() {
        let mut root = root(&[]);
        assert!(root.is_root());
        assert!(root.next().unwrap().is_none());
    }

    #[test]
    fn child_is_bounded_to_its_size() {
        let mut root = root(&[0x81, 0x82, 0x01, 0x02, 0x83, 0x81, 0x03]);

        let mut first = root.next().unwrap().expect("first child");
        assert_eq!(0x81, first.id());
        assert_eq!(2, first.remaining_size());
        let mut buf = [0u8; 16];
        assert_eq!(2, first.read(&mut buf).unwrap());
        assert_eq!(0, first.read(&mut buf).unwrap());
        assert_eq!(0, first.remaining_size());

        let mut second = root.next().unwrap().expect("second child");
        assert_eq!(0x83, second.id());
        assert_eq!(vec![0x03], second.read_all_bytes().unwrap());
        assert!(root.next().unwrap().is_none());
    }

    #[test]
    fn nested_children_end_at_parent_boundary() {
        // 0xa0 { 0x81 [0x05] } 0x82 [0x06]
        let mut root = root(&[0xa0, 0x83, 0x81, 0x81, 0x05, 0x82, 0x81, 0x06]);

        let mut parent = root.next().unwrap().expect("parent");
        let mut child = parent.next().unwrap().expect("child");
        assert_eq!(5, child.read_unsigned().unwrap());
        assert!(parent.next().unwrap().is_none());

        let mut sibling = root.next().unwrap().expect("sibling");
        assert_eq!(0x82, sibling.id());
        assert_eq!(6, sibling.read_unsigned().unwrap());
    }

    #[test]
    fn truncated_payload_is_a_short_read() {
        let mut root = root(&[0x81, 0x84, 0x01, 0x02]);
        let mut child = root.next().unwrap().expect("child");
        let result = child.read_all_bytes();
        assert!(matches!(result, Err(ElementError::ShortRead { id: 0x81, expected: 4, actual: 2 })));
    }

    #[test]
    fn child_cannot_read_past_parent() {
        // parent declares 3 bytes, child claims 4
        let mut root = root(&[0xa0, 0x83, 0x81, 0x84, 0x01, 0x02, 0x03, 0x04]);
        let mut parent = root.next().unwrap().expect("parent");
        let mut child = parent.next().unwrap().expect("child");
        assert_eq!(4, child.remaining_size());
        let result = child.read_all_bytes();
        assert!(matches!(result, Err(ElementError::ShortRead { id: 0x81, expected: 4, actual: 1 })));
    }

    #[test]
    fn partial_header_is_an_error() {
        let mut root = root(&[0x42]);
        let result = root.next();
        assert!(matches!(result, Err(ElementError::CorruptedHeader { parent_id: 0, problem: VintError::Truncated { length: 2, read: 1 } })));
    }

    #[test]
    fn missing_size_is_an_error() {
        let mut root = root(&[0x81]);
        assert!(matches!(root.next(), Err(ElementError::CorruptedHeader { parent_id: 0, .. })));
    }

    #[test]
    fn zero_vint_is_an_error() {
        let mut root = root(&[0x00, 0x81]);
        assert!(matches!(root.next(), Err(ElementError::CorruptedHeader { parent_id: 0, problem: VintError::Tool(_) })));
    }

    #[test]
    fn bounded_element_ending_early_is_an_error() {
        let mut root = root(&[0xa0, 0x85, 0x81, 0x81, 0x01]);
        let mut parent = root.next().unwrap().expect("parent");
        let mut child = parent.next().unwrap().expect("child");
        child.skip().unwrap();
        assert!(matches!(parent.next(), Err(ElementError::ShortRead { id: 0xa0, expected: 2, actual: 0 })));
    }

    #[test]
    fn skip_discards_payload() {
        let mut root = root(&[0xec, 0x83, 0x00, 0x00, 0x00, 0x81, 0x81, 0x07]);
        let mut void = root.next().unwrap().expect("void");
        void.skip().unwrap();
        assert_eq!(0, void.remaining_size());

        let mut next = root.next().unwrap().expect("next");
        assert_eq!(7, next.read_unsigned().unwrap());
    }

    #[test]
    fn scalar_readers() {
        let mut root = root(&[
            0x81, 0x80,
            0x82, 0x82, 0xff, 0xfe,
            0x86, 0x88, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
            0x83, 0x84, 0x3f, 0xc0, 0x00, 0x00,
            0x84, 0x83, b'a', 0xff, b'b',
            0x85, 0x89, 0, 0, 0, 0, 0, 0, 0, 0, 1,
        ]);

        assert_eq!(0, root.next().unwrap().unwrap().read_unsigned().unwrap());
        assert_eq!(65534, root.next().unwrap().unwrap().read_signed().unwrap());
        assert_eq!(-2, root.next().unwrap().unwrap().read_signed().unwrap());
        assert_eq!(1.5, root.next().unwrap().unwrap().read_float().unwrap());
        assert_eq!("a\u{fffd}b", root.next().unwrap().unwrap().read_utf8().unwrap());
        assert!(matches!(root.next().unwrap().unwrap().read_unsigned(), Err(ElementError::OversizedScalar { id: 0x85, size: 9 })));
    }

    #[test]
    fn root_reads_to_end_of_source() {
        let mut root = root(&[0x01, 0x02, 0x03]);
        assert_eq!(vec![0x01, 0x02, 0x03], root.read_all_bytes().unwrap());
    }

    #[test]
    fn debug_shows_id_and_remaining() {
        let mut root = root(&[0x42, 0x86, 0x81, 0x01]);
        assert_eq!("{root}", format!("{:?}", root));
        let child = root.next().unwrap().unwrap();
        assert_eq!("{4286 1}", format!("{:?}", child));
    }
}
