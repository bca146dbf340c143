//!
//! Contains the variable length integer codec and fixed width scalar readers used when decoding EBML.
//!

use std::convert::TryInto;
use std::io::{self, Read};

use super::errors::tool::{ToolError, VintError};

///
/// Returns the total length in bytes of a vint that starts with `first`.
///
/// The length is one more than the number of leading zero bits before the marker bit.
///
/// # Errors
///
/// A first byte of `0` has no marker bit within 8 bytes and returns [`ToolError::ReadVintOverflow`].
///
/// ## Example
///
/// ```
/// # use ebml_record::tools::vint_length;
/// assert_eq!(1, vint_length(0x81).unwrap());
/// assert_eq!(2, vint_length(0x40).unwrap());
/// assert_eq!(8, vint_length(0x01).unwrap());
/// assert!(vint_length(0x00).is_err());
/// ```
///
pub fn vint_length(first: u8) -> Result<usize, ToolError> {
    if first == 0 {
        return Err(ToolError::ReadVintOverflow);
    }
    Ok(first.leading_zeros() as usize + 1)
}

///
/// Clears the marker bit of a raw vint value of the given length, leaving the data bits.
///
#[inline]
pub fn clear_marker(value: u64, length: usize) -> u64 {
    value & !(1 << (7 * length))
}

///
/// Reads a vint from the beginning of the input array slice.
///
/// This method returns an option with the `None` variant used to indicate there was not enough data in the buffer to completely read a vint.
///
/// The returned tuple contains the raw value of the vint (`u64`) and the length of the vint (`usize`).  The value keeps the marker bit, which is how element ids are compared - use [`read_size`] for lengths.
///
/// # Errors
///
/// This method can return a `ToolError` if the input array cannot be read as a vint.
///
/// ## Example
///
/// ```
/// # use ebml_record::tools::read_vint;
/// assert_eq!(Some((0x1a45dfa3, 4)), read_vint(&[0x1a, 0x45, 0xdf, 0xa3]).unwrap());
/// assert_eq!(None, read_vint(&[0x1a, 0x45]).unwrap());
/// ```
///
pub fn read_vint(buffer: &[u8]) -> Result<Option<(u64, usize)>, ToolError> {
    if buffer.is_empty() {
        return Ok(None);
    }

    let length = vint_length(buffer[0])?;

    if length > buffer.len() {
        // Not enough data in the buffer to read out the vint value
        return Ok(None);
    }

    Ok(Some((concat_be(&buffer[..length]), length)))
}

///
/// Reads a vint element size from the beginning of the input array slice.
///
/// Identical to [`read_vint`] except that the marker bit is cleared from the returned value.
///
/// ```
/// # use ebml_record::tools::read_size;
/// assert_eq!(Some((1, 1)), read_size(&[0x81]).unwrap());
/// assert_eq!(Some((1, 2)), read_size(&[0x40, 0x01]).unwrap());
/// ```
///
pub fn read_size(buffer: &[u8]) -> Result<Option<(u64, usize)>, ToolError> {
    Ok(read_vint(buffer)?.map(|(value, length)| (clear_marker(value, length), length)))
}

///
/// Reads a raw vint (marker bit kept) from a byte source.
///
/// Returns `Ok(None)` if the source is already at its end before the first byte.  Ending anywhere inside the vint is an error.
///
/// # Errors
///
/// [`VintError::Truncated`] if the source ends partway through the vint, [`VintError::Tool`] if the first byte is `0`, and [`VintError::Io`] for any other read failure.
///
pub fn read_vint_from<R: Read + ?Sized>(source: &mut R) -> Result<Option<(u64, usize)>, VintError> {
    let mut buffer = [0u8; 8];
    if !read_first_byte(source, &mut buffer)? {
        return Ok(None);
    }

    let length = vint_length(buffer[0])?;
    let mut read = 1;
    while read < length {
        match source.read(&mut buffer[read..length]) {
            Ok(0) => return Err(VintError::Truncated { length, read }),
            Ok(count) => read += count,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {},
            Err(source) => return Err(VintError::Io { source }),
        }
    }

    Ok(Some((concat_be(&buffer[..length]), length)))
}

///
/// Reads a vint element size (marker bit cleared) from a byte source.
///
/// See [`read_vint_from`] for the end of source and error behaviour.
///
pub fn read_size_from<R: Read + ?Sized>(source: &mut R) -> Result<Option<(u64, usize)>, VintError> {
    Ok(read_vint_from(source)?.map(|(value, length)| (clear_marker(value, length), length)))
}

fn read_first_byte<R: Read + ?Sized>(source: &mut R, buffer: &mut [u8; 8]) -> Result<bool, VintError> {
    loop {
        match source.read(&mut buffer[..1]) {
            Ok(0) => return Ok(false),
            Ok(_) => return Ok(true),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {},
            Err(source) => return Err(VintError::Io { source }),
        }
    }
}

#[inline]
fn concat_be(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |value, byte| (value << 8) | *byte as u64)
}

///
/// Reads a `u64` value from any length array slice.
///
/// Rather than forcing the input to be a `[u8; 8]` like standard library methods, this can interpret a `u64` from a slice of any length <= 8.  Bytes are big endian - i.e. an array of `[4, 0]` would return a value of `1024`.  An empty slice reads as `0`.
///
/// # Errors
///
/// This method will return an error if the input slice has a length > 8.
///
/// ## Example
///
/// ```
/// # use ebml_record::tools::arr_to_u64;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = arr_to_u64(&[16,0])?;
/// assert_eq!(result, 4096);
/// assert_eq!(arr_to_u64(&[])?, 0);
/// # Ok(())
/// # }
/// ```
///
pub fn arr_to_u64(arr: &[u8]) -> Result<u64, ToolError> {
    if arr.len() > 8 {
        return Err(ToolError::ReadU64Overflow(Vec::from(arr)));
    }

    Ok(concat_be(arr))
}

///
/// Reads an `i64` value from any length array slice.
///
/// The slice holds a big endian two's complement value of its own width, so the top bit of the first byte is the sign - i.e. `[0xff]` is `-1` and `[0x00, 0xff]` is `255`.  An empty slice reads as `0`.
///
/// # Errors
///
/// This method will return an error if the input slice has a length > 8.
///
/// ## Example
///
/// ```
/// # use ebml_record::tools::arr_to_i64;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert_eq!(arr_to_i64(&[4,0])?, 1024);
/// assert_eq!(arr_to_i64(&[0xfc,0])?, -1024);
/// # Ok(())
/// # }
/// ```
///
pub fn arr_to_i64(arr: &[u8]) -> Result<i64, ToolError> {
    if arr.len() > 8 {
        return Err(ToolError::ReadI64Overflow(Vec::from(arr)));
    }

    if arr.is_empty() {
        return Ok(0);
    }

    let shift = 64 - 8 * arr.len() as u32;
    Ok(((concat_be(arr) << shift) as i64) >> shift)
}

///
/// Reads an `f64` value from an array slice of length <= 8.
///
/// A slice of exactly 8 bytes is read as a big endian `f64`.  Anything shorter is read as a big endian unsigned value whose low 32 bits are reinterpreted as an `f32` and widened, so the usual 4 byte floats work and an empty slice reads as `0.0`.
///
/// # Errors
///
/// This method will return an error if the input slice has a length > 8.
///
pub fn arr_to_f64(arr: &[u8]) -> Result<f64, ToolError> {
    match arr.len() {
        8 => {
            let bytes: [u8; 8] = arr.try_into().map_err(|_| ToolError::ReadF64Mismatch(Vec::from(arr)))?;
            Ok(f64::from_be_bytes(bytes))
        },
        len if len < 8 => Ok(f32::from_bits(concat_be(arr) as u32) as f64),
        _ => Err(ToolError::ReadF64Mismatch(Vec::from(arr))),
    }
}
