extern crate proc_macro;

mod ast;
mod derive;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

///
/// Derive macro that implements [`EbmlRecord`][record] for a struct with named fields.
///
/// Rather than requiring a handwritten descriptor table and accessor `match`es, this macro reads attributes on the struct fields and generates a static descriptor accordingly.  The kind of each field is taken from its type:
///   * `u64` - unsigned integer
///   * `i64` - signed integer
///   * `f64` or `f32` - float
///   * `String` - text
///   * `Vec<u8>` - binary
///   * `Vec<T>` where `T: EbmlRecord + Default` - one nested record per occurrence of the element
///   * `[T; N]` where `T: EbmlRecord` - fixed array of nested records
///   * any other type - a nested record (must implement `EbmlRecord`)
///
/// The following attributes are recognised on fields (all optional):
///   * __#[id(`u64`)]__ - The raw id of the element this field is decoded from, marker bit included. e.g. `#[id(0x4286)]`
///   * __#[stop]__ - Reaching this field's element stops decoding and hands the element back to the caller.  Requires `#[id]`.
///   * __#[default_value(literal)]__ - Value used when the element is absent. e.g. `#[default_value("eng")]` or `#[default_value(8000.0)]`
///   * __#[default_link(field)]__ - Copies the named sibling field when the element is absent. e.g. `#[default_link(pixel_width)]`
///
/// Duplicate ids, unparsable default values, links to unknown fields or fields of a different kind, and defaults on non-scalar fields are all rejected at compile time.
///
/// ## Example
///
/// ```ignore
/// use ebml_record::schema::EbmlRecord;
///
/// #[derive(EbmlRecord, Default)]
/// struct Video {
///     #[id(0xb0)]
///     pixel_width: u64,
///
///     #[id(0x54b0)]
///     #[default_link(pixel_width)]
///     display_width: u64,
///
///     #[id(0x2383e3)]
///     #[default_value("25.0")]
///     frame_rate: f64,
/// }
/// ```
///
/// [record]: ebml_record_schema::EbmlRecord

#[proc_macro_derive(EbmlRecord, attributes(id, stop, default_value, default_link))]
pub fn derive_ebml_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::impl_ebml_record(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
