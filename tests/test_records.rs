use std::io::Cursor;

use ebml_record::schema::EbmlRecord;
use ebml_record::Element;

#[derive(EbmlRecord, Default, Debug, PartialEq)]
pub struct Single {
    #[id(0x81)]
    pub a: u64,
}

#[derive(EbmlRecord, Default, Debug, PartialEq)]
pub struct Video {
    #[id(0xb0)]
    pub pixel_width: u64,

    #[id(0xba)]
    pub pixel_height: u64,

    #[id(0x54b0)]
    #[default_link(pixel_width)]
    pub display_width: u64,

    #[id(0x54ba)]
    #[default_link(pixel_height)]
    pub display_height: u64,

    #[id(0x2383e3)]
    #[default_value("25.0")]
    pub frame_rate: f64,

    #[id(0x55b2)]
    #[default_value(2.2)]
    pub gamma: f32,
}

#[derive(EbmlRecord, Default, Debug, PartialEq)]
pub struct Encoding {
    #[id(0x5031)]
    pub order: u64,

    #[id(0x5032)]
    #[default_value(1)]
    pub scope: u64,
}

#[derive(EbmlRecord, Default, Debug, PartialEq)]
pub struct Corner {
    #[id(0x81)]
    pub x: u64,

    #[id(0x82)]
    #[default_value(7)]
    pub y: u64,
}

#[derive(EbmlRecord, Default, Debug, PartialEq)]
pub struct Track {
    #[id(0xd7)]
    pub number: u64,

    #[id(0x536e)]
    #[default_value("unnamed")]
    pub name: String,

    #[id(0x22b59c)]
    #[default_value("eng")]
    pub language: String,

    #[id(0xe0)]
    pub video: Video,

    #[id(0x6d80)]
    pub encodings: Vec<Encoding>,

    #[id(0x55b0)]
    pub corners: [Corner; 2],

    #[id(0x4489)]
    pub duration: f64,

    #[id(0xfb)]
    #[default_value("-1")]
    pub reference: i64,

    #[id(0x63a2)]
    pub codec_private: Vec<u8>,
}

#[derive(EbmlRecord, Default, Debug, PartialEq)]
pub struct Cluster {
    #[id(0xe7)]
    pub timestamp: u64,

    #[id(0xa3)]
    #[stop]
    pub block: Vec<u8>,
}

#[derive(EbmlRecord, Default, Debug, PartialEq)]
pub struct Segment {
    #[id(0x1f43b675)]
    pub cluster: Cluster,

    #[id(0x2ad7b1)]
    #[default_value("1000000")]
    pub timecode_scale: u64,
}

///
/// Encodes one element with a single byte size.  Only for payloads shorter than 127 bytes.
///
pub fn el(id: &[u8], payload: &[u8]) -> Vec<u8> {
    assert!(payload.len() < 0x7f, "test payload too long for a one byte size");
    let mut data = id.to_vec();
    data.push(0x80 | payload.len() as u8);
    data.extend_from_slice(payload);
    data
}

pub fn source(parts: &[Vec<u8>]) -> Element<Cursor<Vec<u8>>> {
    Element::root(Cursor::new(parts.concat()))
}
