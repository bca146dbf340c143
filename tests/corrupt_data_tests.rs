mod test_records;

pub mod corrupt_data_tests {
    use std::error::Error;

    use ebml_record::error::{DecodeError, ElementError, ToolError, VintError};
    use ebml_record::Decoder;

    use super::test_records::*;

    #[test]
    pub fn error_on_zero_id_byte() {
        let mut root = source(&[el(&[0x81], &[0x01]), vec![0x00, 0x81, 0x01]]);
        let mut record = Single::default();

        let result = Decoder::new().decode(&mut root, &mut record);
        assert!(matches!(
            result,
            Err(DecodeError::Element(ElementError::CorruptedHeader { parent_id: 0, problem: VintError::Tool(ToolError::ReadVintOverflow) }))
        ));
        // Fields decoded before the failure keep their values.
        assert_eq!(1, record.a);
    }

    #[test]
    pub fn error_on_truncated_size() {
        let mut root = source(&[vec![0x81, 0x40]]);
        let mut record = Single::default();

        let result = Decoder::new().decode(&mut root, &mut record);
        assert!(matches!(
            result,
            Err(DecodeError::Element(ElementError::CorruptedHeader { problem: VintError::Truncated { length: 2, read: 1 }, .. }))
        ));
    }

    #[test]
    pub fn error_on_truncated_child_header() {
        // The video element declares 3 bytes but its only child header is cut off after its id.
        let mut root = source(&[vec![0xe0, 0x83, 0x54, 0xb0]]);
        let mut track = Track::default();

        let result = Decoder::new().decode(&mut root, &mut track);
        assert!(matches!(result, Err(DecodeError::Element(ElementError::CorruptedHeader { parent_id: 0xe0, .. }))));
    }

    #[test]
    pub fn child_cannot_overrun_parent() {
        // The inner element claims 4 bytes but its parent only has 1 left for it.
        let mut root = source(&[vec![0xe0, 0x83, 0xb0, 0x84, 0x01], el(&[0xd7], &[0x02])]);
        let mut track = Track::default();

        let result = Decoder::new().decode(&mut root, &mut track);
        assert!(matches!(result, Err(DecodeError::Element(ElementError::ShortRead { id: 0xb0, expected: 4, actual: 1 }))));
        assert_eq!(0, track.number);
    }

    #[test]
    pub fn error_on_oversized_scalar() {
        let mut root = source(&[el(&[0x81], &[0x01; 9])]);
        let mut record = Single::default();

        let result = Decoder::new().decode(&mut root, &mut record);
        assert!(matches!(result, Err(DecodeError::Element(ElementError::OversizedScalar { id: 0x81, size: 9 }))));
    }

    #[test]
    pub fn error_on_truncated_nested_payload() {
        let mut root = source(&[vec![0x6d, 0x80, 0x86, 0x50, 0x31, 0x81, 0x01]]);
        let mut track = Track::default();

        let result = Decoder::new().decode(&mut root, &mut track);
        assert!(matches!(result, Err(DecodeError::Element(ElementError::ShortRead { id: 0x6d80, .. }))));
    }

    #[test]
    pub fn errors_describe_themselves() {
        let mut root = source(&[vec![0x81, 0x84, 0x01]]);
        let err = Decoder::new().decode(&mut root, &mut Single::default()).expect_err("decode should fail");

        assert_eq!("Element 0x81 declared 4 bytes but only 1 could be read.", err.to_string());
        assert!(err.source().is_some());
    }
}
