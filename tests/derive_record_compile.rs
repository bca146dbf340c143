#[cfg(feature = "derive")]
pub mod derive_record_compile {
    use ebml_record::schema::{EbmlRecord, FieldKind, FieldSpec, ScalarValue};
    use ebml_record::Element;
    use std::io::Cursor;

    #[derive(EbmlRecord, Default, Debug, PartialEq)]
    pub struct Trial {
        #[id(0x4286)]
        #[default_value(1)]
        version: u64,

        #[id(0x42f7)]
        #[default_link(version)]
        read_version: u64,

        #[id(0xfb)]
        offset: i64,

        #[id(0x4489)]
        #[default_value("8000")]
        rate: f64,

        #[id(0x4282)]
        #[default_value("webm")]
        doc_type: String,

        #[id(0xec)]
        void: Vec<u8>,

        #[id(0xa3)]
        #[stop]
        block: Vec<u8>,

        untagged: u64,
    }

    #[derive(EbmlRecord, Default, Debug, PartialEq)]
    pub struct Wrapper<T: EbmlRecord + Default> {
        #[id(0xa0)]
        inner: T,

        #[id(0xa1)]
        many: Vec<T>,

        #[id(0xa2)]
        pair: [T; 2],
    }

    #[derive(EbmlRecord, Default, Debug, PartialEq)]
    pub struct Nothing;

    #[test]
    pub fn descriptor_matches_attributes() {
        let trial = Trial::default();
        let fields = trial.fields();

        assert_eq!(8, fields.len());
        assert_eq!(
            FieldSpec::new("version", FieldKind::UnsignedInt).id(0x4286).default_value("1"),
            fields[0]
        );
        assert_eq!(
            FieldSpec::new("read_version", FieldKind::UnsignedInt).id(0x42f7).default_link("version"),
            fields[1]
        );
        assert_eq!(FieldKind::Integer, fields[2].kind);
        assert_eq!(Some("8000"), fields[3].default);
        assert_eq!(FieldKind::Utf8, fields[4].kind);
        assert_eq!(FieldKind::Binary, fields[5].kind);
        assert!(fields[6].stop);
        assert_eq!(None, fields[7].id);

        assert_eq!(Some(6), trial.find_field(0xa3).map(|(index, _)| index));
        assert_eq!(Some(7), trial.field_index("untagged"));
    }

    #[test]
    pub fn accessors_follow_declaration_order() {
        let mut trial = Trial {
            version: 2,
            doc_type: String::from("matroska"),
            ..Trial::default()
        };

        assert_eq!(Some(ScalarValue::UnsignedInt(2)), trial.scalar_value(0));
        assert_eq!(Some(ScalarValue::Utf8(String::from("matroska"))), trial.scalar_value(4));
        assert_eq!(None, trial.scalar_value(5));
        assert_eq!(None, trial.scalar_value(8));

        for (index, field) in trial.fields().iter().enumerate() {
            let access = trial.field_mut(index).expect("every declared field is accessible");
            assert_eq!(field.kind, access.kind());
        }
        assert!(trial.field_mut(8).is_none());
    }

    #[test]
    pub fn generic_records_decode() {
        let data = vec![0xa0, 0x83, 0x42, 0x86, 0x80, 0xa1, 0x80, 0xa1, 0x80];
        let mut root = Element::root(Cursor::new(data));
        let mut wrapper: Wrapper<Trial> = Wrapper::default();

        assert!(root.decode_into(&mut wrapper).expect("decode should succeed").is_complete());
        assert_eq!(0, wrapper.inner.version);
        assert_eq!(0, wrapper.inner.read_version);
        assert_eq!("webm", wrapper.inner.doc_type);
        assert_eq!(2, wrapper.many.len());
        assert_eq!(1, wrapper.many[1].version);
        assert_eq!(Trial::default(), wrapper.pair[0]);

        let kinds: Vec<FieldKind> = wrapper.fields().iter().map(|field| field.kind).collect();
        assert_eq!(vec![FieldKind::Record, FieldKind::RecordList, FieldKind::RecordArray], kinds);
    }

    #[test]
    pub fn unit_record_has_no_fields() {
        assert!(Nothing.fields().is_empty());
    }
}
