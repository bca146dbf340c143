use super::FieldKind;

///
/// An owned scalar value, used to move defaults between fields.
///
#[derive(Clone, PartialEq, Debug)]
pub enum ScalarValue {
    UnsignedInt(u64),
    Integer(i64),
    Float(f64),
    Utf8(String),
}

impl ScalarValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            ScalarValue::UnsignedInt(_) => FieldKind::UnsignedInt,
            ScalarValue::Integer(_) => FieldKind::Integer,
            ScalarValue::Float(_) => FieldKind::Float,
            ScalarValue::Utf8(_) => FieldKind::Utf8,
        }
    }

    ///
    /// Parses a default literal according to a field kind.
    ///
    /// Integers are read in base 10, floats with the standard library parser, and strings are taken as-is.  Returns `None` if the literal does not parse or `kind` is not scalar.
    ///
    /// ```
    /// use ebml_record_schema::{FieldKind, ScalarValue};
    ///
    /// assert_eq!(Some(ScalarValue::UnsignedInt(8000)), ScalarValue::parse(FieldKind::UnsignedInt, "8000"));
    /// assert_eq!(Some(ScalarValue::Float(8000.0)), ScalarValue::parse(FieldKind::Float, "8000"));
    /// assert_eq!(None, ScalarValue::parse(FieldKind::UnsignedInt, "-1"));
    /// assert_eq!(None, ScalarValue::parse(FieldKind::Binary, "00"));
    /// ```
    ///
    pub fn parse(kind: FieldKind, literal: &str) -> Option<Self> {
        match kind {
            FieldKind::UnsignedInt => literal.parse().ok().map(ScalarValue::UnsignedInt),
            FieldKind::Integer => literal.parse().ok().map(ScalarValue::Integer),
            FieldKind::Float => literal.parse().ok().map(ScalarValue::Float),
            FieldKind::Utf8 => Some(ScalarValue::Utf8(literal.to_string())),
            _ => None,
        }
    }
}
