use ebml_record_schema::{EbmlRecord, FieldSpec, ScalarValue, SchemaError};

///
/// Fills in every scalar field of `record` that was not decoded.
///
/// `written[i]` is true when field `i` received a value from an element.  Fields are visited in declaration order, so a link to an earlier field sees that field's resolved default while a link to a later field sees whatever it held before resolution.  A literal default takes precedence over a link when both are declared.
///
pub(crate) fn resolve(record: &mut dyn EbmlRecord, written: &[bool]) -> Result<(), SchemaError> {
    let fields = record.fields();

    for (index, field) in fields.iter().enumerate() {
        if written.get(index).copied().unwrap_or(false) || !field.kind.is_scalar() {
            continue;
        }

        let value = match (field.default, field.default_link) {
            (Some(literal), _) => parse_literal(field, literal)?,
            (None, Some(link)) => linked_value(record, field, link)?,
            (None, None) => continue,
        };

        log::debug!("defaulting '{}' to {:?}", field.name, value);
        let access = record.field_mut(index).ok_or(SchemaError::MissingField { index, name: field.name })?;
        access.assign(value).map_err(|value| SchemaError::KindMismatch {
            field: field.name,
            expected: field.kind,
            found: value.kind(),
        })?;
    }

    Ok(())
}

fn parse_literal(field: &FieldSpec, literal: &'static str) -> Result<ScalarValue, SchemaError> {
    ScalarValue::parse(field.kind, literal).ok_or(SchemaError::InvalidDefault {
        field: field.name,
        kind: field.kind,
        literal,
    })
}

fn linked_value(record: &dyn EbmlRecord, field: &FieldSpec, link: &'static str) -> Result<ScalarValue, SchemaError> {
    let target = record.field_index(link).ok_or(SchemaError::UnknownLink { field: field.name, link })?;
    let value = record.scalar_value(target).ok_or(SchemaError::KindMismatch {
        field: field.name,
        expected: field.kind,
        found: record.fields()[target].kind,
    })?;

    if value.kind() != field.kind {
        return Err(SchemaError::KindMismatch {
            field: field.name,
            expected: field.kind,
            found: value.kind(),
        });
    }
    Ok(value)
}
