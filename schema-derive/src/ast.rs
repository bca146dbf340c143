use ebml_record_schema::FieldKind;
use syn::{Data, DeriveInput, Error, Fields, GenericArgument, Generics, Ident, Lit, LitInt, PathArguments, Result, Type};

pub struct Record<'a> {
    pub original: &'a DeriveInput,
    pub ident: Ident,
    pub fields: Vec<Field<'a>>,
    pub generics: &'a Generics,
}

pub struct Field<'a> {
    pub original: &'a syn::Field,
    pub ident: Ident,
    pub access: Access,
    pub attributes: Attributes,
}

///
/// How the generated code hands out a field.  Mostly mirrors `FieldKind`, but `f32` needs its own accessor.
///
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Access {
    UnsignedInt,
    Integer,
    Float,
    Float32,
    Utf8,
    Binary,
    Record,
    RecordList,
    RecordArray,
}

pub struct Attributes {
    pub id: Option<(u64, LitInt)>,
    pub stop: Option<syn::Attribute>,
    pub default: Option<(String, Lit)>,
    pub default_link: Option<Ident>,
}

impl Access {
    pub fn kind(self) -> FieldKind {
        match self {
            Access::UnsignedInt => FieldKind::UnsignedInt,
            Access::Integer => FieldKind::Integer,
            Access::Float | Access::Float32 => FieldKind::Float,
            Access::Utf8 => FieldKind::Utf8,
            Access::Binary => FieldKind::Binary,
            Access::Record => FieldKind::Record,
            Access::RecordList => FieldKind::RecordList,
            Access::RecordArray => FieldKind::RecordArray,
        }
    }

    fn from_type(ty: &Type) -> Result<Self> {
        let path = match ty {
            Type::Array(_) => return Ok(Access::RecordArray),
            Type::Path(path) if path.qself.is_none() => &path.path,
            _ => return Err(Error::new_spanned(ty, "unsupported field type for #[derive(EbmlRecord)]")),
        };

        let segment = path.segments.last().ok_or_else(|| Error::new_spanned(ty, "empty type path"))?;
        match segment.ident.to_string().as_str() {
            "u64" => Ok(Access::UnsignedInt),
            "i64" => Ok(Access::Integer),
            "f64" => Ok(Access::Float),
            "f32" => Ok(Access::Float32),
            "String" => Ok(Access::Utf8),
            "Vec" => match single_type_argument(&segment.arguments) {
                Some(Type::Path(inner)) if inner.path.is_ident("u8") => Ok(Access::Binary),
                Some(_) => Ok(Access::RecordList),
                None => Err(Error::new_spanned(ty, "Vec fields need exactly one type argument")),
            },
            "u8" | "u16" | "u32" | "u128" | "usize" | "i8" | "i16" | "i32" | "i128" | "isize" | "bool" | "char" | "str" | "Option" | "Box" => {
                Err(Error::new_spanned(ty, format!("unsupported field type `{}`: use u64, i64, f64, f32, String, Vec<u8>, a record, Vec<record> or [record; N]", segment.ident)))
            },
            _ => Ok(Access::Record),
        }
    }
}

fn single_type_argument(arguments: &PathArguments) -> Option<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(ty)) => Some(ty),
            _ => None,
        },
        _ => None,
    }
}

impl<'a> Record<'a> {
    pub fn from_syn(node: &'a DeriveInput) -> Result<Self> {
        let data = match &node.data {
            Data::Struct(data) => data,
            _ => return Err(Error::new_spanned(node, "#[derive(EbmlRecord)] only works on structs")),
        };

        let named = match &data.fields {
            Fields::Named(named) => named,
            Fields::Unit => return Ok(Record { original: node, ident: node.ident.clone(), fields: Vec::new(), generics: &node.generics }),
            Fields::Unnamed(_) => return Err(Error::new_spanned(node, "#[derive(EbmlRecord)] requires named fields")),
        };

        let fields = named
            .named
            .iter()
            .map(Field::from_syn)
            .collect::<Result<_>>()?;

        Ok(Record {
            original: node,
            ident: node.ident.clone(),
            fields,
            generics: &node.generics,
        })
    }
}

impl<'a> Field<'a> {
    fn from_syn(node: &'a syn::Field) -> Result<Self> {
        let ident = node.ident.clone().ok_or_else(|| Error::new_spanned(node, "#[derive(EbmlRecord)] requires named fields"))?;
        let mut id: Option<(u64, LitInt)> = None;
        let mut stop: Option<syn::Attribute> = None;
        let mut default: Option<(String, Lit)> = None;
        let mut default_link: Option<Ident> = None;

        for attr in &node.attrs {
            if attr.path.is_ident("id") {
                if id.is_some() {
                    return Err(Error::new_spanned(attr, "duplicate #[id] attribute"));
                }
                let lit = attr.parse_args::<LitInt>()?;
                id = Some((lit.base10_parse::<u64>()?, lit));
            } else if attr.path.is_ident("stop") {
                if stop.is_some() {
                    return Err(Error::new_spanned(attr, "duplicate #[stop] attribute"));
                }
                if !attr.tokens.is_empty() {
                    return Err(Error::new_spanned(attr, "#[stop] does not take arguments"));
                }
                stop = Some(attr.clone());
            } else if attr.path.is_ident("default_value") {
                if default.is_some() {
                    return Err(Error::new_spanned(attr, "duplicate #[default_value] attribute"));
                }
                let lit = attr.parse_args::<Lit>()?;
                let text = match &lit {
                    Lit::Str(s) => s.value(),
                    Lit::Int(i) => i.base10_digits().to_string(),
                    Lit::Float(f) => f.base10_digits().to_string(),
                    _ => return Err(Error::new_spanned(&lit, "#[default_value] expects a string, integer or float literal")),
                };
                default = Some((text, lit));
            } else if attr.path.is_ident("default_link") {
                if default_link.is_some() {
                    return Err(Error::new_spanned(attr, "duplicate #[default_link] attribute"));
                }
                default_link = Some(attr.parse_args::<Ident>()?);
            }
        }

        Ok(Field {
            original: node,
            ident,
            access: Access::from_type(&node.ty)?,
            attributes: Attributes {
                id,
                stop,
                default,
                default_link,
            },
        })
    }
}
