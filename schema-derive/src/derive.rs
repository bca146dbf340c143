use std::collections::HashMap;

use ebml_record_schema::ScalarValue;
use itertools::Itertools;
use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned, ToTokens};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Error, Ident, Result, Visibility};

use super::ast::{Access, Field, Record};

pub fn impl_ebml_record(ast: &DeriveInput) -> Result<TokenStream> {
    let input = Record::from_syn(ast)?;
    validate(&input)?;

    let schema = spanned_schema_path(input.original);
    let ty = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let specs = input.fields.iter().map(|field: &Field| {
        let name = field.ident.to_string();
        let kind = Ident::new(&format!("{:?}", field.access.kind()), Span::call_site());
        let id = optional(field.attributes.id.as_ref().map(|(id, _)| quote!(#id)));
        let stop = field.attributes.stop.is_some();
        let default = optional(field.attributes.default.as_ref().map(|(text, _)| quote!(#text)));
        let default_link = optional(field.attributes.default_link.as_ref().map(|link| {
            let link = link.to_string();
            quote!(#link)
        }));

        quote! {
            #schema FieldSpec {
                name: #name,
                kind: #schema FieldKind::#kind,
                id: #id,
                stop: #stop,
                default: #default,
                default_link: #default_link,
            },
        }
    });

    let field_mut = input.fields.iter().enumerate().map(|(index, field): (usize, &Field)| {
        let name = &field.ident;
        let access = match field.access {
            Access::UnsignedInt => quote!(#schema FieldMut::UnsignedInt(&mut self.#name)),
            Access::Integer => quote!(#schema FieldMut::Integer(&mut self.#name)),
            Access::Float => quote!(#schema FieldMut::Float(&mut self.#name)),
            Access::Float32 => quote!(#schema FieldMut::Float32(&mut self.#name)),
            Access::Utf8 => quote!(#schema FieldMut::Utf8(&mut self.#name)),
            Access::Binary => quote!(#schema FieldMut::Binary(&mut self.#name)),
            Access::Record => quote!(#schema FieldMut::Record(&mut self.#name)),
            Access::RecordList => quote!(#schema FieldMut::RecordList(&mut self.#name)),
            Access::RecordArray => quote! {
                #schema FieldMut::RecordArray(
                    self.#name.iter_mut().map(|slot| slot as &mut dyn #schema EbmlRecord).collect()
                )
            },
        };

        quote! {
            #index => ::core::option::Option::Some(#access),
        }
    });

    let scalar_value = input.fields.iter().enumerate().filter_map(|(index, field): (usize, &Field)| {
        let name = &field.ident;
        let value = match field.access {
            Access::UnsignedInt => quote!(#schema ScalarValue::UnsignedInt(self.#name)),
            Access::Integer => quote!(#schema ScalarValue::Integer(self.#name)),
            Access::Float => quote!(#schema ScalarValue::Float(self.#name)),
            Access::Float32 => quote!(#schema ScalarValue::Float(self.#name as f64)),
            Access::Utf8 => quote!(#schema ScalarValue::Utf8(::std::clone::Clone::clone(&self.#name))),
            _ => return None,
        };

        Some(quote! {
            #index => ::core::option::Option::Some(#value),
        })
    });

    Ok(quote! {
        impl #impl_generics #schema EbmlRecord for #ty #ty_generics #where_clause {
            fn fields(&self) -> &'static [#schema FieldSpec] {
                const FIELDS: &[#schema FieldSpec] = &[
                    #(#specs)*
                ];
                FIELDS
            }

            fn field_mut(&mut self, index: usize) -> ::core::option::Option<#schema FieldMut<'_>> {
                match index {
                    #(#field_mut)*
                    _ => ::core::option::Option::None,
                }
            }

            fn scalar_value(&self, index: usize) -> ::core::option::Option<#schema ScalarValue> {
                match index {
                    #(#scalar_value)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

fn optional(value: Option<TokenStream>) -> TokenStream {
    match value {
        Some(value) => quote!(::core::option::Option::Some(#value)),
        None => quote!(::core::option::Option::None),
    }
}

fn validate(input: &Record) -> Result<()> {
    let mut errors: Vec<Error> = Vec::new();

    let mut used_ids = HashMap::<u64, &Field>::new();
    for field in &input.fields {
        if let Some((id, lit)) = &field.attributes.id {
            if let Some(original) = used_ids.insert(*id, field) {
                errors.push(Error::new_spanned(lit, format!("duplicate #[id({})] detected", lit.to_token_stream())));
                errors.push(Error::new_spanned(original.original, format!("#[id({})] already used previously", lit.to_token_stream())));
            }
        }
    }

    let by_name: HashMap<String, &Field> = input.fields.iter().map(|field| (field.ident.to_string(), field)).collect();

    for field in &input.fields {
        let kind = field.access.kind();

        if let Some(stop) = &field.attributes.stop {
            if field.attributes.id.is_none() {
                errors.push(Error::new_spanned(stop, "#[stop] requires an #[id] on the same field"));
            }
        }

        if !kind.is_scalar() && (field.attributes.default.is_some() || field.attributes.default_link.is_some()) {
            errors.push(Error::new_spanned(field.original, format!("defaults only apply to scalar fields, `{}` is {:?}", field.ident, kind)));
            continue;
        }

        if let Some((text, lit)) = &field.attributes.default {
            if ScalarValue::parse(kind, text).is_none() {
                errors.push(Error::new_spanned(lit, format!("default value {:?} cannot be parsed as {:?}", text, kind)));
            }
        }

        if let Some(link) = &field.attributes.default_link {
            match by_name.get(&link.to_string()) {
                None => errors.push(Error::new_spanned(
                    link,
                    format!("unknown field `{}`, expected one of: {}", link, input.fields.iter().map(|f| &f.ident).join(", ")),
                )),
                Some(target) if target.ident == field.ident => errors.push(Error::new_spanned(link, "a field cannot link its default to itself")),
                Some(target) if target.access.kind() != kind => errors.push(Error::new_spanned(
                    link,
                    format!("`{}` is {:?} but `{}` is {:?}", link, target.access.kind(), field.ident, kind),
                )),
                Some(_) => {},
            }
        }
    }

    match errors.into_iter().reduce(|mut a, b| {
        a.combine(b);
        a
    }) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn spanned_schema_path(input: &DeriveInput) -> TokenStream {
    let vis_span = match &input.vis {
        Visibility::Public(vis) => Some(vis.pub_token.span()),
        Visibility::Crate(vis) => Some(vis.crate_token.span()),
        Visibility::Restricted(vis) => Some(vis.pub_token.span()),
        Visibility::Inherited => None,
    };
    let data_span = match &input.data {
        Data::Struct(data) => data.struct_token.span(),
        Data::Enum(data) => data.enum_token.span(),
        Data::Union(data) => data.union_token.span(),
    };
    let first_span = vis_span.unwrap_or(data_span);
    quote_spanned!(first_span=> ebml_record::schema::)
}
