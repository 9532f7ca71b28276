//! Derive macro for gql update records.
//!
//! This crate provides the `#[derive(Record)]` macro, which describes a
//! struct's fields as columns so that it can be passed to
//! `Dataset::update_sql`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, Ident, LitStr, Type};

/// Derives `Record` and `UpdatePayload` for a struct.
///
/// # Field Attributes
///
/// - `#[db(name = "column_name")]` - Specifies the SQL column name
///   (optional, defaults to the field name)
/// - `#[gql(skip_update)]` - Leaves the field out of UPDATE statements.
///   Skipped fields do not need to implement `Valuer`.
///
/// # Generated Items
///
/// - `impl Record` with one `FieldDescriptor` per field, in declaration
///   order, and a value accessor for every non-skipped field
/// - `impl UpdatePayload` classifying the struct as a record payload
#[proc_macro_derive(Record, attributes(db, gql))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_record_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_record_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record derive only supports structs",
            ));
        }
    };

    let mut field_infos: Vec<FieldInfo> = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let attrs = parse_field_attrs(&field.attrs)?;
        let column_name = attrs
            .name
            .unwrap_or_else(|| field_name.to_string().trim_start_matches("r#").to_string());

        if let Some(other) = field_infos.iter().find(|f| f.column_name == column_name) {
            return Err(syn::Error::new_spanned(
                field,
                format!(
                    "column `{column_name}` is already used by field `{}`",
                    other.field_name
                ),
            ));
        }

        field_infos.push(FieldInfo {
            field_name,
            field_type: field.ty.clone(),
            column_name,
            skip_update: attrs.skip_update,
        });
    }

    let descriptors: Vec<TokenStream2> = field_infos
        .iter()
        .map(|info| {
            let name = info.field_name.to_string();
            let name = name.trim_start_matches("r#");
            let column = &info.column_name;
            if info.skip_update {
                quote! {
                    ::gql_core::builder::FieldDescriptor::new(#name, #column).skip_update()
                }
            } else {
                quote! {
                    ::gql_core::builder::FieldDescriptor::new(#name, #column)
                }
            }
        })
        .collect();

    let accessor_arms: Vec<TokenStream2> = field_infos
        .iter()
        .enumerate()
        .filter(|(_, info)| !info.skip_update)
        .map(|(index, info)| {
            let field_name = &info.field_name;
            quote! {
                #index => ::core::option::Option::Some(&self.#field_name),
            }
        })
        .collect();

    let mut generics = input.generics.clone();
    if input.generics.type_params().next().is_some() {
        let where_clause = generics.make_where_clause();
        for info in field_infos.iter().filter(|f| !f.skip_update) {
            let ty = &info.field_type;
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::gql_core::builder::Valuer));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::gql_core::builder::Record for #struct_name #ty_generics #where_clause {
            const FIELDS: &'static [::gql_core::builder::FieldDescriptor] = &[
                #(#descriptors),*
            ];

            fn field(
                &self,
                index: usize,
            ) -> ::core::option::Option<&dyn ::gql_core::builder::Valuer> {
                match index {
                    #(#accessor_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::gql_core::builder::UpdatePayload for #struct_name #ty_generics #where_clause {
            fn payload(&self) -> ::gql_core::builder::Payload<'_> {
                ::gql_core::builder::Payload::record(self)
            }
        }
    };

    Ok(expanded)
}

struct FieldInfo {
    field_name: Ident,
    field_type: Type,
    column_name: String,
    skip_update: bool,
}

#[derive(Default)]
struct FieldAttrs {
    name: Option<String>,
    skip_update: bool,
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("db") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.name = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported db attribute, expected `name = \"...\"`"))
                }
            })?;
        } else if attr.path().is_ident("gql") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip_update") {
                    result.skip_update = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported gql attribute, expected `skip_update`"))
                }
            })?;
        }
    }

    Ok(result)
}
