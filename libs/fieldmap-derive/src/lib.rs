use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Keys written by `export_state` under the default `StateConfig`.
const RESERVED_KEYS: &[&str] = &["type_name", "module_path"];

/// Derive macro for fixed-schema records.
///
/// Implements `fieldmap::Record` on a struct with named fields: a static
/// schema (field names and declared types, in declaration order) plus
/// positional read/write of every field through `fieldmap::Value`. Every
/// field type must implement `fieldmap::FieldValue`.
///
/// Container attributes:
///
/// - `#[record(type_name = "...")]`: type identifier written into exported
///   state (defaults to the struct name).
/// - `#[record(nested)]`: also implement `FieldValue`, so the record can be
///   a field of another record. Requires `Default`.
///
/// Field attributes:
///
/// - `#[record(rename = "...")]`: mapping key for the field. `type_name` and
///   `module_path` are reserved and rejected as keys.
///
/// Iterating `&record` yields its keys.
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Clone, Default)]
/// #[record(nested)]
/// pub struct Point {
///     pub x: i64,
///     #[record(rename = "y-axis")]
///     pub y: i64,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Record only supports structs",
            ))
        }
    };

    // Parse #[record(...)] on the struct.
    let mut type_name = name.to_string();
    let mut nested = false;

    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("type_name") {
                let value: LitStr = meta.value()?.parse()?;
                type_name = value.value();
            } else if meta.path.is_ident("nested") {
                nested = true;
            } else {
                return Err(meta.error("unknown record attribute (expected 'type_name' or 'nested')"));
            }
            Ok(())
        })?;
    }

    let mut schema_tokens = Vec::new();
    let mut get_tokens = Vec::new();
    let mut set_tokens = Vec::new();
    let mut export_tokens = Vec::new();
    let mut keys: Vec<String> = Vec::new();

    for (position, field) in fields.iter().enumerate() {
        let field_ident = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "expected named field")
        })?;
        let field_ty = &field.ty;

        // Parse #[record(...)] on the field.
        let mut key = field_ident.to_string();
        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    key = value.value();
                } else {
                    return Err(meta.error("unknown record field attribute (expected 'rename')"));
                }
                Ok(())
            })?;
        }

        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(syn::Error::new_spanned(
                field_ident,
                format!(
                    "record key '{key}' is reserved for exported state, \
                     use #[record(rename = \"...\")] to pick another key"
                ),
            ));
        }

        if keys.contains(&key) {
            return Err(syn::Error::new_spanned(
                field_ident,
                format!("duplicate record key '{key}'"),
            ));
        }
        keys.push(key.clone());

        let ty_str = quote!(#field_ty).to_string().replace(' ', "");

        schema_tokens.push(quote! {
            ::fieldmap::Field {
                name: #key,
                type_name: #ty_str,
            }
        });

        get_tokens.push(quote! {
            #position => ::core::option::Option::Some(
                ::fieldmap::FieldValue::to_value(&self.#field_ident)
            ),
        });

        set_tokens.push(quote! {
            #position => {
                self.#field_ident = ::fieldmap::FieldValue::from_value(value)
                    .map_err(|e| e.with_context(#key))?;
                ::core::result::Result::Ok(())
            }
        });

        export_tokens.push(quote! {
            #position => ::fieldmap::FieldValue::as_export(&self.#field_ident),
        });
    }

    let field_count = keys.len();

    let field_value_impl = if nested {
        quote! {
            impl ::fieldmap::FieldValue for #name {
                fn to_value(&self) -> ::fieldmap::Value {
                    ::fieldmap::Value::Map(
                        ::fieldmap::RecordMapping::items(self)
                            .map(|(k, v)| (::std::string::ToString::to_string(k), v))
                            .collect(),
                    )
                }

                fn from_value(value: ::fieldmap::Value) -> ::fieldmap::Result<Self> {
                    match value {
                        ::fieldmap::Value::Map(entries) => {
                            let mut record = <Self as ::core::default::Default>::default();
                            let config = ::fieldmap::StateConfig::default();
                            ::fieldmap::RecordMapping::update(
                                &mut record,
                                entries.into_iter().filter(|(k, _)| !config.is_reserved(k)),
                            )?;
                            ::core::result::Result::Ok(record)
                        }
                        other => ::core::result::Result::Err(
                            ::fieldmap::RecordError::invalid_value(
                                "",
                                ::std::format!("expected map, found {}", other.kind()),
                            ),
                        ),
                    }
                }

                fn as_export(&self) -> ::core::option::Option<&dyn ::fieldmap::ExportState> {
                    ::core::option::Option::Some(self)
                }
            }
        }
    } else {
        quote! {}
    };

    let expanded = quote! {
        impl ::fieldmap::Record for #name {
            fn schema(&self) -> &'static ::fieldmap::Schema {
                static SCHEMA: ::fieldmap::Schema = ::fieldmap::Schema {
                    type_name: #type_name,
                    module_path: ::core::module_path!(),
                    fields: &[
                        #(#schema_tokens),*
                    ],
                };
                &SCHEMA
            }

            fn field(&self, position: usize) -> ::core::option::Option<::fieldmap::Value> {
                match position {
                    #(#get_tokens)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                position: usize,
                value: ::fieldmap::Value,
            ) -> ::fieldmap::Result<()> {
                match position {
                    #(#set_tokens)*
                    _ => ::core::result::Result::Err(::fieldmap::RecordError::IndexOutOfRange {
                        index: <i64 as ::core::convert::TryFrom<usize>>::try_from(position)
                            .unwrap_or(i64::MAX),
                        len: #field_count,
                    }),
                }
            }

            fn field_export(
                &self,
                position: usize,
            ) -> ::core::option::Option<&dyn ::fieldmap::ExportState> {
                match position {
                    #(#export_tokens)*
                    _ => ::core::option::Option::None,
                }
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }
        }

        impl<'a> ::core::iter::IntoIterator for &'a #name {
            type Item = &'static str;
            type IntoIter = ::fieldmap::iter::Keys;

            fn into_iter(self) -> Self::IntoIter {
                ::fieldmap::RecordMapping::keys(self)
            }
        }

        #field_value_impl
    };

    Ok(TokenStream::from(expanded))
}
