use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, LitStr, Visibility};

/// Derive macro generating the field-accessor table of a struct.
///
/// Implements `injector::Reflect` and `injector::Struct` for the annotated
/// struct. Every field type must itself implement `Reflect` (the supported
/// scalars, `String`, or another derived struct).
///
/// - `pub` fields can be written through a path; other fields can be found
///   but are reported as not settable.
/// - `#[inject(rename = "IQ")]` on a field sets its lookup name (default: the
///   field identifier).
/// - `#[inject(skip)]` on a field leaves it out of the table.
/// - `#[inject(rename = "Dog")]` on the struct sets its type name.
///
/// # Example
///
/// ```ignore
/// #[derive(Reflect, Default)]
/// pub struct Husky {
///     #[inject(rename = "IQ")]
///     pub iq: u8,
///
///     #[inject(skip)]
///     pub cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(inject))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

/// Parsed `#[inject(...)]` options.
#[derive(Default)]
struct InjectAttr {
    rename: Option<String>,
    skip: bool,
}

fn parse_inject_attr(attrs: &[Attribute]) -> Result<InjectAttr, syn::Error> {
    let mut parsed = InjectAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("inject") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.rename = Some(value.value());
            } else if meta.path.is_ident("skip") {
                parsed.skip = true;
            } else {
                return Err(meta.error("unknown inject option (expected `rename` or `skip`)"));
            }
            Ok(())
        })?;
    }
    Ok(parsed)
}

struct TableField<'a> {
    ident: &'a Ident,
    name: String,
    exported: bool,
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Reflect does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Reflect only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Reflect only supports structs",
            ))
        }
    };

    let type_name = parse_inject_attr(&input.attrs)?
        .rename
        .unwrap_or_else(|| name.to_string());

    let mut table = Vec::new();
    let mut seen = HashSet::new();
    for field in fields {
        let ident = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "expected named field")
        })?;
        let attr = parse_inject_attr(&field.attrs)?;
        if attr.skip {
            continue;
        }
        let field_name = attr.rename.unwrap_or_else(|| ident.to_string());
        if !seen.insert(field_name.clone()) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("duplicate field name '{field_name}'"),
            ));
        }
        table.push(TableField {
            ident,
            name: field_name,
            exported: matches!(field.vis, Visibility::Public(_)),
        });
    }

    let field_types = table.iter().map(|f| {
        let (ident, field_name, exported) = (f.ident, &f.name, f.exported);
        quote! {
            ::injector::FieldType::new(
                #field_name,
                ::injector::Reflect::reflect_type(&self.#ident),
                #exported,
            )
        }
    });

    let field_values = table.iter().map(|f| {
        let (ident, field_name) = (f.ident, &f.name);
        quote! {
            (#field_name.to_string(), ::injector::Reflect::to_value(&self.#ident))
        }
    });

    let field_names: Vec<&String> = table.iter().map(|f| &f.name).collect();

    let field_arms = table.iter().map(|f| {
        let (ident, field_name) = (f.ident, &f.name);
        quote! {
            #field_name => Some(&self.#ident as &dyn ::injector::Reflect),
        }
    });

    let field_mut_arms = table.iter().map(|f| {
        let (ident, field_name, exported) = (f.ident, &f.name, f.exported);
        quote! {
            #field_name => Some(::injector::FieldMut {
                value: &mut self.#ident,
                exported: #exported,
            }),
        }
    });

    let expanded = quote! {
        impl ::injector::Reflect for #name {
            fn reflect_type(&self) -> ::injector::Type {
                ::injector::Type::Struct(::injector::StructType::named(
                    #type_name,
                    vec![#(#field_types),*],
                ))
            }

            fn slot(&mut self) -> ::injector::Slot<'_> {
                ::injector::Slot::Struct(self)
            }

            fn to_value(&self) -> ::injector::Value {
                ::injector::Value::Struct(::injector::StructValue {
                    name: Some(#type_name.to_string()),
                    fields: vec![#(#field_values),*],
                })
            }

            fn as_struct(&self) -> Option<&dyn ::injector::Struct> {
                Some(self)
            }
        }

        impl ::injector::Struct for #name {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn field_names(&self) -> &'static [&'static str] {
                &[#(#field_names),*]
            }

            #[allow(unused_variables)]
            fn field(&self, name: &str) -> Option<&dyn ::injector::Reflect> {
                match name {
                    #(#field_arms)*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn field_mut(&mut self, name: &str) -> Option<::injector::FieldMut<'_>> {
                match name {
                    #(#field_mut_arms)*
                    _ => None,
                }
            }
        }
    };

    Ok(TokenStream::from(expanded))
}
