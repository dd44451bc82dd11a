use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Derive macro for the `AsCompoundKey` trait.
///
/// Turns a named-field struct into its compound key: each field becomes a
/// named selector holding the field's value, in declaration order.
///
/// # Example
///
/// ```ignore
/// use compoundmap_core::AsCompoundKey;
///
/// #[derive(AsCompoundKey)]
/// struct Position {
///     row: u32,
///     col: u32,
/// }
/// ```
///
/// # Attributes
///
/// - `#[compound(skip)]` - Leave this field out of the key
/// - `#[compound(rename = "name")]` - Use a custom selector name
#[proc_macro_derive(AsCompoundKey, attributes(compound))]
pub fn derive_as_compound_key(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = named_fields(input)?;

    let field_calls: Vec<_> = fields
        .iter()
        .filter_map(|field| {
            let attrs = parse_field_attrs(&field.attrs);
            if attrs.skip {
                return None;
            }
            let ident = field.ident.as_ref()?;
            let selector = attrs.rename.unwrap_or_else(|| ident.to_string());
            Some(quote! {
                .field(
                    #selector,
                    ::compoundmap_core::Value::from(self.#ident.clone()),
                )
            })
        })
        .collect();

    Ok(quote! {
        impl #impl_generics ::compoundmap_core::AsCompoundKey for #name #ty_generics #where_clause {
            fn as_compound_key(&self) -> ::compoundmap_core::CompoundKey {
                ::compoundmap_core::CompoundKey::new()
                    #(#field_calls)*
            }
        }
    })
}

fn named_fields(input: &DeriveInput) -> syn::Result<&syn::punctuated::Punctuated<syn::Field, syn::Token![,]>> {
    match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(named) => Ok(&named.named),
            _ => Err(syn::Error::new_spanned(
                input,
                "AsCompoundKey requires named fields",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            "AsCompoundKey can only be derived for structs",
        )),
    }
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    rename: Option<String>,
}

fn parse_field_attrs(attrs: &[syn::Attribute]) -> FieldAttrs {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("compound") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.rename = Some(value.value());
            }
            Ok(())
        });
    }

    result
}
