use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, GenericParam, parse_macro_input, parse_quote};

/// Derive macro for implementing `Message` trait.
///
/// Only structs are messages: named-field, tuple and unit structs are
/// accepted, enums and unions are rejected at compile time. Type parameters
/// get `Send + Sync + 'static` bounds.
///
/// The generated impl names `::msgmux::Message`, so the deriving crate must
/// depend on `msgmux`; crates that only depend on `msgmux-core` write
/// `impl Message for T {}` instead.
#[proc_macro_derive(Message)]
pub fn derive_message(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);

    let rejected = match &input.data {
        Data::Struct(_) => None,
        Data::Enum(data) => Some(syn::Error::new_spanned(
            data.enum_token,
            "`Message` can only be derived for structs; enums are not message records",
        )),
        Data::Union(data) => Some(syn::Error::new_spanned(
            data.union_token,
            "`Message` can only be derived for structs; unions are not message records",
        )),
    };
    if let Some(err) = rejected {
        return err.to_compile_error().into();
    }

    for param in &mut input.generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::core::marker::Send));
            ty.bounds.push(parse_quote!(::core::marker::Sync));
            ty.bounds.push(parse_quote!('static));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::msgmux::Message for #name #ty_generics #where_clause {
            const KIND: ::msgmux::MessageKind = ::msgmux::MessageKind::Record;
        }
    };

    TokenStream::from(expanded)
}
