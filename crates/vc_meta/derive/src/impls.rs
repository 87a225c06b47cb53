use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, GenericParam, Generics, Index, Member, parse_quote};

use crate::attributes::{FieldAccess, FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// Generics

/// Adds a `'static` bound to every type parameter.
fn static_generics(generics: &Generics) -> syn::Result<Generics> {
    let mut generics = generics.clone();
    for param in &mut generics.params {
        match param {
            GenericParam::Type(ty) => ty.bounds.push(parse_quote!('static)),
            GenericParam::Lifetime(lt) => {
                return Err(syn::Error::new(
                    lt.span(),
                    "member registration requires a `'static` type, lifetime parameters are not supported",
                ));
            }
            GenericParam::Const(_) => {}
        }
    }
    Ok(generics)
}

// -----------------------------------------------------------------------------
// Meta

/// Generate the `Meta` implementation of a struct.
pub(crate) fn impl_meta(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &ast.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "`Meta` can only be derived for structs, use `MetaEnum` for enum value types",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "`Meta` cannot be derived for unions",
            ));
        }
    };

    let type_attributes = TypeAttributes::parse_attrs(&ast.attrs)?;

    let vc_meta_path = crate::path::vc_meta();
    let meta_ = crate::path::meta_(&vc_meta_path);
    let members_ = crate::path::members_(&vc_meta_path);
    let registry_ = crate::path::registry_(&vc_meta_path);

    let mut members = Vec::with_capacity(fields.len());
    let mut uses_registry = false;
    for (index, field) in fields.iter().enumerate() {
        if let Some((member, is_enum)) = member_expr(&vc_meta_path, index, field)? {
            uses_registry |= is_enum;
            members.push(member);
        }
    }

    let type_name = type_attributes.name.map(|name| {
        quote! {
            #[inline]
            fn type_name() -> &'static str {
                #name
            }
        }
    });

    let constructor = type_attributes.ctor.map(|args| {
        let constructor_arg_ = crate::path::constructor_arg_(&vc_meta_path);
        quote! {
            .with_constructor([#(#constructor_arg_::of::<#args>()),*])
        }
    });

    let init = if members.is_empty() {
        quote! { #members_::new() }
    } else {
        let capacity = members.len();
        quote! { #members_::with_capacity(#capacity) }
    };

    let registry = if uses_registry {
        quote! { registry }
    } else {
        quote! { _registry }
    };

    let register_members = quote! {
        fn register_members(#registry: &#registry_) -> #members_<Self> {
            #init
                #(.with(#members))*
                #constructor
        }
    };

    let ident = &ast.ident;
    let generics = static_generics(&ast.generics)?;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #meta_ for #ident #ty_generics #where_clause {
            #type_name

            #register_members
        }
    })
}

/// Generate the member expression of one field, `None` if it is skipped.
///
/// The flag is set for enum members, whose expression reads the `registry`
/// argument of `register_members`.
fn member_expr(
    vc_meta_path: &syn::Path,
    index: usize,
    field: &Field,
) -> syn::Result<Option<(TokenStream, bool)>> {
    let mut attrs = FieldAttributes::parse_attrs(&field.attrs)?;
    if attrs.skip {
        return Ok(None);
    }

    let member = match &field.ident {
        Some(ident) => Member::Named(ident.clone()),
        None => Member::Unnamed(Index::from(index)),
    };

    let name = match (&attrs.rename, &member) {
        (Some(rename), _) => rename.value(),
        (None, Member::Named(ident)) => ident.unraw().to_string(),
        (None, Member::Unnamed(index)) => index.index.to_string(),
    };

    let member_ = crate::path::member_(vc_meta_path);
    let ty = &field.ty;

    let expr = match attrs.access()? {
        FieldAccess::Field => quote! {
            #member_::<Self, #ty>::field(
                #name,
                |this: &Self| &this.#member,
                |this: &mut Self| &mut this.#member,
            )
        },
        FieldAccess::Value { get, set: Some(set) } => quote! {
            #member_::<Self, #ty>::value(#name, #get, #set)
        },
        FieldAccess::Value { get, set: None } => quote! {
            #member_::<Self, #ty>::value_read_only(#name, #get)
        },
        FieldAccess::Ref { get, set, get_mut } => {
            let base = match set {
                Some(set) => quote! { #member_::<Self, #ty>::reference(#name, #get, #set) },
                None => quote! { #member_::<Self, #ty>::reference_read_only(#name, #get) },
            };
            match get_mut {
                Some(get_mut) => quote! { #base.with_mut_getter(#get_mut) },
                None => base,
            }
        }
    };

    if !attrs.is_enum() {
        return Ok(Some((expr, false)));
    }

    let enum_member_ = crate::path::enum_member_(vc_meta_path);
    let symbols = attrs
        .symbols
        .iter()
        .map(|(name, value)| quote! { .symbol(#name, #value) });

    Ok(Some((
        quote! {
            #enum_member_::<Self, #ty>::new(#expr, registry.symbol_table::<Self, #ty>())
                #(#symbols)*
        },
        true,
    )))
}

// -----------------------------------------------------------------------------
// MetaEnum

/// Generate the `MetaEnum` implementation of an enum.
pub(crate) fn impl_meta_enum(ast: &DeriveInput) -> syn::Result<TokenStream> {
    if !matches!(ast.data, Data::Enum(_)) {
        return Err(syn::Error::new(
            ast.ident.span(),
            "`MetaEnum` can only be derived for enums",
        ));
    }

    let vc_meta_path = crate::path::vc_meta();
    let meta_enum_ = crate::path::meta_enum_(&vc_meta_path);

    let ident = &ast.ident;
    let generics = static_generics(&ast.generics)?;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #meta_enum_ for #ident #ty_generics #where_clause {}
    })
}
