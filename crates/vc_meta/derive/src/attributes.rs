//! Parse `#[meta(...)]` attributes.

use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, LitStr, Token, Type, parenthesized};

use crate::META_ATTRIBUTE_NAME;

/// Calls `parser` for every item of every `#[meta(...)]` attribute.
fn for_each_meta_item(
    attrs: &[Attribute],
    mut parser: impl FnMut(ParseNestedMeta) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if attr.path().is_ident(META_ATTRIBUTE_NAME) {
            attr.parse_nested_meta(&mut parser)?;
        }
    }
    Ok(())
}

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate attribute"));
    }
    *slot = Some(value);
    Ok(())
}

// -----------------------------------------------------------------------------
// Type Attributes

/// Attributes on the type.
///
/// - `#[meta(name = "...")]`
/// - `#[meta(ctor(Type, ...))]`
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub name: Option<LitStr>,
    pub ctor: Option<Vec<Type>>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_meta_item(attrs, |meta| {
            if meta.path.is_ident("name") {
                let name: LitStr = meta.value()?.parse()?;
                set_once(&mut this.name, name, &meta)
            } else if meta.path.is_ident("ctor") {
                let content;
                parenthesized!(content in meta.input);
                let args = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                if args.is_empty() {
                    return Err(meta.error("`ctor` expects at least one argument type"));
                }
                set_once(&mut this.ctor, args.into_iter().collect(), &meta)
            } else {
                Err(meta.error("unsupported type attribute, expected `name` or `ctor`"))
            }
        })?;
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Field Attributes

/// How the generated member reaches the field.
pub(crate) enum FieldAccess {
    Field,
    Value {
        get: Expr,
        set: Option<Expr>,
    },
    Ref {
        get: Expr,
        set: Option<Expr>,
        get_mut: Option<Expr>,
    },
}

/// Attributes on a field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub skip: bool,
    pub rename: Option<LitStr>,
    pub as_enum: bool,
    pub symbols: Vec<(LitStr, Expr)>,
    get: Option<Expr>,
    set: Option<Expr>,
    get_ref: Option<Expr>,
    set_ref: Option<Expr>,
    get_mut: Option<Expr>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_meta_item(attrs, |meta| this.parse_item(meta))?;
        Ok(this)
    }

    fn parse_item(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let Some(ident) = meta.path.get_ident() else {
            return Err(meta.error("expected an identifier"));
        };

        match ident.to_string().as_str() {
            "skip" => {
                self.skip = true;
                Ok(())
            }
            "as_enum" => {
                self.as_enum = true;
                Ok(())
            }
            "rename" => {
                let name: LitStr = meta.value()?.parse()?;
                set_once(&mut self.rename, name, &meta)
            }
            "symbol" => {
                let content;
                parenthesized!(content in meta.input);
                let name: LitStr = content.parse()?;
                content.parse::<Token![,]>()?;
                let value: Expr = content.parse()?;
                self.symbols.push((name, value));
                Ok(())
            }
            "get" => {
                let expr = meta.value()?.parse()?;
                set_once(&mut self.get, expr, &meta)
            }
            "set" => {
                let expr = meta.value()?.parse()?;
                set_once(&mut self.set, expr, &meta)
            }
            "get_ref" => {
                let expr = meta.value()?.parse()?;
                set_once(&mut self.get_ref, expr, &meta)
            }
            "set_ref" => {
                let expr = meta.value()?.parse()?;
                set_once(&mut self.set_ref, expr, &meta)
            }
            "get_mut" => {
                let expr = meta.value()?.parse()?;
                set_once(&mut self.get_mut, expr, &meta)
            }
            _ => Err(meta.error(
                "unsupported field attribute, expected one of \
                `skip`, `rename`, `get`, `set`, `get_ref`, `set_ref`, `get_mut`, `symbol`, `as_enum`",
            )),
        }
    }

    /// Returns `true` if the field is registered as an enum member.
    #[inline]
    pub fn is_enum(&self) -> bool {
        self.as_enum || !self.symbols.is_empty()
    }

    /// Resolves the accessor attributes into one access strategy.
    pub fn access(&mut self) -> syn::Result<FieldAccess> {
        let value = self.get.is_some() || self.set.is_some();
        let reference = self.get_ref.is_some() || self.set_ref.is_some() || self.get_mut.is_some();

        if value && reference {
            let span = self
                .get
                .as_ref()
                .or(self.set.as_ref())
                .map(Spanned::span)
                .unwrap_or_else(proc_macro2::Span::call_site);
            return Err(syn::Error::new(
                span,
                "value accessors (`get`, `set`) and reference accessors \
                (`get_ref`, `set_ref`, `get_mut`) cannot be mixed",
            ));
        }

        if value {
            return match self.get.take() {
                Some(get) => Ok(FieldAccess::Value {
                    get,
                    set: self.set.take(),
                }),
                None => Err(missing_reader(self.set.as_ref(), "set", "get")),
            };
        }

        if reference {
            return match self.get_ref.take() {
                Some(get) => Ok(FieldAccess::Ref {
                    get,
                    set: self.set_ref.take(),
                    get_mut: self.get_mut.take(),
                }),
                None => Err(missing_reader(
                    self.set_ref.as_ref().or(self.get_mut.as_ref()),
                    "set_ref` or `get_mut",
                    "get_ref",
                )),
            };
        }

        Ok(FieldAccess::Field)
    }
}

fn missing_reader(at: Option<&Expr>, writer: &str, reader: &str) -> syn::Error {
    let span = at
        .map(Spanned::span)
        .unwrap_or_else(proc_macro2::Span::call_site);
    syn::Error::new(span, format!("`{writer}` requires `{reader}`"))
}
