//! Attribute macro for declaring trialrun test groups.
//!
//! `#[test_group]` goes on an inherent `impl` block. It scans the methods for tag attributes, removes the
//! recognized ones and implements `trialrun::TestGroup` with one declared unit per tagged method:
//!
//! - `#[test]`, `#[test(name = "...", order = N)]`
//! - `#[order]`, `#[order(N)]`, `#[order(value = N)]`
//! - `#[disabled]`
//! - `#[before_each]`, `#[after_each]`, `#[before_suite]`, `#[after_suite]`
//!
//! A method with a `self` receiver becomes an instance-scope unit, any other method a suite-scope unit. The macro
//! does not validate scopes or tag combinations; the runner does that when the group is collected, so a malformed
//! group fails its run with a structural error instead of failing to compile.
//!
//! Other attributes on a tagged method stay on the method and are recorded as unknown tags, except `cfg`, which
//! is copied onto the registration so a compiled-out method is not declared. Methods without any recognized tag
//! are left alone.
//!
//! # Example
//! ```ignore
//! #[derive(Default)]
//! struct CommonTest;
//!
//! #[test_group]
//! impl CommonTest {
//!     #[before_suite]
//!     fn start_up_suite() {}
//!
//!     #[test]
//!     #[order(7)]
//!     fn simple_test(&mut self) -> AssertResult {
//!         assert_equals(1, 1)
//!     }
//! }
//!
//! // Generates:
//! impl ::trialrun::TestGroup for CommonTest {
//!     fn declare() -> ::trialrun::GroupDecl<Self> {
//!         let decl = ::trialrun::GroupDecl::new("CommonTest").factory_default();
//!         let decl = decl.unit("start_up_suite", ::trialrun::UnitBody::suite(|| Self::start_up_suite()), [...]);
//!         let decl = decl.unit("simple_test", ::trialrun::UnitBody::instance(|this: &mut Self| Self::simple_test(this)), [...]);
//!         decl
//!     }
//! }
//! ```
//!
//! # Arguments
//!
//! - `name = "..."`: group name (default: the type name)
//! - `factory = expr`: zero-argument constructor, e.g. `factory = Self::new` (default: `Default::default`)
//! - `no_factory`: declare no construction path; any enabled test aborts the run

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::ParseStream;
use syn::{Attribute, Expr, ImplItem, ItemImpl, LitInt, LitStr, Meta, Token, Type, parse_macro_input};
use trialrun_core::tags::{self, TagId};

#[proc_macro_attribute]
pub fn test_group(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut group_args = GroupArgs::default();
    let parser = syn::meta::parser(|meta| group_args.parse(meta));
    parse_macro_input!(args with parser);
    let mut item = parse_macro_input!(input as ItemImpl);

    match expand(group_args, &mut item) {
        Ok(tokens) => tokens.into(),
        Err(err) => {
            let err = err.to_compile_error();
            quote!(#item #err).into()
        }
    }
}

#[derive(Default)]
enum FactoryArg {
    #[default]
    Default,
    Custom(Expr),
    Missing,
}

#[derive(Default)]
struct GroupArgs {
    name: Option<LitStr>,
    factory: FactoryArg,
}

impl GroupArgs {
    fn parse(&mut self, meta: syn::meta::ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            self.name = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("factory") {
            self.factory = FactoryArg::Custom(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("no_factory") {
            self.factory = FactoryArg::Missing;
            Ok(())
        } else {
            Err(meta.error("unsupported test_group argument; expected `name`, `factory` or `no_factory`"))
        }
    }
}

fn expand(args: GroupArgs, item: &mut ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[test_group] goes on an inherent impl block, not a trait impl",
        ));
    }

    let mut units = Vec::new();
    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };

        let mut tags = Vec::new();
        let mut recognized = false;
        let mut cfgs = Vec::new();
        let mut kept = Vec::new();
        for attr in method.attrs.drain(..) {
            if attr.path().is_ident("doc") {
                kept.push(attr);
                continue;
            }
            if attr.path().is_ident("cfg") {
                cfgs.push(attr.clone());
                kept.push(attr);
                continue;
            }
            let spelling = path_to_string(&attr);
            match tags::from_str(&spelling) {
                Some(id) => {
                    recognized = true;
                    tags.push(tag_tokens(id, &attr)?);
                }
                None => {
                    tags.push(quote!(::trialrun::Tag::unknown(#spelling)));
                    kept.push(attr);
                }
            }
        }
        method.attrs = kept;

        if !recognized {
            continue;
        }

        let ident = &method.sig.ident;
        let ident_str = ident.to_string();
        let body = if method.sig.receiver().is_some() {
            quote!(::trialrun::UnitBody::instance(|this: &mut Self| Self::#ident(this)))
        } else {
            quote!(::trialrun::UnitBody::suite(|| Self::#ident()))
        };
        units.push(quote! {
            #(#cfgs)*
            let decl = decl.unit(#ident_str, #body, [#(#tags),*]);
        });
    }

    let self_ty = &item.self_ty;
    let name = match &args.name {
        Some(name) => name.value(),
        None => type_name(self_ty),
    };
    let factory = match &args.factory {
        FactoryArg::Default => quote!(.factory_default()),
        FactoryArg::Custom(expr) => quote!(.factory(#expr)),
        FactoryArg::Missing => quote!(),
    };
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();

    Ok(quote! {
        #item

        impl #impl_generics ::trialrun::TestGroup for #self_ty #where_clause {
            #[allow(clippy::let_and_return)]
            fn declare() -> ::trialrun::GroupDecl<Self> {
                let decl: ::trialrun::GroupDecl<Self> = ::trialrun::GroupDecl::new(#name) #factory;
                #(#units)*
                decl
            }
        }
    })
}

fn path_to_string(attr: &Attribute) -> String {
    attr.path()
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

fn type_name(ty: &Type) -> String {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident.to_string();
        }
    }
    quote!(#ty).to_string()
}

fn tag_tokens(id: TagId, attr: &Attribute) -> syn::Result<TokenStream2> {
    match id {
        TagId::Test => test_tag(attr),
        TagId::Order => order_tag(attr),
        TagId::Disabled => {
            require_bare(id, attr)?;
            Ok(quote!(::trialrun::Tag::Disabled))
        }
        TagId::BeforeEach => {
            require_bare(id, attr)?;
            Ok(quote!(::trialrun::Tag::BeforeEach))
        }
        TagId::AfterEach => {
            require_bare(id, attr)?;
            Ok(quote!(::trialrun::Tag::AfterEach))
        }
        TagId::BeforeSuite => {
            require_bare(id, attr)?;
            Ok(quote!(::trialrun::Tag::BeforeSuite))
        }
        TagId::AfterSuite => {
            require_bare(id, attr)?;
            Ok(quote!(::trialrun::Tag::AfterSuite))
        }
    }
}

fn require_bare(id: TagId, attr: &Attribute) -> syn::Result<()> {
    match &attr.meta {
        Meta::Path(_) => Ok(()),
        _ => Err(syn::Error::new_spanned(
            attr,
            format!("`{}` takes no arguments", tags::as_str(id)),
        )),
    }
}

fn test_tag(attr: &Attribute) -> syn::Result<TokenStream2> {
    let mut name: Option<String> = None;
    let mut order: Option<i32> = None;

    match &attr.meta {
        Meta::Path(_) => {}
        Meta::List(_) => attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(tags::TEST_NAME_ARG) {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident(tags::TEST_ORDER_ARG) {
                order = Some(parse_int(meta.value()?)?);
                Ok(())
            } else {
                Err(meta.error("unsupported test attribute; expected `name` or `order`"))
            }
        })?,
        Meta::NameValue(_) => {
            return Err(syn::Error::new_spanned(
                attr,
                "use `#[test(name = \"...\", order = N)]`",
            ));
        }
    }

    let name = match name {
        Some(name) => quote!(::core::option::Option::Some(::std::string::String::from(#name))),
        None => quote!(::core::option::Option::None),
    };
    let order = match order {
        Some(order) => quote!(::core::option::Option::Some(#order)),
        None => quote!(::core::option::Option::None),
    };
    Ok(quote!(::trialrun::Tag::Test { name: #name, order: #order }))
}

fn order_tag(attr: &Attribute) -> syn::Result<TokenStream2> {
    match &attr.meta {
        Meta::Path(_) => Ok(quote!(::trialrun::Tag::bare_order())),
        Meta::List(_) => {
            let value = attr.parse_args_with(|input: ParseStream| {
                if input.peek(syn::Ident) {
                    let key: syn::Ident = input.parse()?;
                    if key != tags::ORDER_VALUE_ARG {
                        return Err(syn::Error::new(key.span(), "expected `value = N` or `N`"));
                    }
                    input.parse::<Token![=]>()?;
                }
                parse_int(input)
            })?;
            Ok(quote!(::trialrun::Tag::Order { value: #value }))
        }
        Meta::NameValue(_) => Err(syn::Error::new_spanned(attr, "use `#[order(N)]`")),
    }
}

/// Parse an optionally negative integer literal that fits an `i32`.
fn parse_int(input: ParseStream) -> syn::Result<i32> {
    let negative = input.peek(Token![-]);
    if negative {
        input.parse::<Token![-]>()?;
    }
    let lit: LitInt = input.parse()?;
    let value: i64 = lit.base10_parse()?;
    let value = if negative { -value } else { value };
    i32::try_from(value).map_err(|_| syn::Error::new(lit.span(), "order value does not fit an i32"))
}
