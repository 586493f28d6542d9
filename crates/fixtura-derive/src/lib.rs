//! Fixtura derive macros: mockable traits.
//!
//! `#[mockable]` on a trait keeps the trait as written and generates:
//!
//! - `impl fixtura::Mockable for dyn Trait`, listing the trait's methods and
//!   then those of the traits named in `extends(...)`
//! - `impl Trait for fixtura::Mock`, where every method records its
//!   arguments (`Debug`-formatted) on the spy of the same name and returns
//!   whatever that spy is configured to return
//!
//! # Example
//!
//! ```ignore
//! use fixtura::{create_mock, mockable};
//!
//! #[mockable]
//! trait Repository {
//!     fn find(&self, id: u32) -> Option<String>;
//! }
//!
//! #[mockable(extends(Repository), name = "UserRepository")]
//! trait UserRepository: Repository {
//!     fn count(&self) -> usize;
//! }
//!
//! let mock = create_mock::<dyn UserRepository>();
//! mock.spy("count").and_return(3_usize);
//! assert_eq!(mock.count(), 3);
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, FnArg, ItemTrait, LitStr, Pat, PatIdent, Path, Token, TraitItem};

/// Attribute macro generating a mock implementation of a trait.
///
/// # Attributes
///
/// - `extends(Parent, ...)` - parent traits, themselves `#[mockable]`
/// - `name = "..."` - override the mock name (defaults to the trait name)
///
/// Generic traits, generic or `async` methods, methods without a `self`
/// receiver, and associated types or constants are rejected.
#[proc_macro_attribute]
pub fn mockable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match MockableArgs::parse(attr.into()) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };
    let item = parse_macro_input!(item as ItemTrait);
    match expand(&args, &item) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Parsed `#[mockable(...)]` arguments
#[derive(Default)]
struct MockableArgs {
    parents: Vec<Path>,
    name: Option<String>,
}

impl MockableArgs {
    fn parse(tokens: TokenStream2) -> syn::Result<Self> {
        let mut args = Self::default();
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("extends") {
                let content;
                syn::parenthesized!(content in meta.input);
                let parents = Punctuated::<Path, Token![,]>::parse_terminated(&content)?;
                args.parents.extend(parents);
                Ok(())
            } else if meta.path.is_ident("name") {
                let name: LitStr = meta.value()?.parse()?;
                args.name = Some(name.value());
                Ok(())
            } else {
                Err(meta.error("expected `extends(...)` or `name = \"...\"`"))
            }
        });
        parser.parse2(tokens)?;
        Ok(args)
    }
}

fn expand(args: &MockableArgs, item: &ItemTrait) -> syn::Result<TokenStream2> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[mockable] does not support generic traits",
        ));
    }
    let trait_name = &item.ident;
    let mock_name = args
        .name
        .clone()
        .unwrap_or_else(|| trait_name.to_string());

    let mut method_names = Vec::new();
    let mut methods = Vec::new();
    for trait_item in &item.items {
        let TraitItem::Fn(method) = trait_item else {
            return Err(syn::Error::new_spanned(
                trait_item,
                "#[mockable] traits may only contain methods",
            ));
        };
        let sig = &method.sig;
        if !sig.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &sig.generics,
                "#[mockable] does not support generic methods",
            ));
        }
        if sig.asyncness.is_some() {
            return Err(syn::Error::new_spanned(
                sig,
                "#[mockable] does not support async methods",
            ));
        }
        if sig.receiver().is_none() {
            return Err(syn::Error::new_spanned(
                sig,
                "#[mockable] methods need a `self` receiver",
            ));
        }

        let method_name = sig.ident.to_string();
        let mut sig = sig.clone();
        let mut arg_names = Vec::new();
        for (i, input) in sig.inputs.iter_mut().enumerate() {
            if let FnArg::Typed(typed) = input {
                let arg = format_ident!("arg{}", i);
                *typed.pat = Pat::Ident(PatIdent {
                    attrs: Vec::new(),
                    by_ref: None,
                    mutability: None,
                    ident: arg.clone(),
                    subpat: None,
                });
                arg_names.push(arg);
            }
        }
        methods.push(quote! {
            #sig {
                self.spy(#method_name).invoke(::std::vec![
                    #(::std::format!("{:?}", #arg_names)),*
                ])
            }
        });
        method_names.push(method_name);
    }

    let parents = &args.parents;
    Ok(quote! {
        #item

        impl ::fixtura::Mockable for dyn #trait_name {
            const NAME: &'static str = #mock_name;

            fn method_names() -> ::std::vec::Vec<&'static str> {
                ::fixtura::merge_method_names(&[
                    ::std::vec![#(#method_names),*],
                    #(<dyn #parents as ::fixtura::Mockable>::method_names()),*
                ])
            }
        }

        impl #trait_name for ::fixtura::Mock {
            #(#methods)*
        }
    })
}
