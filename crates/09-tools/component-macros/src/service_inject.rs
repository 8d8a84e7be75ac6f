//! `ServiceInject` 派生实现

use crate::utils::{attribute_args, take_crate_path};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Meta, Path, Result};

/// 服务生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ServiceLifetime {
    Singleton,
    #[default]
    Scoped,
    Transient,
}

fn parse_lifetime(args: Vec<Meta>) -> Result<ServiceLifetime> {
    let mut lifetime = None;

    for meta in args {
        let Meta::Path(path) = &meta else {
            return Err(syn::Error::new_spanned(
                &meta,
                "期望 singleton、scoped 或 transient",
            ));
        };

        let parsed = if path.is_ident("singleton") {
            ServiceLifetime::Singleton
        } else if path.is_ident("scoped") {
            ServiceLifetime::Scoped
        } else if path.is_ident("transient") {
            ServiceLifetime::Transient
        } else {
            return Err(syn::Error::new_spanned(
                path,
                "未知的生命周期, 期望 singleton、scoped 或 transient",
            ));
        };

        if lifetime.replace(parsed).is_some() {
            return Err(syn::Error::new_spanned(path, "生命周期只能声明一次"));
        }
    }

    Ok(lifetime.unwrap_or_default())
}

pub fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let (krate, args): (Path, Vec<Meta>) =
        take_crate_path(attribute_args(&input.attrs, "service_inject")?)?;
    let lifetime = match parse_lifetime(args)? {
        ServiceLifetime::Singleton => quote! { #krate::Lifetime::Singleton },
        ServiceLifetime::Scoped => quote! { #krate::Lifetime::Scoped },
        ServiceLifetime::Transient => quote! { #krate::Lifetime::Transient },
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::ServiceInject for #name #ty_generics #where_clause {
            const LIFETIME: #krate::Lifetime = #lifetime;
        }
    })
}
