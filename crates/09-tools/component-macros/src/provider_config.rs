//! `ProviderConfig` 派生实现

use crate::utils::{attribute_args, string_value, take_crate_path};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Meta, Result};

fn parse_section(input: &DeriveInput, args: Vec<Meta>) -> Result<String> {
    let mut section = None;

    for meta in args {
        match &meta {
            Meta::NameValue(nv) if nv.path.is_ident("section") => {
                let value = string_value(&nv.value)?;
                if value.trim().is_empty() {
                    return Err(syn::Error::new_spanned(&nv.value, "配置节名称不能为空"));
                }
                if section.replace(value).is_some() {
                    return Err(syn::Error::new_spanned(&nv.path, "配置节只能声明一次"));
                }
            }
            other => {
                return Err(syn::Error::new_spanned(other, "期望 section = \"...\""));
            }
        }
    }

    Ok(section.unwrap_or_else(|| input.ident.to_string()))
}

pub fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let (krate, args) = take_crate_path(attribute_args(&input.attrs, "provider_config")?)?;
    let section = parse_section(input, args)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::ProviderConfig for #name #ty_generics #where_clause {
            const SECTION: &'static str = #section;
        }
    })
}
