//! 宏工具函数

use syn::{punctuated::Punctuated, Attribute, Expr, Lit, Meta, Path, Result, Token};

/// 收集指定名称的属性中的全部参数
///
/// 同名属性可以出现多次，参数按出现顺序合并。
pub fn attribute_args(attrs: &[Attribute], name: &str) -> Result<Vec<Meta>> {
    let mut args = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(name)) {
        let parsed = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        args.extend(parsed);
    }
    Ok(args)
}

/// 读取 `key = "value"` 形式的字符串参数
pub fn string_value(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.value()),
            other => Err(syn::Error::new_spanned(other, "期望字符串字面量")),
        },
        other => Err(syn::Error::new_spanned(other, "期望字符串字面量")),
    }
}

/// 取出 `crate = "path"` 参数，返回基础设施 crate 的路径和其余参数
///
/// 未声明时使用 `::infrastructure_common`。通过其他 crate 的重新导出使用派生宏时，
/// 可以写 `crate = "infrastructure_composition::infrastructure_common"`。
pub fn take_crate_path(args: Vec<Meta>) -> Result<(Path, Vec<Meta>)> {
    let mut crate_path = None;
    let mut rest = Vec::new();

    for meta in args {
        match &meta {
            Meta::NameValue(nv) if nv.path.is_ident("crate") => {
                let path: Path = syn::parse_str(&string_value(&nv.value)?)
                    .map_err(|e| syn::Error::new_spanned(&nv.value, e))?;
                if crate_path.replace(path).is_some() {
                    return Err(syn::Error::new_spanned(&nv.path, "crate 只能声明一次"));
                }
            }
            _ => rest.push(meta),
        }
    }

    Ok((
        crate_path.unwrap_or_else(|| syn::parse_quote!(::infrastructure_common)),
        rest,
    ))
}
