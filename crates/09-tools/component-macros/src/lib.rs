//! # Component Macros
//!
//! 为类型目录提供编译时注册元数据的派生宏。
//!
//! ## 核心宏
//!
//! - [`ServiceInject`] - 声明服务的生命周期
//! - [`ProviderConfig`] - 声明配置提供者绑定的配置节
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{ProviderConfig, ServiceInject};
//! use serde::Deserialize;
//!
//! #[derive(Default, ServiceInject)]
//! #[service_inject(singleton)]
//! pub struct TokenService;
//!
//! #[derive(Debug, Default, Deserialize, ProviderConfig)]
//! #[provider_config(section = "Jwt")]
//! pub struct JwtOptions {
//!     pub issuer: String,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod provider_config;
mod service_inject;
mod utils;

/// 服务生命周期元数据
///
/// 为类型实现 `infrastructure_common::ServiceInject`。
///
/// # 参数
///
/// - `singleton` - 单例生命周期
/// - `scoped` - 作用域生命周期（默认）
/// - `transient` - 瞬态生命周期
/// - `crate = "path"` - 基础设施 crate 的路径，默认 `::infrastructure_common`
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(ServiceInject)]
/// #[service_inject(transient)]
/// pub struct RequestLogger;
/// ```
#[proc_macro_derive(ServiceInject, attributes(service_inject))]
pub fn derive_service_inject(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    service_inject::expand(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// 配置提供者元数据
///
/// 为类型实现 `infrastructure_common::ProviderConfig`。
///
/// # 参数
///
/// - `section = "Name"` - 配置节名称，默认为类型名
/// - `crate = "path"` - 基础设施 crate 的路径，默认 `::infrastructure_common`
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Deserialize, ProviderConfig)]
/// #[provider_config(section = "Smtp")]
/// pub struct SmtpOptions {
///     pub host: String,
/// }
/// ```
#[proc_macro_derive(ProviderConfig, attributes(provider_config))]
pub fn derive_provider_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    provider_config::expand(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
