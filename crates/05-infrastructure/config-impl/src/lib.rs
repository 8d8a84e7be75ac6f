//! # Configuration Implementation
//!
//! 配置管理的具体实现，提供配置源和配置提供者绑定。
//!
//! ## 主要组件
//!
//! - [`JsonConfigProvider`] - JSON 配置提供者
//! - [`EnvironmentConfiguration`] - 按环境加载的配置，支持环境变量占位符
//! - [`ProviderBinder`] - 把提供者类型绑定到配置节

pub mod binder;
pub mod providers;

pub use binder::*;
pub use providers::*;
