//! # Infrastructure Common
//!
//! 这个 crate 提供了基础设施层的公共类型和工具。
//!
//! ## 核心内容
//!
//! - [`Lifetime`] - 服务生命周期
//! - [`ServiceInject`] / [`ProviderConfig`] - 类型元数据
//! - [`ConfigSection`] / [`Options`] - 配置节与选项包装器
//! - [`TypeInfo`] - 类型标识
//! - 错误类型与结果别名
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 显式声明的元数据代替运行时反射

pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
