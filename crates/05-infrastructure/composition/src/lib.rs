//! # 基础设施组合层
//!
//! 负责将类型目录、注册引擎、配置和日志组合成一个可运行的应用。
//!
//! ## 主要功能
//!
//! - **应用构建器**: 按约定注册服务、绑定配置提供者
//! - **构建器工厂**: 自动发现并执行目录中的 [`BuilderFactory`]
//! - **日志初始化**: 基于 `tracing-subscriber` 的日志配置
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use config_impl::EnvironmentOptions;
//! use infrastructure_composition::{ApplicationBuilder, LoggingConfig};
//! use di_impl::TypeCatalog;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = TypeCatalog::new();
//!     let mut builder = ApplicationBuilder::new(&catalog)
//!         .with_logging(&LoggingConfig::development())?
//!         .with_environment_configuration(EnvironmentOptions::default())?;
//!
//!     builder.add_factories()?;
//!     let application = builder.build()?;
//!     println!("环境: {}", application.environment());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod factory;
pub mod logging;

pub use builder::{Application, ApplicationBuilder};
pub use factory::BuilderFactory;
pub use logging::LoggingConfig;

// 重新导出元数据 derive 与对应 trait
//
// 不直接依赖 infrastructure-common 的 crate 使用派生宏时需要声明
// `crate = "infrastructure_composition::infrastructure_common"`。
pub use component_macros::{ProviderConfig, ServiceInject};
pub use infrastructure_common;
pub use infrastructure_common::{InfrastructureError, Lifetime, ProviderConfig, ServiceInject};

#[cfg(test)]
mod tests;
