//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义类型目录、服务注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ContractType`] / [`ImplementationType`] - 显式声明的类型目录模型
//! - [`ServiceCollection`] - 服务注册接口
//! - [`ServiceResolver`] - 依赖解析接口
//! - [`TypeScanner`] - 类型扫描接口
//! - [`ServiceContainer`] - 容器接口

pub mod catalog;
pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use catalog::*;
pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
