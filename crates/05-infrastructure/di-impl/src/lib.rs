//! # 依赖注入具体实现
//!
//! 提供类型目录、类型扫描器、能力索引、约定注册引擎和依赖注入容器。
//!
//! ## 使用流程
//!
//! 1. 以 [`ModuleBuilder`] 声明各模块的契约与实现类型，组成 [`TypeCatalog`]
//! 2. [`TypeUniverseScanner::scan`] 加载目录
//! 3. [`RegistrationEngine`] 按约定把实现类型注册到 [`DiContainerBuilder`]
//! 4. 构建 [`DiContainer`] 并解析服务

pub mod capability;
pub mod catalog;
pub mod container;
pub mod engine;
pub mod scanner;

pub use capability::{CapabilityIndex, ExclusionSet, TypePredicate};
pub use catalog::{ModuleBuilder, StaticModule, TypeCatalog, TypeModule};
pub use container::{DiContainer, DiContainerBuilder, DiScope};
pub use engine::{Registration, RegistrationEngine, RegistrationPhase, RegistrationReport};
pub use scanner::TypeUniverseScanner;
