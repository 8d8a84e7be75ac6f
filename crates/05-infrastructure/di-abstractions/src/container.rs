//! 依赖注入容器抽象接口

use crate::catalog::ContractType;
use crate::resolver::ServiceResolver;
use infrastructure_common::Lifetime;

/// 依赖注入容器 trait
///
/// 构建完成后只读，实例缓存之外没有可变状态。
pub trait ServiceContainer: ServiceResolver + Send + Sync {
    /// 作用域类型
    type Scope: ServiceResolver;

    /// 创建新的作用域，`Scoped` 服务在作用域内共享
    fn create_scope(&self) -> Self::Scope;

    /// 已注册的契约及其生命周期
    fn registrations(&self) -> Vec<(ContractType, Lifetime)>;
}
