//! 构建器工厂
//!
//! 类型目录中实现 [`BuilderFactory`] 的具体类型在启动时被实例化，并依次配置应用构建器。

use crate::builder::ApplicationBuilder;
use di_abstractions::{ContractKey, ContractType, ImplementationType, ServiceResolver};
use di_impl::CapabilityIndex;
use infrastructure_common::{
    ComponentError, DependencyError, InfrastructureResult,
};
use std::any::Any;
use std::sync::Arc;

/// 构建器工厂 trait
pub trait BuilderFactory: Send + Sync {
    /// 配置应用构建器
    fn add_factory(&self, builder: &mut ApplicationBuilder) -> InfrastructureResult<()>;
}

/// 不提供任何服务的解析器，工厂在容器构建之前实例化
struct EmptyResolver;

impl ServiceResolver for EmptyResolver {
    fn resolve_contract(
        &self,
        contract: &ContractType,
    ) -> Result<Box<dyn Any + Send + Sync>, DependencyError> {
        Err(DependencyError::not_registered(contract.to_string()))
    }

    fn can_resolve(&self, _key: &ContractKey) -> bool {
        false
    }
}

/// 实例化工厂类型
pub(crate) fn activate_factory(
    implementation: &ImplementationType,
) -> InfrastructureResult<Arc<dyn BuilderFactory>> {
    let contract = ContractType::of::<dyn BuilderFactory>();
    let binding = CapabilityIndex::matching(implementation, &contract)
        .into_iter()
        .next()
        .ok_or_else(|| {
            ComponentError::registration_error(implementation.name(), "没有声明 BuilderFactory 契约")
        })?;
    let activator = implementation.activator().ok_or_else(|| {
        ComponentError::registration_error(implementation.name(), "实现类型没有激活器")
    })?;

    let instance = activator(&EmptyResolver)?;
    let factory = (binding.caster)(instance)
        .and_then(|view| view.downcast::<Arc<dyn BuilderFactory>>().ok())
        .ok_or_else(|| DependencyError::TypeMismatch {
            type_name: implementation.name(),
        })?;
    Ok(*factory)
}
