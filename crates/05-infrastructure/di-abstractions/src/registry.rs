//! 服务注册表抽象接口

use crate::catalog::{ContractBinding, ContractKey, ContractType, ImplementationType};
use crate::factory::{activator_fn, identity_caster, instance_activator, Activator, Caster, Instance};
use crate::resolver::ServiceResolver;
use infrastructure_common::{
    ComponentError, ConfigSection, DependencyError, Lifetime, Options, TypeInfo,
};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::sync::Arc;

/// 服务描述符
///
/// 一条注册记录：契约、实现、生命周期，以及创建实例和转换为契约视图的函数。
#[derive(Clone)]
pub struct ServiceDescriptor {
    /// 注册的契约
    pub contract: ContractType,
    /// 实现类型
    pub implementation: TypeInfo,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 激活器
    pub activator: Activator,
    /// 转换器
    pub caster: Caster,
}

impl ServiceDescriptor {
    /// 创建新的服务描述符
    pub fn new(
        contract: ContractType,
        implementation: TypeInfo,
        lifetime: Lifetime,
        activator: Activator,
        caster: Caster,
    ) -> Self {
        Self {
            contract,
            implementation,
            lifetime,
            activator,
            caster,
        }
    }

    /// 由目录中的实现类型及其契约声明创建描述符
    pub fn from_binding(
        implementation: &ImplementationType,
        binding: &ContractBinding,
        lifetime: Lifetime,
    ) -> Result<Self, ComponentError> {
        let activator = implementation.activator().ok_or_else(|| {
            ComponentError::registration_error(implementation.name(), "实现类型没有激活器")
        })?;

        Ok(Self::new(
            binding.contract,
            *implementation.type_info(),
            lifetime,
            Arc::clone(activator),
            Arc::clone(&binding.caster),
        ))
    }

    /// 以工厂函数注册具体类型自身
    pub fn factory<T, F>(lifetime: Lifetime, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        Self::new(
            ContractType::of::<T>(),
            TypeInfo::of::<T>(),
            lifetime,
            activator_fn(factory),
            identity_caster::<T>(),
        )
    }

    /// 注册单例实例，契约可以是 trait object
    pub fn instance<C>(instance: Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let caster: Caster = Arc::new(|instance: Instance| {
            let holder = instance.downcast::<Arc<C>>().ok()?;
            Some(Box::new(Arc::clone(&holder)) as Box<dyn Any + Send + Sync>)
        });

        Self::new(
            ContractType::of::<C>(),
            TypeInfo::of::<C>(),
            Lifetime::Singleton,
            instance_activator(Arc::new(instance)),
            caster,
        )
    }

    /// 选项注册：解析 `Options<T>` 时由配置节反序列化出 `T`
    pub fn options<T>(section: ConfigSection) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Self::factory::<Options<T>, _>(Lifetime::Singleton, move |_| {
            section
                .bind::<T>()
                .map(Options::new)
                .map_err(|e| DependencyError::creation_failed(std::any::type_name::<T>(), e))
        })
    }

    /// 契约标识
    pub fn key(&self) -> ContractKey {
        self.contract.key()
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("contract", &self.contract)
            .field("implementation", &self.implementation)
            .field("lifetime", &self.lifetime)
            .field("activator", &"<function>")
            .finish()
    }
}

/// 服务集合 trait
///
/// 启动阶段写入注册记录，构建容器后只读。
pub trait ServiceCollection {
    /// 添加注册，同一契约的后续注册在解析时覆盖先前的注册
    fn register(&mut self, descriptor: ServiceDescriptor);

    /// 契约未注册时添加注册，返回是否添加
    fn try_register(&mut self, descriptor: ServiceDescriptor) -> bool;

    /// 检查契约是否已注册
    fn contains(&self, key: &ContractKey) -> bool;

    /// 获取所有注册记录
    fn descriptors(&self) -> &[ServiceDescriptor];

    /// 注册记录数量
    fn len(&self) -> usize {
        self.descriptors().len()
    }

    /// 是否没有任何注册
    fn is_empty(&self) -> bool {
        self.descriptors().is_empty()
    }
}
