//! 服务工厂抽象
//!
//! 提供服务实例创建与类型转换的函数类型

use crate::resolver::ServiceResolver;
use infrastructure_common::DependencyError;
use std::any::Any;
use std::sync::Arc;

/// 类型擦除后的服务实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 实例激活器：使用解析器构建具体实现的实例
pub type Activator =
    Arc<dyn Fn(&dyn ServiceResolver) -> Result<Instance, DependencyError> + Send + Sync>;

/// 实例转换器：将具体实现实例转换为契约视图
///
/// 返回值是装箱的 `Arc<C>`，其中 `C` 为契约类型。
pub type Caster = Arc<dyn Fn(Instance) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// 由构造函数创建激活器
pub fn activator_fn<T, F>(factory: F) -> Activator
where
    T: Send + Sync + 'static,
    F: Fn(&dyn ServiceResolver) -> Result<T, DependencyError> + Send + Sync + 'static,
{
    Arc::new(move |resolver: &dyn ServiceResolver| {
        let instance = factory(resolver)?;
        Ok(Arc::new(instance) as Instance)
    })
}

/// 由 `Default` 实现创建激活器
pub fn default_activator<T>() -> Activator
where
    T: Default + Send + Sync + 'static,
{
    activator_fn(|_: &dyn ServiceResolver| Ok(T::default()))
}

/// 由已有实例创建激活器，每次激活返回同一实例
pub fn instance_activator<T>(instance: Arc<T>) -> Activator
where
    T: Send + Sync + 'static,
{
    let instance = instance as Instance;
    Arc::new(move |_: &dyn ServiceResolver| Ok(Arc::clone(&instance)))
}

/// 创建转换器：具体实例向下转型为 `T` 后映射到契约 `C`
pub fn caster_for<T, C>(upcast: fn(Arc<T>) -> Arc<C>) -> Caster
where
    T: Send + Sync + 'static,
    C: ?Sized + Send + Sync + 'static,
{
    Arc::new(move |instance: Instance| {
        let concrete = instance.downcast::<T>().ok()?;
        Some(Box::new(upcast(concrete)) as Box<dyn Any + Send + Sync>)
    })
}

/// 创建恒等转换器，用于以具体类型自身注册
pub fn identity_caster<T>() -> Caster
where
    T: Send + Sync + 'static,
{
    caster_for::<T, T>(|it| it)
}
