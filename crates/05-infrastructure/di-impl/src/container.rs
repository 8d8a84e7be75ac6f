//! 依赖注入容器实现
//!
//! 构建器阶段收集注册记录，构建后的容器只读，实例缓存使用 `DashMap`。

use dashmap::DashMap;
use di_abstractions::{
    ContractKey, ContractType, Instance, ResolveContext, ResolveOptions, ServiceCollection,
    ServiceContainer, ServiceDescriptor, ServiceResolver,
};
use infrastructure_common::{DependencyError, Lifetime, Scope};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 容器构建器
#[derive(Debug, Default)]
pub struct DiContainerBuilder {
    descriptors: Vec<ServiceDescriptor>,
    /// 契约 -> 最近一次注册的下标
    index: HashMap<ContractKey, usize>,
    options: ResolveOptions,
}

impl DiContainerBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置解析选项
    #[must_use]
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// 构建容器
    pub fn build(self) -> DiContainer {
        info!("构建容器完成，注册了 {} 个服务", self.descriptors.len());
        DiContainer {
            inner: Arc::new(ContainerInner {
                descriptors: self.descriptors,
                index: self.index,
                options: self.options,
                singletons: DashMap::new(),
            }),
            root: Scope::root(),
            root_instances: Arc::new(DashMap::new()),
        }
    }
}

impl ServiceCollection for DiContainerBuilder {
    fn register(&mut self, descriptor: ServiceDescriptor) {
        debug!(
            "添加注册: {} -> {} ({})",
            descriptor.contract, descriptor.implementation, descriptor.lifetime
        );
        self.index.insert(descriptor.key(), self.descriptors.len());
        self.descriptors.push(descriptor);
    }

    fn try_register(&mut self, descriptor: ServiceDescriptor) -> bool {
        if self.contains(&descriptor.key()) {
            return false;
        }
        self.register(descriptor);
        true
    }

    fn contains(&self, key: &ContractKey) -> bool {
        self.index.contains_key(key)
    }

    fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }
}

struct ContainerInner {
    descriptors: Vec<ServiceDescriptor>,
    index: HashMap<ContractKey, usize>,
    options: ResolveOptions,
    /// 单例缓存，按注册记录区分
    singletons: DashMap<usize, Instance>,
}

impl ContainerInner {
    fn resolve(
        &self,
        scoped: &DashMap<usize, Instance>,
        contract: &ContractType,
    ) -> Result<Box<dyn Any + Send + Sync>, DependencyError> {
        let activation = Activation {
            inner: self,
            scoped,
            context: RefCell::new(ResolveContext::new(self.options.clone())),
        };
        activation.resolve_contract(contract)
    }
}

/// 一次解析过程，记录解析链用于检测循环依赖
struct Activation<'a> {
    inner: &'a ContainerInner,
    scoped: &'a DashMap<usize, Instance>,
    context: RefCell<ResolveContext>,
}

impl Activation<'_> {
    fn instance_for(&self, index: usize) -> Result<Instance, DependencyError> {
        let descriptor = &self.inner.descriptors[index];
        let cache = match descriptor.lifetime {
            Lifetime::Singleton => &self.inner.singletons,
            Lifetime::Scoped => self.scoped,
            Lifetime::Transient => return (descriptor.activator)(self),
        };

        if let Some(instance) = cache.get(&index) {
            return Ok(Arc::clone(instance.value()));
        }

        let instance = (descriptor.activator)(self)?;
        Ok(Arc::clone(cache.entry(index).or_insert(instance).value()))
    }
}

impl ServiceResolver for Activation<'_> {
    fn resolve_contract(
        &self,
        contract: &ContractType,
    ) -> Result<Box<dyn Any + Send + Sync>, DependencyError> {
        let index = *self
            .inner
            .index
            .get(&contract.key())
            .ok_or_else(|| DependencyError::not_registered(contract.to_string()))?;

        self.context.borrow_mut().push(*contract)?;
        let instance = self.instance_for(index);
        self.context.borrow_mut().pop();

        let descriptor = &self.inner.descriptors[index];
        (descriptor.caster)(instance?).ok_or_else(|| DependencyError::TypeMismatch {
            type_name: format!("{} -> {}", descriptor.implementation, contract),
        })
    }

    fn can_resolve(&self, key: &ContractKey) -> bool {
        self.inner.index.contains_key(key)
    }
}

/// 依赖注入容器
///
/// 根容器本身也是一个作用域，在根上解析的 `Scoped` 服务与根容器同生命周期。
#[derive(Clone)]
pub struct DiContainer {
    inner: Arc<ContainerInner>,
    root: Scope,
    root_instances: Arc<DashMap<usize, Instance>>,
}

impl DiContainer {
    /// 根作用域
    pub fn root_scope(&self) -> &Scope {
        &self.root
    }

    /// 注册记录数量
    pub fn len(&self) -> usize {
        self.inner.descriptors.len()
    }

    /// 是否没有任何注册
    pub fn is_empty(&self) -> bool {
        self.inner.descriptors.is_empty()
    }
}

impl ServiceResolver for DiContainer {
    fn resolve_contract(
        &self,
        contract: &ContractType,
    ) -> Result<Box<dyn Any + Send + Sync>, DependencyError> {
        self.inner.resolve(&self.root_instances, contract)
    }

    fn can_resolve(&self, key: &ContractKey) -> bool {
        self.inner.index.contains_key(key)
    }
}

impl ServiceContainer for DiContainer {
    type Scope = DiScope;

    fn create_scope(&self) -> DiScope {
        let scope = self.root.child("scope");
        debug!("创建作用域: {} ({})", scope.name, scope.id);
        DiScope {
            inner: Arc::clone(&self.inner),
            scope,
            instances: DashMap::new(),
        }
    }

    fn registrations(&self) -> Vec<(ContractType, Lifetime)> {
        self.inner
            .descriptors
            .iter()
            .enumerate()
            .filter(|(index, descriptor)| self.inner.index.get(&descriptor.key()) == Some(index))
            .map(|(_, descriptor)| (descriptor.contract, descriptor.lifetime))
            .collect()
    }
}

impl std::fmt::Debug for DiContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiContainer")
            .field("root", &self.root.id)
            .field("services", &self.inner.descriptors.len())
            .field("singletons", &self.inner.singletons.len())
            .finish()
    }
}

/// 服务作用域
pub struct DiScope {
    inner: Arc<ContainerInner>,
    scope: Scope,
    instances: DashMap<usize, Instance>,
}

impl DiScope {
    /// 作用域信息
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl ServiceResolver for DiScope {
    fn resolve_contract(
        &self,
        contract: &ContractType,
    ) -> Result<Box<dyn Any + Send + Sync>, DependencyError> {
        self.inner.resolve(&self.instances, contract)
    }

    fn can_resolve(&self, key: &ContractKey) -> bool {
        self.inner.index.contains_key(key)
    }
}

impl Drop for DiScope {
    fn drop(&mut self) {
        debug!(
            "释放作用域: {} ({} 个实例)",
            self.scope.id,
            self.instances.len()
        );
    }
}
