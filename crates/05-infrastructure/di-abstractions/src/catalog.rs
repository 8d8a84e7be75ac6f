//! 类型目录模型
//!
//! 以显式声明的契约与实现类型代替运行时反射。契约按 [`ContractKey`] 标识：
//! 非泛型契约与泛型契约的封闭用法（如 `dyn Repository<User>`）使用 `TypeId`，
//! 开放泛型定义（如 `Repository<T>`）使用 [`GenericDefinition`]。

use crate::factory::{caster_for, default_activator, identity_caster, Activator, Caster, Instance};
use crate::registry::ServiceDescriptor;
use infrastructure_common::{
    short_type_name, ConfigSection, Lifetime, Options, ProviderConfig, ServiceInject, TypeInfo,
};
use serde::de::DeserializeOwned;
use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;

/// 泛型定义：基础标识与泛型参数个数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenericDefinition {
    /// 基础标识
    pub base: &'static str,
    /// 泛型参数个数
    pub arity: usize,
}

impl GenericDefinition {
    /// 创建泛型定义
    pub const fn new(base: &'static str, arity: usize) -> Self {
        Self { base, arity }
    }

    /// 开放泛型契约
    pub fn open(&self) -> ContractType {
        ContractType {
            key: ContractKey::Definition(*self),
            name: self.base,
            definition: Some(*self),
        }
    }
}

impl std::fmt::Display for GenericDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}`{}", self.base, self.arity)
    }
}

/// 契约标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKey {
    /// 具体类型（非泛型或封闭泛型）
    Type(TypeId),
    /// 开放泛型定义
    Definition(GenericDefinition),
}

impl ContractKey {
    /// 由类型创建标识
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(TypeId::of::<T>())
    }
}

/// 契约类型
#[derive(Debug, Clone, Copy)]
pub struct ContractType {
    key: ContractKey,
    name: &'static str,
    definition: Option<GenericDefinition>,
}

impl ContractType {
    /// 非泛型契约
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self {
            key: ContractKey::of::<C>(),
            name: std::any::type_name::<C>(),
            definition: None,
        }
    }

    /// 泛型契约的封闭用法
    pub fn closed<C: ?Sized + 'static>(definition: GenericDefinition) -> Self {
        Self {
            key: ContractKey::of::<C>(),
            name: std::any::type_name::<C>(),
            definition: Some(definition),
        }
    }

    /// 契约标识
    pub fn key(&self) -> ContractKey {
        self.key
    }

    /// 契约名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 泛型定义
    pub fn generic_definition(&self) -> Option<GenericDefinition> {
        self.definition
    }

    /// 是否为开放泛型定义
    pub fn is_open_generic(&self) -> bool {
        matches!(self.key, ContractKey::Definition(_))
    }

    /// 是否为泛型契约（开放或封闭）
    pub fn is_generic(&self) -> bool {
        self.definition.is_some()
    }

    /// 具体类型ID，开放泛型定义没有类型ID
    pub fn type_id(&self) -> Option<TypeId> {
        match self.key {
            ContractKey::Type(id) => Some(id),
            ContractKey::Definition(_) => None,
        }
    }
}

impl PartialEq for ContractType {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ContractType {}

impl std::hash::Hash for ContractType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.key {
            ContractKey::Definition(definition) => write!(f, "{}", definition),
            ContractKey::Type(_) => f.write_str(&short_type_name(self.name)),
        }
    }
}

/// 带类型的契约句柄，用于声明实现类型时推导转换器
pub struct Contract<C: ?Sized> {
    contract: ContractType,
    _marker: PhantomData<fn(&C)>,
}

impl<C: ?Sized + Send + Sync + 'static> Contract<C> {
    /// 非泛型契约
    pub fn new() -> Self {
        Self {
            contract: ContractType::of::<C>(),
            _marker: PhantomData,
        }
    }

    /// 泛型契约的封闭用法
    pub fn closed(definition: GenericDefinition) -> Self {
        Self {
            contract: ContractType::closed::<C>(definition),
            _marker: PhantomData,
        }
    }

    /// 擦除类型后的契约
    pub fn contract_type(&self) -> ContractType {
        self.contract
    }
}

impl<C: ?Sized + Send + Sync + 'static> Default for Contract<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// 实现类型对某个契约的声明
#[derive(Clone)]
pub struct ContractBinding {
    /// 契约
    pub contract: ContractType,
    /// 实例到契约视图的转换器
    pub caster: Caster,
}

impl std::fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractBinding")
            .field("contract", &self.contract)
            .field("caster", &"<function>")
            .finish()
    }
}

/// 类型形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    /// 可实例化的具体类型
    Concrete,
    /// 抽象类型
    Abstract,
    /// 开放泛型定义
    OpenGeneric,
}

/// 配置提供者元数据
#[derive(Clone)]
pub struct ProviderSection {
    /// 配置节名称
    pub section: String,
    /// 由配置节创建选项注册
    pub options: fn(ConfigSection) -> ServiceDescriptor,
}

impl std::fmt::Debug for ProviderSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSection")
            .field("section", &self.section)
            .finish()
    }
}

/// 实现类型
#[derive(Clone)]
pub struct ImplementationType {
    type_info: TypeInfo,
    shape: TypeShape,
    contracts: Vec<ContractBinding>,
    lifetime: Option<Lifetime>,
    activator: Option<Activator>,
    self_caster: Option<Caster>,
    provider: Option<ProviderSection>,
}

impl ImplementationType {
    /// 开始声明具体实现类型
    pub fn builder<T: Send + Sync + 'static>() -> ImplementationBuilder<T> {
        ImplementationBuilder {
            implementation: Self {
                type_info: TypeInfo::of::<T>(),
                shape: TypeShape::Concrete,
                contracts: Vec::new(),
                lifetime: None,
                activator: None,
                self_caster: Some(identity_caster::<T>()),
                provider: None,
            },
            _marker: PhantomData,
        }
    }

    /// 声明抽象类型，扫描时被结构谓词过滤
    pub fn abstract_type<T: ?Sized + 'static>(contracts: Vec<ContractType>) -> Self {
        Self::non_concrete(TypeInfo::of::<T>(), TypeShape::Abstract, contracts)
    }

    /// 声明开放泛型实现，`T` 为代表该定义的任意一个封闭用法
    pub fn open_generic<T: ?Sized + 'static>(contracts: Vec<ContractType>) -> Self {
        Self::non_concrete(TypeInfo::of::<T>(), TypeShape::OpenGeneric, contracts)
    }

    fn non_concrete(type_info: TypeInfo, shape: TypeShape, contracts: Vec<ContractType>) -> Self {
        let unreachable: Caster = Arc::new(|_: Instance| None);
        Self {
            type_info,
            shape,
            contracts: contracts
                .into_iter()
                .map(|contract| ContractBinding {
                    contract,
                    caster: Arc::clone(&unreachable),
                })
                .collect(),
            lifetime: None,
            activator: None,
            self_caster: None,
            provider: None,
        }
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 类型名称
    pub fn name(&self) -> String {
        self.type_info.short_name()
    }

    /// 类型形态
    pub fn shape(&self) -> TypeShape {
        self.shape
    }

    /// 是否为可实例化的具体类型
    pub fn is_concrete(&self) -> bool {
        self.shape == TypeShape::Concrete
    }

    /// 声明的契约
    pub fn contracts(&self) -> &[ContractBinding] {
        &self.contracts
    }

    /// 声明的生命周期
    pub fn lifetime(&self) -> Option<Lifetime> {
        self.lifetime
    }

    /// 激活器
    pub fn activator(&self) -> Option<&Activator> {
        self.activator.as_ref()
    }

    /// 以自身类型注册时使用的绑定
    pub fn self_binding(&self) -> Option<ContractBinding> {
        self.self_caster.as_ref().map(|caster| ContractBinding {
            contract: ContractType {
                key: ContractKey::Type(self.type_info.id),
                name: self.type_info.full_name,
                definition: None,
            },
            caster: Arc::clone(caster),
        })
    }

    /// 配置提供者元数据
    pub fn provider_section(&self) -> Option<&ProviderSection> {
        self.provider.as_ref()
    }
}

impl std::fmt::Debug for ImplementationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplementationType")
            .field("type_info", &self.type_info)
            .field("shape", &self.shape)
            .field("contracts", &self.contracts)
            .field("lifetime", &self.lifetime)
            .field("activator", &self.activator.as_ref().map(|_| "<function>"))
            .field("provider", &self.provider)
            .finish()
    }
}

/// 具体实现类型构建器
pub struct ImplementationBuilder<T> {
    implementation: ImplementationType,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ImplementationBuilder<T> {
    /// 声明实现的契约
    pub fn implements<C>(mut self, contract: Contract<C>, upcast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.implementation.contracts.push(ContractBinding {
            contract: contract.contract_type(),
            caster: caster_for::<T, C>(upcast),
        });
        self
    }

    /// 设置生命周期
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.implementation.lifetime = Some(lifetime);
        self
    }

    /// 设置激活器
    pub fn with_activator(mut self, activator: Activator) -> Self {
        self.implementation.activator = Some(activator);
        self
    }

    /// 标记为配置提供者，绑定到指定配置节
    pub fn provider_section(mut self, section: impl Into<String>) -> Self
    where
        T: DeserializeOwned,
    {
        self.implementation.provider = Some(ProviderSection {
            section: section.into(),
            options: ServiceDescriptor::options::<T>,
        });
        self
    }

    /// 构建实现类型
    pub fn build(self) -> ImplementationType {
        self.implementation
    }
}

impl<T: Default + Send + Sync + 'static> ImplementationBuilder<T> {
    /// 使用 `Default` 实现作为激活器
    pub fn with_default(self) -> Self {
        self.with_activator(default_activator::<T>())
    }
}

impl<T: ServiceInject> ImplementationBuilder<T> {
    /// 读取 `ServiceInject` 元数据中的生命周期
    pub fn with_injected_lifetime(self) -> Self {
        self.with_lifetime(T::LIFETIME)
    }
}

impl<T: ProviderConfig + DeserializeOwned> ImplementationBuilder<T> {
    /// 读取 `ProviderConfig` 元数据中的配置节
    pub fn with_provider_config(self) -> Self {
        self.provider_section(T::SECTION)
    }
}

/// 目录条目
#[derive(Debug, Clone)]
pub enum TypeEntry {
    /// 契约声明
    Contract(ContractType),
    /// 实现类型声明
    Implementation(ImplementationType),
}

/// 选项类型的契约标识
pub fn options_key<T: Send + Sync + 'static>() -> ContractKey {
    ContractKey::of::<Options<T>>()
}
