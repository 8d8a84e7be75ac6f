//! 类型目录
//!
//! 应用在初始化时以模块为单位显式声明契约与实现类型，扫描器只读取这里登记的内容。

use di_abstractions::{ContractType, GenericDefinition, ImplementationType, TypeEntry};
use infrastructure_common::ComponentError;

/// 类型模块 trait
///
/// 相当于一个可被扫描的程序集，`load` 失败的模块在扫描时被跳过。
pub trait TypeModule: Send + Sync {
    /// 模块名称
    fn name(&self) -> &str;

    /// 加载模块中声明的条目，按声明顺序返回
    fn load(&self) -> Result<Vec<TypeEntry>, ComponentError>;
}

/// 静态模块
#[derive(Debug, Clone)]
pub struct StaticModule {
    name: String,
    entries: Vec<TypeEntry>,
}

impl StaticModule {
    /// 创建模块构建器
    pub fn builder(name: impl Into<String>) -> ModuleBuilder {
        ModuleBuilder::new(name)
    }

    /// 模块中的条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 模块是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TypeModule for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<TypeEntry>, ComponentError> {
        Ok(self.entries.clone())
    }
}

/// 模块构建器
#[derive(Debug)]
pub struct ModuleBuilder {
    name: String,
    entries: Vec<TypeEntry>,
}

impl ModuleBuilder {
    /// 创建新的模块构建器
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// 声明非泛型契约
    pub fn contract<C: ?Sized + 'static>(self) -> Self {
        self.contract_type(ContractType::of::<C>())
    }

    /// 声明开放泛型契约
    pub fn open_contract(self, definition: GenericDefinition) -> Self {
        self.contract_type(definition.open())
    }

    /// 声明泛型契约的封闭用法
    pub fn closed_contract<C: ?Sized + 'static>(self, definition: GenericDefinition) -> Self {
        self.contract_type(ContractType::closed::<C>(definition))
    }

    /// 声明契约
    pub fn contract_type(mut self, contract: ContractType) -> Self {
        self.entries.push(TypeEntry::Contract(contract));
        self
    }

    /// 声明实现类型
    pub fn implementation(mut self, implementation: ImplementationType) -> Self {
        self.entries.push(TypeEntry::Implementation(implementation));
        self
    }

    /// 构建静态模块
    pub fn build(self) -> StaticModule {
        StaticModule {
            name: self.name,
            entries: self.entries,
        }
    }
}

/// 类型目录，按注册顺序保存模块
#[derive(Default)]
pub struct TypeCatalog {
    modules: Vec<Box<dyn TypeModule>>,
}

impl TypeCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加模块
    pub fn add_module(&mut self, module: impl TypeModule + 'static) -> &mut Self {
        self.modules.push(Box::new(module));
        self
    }

    /// 添加模块（链式调用）
    #[must_use]
    pub fn with_module(mut self, module: impl TypeModule + 'static) -> Self {
        self.add_module(module);
        self
    }

    /// 所有模块
    pub fn modules(&self) -> impl Iterator<Item = &(dyn TypeModule + 'static)> {
        self.modules.iter().map(|module| &**module)
    }

    /// 模块数量
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// 目录是否为空
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl std::fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.modules.iter().map(|module| module.name()))
            .finish()
    }
}
