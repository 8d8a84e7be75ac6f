//! 能力索引
//!
//! 计算实现类型可以注册到哪些契约下。

use di_abstractions::{ContractBinding, ContractKey, ContractType, ImplementationType, TypeFilter};
use std::collections::HashSet;

/// 排除集合
///
/// 只在一次注册调用内有效，由调用对象持有。
#[derive(Debug, Default)]
pub struct ExclusionSet {
    keys: HashSet<ContractKey>,
}

impl ExclusionSet {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加排除的契约
    pub fn insert(&mut self, contract: &ContractType) {
        self.keys.insert(contract.key());
    }

    /// 契约是否被排除
    ///
    /// 键本身在集合中，或封闭用法的开放泛型定义在集合中。
    pub fn is_excluded(&self, contract: &ContractType) -> bool {
        self.keys.contains(&contract.key())
            || contract
                .generic_definition()
                .is_some_and(|definition| self.keys.contains(&ContractKey::Definition(definition)))
    }

    /// 清空集合
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// 排除的契约数量
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// 集合是否为空
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// 能力索引
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityIndex;

impl CapabilityIndex {
    /// 实现类型声明的、未被排除的契约，按声明顺序去重
    pub fn contracts_of(
        implementation: &ImplementationType,
        excluding: &ExclusionSet,
    ) -> Vec<ContractBinding> {
        let mut seen = HashSet::new();
        implementation
            .contracts()
            .iter()
            .filter(|binding| !excluding.is_excluded(&binding.contract))
            .filter(|binding| seen.insert(binding.contract.key()))
            .cloned()
            .collect()
    }

    /// 实现类型是否满足契约
    ///
    /// 开放泛型契约由任意同一定义的封闭用法满足。
    pub fn satisfies(implementation: &ImplementationType, contract: &ContractType) -> bool {
        contract.type_id() == Some(implementation.type_info().id)
            || !Self::matching(implementation, contract).is_empty()
    }

    /// 实现类型中满足契约的声明
    pub fn matching(
        implementation: &ImplementationType,
        contract: &ContractType,
    ) -> Vec<ContractBinding> {
        let mut seen = HashSet::new();
        implementation
            .contracts()
            .iter()
            .filter(|binding| match contract.key() {
                ContractKey::Type(_) => binding.contract.key() == contract.key(),
                ContractKey::Definition(definition) => {
                    binding.contract.generic_definition() == Some(definition)
                }
            })
            .filter(|binding| seen.insert(binding.contract.key()))
            .cloned()
            .collect()
    }
}

/// 结构谓词
#[derive(Debug, Clone, Default)]
pub struct TypePredicate {
    concrete_only: bool,
    module: Option<String>,
    assignable_to: Option<ContractType>,
}

impl TypePredicate {
    /// 仅选择可实例化的具体类型
    pub fn concrete() -> Self {
        Self {
            concrete_only: true,
            ..Self::default()
        }
    }

    /// 仅选择指定模块中的类型
    #[must_use]
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// 仅选择满足指定契约的类型
    #[must_use]
    pub fn assignable_to(mut self, contract: ContractType) -> Self {
        self.assignable_to = Some(contract);
        self
    }
}

impl TypeFilter for TypePredicate {
    fn matches(&self, module: &str, implementation: &ImplementationType) -> bool {
        if self.concrete_only && !implementation.is_concrete() {
            return false;
        }
        if self.module.as_deref().is_some_and(|expected| expected != module) {
            return false;
        }
        self.assignable_to
            .as_ref()
            .map_or(true, |contract| CapabilityIndex::satisfies(implementation, contract))
    }
}
