//! 类型宇宙扫描器
//!
//! 一次性加载目录中的全部模块，之后的查询都是只读的。

use crate::catalog::TypeCatalog;
use di_abstractions::{
    ContractKey, ContractType, ImplementationType, TypeEntry, TypeFilter, TypeScanner,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// 已加载的模块
#[derive(Debug, Clone)]
struct LoadedModule {
    name: String,
    contracts: Vec<ContractType>,
    implementations: Vec<ImplementationType>,
}

/// 类型宇宙扫描器
#[derive(Debug, Clone, Default)]
pub struct TypeUniverseScanner {
    modules: Vec<LoadedModule>,
    /// 契约或实现类型 -> 首个声明它的模块下标
    locations: HashMap<ContractKey, usize>,
}

impl TypeUniverseScanner {
    /// 加载目录中的所有模块
    ///
    /// 加载失败的模块记录警告后跳过。
    pub fn scan(catalog: &TypeCatalog) -> Self {
        let mut scanner = Self::default();

        for module in catalog.modules() {
            match module.load() {
                Ok(entries) => scanner.push_module(module.name(), entries),
                Err(e) => warn!("跳过无法加载的模块 {}: {}", module.name(), e),
            }
        }

        info!(
            "类型扫描完成: {} 个模块, {} 个实现类型",
            scanner.modules.len(),
            scanner.implementation_count()
        );
        scanner
    }

    fn push_module(&mut self, name: &str, entries: Vec<TypeEntry>) {
        let index = self.modules.len();
        let mut loaded = LoadedModule {
            name: name.to_string(),
            contracts: Vec::new(),
            implementations: Vec::new(),
        };

        for entry in entries {
            match entry {
                TypeEntry::Contract(contract) => {
                    self.locations.entry(contract.key()).or_insert(index);
                    loaded.contracts.push(contract);
                }
                TypeEntry::Implementation(implementation) => {
                    self.locations
                        .entry(ContractKey::Type(implementation.type_info().id))
                        .or_insert(index);
                    loaded.implementations.push(implementation);
                }
            }
        }

        debug!(
            "加载模块 {}: {} 个契约, {} 个实现类型",
            loaded.name,
            loaded.contracts.len(),
            loaded.implementations.len()
        );
        self.modules.push(loaded);
    }

    /// 实现类型总数
    pub fn implementation_count(&self) -> usize {
        self.modules.iter().map(|m| m.implementations.len()).sum()
    }
}

impl TypeScanner for TypeUniverseScanner {
    fn find_types<'a>(
        &'a self,
        filter: &'a dyn TypeFilter,
    ) -> Box<dyn Iterator<Item = &'a ImplementationType> + 'a> {
        Box::new(self.modules.iter().flat_map(move |module| {
            module
                .implementations
                .iter()
                .filter(move |implementation| filter.matches(&module.name, implementation))
        }))
    }

    fn contracts_in(&self, module: &str) -> Vec<ContractType> {
        self.modules
            .iter()
            .filter(|m| m.name == module)
            .flat_map(|m| m.contracts.iter().copied())
            .collect()
    }

    fn locate(&self, key: &ContractKey) -> Option<&str> {
        self.locations
            .get(key)
            .map(|index| self.modules[*index].name.as_str())
    }

    fn modules(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }
}
