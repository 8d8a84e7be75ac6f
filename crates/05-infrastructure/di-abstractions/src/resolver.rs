//! 服务解析器抽象接口
//!
//! 提供依赖解析和服务实例化的能力

use crate::catalog::{ContractKey, ContractType};
use infrastructure_common::{DependencyError, Options};
use std::any::Any;
use std::sync::Arc;

/// 服务解析器 trait
///
/// 对象安全，激活器通过 `&dyn ServiceResolver` 解析自身的依赖。
pub trait ServiceResolver {
    /// 解析契约，返回装箱的 `Arc<C>`
    fn resolve_contract(
        &self,
        contract: &ContractType,
    ) -> Result<Box<dyn Any + Send + Sync>, DependencyError>;

    /// 检查契约是否可以解析
    fn can_resolve(&self, key: &ContractKey) -> bool;
}

/// 带类型的解析方法
pub trait ServiceResolverExt: ServiceResolver {
    /// 解析指定契约
    fn resolve<C>(&self) -> Result<Arc<C>, DependencyError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let contract = ContractType::of::<C>();
        let view = self.resolve_contract(&contract)?;
        view.downcast::<Arc<C>>()
            .map(|service| *service)
            .map_err(|_| DependencyError::TypeMismatch {
                type_name: contract.to_string(),
            })
    }

    /// 解析指定契约，未注册时返回 `None`
    fn try_resolve<C>(&self) -> Result<Option<Arc<C>>, DependencyError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        if self.can_resolve(&ContractKey::of::<C>()) {
            self.resolve::<C>().map(Some)
        } else {
            Ok(None)
        }
    }

    /// 解析选项
    fn options<T>(&self) -> Result<Options<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        self.resolve::<Options<T>>().map(|options| (*options).clone())
    }
}

impl<R: ServiceResolver + ?Sized> ServiceResolverExt for R {}

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<ContractType>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加契约到解析链
    pub fn push(&mut self, contract: ContractType) -> Result<(), DependencyError> {
        if self.resolution_chain.contains(&contract) {
            return Err(DependencyError::CircularDependency {
                dependency_chain: self.describe_with(&contract),
            });
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::DependencyResolutionFailed {
                type_name: contract.to_string(),
                message: format!("超过最大解析深度 {}", self.options.max_depth),
            });
        }
        self.resolution_chain.push(contract);
        Ok(())
    }

    /// 从解析链中移除最近的契约
    pub fn pop(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    fn describe_with(&self, contract: &ContractType) -> String {
        self.resolution_chain
            .iter()
            .chain(std::iter::once(contract))
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}
