//! 类型扫描器抽象接口
//!
//! 提供在类型目录中发现实现类型的能力

use crate::catalog::{ContractKey, ContractType, ImplementationType};

/// 类型过滤器
///
/// 接收类型所在模块与实现类型，返回是否选中。
pub trait TypeFilter {
    /// 判断类型是否满足条件
    fn matches(&self, module: &str, implementation: &ImplementationType) -> bool;
}

impl<F> TypeFilter for F
where
    F: Fn(&str, &ImplementationType) -> bool,
{
    fn matches(&self, module: &str, implementation: &ImplementationType) -> bool {
        self(module, implementation)
    }
}

/// 类型扫描器 trait
///
/// 扫描结果按模块注册顺序和模块内声明顺序输出，扫描没有副作用。
pub trait TypeScanner {
    /// 查找满足过滤条件的实现类型
    fn find_types<'a>(
        &'a self,
        filter: &'a dyn TypeFilter,
    ) -> Box<dyn Iterator<Item = &'a ImplementationType> + 'a>;

    /// 模块中声明的全部契约
    fn contracts_in(&self, module: &str) -> Vec<ContractType>;

    /// 查找声明契约或实现类型的模块
    fn locate(&self, key: &ContractKey) -> Option<&str>;

    /// 已加载的模块名称
    fn modules(&self) -> Vec<&str>;
}
