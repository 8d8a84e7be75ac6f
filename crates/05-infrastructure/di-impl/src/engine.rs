//! 注册引擎
//!
//! 按约定扫描类型目录，把实现类型注册到服务集合中。

use crate::capability::{CapabilityIndex, ExclusionSet, TypePredicate};
use di_abstractions::{
    ContractBinding, ContractType, ImplementationType, ServiceCollection, ServiceDescriptor,
    TypeScanner,
};
use infrastructure_common::{ComponentError, ComponentResult, Lifetime, TypeInfo};
use std::collections::HashSet;
use tracing::{debug, info, trace};

/// 注册调用的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPhase {
    /// 尚未开始
    Idle,
    /// 排除集合已填充
    ExclusionPopulated,
    /// 正在扫描候选类型
    Scanning,
    /// 正在匹配契约
    Matching,
    /// 正在写入注册
    Registering,
    /// 排除集合已清空
    ExclusionCleared,
}

/// 单条注册记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// 契约
    pub contract: ContractType,
    /// 实现类型
    pub implementation: TypeInfo,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl std::fmt::Display for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} ({})", self.contract, self.implementation, self.lifetime)
    }
}

/// 注册报告
#[derive(Debug, Clone, Default)]
pub struct RegistrationReport {
    /// 新增的注册
    pub registered: Vec<Registration>,
    /// 契约已存在而跳过的注册
    pub skipped: Vec<Registration>,
}

impl RegistrationReport {
    /// 合并另一份报告
    pub fn merge(&mut self, other: Self) {
        self.registered.extend(other.registered);
        self.skipped.extend(other.skipped);
    }

    /// 是否没有任何新增注册
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

/// 一次注册调用
///
/// 持有本次调用的排除集合，离开作用域时清空。
struct RegistrationCall {
    mode: &'static str,
    phase: RegistrationPhase,
    exclusions: ExclusionSet,
    report: RegistrationReport,
}

impl RegistrationCall {
    fn begin(mode: &'static str, excluded: &[&ContractType]) -> Self {
        let mut call = Self {
            mode,
            phase: RegistrationPhase::Idle,
            exclusions: ExclusionSet::new(),
            report: RegistrationReport::default(),
        };
        for contract in excluded {
            call.exclusions.insert(contract);
        }
        call.enter(RegistrationPhase::ExclusionPopulated);
        call
    }

    fn enter(&mut self, phase: RegistrationPhase) {
        if self.phase != phase {
            trace!("{}: {:?} -> {:?}", self.mode, self.phase, phase);
            self.phase = phase;
        }
    }

    fn finish(mut self) -> RegistrationReport {
        std::mem::take(&mut self.report)
    }
}

impl Drop for RegistrationCall {
    fn drop(&mut self) {
        self.exclusions.clear();
        self.enter(RegistrationPhase::ExclusionCleared);
    }
}

/// 注册引擎
pub struct RegistrationEngine<'a> {
    scanner: &'a dyn TypeScanner,
}

impl<'a> RegistrationEngine<'a> {
    /// 创建注册引擎
    pub fn new(scanner: &'a dyn TypeScanner) -> Self {
        Self { scanner }
    }

    /// 成对约定注册
    ///
    /// 遍历 `contract_interface` 所在模块声明的契约，在 `implementation_contract`
    /// 所在模块中查找满足这些契约的具体类型并注入。两个标记类型本身不参与注册。
    pub fn add_services(
        &self,
        services: &mut dyn ServiceCollection,
        contract_interface: &ContractType,
        implementation_contract: &ContractType,
    ) -> ComponentResult<RegistrationReport> {
        let mut call = RegistrationCall::begin(
            "add_services",
            &[contract_interface, implementation_contract],
        );

        call.enter(RegistrationPhase::Scanning);
        let interface_module = self.module_of(contract_interface)?;
        let implementation_module = self.module_of(implementation_contract)?;
        let contracts: Vec<ContractType> = self
            .scanner
            .contracts_in(interface_module)
            .into_iter()
            .filter(|contract| !call.exclusions.is_excluded(contract))
            .collect();
        debug!(
            "成对注册: 契约模块 {} 中有 {} 个候选契约, 实现模块 {}",
            interface_module,
            contracts.len(),
            implementation_module
        );

        let mut injected = HashSet::new();
        for contract in &contracts {
            call.enter(RegistrationPhase::Matching);
            let predicate = TypePredicate::concrete()
                .in_module(implementation_module)
                .assignable_to(*contract);
            let candidates: Vec<&ImplementationType> =
                self.scanner.find_types(&predicate).collect();
            if candidates.is_empty() {
                debug!("契约 {} 没有匹配的实现", contract);
                continue;
            }

            call.enter(RegistrationPhase::Registering);
            for implementation in candidates {
                // 满足多个契约的实现只注入一次
                if !injected.insert(*implementation.type_info()) {
                    continue;
                }
                Self::inject(services, implementation, &[], &mut call)?;
            }
        }

        Ok(call.finish())
    }

    /// 按契约注册
    ///
    /// 在契约所在模块中查找满足它的具体类型，注册到匹配的契约及其余未排除的契约下。
    pub fn add_services_by_interface(
        &self,
        services: &mut dyn ServiceCollection,
        contract_interface: &ContractType,
    ) -> ComponentResult<RegistrationReport> {
        let mut call = RegistrationCall::begin("add_services_by_interface", &[contract_interface]);

        call.enter(RegistrationPhase::Scanning);
        let module = self.module_of(contract_interface)?;
        let predicate = TypePredicate::concrete()
            .in_module(module)
            .assignable_to(*contract_interface);
        let candidates: Vec<&ImplementationType> = self.scanner.find_types(&predicate).collect();
        if candidates.is_empty() {
            debug!("契约 {} 在模块 {} 中没有匹配的实现", contract_interface, module);
        }

        for implementation in candidates {
            call.enter(RegistrationPhase::Matching);
            let anchors = CapabilityIndex::matching(implementation, contract_interface);

            call.enter(RegistrationPhase::Registering);
            Self::inject(services, implementation, &anchors, &mut call)?;
        }

        Ok(call.finish())
    }

    /// 成对约定注册（类型参数形式）
    pub fn add_services_of<I, M>(
        &self,
        services: &mut dyn ServiceCollection,
    ) -> ComponentResult<RegistrationReport>
    where
        I: ?Sized + 'static,
        M: ?Sized + 'static,
    {
        self.add_services(services, &ContractType::of::<I>(), &ContractType::of::<M>())
    }

    /// 按契约注册（类型参数形式）
    pub fn add_services_by_interface_of<I>(
        &self,
        services: &mut dyn ServiceCollection,
    ) -> ComponentResult<RegistrationReport>
    where
        I: ?Sized + 'static,
    {
        self.add_services_by_interface(services, &ContractType::of::<I>())
    }

    fn module_of(&self, marker: &ContractType) -> ComponentResult<&'a str> {
        self.scanner
            .locate(&marker.key())
            .ok_or_else(|| ComponentError::unknown_type(marker.to_string()))
    }

    /// 把实现类型注册到锚定契约和其余未排除的契约下，没有契约时注册到自身
    fn inject(
        services: &mut dyn ServiceCollection,
        implementation: &ImplementationType,
        anchors: &[ContractBinding],
        call: &mut RegistrationCall,
    ) -> ComponentResult<()> {
        let lifetime = implementation.lifetime().unwrap_or_default();

        let mut bindings: Vec<ContractBinding> = anchors.to_vec();
        for binding in CapabilityIndex::contracts_of(implementation, &call.exclusions) {
            if !bindings.iter().any(|b| b.contract == binding.contract) {
                bindings.push(binding);
            }
        }
        if bindings.is_empty() {
            bindings.extend(implementation.self_binding());
        }

        for binding in &bindings {
            let descriptor = ServiceDescriptor::from_binding(implementation, binding, lifetime)?;
            let registration = Registration {
                contract: binding.contract,
                implementation: *implementation.type_info(),
                lifetime,
            };

            if services.try_register(descriptor) {
                info!("注册服务: {}", registration);
                call.report.registered.push(registration);
            } else {
                debug!("契约已注册, 跳过: {}", registration);
                call.report.skipped.push(registration);
            }
        }
        Ok(())
    }
}
