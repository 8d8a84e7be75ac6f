//! 注册引擎、配置绑定与容器的端到端测试

use config_impl::JsonConfigProvider;
use di_abstractions::{
    Contract, ContractKey, GenericDefinition, ImplementationType, ServiceCollection,
    ServiceContainer, ServiceResolverExt,
};
use di_impl::{ModuleBuilder, TypeCatalog};
use infrastructure_common::{Lifetime, ProviderConfig, ServiceInject};
use infrastructure_composition::ApplicationBuilder;
use serde::Deserialize;
use serde_json::json;
use std::marker::PhantomData;
use std::sync::Arc;

// 契约模块
trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

trait Repository<T>: Send + Sync {
    fn table(&self) -> &'static str;
}

trait Provider: Send + Sync {}

/// 成对注册时标记契约模块
trait DomainMarker {}

/// 成对注册时标记实现模块
trait DataMarker {}

const REPOSITORY: GenericDefinition = GenericDefinition::new("Repository", 1);

struct User;

// 实现模块
#[derive(Default, infrastructure_composition::ServiceInject)]
#[service_inject(singleton)]
struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        42
    }
}

#[derive(Default, infrastructure_composition::ServiceInject)]
struct FrozenClock;

impl Clock for FrozenClock {
    fn now(&self) -> u64 {
        0
    }
}

struct SqlRepository<T>(PhantomData<fn() -> T>);

impl<T> Default for SqlRepository<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl Repository<User> for SqlRepository<User> {
    fn table(&self) -> &'static str {
        "users"
    }
}

#[derive(Default)]
struct AuditTrail;

#[derive(Default, infrastructure_composition::ServiceInject)]
#[service_inject(scoped)]
struct UnitOfWork {
    _pending: Vec<String>,
}

#[derive(Default, infrastructure_composition::ServiceInject)]
#[service_inject(transient, crate = "infrastructure_composition::infrastructure_common")]
struct RequestId(u64);

#[derive(Debug, Default, Deserialize, infrastructure_composition::ProviderConfig)]
#[provider_config(section = "Jwt", crate = "infrastructure_composition::infrastructure_common")]
#[serde(rename_all = "PascalCase", default)]
struct JwtOptions {
    issuer: String,
    expires_in_minutes: u32,
}

impl Provider for JwtOptions {}

#[derive(Default)]
struct UntaggedOptions;

impl Provider for UntaggedOptions {}

fn contracts_module() -> ModuleBuilder {
    ModuleBuilder::new("domain")
        .contract::<dyn DomainMarker>()
        .contract::<dyn Clock>()
        .contract::<dyn Provider>()
        .open_contract(REPOSITORY)
}

fn data_module() -> ModuleBuilder {
    ModuleBuilder::new("data")
        .contract::<dyn DataMarker>()
        .implementation(
            ImplementationType::builder::<SqlRepository<User>>()
                .implements(Contract::<dyn Repository<User>>::closed(REPOSITORY), |it| {
                    it as Arc<dyn Repository<User>>
                })
                .with_default()
                .build(),
        )
        .implementation(ImplementationType::builder::<AuditTrail>().with_default().build())
}

fn lifetimes_module() -> ModuleBuilder {
    ModuleBuilder::new("lifetimes")
        .implementation(
            ImplementationType::builder::<UnitOfWork>()
                .with_injected_lifetime()
                .with_default()
                .build(),
        )
        .implementation(
            ImplementationType::builder::<RequestId>()
                .with_injected_lifetime()
                .with_default()
                .build(),
        )
}

fn providers_module() -> ModuleBuilder {
    ModuleBuilder::new("providers")
        .implementation(
            ImplementationType::builder::<JwtOptions>()
                .implements(Contract::<dyn Provider>::new(), |it| it as Arc<dyn Provider>)
                .with_provider_config()
                .with_default()
                .build(),
        )
        .implementation(
            ImplementationType::builder::<UntaggedOptions>()
                .implements(Contract::<dyn Provider>::new(), |it| it as Arc<dyn Provider>)
                .with_default()
                .build(),
        )
}

#[test]
fn test_derived_metadata() {
    assert_eq!(SystemClock::LIFETIME, Lifetime::Singleton);
    assert_eq!(FrozenClock::LIFETIME, Lifetime::Scoped);
    assert_eq!(JwtOptions::SECTION, "Jwt");
}

#[test]
fn test_register_by_interface_resolves_implementation() -> anyhow::Result<()> {
    // Clock 契约与实现声明在同一模块
    let catalog = TypeCatalog::new().with_module(
        ModuleBuilder::new("clocks")
            .contract::<dyn Clock>()
            .implementation(
                ImplementationType::builder::<SystemClock>()
                    .implements(Contract::<dyn Clock>::new(), |it| it as Arc<dyn Clock>)
                    .with_injected_lifetime()
                    .with_default()
                    .build(),
            )
            .build(),
    );
    let mut builder = ApplicationBuilder::new(&catalog);
    builder.add_services_by_interface::<dyn Clock>()?;

    let application = builder.build()?;
    assert_eq!(application.container().resolve::<dyn Clock>()?.now(), 42);
    assert_eq!(
        application.container().registrations(),
        vec![(di_abstractions::ContractType::of::<dyn Clock>(), Lifetime::Singleton)]
    );
    Ok(())
}

#[test]
fn test_first_discovered_candidate_stays() -> anyhow::Result<()> {
    let catalog = TypeCatalog::new().with_module(
        ModuleBuilder::new("clocks")
            .contract::<dyn Clock>()
            .implementation(
                ImplementationType::builder::<SystemClock>()
                    .implements(Contract::<dyn Clock>::new(), |it| it as Arc<dyn Clock>)
                    .with_injected_lifetime()
                    .with_default()
                    .build(),
            )
            .implementation(
                ImplementationType::builder::<FrozenClock>()
                    .implements(Contract::<dyn Clock>::new(), |it| it as Arc<dyn Clock>)
                    .with_injected_lifetime()
                    .with_default()
                    .build(),
            )
            .build(),
    );
    let mut builder = ApplicationBuilder::new(&catalog);
    builder.add_services_by_interface::<dyn Clock>()?;
    builder.add_services_by_interface::<dyn Clock>()?;

    let report = builder.registration_report();
    assert_eq!(report.registered.len(), 1);
    // 第一次扫描中 FrozenClock 被跳过，第二次两个都被跳过
    assert_eq!(report.skipped.len(), 3);

    let application = builder.build()?;
    assert_eq!(application.container().resolve::<dyn Clock>()?.now(), 42);
    Ok(())
}

#[test]
fn test_pair_mode_matches_open_generic_definition() -> anyhow::Result<()> {
    let catalog = TypeCatalog::new()
        .with_module(contracts_module().build())
        .with_module(data_module().build());
    let mut builder = ApplicationBuilder::new(&catalog);
    builder.add_services::<dyn DomainMarker, dyn DataMarker>()?;

    assert!(builder
        .services()
        .contains(&ContractKey::of::<dyn Repository<User>>()));

    let application = builder.build()?;
    let repository = application.container().resolve::<dyn Repository<User>>()?;
    assert_eq!(repository.table(), "users");
    Ok(())
}

#[test]
fn test_implementation_without_contracts_registers_itself() -> anyhow::Result<()> {
    let catalog = TypeCatalog::new().with_module(data_module().build());
    let mut builder = ApplicationBuilder::new(&catalog);
    builder.add_services_by_interface::<AuditTrail>()?;

    let application = builder.build()?;
    assert!(application.container().resolve::<AuditTrail>().is_ok());
    assert!(application
        .container()
        .try_resolve::<dyn Repository<User>>()?
        .is_none());
    Ok(())
}

#[test]
fn test_only_annotated_provider_is_bound() -> anyhow::Result<()> {
    let catalog = TypeCatalog::new()
        .with_module(contracts_module().build())
        .with_module(providers_module().build());
    let mut builder = ApplicationBuilder::new(&catalog).with_configuration(
        JsonConfigProvider::new(json!({
            "Jwt": { "Issuer": "lorn", "ExpiresInMinutes": 15 }
        })),
    );
    builder.add_providers::<dyn Provider>()?;

    let bindings = builder.provider_bindings();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].section, "Jwt");
    assert_eq!(bindings[0].provider.short_name(), "JwtOptions");

    let application = builder.build()?;
    let jwt = application.container().options::<JwtOptions>()?;
    assert_eq!(jwt.issuer, "lorn");
    assert_eq!(jwt.expires_in_minutes, 15);
    Ok(())
}

#[test]
fn test_lifetime_policies() -> anyhow::Result<()> {
    let catalog = TypeCatalog::new()
        .with_module(
            ModuleBuilder::new("clocks")
                .contract::<dyn Clock>()
                .implementation(
                    ImplementationType::builder::<SystemClock>()
                        .implements(Contract::<dyn Clock>::new(), |it| it as Arc<dyn Clock>)
                        .with_injected_lifetime()
                        .with_default()
                        .build(),
                )
                .build(),
        )
        .with_module(lifetimes_module().build());
    let mut builder = ApplicationBuilder::new(&catalog);
    builder
        .add_services_by_interface::<dyn Clock>()?
        .add_services_by_interface::<UnitOfWork>()?
        .add_services_by_interface::<RequestId>()?;

    let application = builder.build()?;
    let container = application.container();

    // 单例：所有作用域共享同一实例
    let first_scope = container.create_scope();
    let second_scope = container.create_scope();
    assert!(Arc::ptr_eq(
        &first_scope.resolve::<dyn Clock>()?,
        &second_scope.resolve::<dyn Clock>()?
    ));

    // 作用域：同一作用域内共享，不同作用域之间不同
    let unit = first_scope.resolve::<UnitOfWork>()?;
    assert!(Arc::ptr_eq(&unit, &first_scope.resolve::<UnitOfWork>()?));
    assert!(!Arc::ptr_eq(&unit, &second_scope.resolve::<UnitOfWork>()?));

    // 瞬态：每次解析都创建新实例
    assert!(!Arc::ptr_eq(
        &first_scope.resolve::<RequestId>()?,
        &first_scope.resolve::<RequestId>()?
    ));
    Ok(())
}
