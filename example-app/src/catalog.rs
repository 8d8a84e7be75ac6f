//! 示例应用的类型目录

use di_abstractions::{activator_fn, Contract, ImplementationType};
use di_impl::{ModuleBuilder, StaticModule, TypeCatalog};
use infrastructure_common::InfrastructureResult;
use infrastructure_composition::{ApplicationBuilder, BuilderFactory, ProviderConfig, ServiceInject};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// 契约模块标记
pub trait ContractsMarker {}

/// 服务模块标记
pub trait ServicesMarker {}

/// 配置提供者
pub trait Provider: Send + Sync {}

/// 时钟
pub trait Clock: Send + Sync {
    /// 当前 Unix 时间戳（秒）
    fn unix_now(&self) -> u64;
}

/// 欢迎信息
pub trait Greeter: Send + Sync {
    /// 生成欢迎信息
    fn greet(&self, name: &str) -> String;
}

/// JWT 配置
#[derive(Debug, Default, Deserialize, ProviderConfig)]
#[provider_config(section = "Jwt")]
#[serde(rename_all = "PascalCase", default)]
pub struct JwtOptions {
    /// 签发者
    pub issuer: String,
    /// 受众
    pub audience: String,
    /// 签名密钥，通常来自 `__JWT_SECRET__` 占位符
    pub secret: String,
    /// 过期时间（分钟）
    pub expires_in_minutes: u32,
}

impl Provider for JwtOptions {}

/// 跨域配置
#[derive(Debug, Default, Deserialize, ProviderConfig)]
#[provider_config(section = "Cors")]
#[serde(rename_all = "PascalCase", default)]
pub struct CorsOptions {
    /// 允许的来源
    pub allowed_origins: Vec<String>,
}

impl Provider for CorsOptions {}

#[derive(Default, ServiceInject)]
#[service_inject(singleton)]
struct SystemClock;

impl Clock for SystemClock {
    fn unix_now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

#[derive(ServiceInject)]
#[service_inject(scoped)]
struct WelcomeGreeter {
    clock: Arc<dyn Clock>,
}

impl Greeter for WelcomeGreeter {
    fn greet(&self, name: &str) -> String {
        format!("欢迎, {} (at {})", name, self.clock.unix_now())
    }
}

/// 注册示例服务与配置提供者
#[derive(Default)]
struct ApiFactory;

impl BuilderFactory for ApiFactory {
    fn add_factory(&self, builder: &mut ApplicationBuilder) -> InfrastructureResult<()> {
        info!("ApiFactory: 注册服务与配置提供者");
        builder
            .add_services::<dyn ContractsMarker, dyn ServicesMarker>()?
            .add_providers::<dyn Provider>()?;
        Ok(())
    }
}

fn contracts() -> StaticModule {
    ModuleBuilder::new("example.contracts")
        .contract::<dyn ContractsMarker>()
        .contract::<dyn Clock>()
        .contract::<dyn Greeter>()
        .contract::<dyn Provider>()
        .contract::<dyn BuilderFactory>()
        .build()
}

fn services() -> StaticModule {
    ModuleBuilder::new("example.services")
        .contract::<dyn ServicesMarker>()
        .implementation(
            ImplementationType::builder::<SystemClock>()
                .implements(Contract::<dyn Clock>::new(), |it| it as Arc<dyn Clock>)
                .with_injected_lifetime()
                .with_default()
                .build(),
        )
        .implementation(
            ImplementationType::builder::<WelcomeGreeter>()
                .implements(Contract::<dyn Greeter>::new(), |it| it as Arc<dyn Greeter>)
                .with_injected_lifetime()
                .with_activator(activator_fn(|resolver| {
                    use di_abstractions::ServiceResolverExt;
                    Ok(WelcomeGreeter {
                        clock: resolver.resolve::<dyn Clock>()?,
                    })
                }))
                .build(),
        )
        .build()
}

fn providers() -> StaticModule {
    ModuleBuilder::new("example.providers")
        .implementation(
            ImplementationType::builder::<JwtOptions>()
                .implements(Contract::<dyn Provider>::new(), |it| it as Arc<dyn Provider>)
                .with_provider_config()
                .with_default()
                .build(),
        )
        .implementation(
            ImplementationType::builder::<CorsOptions>()
                .implements(Contract::<dyn Provider>::new(), |it| it as Arc<dyn Provider>)
                .with_provider_config()
                .with_default()
                .build(),
        )
        .implementation(
            ImplementationType::builder::<ApiFactory>()
                .implements(Contract::<dyn BuilderFactory>::new(), |it| {
                    it as Arc<dyn BuilderFactory>
                })
                .with_default()
                .build(),
        )
        .build()
}

/// 示例应用的类型目录
pub fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with_module(contracts())
        .with_module(services())
        .with_module(providers())
}
