//! 应用构建器

use crate::factory::{activate_factory, BuilderFactory};
use crate::logging::LoggingConfig;
use config_abstractions::ConfigProvider;
use config_impl::{
    EnvironmentConfiguration, EnvironmentOptions, JsonConfigProvider, ProviderBinder,
    ProviderBinding,
};
use di_abstractions::{ContractType, ImplementationType, TypeScanner};
use di_impl::{
    DiContainer, DiContainerBuilder, RegistrationEngine, RegistrationReport, TypeCatalog,
    TypePredicate, TypeUniverseScanner,
};
use infrastructure_common::InfrastructureResult;
use std::sync::Arc;
use tracing::{debug, info};

/// 应用构建器
///
/// 持有扫描后的类型宇宙、服务集合和配置，按约定注册服务后构建 [`Application`]。
pub struct ApplicationBuilder {
    scanner: TypeUniverseScanner,
    services: DiContainerBuilder,
    configuration: Arc<dyn ConfigProvider>,
    environment: String,
    report: RegistrationReport,
    provider_bindings: Vec<ProviderBinding>,
}

impl ApplicationBuilder {
    /// 扫描类型目录并创建构建器
    ///
    /// 初始配置为空，环境为 `Production`。
    pub fn new(catalog: &TypeCatalog) -> Self {
        Self {
            scanner: TypeUniverseScanner::scan(catalog),
            services: DiContainerBuilder::new(),
            configuration: Arc::new(JsonConfigProvider::new(serde_json::json!({}))),
            environment: EnvironmentConfiguration::PRODUCTION.to_string(),
            report: RegistrationReport::default(),
            provider_bindings: Vec::new(),
        }
    }

    /// 初始化日志
    pub fn with_logging(self, config: &LoggingConfig) -> InfrastructureResult<Self> {
        config.init()?;
        Ok(self)
    }

    /// 使用指定的配置提供者
    #[must_use]
    pub fn with_configuration(mut self, configuration: impl ConfigProvider + 'static) -> Self {
        info!("使用配置提供者: {}", configuration.name());
        self.configuration = Arc::new(configuration);
        self
    }

    /// 加载环境配置
    pub fn with_environment_configuration(
        mut self,
        options: EnvironmentOptions,
    ) -> InfrastructureResult<Self> {
        let configuration = EnvironmentConfiguration::build(options)?;
        self.environment = configuration.environment().to_string();
        self.configuration = Arc::new(configuration);
        Ok(self)
    }

    /// 设置环境名称
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// 环境名称
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// 配置提供者
    pub fn configuration(&self) -> &dyn ConfigProvider {
        self.configuration.as_ref()
    }

    /// 扫描后的类型宇宙
    pub fn scanner(&self) -> &TypeUniverseScanner {
        &self.scanner
    }

    /// 服务集合，用于手动注册
    pub fn services(&mut self) -> &mut DiContainerBuilder {
        &mut self.services
    }

    /// 成对约定注册
    pub fn add_services<I, M>(&mut self) -> InfrastructureResult<&mut Self>
    where
        I: ?Sized + 'static,
        M: ?Sized + 'static,
    {
        let report = RegistrationEngine::new(&self.scanner)
            .add_services_of::<I, M>(&mut self.services)?;
        self.report.merge(report);
        Ok(self)
    }

    /// 按契约注册
    pub fn add_services_by_interface<I>(&mut self) -> InfrastructureResult<&mut Self>
    where
        I: ?Sized + 'static,
    {
        let report = RegistrationEngine::new(&self.scanner)
            .add_services_by_interface_of::<I>(&mut self.services)?;
        self.report.merge(report);
        Ok(self)
    }

    /// 绑定配置提供者
    pub fn add_providers<P>(&mut self) -> InfrastructureResult<&mut Self>
    where
        P: ?Sized + 'static,
    {
        let bindings = ProviderBinder::new(&self.scanner, self.configuration.as_ref())
            .add_providers_of::<P>(&mut self.services)?;
        self.provider_bindings.extend(bindings);
        Ok(self)
    }

    /// 实例化目录中的所有 [`BuilderFactory`] 并依次配置构建器
    pub fn add_factories(&mut self) -> InfrastructureResult<&mut Self> {
        let predicate =
            TypePredicate::concrete().assignable_to(ContractType::of::<dyn BuilderFactory>());
        let factories = self
            .scanner
            .find_types(&predicate)
            .map(|implementation: &ImplementationType| {
                debug!("实例化构建器工厂: {}", implementation.name());
                activate_factory(implementation)
            })
            .collect::<InfrastructureResult<Vec<_>>>()?;

        info!("发现 {} 个构建器工厂", factories.len());
        for factory in factories {
            factory.add_factory(self)?;
        }
        Ok(self)
    }

    /// 累计的注册报告
    pub fn registration_report(&self) -> &RegistrationReport {
        &self.report
    }

    /// 累计的提供者绑定
    pub fn provider_bindings(&self) -> &[ProviderBinding] {
        &self.provider_bindings
    }

    /// 构建应用
    pub fn build(self) -> InfrastructureResult<Application> {
        info!(
            "应用构建完成: environment={}, 注册 {} 个服务, 绑定 {} 个配置提供者",
            self.environment,
            self.report.registered.len(),
            self.provider_bindings.len()
        );
        Ok(Application {
            container: self.services.build(),
            configuration: self.configuration,
            environment: self.environment,
            report: self.report,
            provider_bindings: self.provider_bindings,
        })
    }
}

/// 构建完成的应用
pub struct Application {
    container: DiContainer,
    configuration: Arc<dyn ConfigProvider>,
    environment: String,
    report: RegistrationReport,
    provider_bindings: Vec<ProviderBinding>,
}

impl Application {
    /// 依赖注入容器
    pub fn container(&self) -> &DiContainer {
        &self.container
    }

    /// 配置提供者
    pub fn configuration(&self) -> &dyn ConfigProvider {
        self.configuration.as_ref()
    }

    /// 环境名称
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        EnvironmentConfiguration::is_production(&self.environment)
    }

    /// 注册报告
    pub fn registration_report(&self) -> &RegistrationReport {
        &self.report
    }

    /// 提供者绑定
    pub fn provider_bindings(&self) -> &[ProviderBinding] {
        &self.provider_bindings
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("environment", &self.environment)
            .field("container", &self.container)
            .field("configuration", &self.configuration.name())
            .field("registered", &self.report.registered.len())
            .finish()
    }
}
