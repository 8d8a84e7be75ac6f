//! 配置提供者绑定器
//!
//! 查找带有配置节元数据的提供者类型，把对应配置节注册为 `Options<T>` 单例。

use config_abstractions::ConfigProvider;
use di_abstractions::{ContractType, ImplementationType, ServiceCollection, TypeScanner};
use di_impl::TypePredicate;
use infrastructure_common::{ConfigError, ConfigSection, InfrastructureResult, TypeInfo};
use tracing::{debug, info, warn};

/// 提供者绑定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderBinding {
    /// 提供者类型
    pub provider: TypeInfo,
    /// 配置节名称
    pub section: String,
    /// 是否新增了选项注册，选项已注册时为 `false`
    pub registered: bool,
}

impl std::fmt::Display for ProviderBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <- [{}]", self.provider, self.section)
    }
}

/// 配置提供者绑定器
pub struct ProviderBinder<'a> {
    scanner: &'a dyn TypeScanner,
    configuration: &'a dyn ConfigProvider,
}

impl<'a> ProviderBinder<'a> {
    /// 创建绑定器
    pub fn new(scanner: &'a dyn TypeScanner, configuration: &'a dyn ConfigProvider) -> Self {
        Self {
            scanner,
            configuration,
        }
    }

    /// 在所有模块中查找满足提供者契约的具体类型并绑定配置节
    ///
    /// 没有配置节元数据的类型被跳过，配置中缺少的配置节绑定为空配置节。
    pub fn add_providers(
        &self,
        services: &mut dyn ServiceCollection,
        provider_contract: &ContractType,
    ) -> InfrastructureResult<Vec<ProviderBinding>> {
        let predicate = TypePredicate::concrete().assignable_to(*provider_contract);
        let providers: Vec<&ImplementationType> = self.scanner.find_types(&predicate).collect();
        debug!(
            "提供者契约 {} 有 {} 个候选类型",
            provider_contract,
            providers.len()
        );

        let mut bindings = Vec::new();
        for provider in providers {
            let Some(metadata) = provider.provider_section() else {
                debug!("类型 {} 没有配置节元数据, 跳过", provider.name());
                continue;
            };

            let section = self.section(&metadata.section)?;
            let registered = services.try_register((metadata.options)(section));
            let binding = ProviderBinding {
                provider: *provider.type_info(),
                section: metadata.section.clone(),
                registered,
            };

            if registered {
                info!("绑定配置提供者: {}", binding);
            } else {
                debug!("配置提供者已绑定, 跳过: {}", binding);
            }
            bindings.push(binding);
        }

        Ok(bindings)
    }

    /// 在所有模块中查找提供者并绑定配置节（类型参数形式）
    pub fn add_providers_of<P>(
        &self,
        services: &mut dyn ServiceCollection,
    ) -> InfrastructureResult<Vec<ProviderBinding>>
    where
        P: ?Sized + 'static,
    {
        self.add_providers(services, &ContractType::of::<P>())
    }

    fn section(&self, name: &str) -> Result<ConfigSection, ConfigError> {
        match self.configuration.get_section(name) {
            Ok(section) => Ok(section),
            Err(ConfigError::KeyNotFound { .. }) => {
                warn!(
                    "配置中缺少配置节 {} ({}), 使用空配置节",
                    name,
                    self.configuration.name()
                );
                Ok(ConfigSection::new(name))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::JsonConfigProvider;
    use di_abstractions::{Contract, ServiceResolverExt};
    use di_impl::{DiContainerBuilder, ModuleBuilder, TypeCatalog, TypeUniverseScanner};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    trait Provider: Send + Sync {}

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct JwtSecrets {
        issuer: String,
        #[serde(default)]
        expires_in_minutes: u32,
    }
    impl Provider for JwtSecrets {}

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct SmtpSettings {
        host: String,
    }
    impl Provider for SmtpSettings {}

    #[derive(Default)]
    struct Untagged;
    impl Provider for Untagged {}

    fn scanner() -> TypeUniverseScanner {
        let catalog = TypeCatalog::new()
            .with_module(ModuleBuilder::new("contracts").contract::<dyn Provider>().build())
            .with_module(
                ModuleBuilder::new("providers")
                    .implementation(
                        ImplementationType::builder::<JwtSecrets>()
                            .implements(Contract::<dyn Provider>::new(), |it| it as Arc<dyn Provider>)
                            .provider_section("Jwt")
                            .with_default()
                            .build(),
                    )
                    .implementation(
                        ImplementationType::builder::<Untagged>()
                            .implements(Contract::<dyn Provider>::new(), |it| it as Arc<dyn Provider>)
                            .with_default()
                            .build(),
                    )
                    .implementation(
                        ImplementationType::builder::<SmtpSettings>()
                            .implements(Contract::<dyn Provider>::new(), |it| it as Arc<dyn Provider>)
                            .provider_section("Smtp")
                            .with_default()
                            .build(),
                    )
                    .build(),
            );
        TypeUniverseScanner::scan(&catalog)
    }

    #[test]
    fn test_only_tagged_providers_are_bound() {
        let scanner = scanner();
        let configuration = JsonConfigProvider::new(json!({
            "Jwt": { "Issuer": "lorn", "ExpiresInMinutes": 30 }
        }));
        let binder = ProviderBinder::new(&scanner, &configuration);
        let mut services = DiContainerBuilder::new();

        let bindings = binder
            .add_providers_of::<dyn Provider>(&mut services)
            .unwrap();
        let sections: Vec<&str> = bindings.iter().map(|b| b.section.as_str()).collect();
        assert_eq!(sections, vec!["Jwt", "Smtp"]);

        let container = services.build();
        let jwt = container.options::<JwtSecrets>().unwrap();
        assert_eq!(jwt.issuer, "lorn");
        assert_eq!(jwt.expires_in_minutes, 30);

        // 缺少的配置节绑定为空配置节
        let smtp = container.options::<SmtpSettings>().unwrap();
        assert_eq!(smtp.host, "");
    }

    #[test]
    fn test_second_binding_is_skipped() {
        let scanner = scanner();
        let configuration = JsonConfigProvider::new(json!({ "Jwt": { "Issuer": "first" } }));
        let binder = ProviderBinder::new(&scanner, &configuration);
        let mut services = DiContainerBuilder::new();

        binder.add_providers_of::<dyn Provider>(&mut services).unwrap();
        let again = binder.add_providers_of::<dyn Provider>(&mut services).unwrap();

        assert_eq!(again.len(), 2);
        assert!(again.iter().all(|binding| !binding.registered));
        assert_eq!(services.len(), 2);
    }
}
