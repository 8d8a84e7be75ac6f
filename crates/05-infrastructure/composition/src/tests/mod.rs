//! 应用构建器测试

use crate::{ApplicationBuilder, BuilderFactory};
use config_abstractions::ConfigProvider;
use config_impl::{EnvironmentOptions, JsonConfigProvider};
use di_abstractions::{Contract, ImplementationType, ServiceContainer, ServiceResolverExt};
use di_impl::{ModuleBuilder, TypeCatalog};
use infrastructure_common::{InfrastructureResult, Lifetime};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

trait Provider: Send + Sync {}

#[derive(Default)]
struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct JwtSecrets {
    issuer: String,
}

impl Provider for JwtSecrets {}

/// 在工厂阶段注册问候服务
#[derive(Default)]
struct GreetingFactory;

impl BuilderFactory for GreetingFactory {
    fn add_factory(&self, builder: &mut ApplicationBuilder) -> InfrastructureResult<()> {
        builder.add_services_by_interface::<dyn Greeter>()?;
        Ok(())
    }
}

fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with_module(
            ModuleBuilder::new("bootstrap")
                .contract::<dyn BuilderFactory>()
                .contract::<dyn Provider>()
                .build(),
        )
        .with_module(
            ModuleBuilder::new("greeting")
                .contract::<dyn Greeter>()
                .implementation(
                    ImplementationType::builder::<EnglishGreeter>()
                        .implements(Contract::<dyn Greeter>::new(), |it| it as Arc<dyn Greeter>)
                        .with_lifetime(Lifetime::Singleton)
                        .with_default()
                        .build(),
                )
                .implementation(
                    ImplementationType::builder::<GreetingFactory>()
                        .implements(Contract::<dyn BuilderFactory>::new(), |it| {
                            it as Arc<dyn BuilderFactory>
                        })
                        .with_default()
                        .build(),
                )
                .build(),
        )
        .with_module(
            ModuleBuilder::new("providers")
                .implementation(
                    ImplementationType::builder::<JwtSecrets>()
                        .implements(Contract::<dyn Provider>::new(), |it| it as Arc<dyn Provider>)
                        .provider_section("Jwt")
                        .with_default()
                        .build(),
                )
                .build(),
        )
}

#[test]
fn test_build_empty_application() {
    let application = ApplicationBuilder::new(&TypeCatalog::new()).build().unwrap();

    assert!(application.is_production());
    assert!(application.container().is_empty());
    assert!(application.registration_report().is_empty());
}

#[test]
fn test_register_services_and_resolve() {
    let mut builder = ApplicationBuilder::new(&catalog());
    builder.add_services_by_interface::<dyn Greeter>().unwrap();
    assert_eq!(builder.registration_report().registered.len(), 1);

    let application = builder.build().unwrap();
    let greeter = application.container().resolve::<dyn Greeter>().unwrap();
    assert_eq!(greeter.greet(), "hello");
}

#[test]
fn test_factories_configure_builder() {
    let mut builder = ApplicationBuilder::new(&catalog());
    builder.add_factories().unwrap();

    let application = builder.build().unwrap();
    let registrations = application.container().registrations();
    assert!(registrations
        .iter()
        .any(|(contract, lifetime)| contract.to_string() == "dyn Greeter"
            && *lifetime == Lifetime::Singleton));
}

#[test]
fn test_providers_bind_configuration_sections() {
    let mut builder = ApplicationBuilder::new(&catalog()).with_configuration(
        JsonConfigProvider::new(json!({ "Jwt": { "Issuer": "lorn" } })),
    );
    builder.add_providers::<dyn Provider>().unwrap();
    // 重复绑定不会新增注册
    builder.add_providers::<dyn Provider>().unwrap();

    let bindings = builder.provider_bindings();
    assert_eq!(bindings.len(), 2);
    assert!(bindings[0].registered);
    assert!(!bindings[1].registered);

    let application = builder.build().unwrap();
    let jwt = application.container().options::<JwtSecrets>().unwrap();
    assert_eq!(jwt.issuer, "lorn");
}

#[test]
fn test_environment_configuration_sets_environment() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("appsettings.Testing.json"),
        r#"{ "Jwt": { "Issuer": "testing" } }"#,
    )
    .unwrap();

    let builder = ApplicationBuilder::new(&catalog())
        .with_environment_configuration(
            EnvironmentOptions::new("Testing").with_config_dir(dir.path()),
        )
        .unwrap();
    assert_eq!(builder.environment(), "Testing");
    assert_eq!(
        builder.configuration().get_configuration("Jwt:Issuer").unwrap(),
        json!("testing")
    );

    let application = builder.build().unwrap();
    assert!(!application.is_production());
}

#[test]
fn test_environment_file_binds_pascal_case_provider() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("appsettings.Testing.json"),
        r#"{ "Jwt": { "Issuer": "testing" } }"#,
    )
    .unwrap();

    let mut builder = ApplicationBuilder::new(&catalog())
        .with_environment_configuration(
            EnvironmentOptions::new("Testing").with_config_dir(dir.path()),
        )
        .unwrap();
    assert_eq!(builder.configuration().get_all_keys(), vec!["Jwt:Issuer"]);
    builder.add_providers::<dyn Provider>().unwrap();

    let application = builder.build().unwrap();
    let jwt = application.container().options::<JwtSecrets>().unwrap();
    assert_eq!(jwt.issuer, "testing");
}

#[test]
fn test_production_environment_ignores_case() {
    let application = ApplicationBuilder::new(&TypeCatalog::new())
        .with_environment("production")
        .build()
        .unwrap();
    assert!(application.is_production());
}
