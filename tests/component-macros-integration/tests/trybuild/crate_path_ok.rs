use component_macros::{ProviderConfig, ServiceInject};

// 通过重新导出的路径引用 trait
mod infra {
    pub use infrastructure_common as common;
}

#[derive(ServiceInject)]
#[service_inject(crate = "infra::common", singleton)]
struct ReexportedService;

#[derive(ProviderConfig)]
#[provider_config(crate = "infra::common", section = "Cache")]
struct CacheOptions;

fn main() {
    use infra::common::{Lifetime, ProviderConfig, ServiceInject};
    assert_eq!(ReexportedService::LIFETIME, Lifetime::Singleton);
    assert_eq!(CacheOptions::SECTION, "Cache");
}
