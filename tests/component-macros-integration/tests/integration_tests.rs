//! 派生元数据与类型目录构建器的集成测试

use component_macros::{ProviderConfig, ServiceInject};
use di_abstractions::{Contract, ImplementationType};
use infrastructure_common::{ConfigSection, Lifetime, ProviderConfig};
use serde::Deserialize;
use std::sync::Arc;

trait Sender: Send + Sync {
    fn send(&self, to: &str) -> String;
}

#[derive(Default, ServiceInject)]
#[service_inject(singleton)]
struct MailSender;

impl Sender for MailSender {
    fn send(&self, to: &str) -> String {
        format!("mail -> {}", to)
    }
}

#[derive(Default, ServiceInject)]
struct QueueSender;

#[derive(Debug, Default, Deserialize, ProviderConfig)]
#[provider_config(section = "Mail")]
#[serde(rename_all = "PascalCase", default)]
struct MailOptions {
    host: String,
    port: u16,
}

#[derive(Debug, Default, Deserialize, ProviderConfig)]
struct QueueOptions {}

#[test]
fn test_injected_lifetime_is_recorded() {
    let mail = ImplementationType::builder::<MailSender>()
        .implements(Contract::<dyn Sender>::new(), |it| it as Arc<dyn Sender>)
        .with_injected_lifetime()
        .with_default()
        .build();
    assert_eq!(mail.lifetime(), Some(Lifetime::Singleton));

    let queue = ImplementationType::builder::<QueueSender>()
        .with_injected_lifetime()
        .with_default()
        .build();
    assert_eq!(queue.lifetime(), Some(Lifetime::Scoped));
}

#[test]
fn test_provider_config_section_is_recorded() {
    let mail = ImplementationType::builder::<MailOptions>()
        .with_provider_config()
        .build();
    let metadata = mail.provider_section().unwrap();
    assert_eq!(metadata.section, "Mail");

    let queue = ImplementationType::builder::<QueueOptions>()
        .with_provider_config()
        .build();
    assert_eq!(queue.provider_section().unwrap().section, QueueOptions::SECTION);
    assert_eq!(QueueOptions::SECTION, "QueueOptions");
}

#[test]
fn test_provider_section_binds_options() {
    let section = ConfigSection::from_value(
        MailOptions::SECTION,
        &serde_json::json!({ "Host": "smtp.local", "Port": 587 }),
    );
    let options: MailOptions = section.bind().unwrap();
    assert_eq!(options.host, "smtp.local");
    assert_eq!(options.port, 587);

    let sender = MailSender;
    assert_eq!(sender.send("ops"), "mail -> ops");
}
