use component_macros::ProviderConfig;
use infrastructure_common::ProviderConfig;
use serde::Deserialize;

#[derive(Deserialize, ProviderConfig)]
#[provider_config(section = "Smtp")]
struct SmtpOptions {
    #[allow(dead_code)]
    host: String,
}

fn main() {
    assert_eq!(SmtpOptions::SECTION, "Smtp");
}
