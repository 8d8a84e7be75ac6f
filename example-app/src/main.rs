//! # 示例应用程序
//!
//! 演示按约定注册服务、绑定配置提供者并构建应用。

mod catalog;

use anyhow::Context;
use catalog::{CorsOptions, Greeter, JwtOptions};
use clap::Parser;
use config_impl::EnvironmentOptions;
use di_abstractions::{ServiceContainer, ServiceResolverExt};
use infrastructure_composition::{ApplicationBuilder, LoggingConfig};
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn Bootstrap 示例应用")]
struct Args {
    /// 环境名称，默认读取 APP_ENVIRONMENT
    #[arg(short, long)]
    environment: Option<String>,

    /// 配置目录
    #[arg(short, long, default_value = "ConfigSettings")]
    config_dir: String,

    /// 日志级别，默认由环境决定
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut options = EnvironmentOptions::default().with_config_dir(&args.config_dir);
    if let Some(environment) = args.environment {
        options.environment = environment;
    }

    let mut logging = LoggingConfig::for_environment(&options.environment);
    if let Some(level) = &args.log_level {
        logging = logging.with_level(
            level
                .parse()
                .with_context(|| format!("无效的日志级别: {}", level))?,
        );
    }

    let catalog = catalog::catalog();
    let mut builder = ApplicationBuilder::new(&catalog)
        .with_logging(&logging)?
        .with_environment_configuration(options)
        .context("加载环境配置失败")?;
    builder.add_factories()?;

    let application = builder.build()?;
    info!("应用已构建: {:?}", application);

    for (contract, lifetime) in application.container().registrations() {
        info!("  {} ({})", contract, lifetime);
    }

    let scope = application.container().create_scope();
    let greeter = scope.resolve::<dyn Greeter>()?;
    info!("{}", greeter.greet("Lorn"));

    let jwt = scope.options::<JwtOptions>()?;
    info!(
        "Jwt: issuer={}, audience={}, expires_in_minutes={}",
        jwt.issuer, jwt.audience, jwt.expires_in_minutes
    );
    // 未替换的占位符保持 __NAME__ 形式
    let secret_configured = !jwt.secret.is_empty() && !jwt.secret.starts_with("__");
    info!("Jwt secret 已配置: {}", secret_configured);
    let cors = scope.options::<CorsOptions>()?;
    info!("Cors: {:?}", cors.allowed_origins);

    Ok(())
}
