use anyhow::Result;
use chemical_thinking::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置：命令行给出 TOML 路径时优先使用
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env(),
    };

    // 初始化日志
    logger::init_with_level(if config.verbose_logging { "debug" } else { "info" });

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
