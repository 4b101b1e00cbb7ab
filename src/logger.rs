//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 初始化全局 tracing 订阅器
///
/// 优先使用 `RUST_LOG`，否则默认 `info`。重复调用是安全的。
pub fn init() {
    init_with_level("info");
}

/// 按指定默认级别初始化（`verbose_logging` 时传入 `debug`）
pub fn init_with_level(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
