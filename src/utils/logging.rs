/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::clients::ServiceHealth;
use crate::config::Config;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 化学思维练习批改");
    info!("🤖 判分模型: {} | 出题模型: {}", config.grading_model, config.generation_model);
    info!("📊 最大并发数: {}", config.max_concurrent_submissions);
    info!("{}", "=".repeat(60));
}

/// 记录 LLM 服务状态
pub fn log_health(health: &ServiceHealth) {
    match health {
        ServiceHealth::Healthy { models } => {
            info!("✓ LLM 服务正常，可用模型: {}", models.join(", "));
        }
        ServiceHealth::Unreachable { reason } => {
            info!("⚠️ LLM 服务不可达 ({})，状态: {}", reason, health.status());
        }
        ServiceHealth::MalformedResponse { reason } => {
            info!("⚠️ LLM 服务响应异常 ({})，状态: {}", reason, health.status());
        }
    }
}

/// 记录练习批次加载信息
pub fn log_batch_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 条待批改的作答", total);
    info!("📋 最多同时批改 {} 条\n", max_concurrent);
}

/// 打印最终统计信息
pub fn print_final_stats(correct: usize, incorrect: usize, failed: usize) {
    let total = correct + incorrect + failed;
    info!("\n{}", "=".repeat(60));
    info!("📊 全部批改完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 答对: {}/{}", correct, total);
    info!("❌ 答错: {}", incorrect);
    info!("💥 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("化学思维练习", 2), "化学...");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
    }
}
