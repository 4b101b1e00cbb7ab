use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{AppError, AppResult, FileError};
use crate::models::submission::Submission;

/// 练习文件中的一条作答
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeEntry {
    pub student_id: String,
    #[serde(flatten)]
    pub submission: Submission,
}

/// 一个练习文件（`[[attempt]]` 列表）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PracticeBatch {
    #[serde(default, rename = "attempt")]
    pub attempts: Vec<PracticeEntry>,
}

/// 从 TOML 文本解析练习批次
pub fn parse_practice_batch(content: &str, origin: &str) -> AppResult<PracticeBatch> {
    toml::from_str(content).map_err(|e| {
        AppError::File(FileError::TomlParseFailed {
            path: origin.to_string(),
            source: Box::new(e),
        })
    })
}

/// 从 TOML 文件加载练习批次
pub async fn load_practice_batch(path: &Path) -> AppResult<PracticeBatch> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let batch = parse_practice_batch(&content, &path.display().to_string())?;
    tracing::info!("成功加载 {} 条练习记录: {}", batch.attempts.len(), path.display());

    Ok(batch)
}
