//! 练习处理上下文
//!
//! 封装"这是谁的第几条作答"这一信息

use std::fmt::Display;

/// 练习处理上下文
#[derive(Debug, Clone)]
pub struct PracticeCtx {
    /// 学生ID
    pub student_id: String,

    /// 批次中的序号（仅用于日志显示，从1开始）
    pub entry_index: usize,
}

impl PracticeCtx {
    pub fn new(student_id: impl Into<String>, entry_index: usize) -> Self {
        Self {
            student_id: student_id.into(),
            entry_index,
        }
    }
}

impl Display for PracticeCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[作答 #{} 学生 {}]", self.entry_index, self.student_id)
    }
}
