use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::primitive::Primitive;

/// 进度记录主键：(学生, 原语, 课题)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgressKey {
    pub student_id: String,
    pub primitive: Primitive,
    pub topic: String,
}

impl ProgressKey {
    pub fn new(student_id: impl Into<String>, primitive: Primitive, topic: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            primitive,
            topic: topic.into(),
        }
    }
}

impl std::fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[学生 {} {}/{}]", self.student_id, self.primitive, self.topic)
    }
}

/// 存储中已有的进度（掌握追踪的输入）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub streak: u32,
    pub attempts: u32,
}

/// 一次更新后的掌握状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryUpdate {
    pub streak: u32,
    pub attempts: u32,
    pub mastery_achieved: bool,
}

impl From<MasteryUpdate> for ProgressSnapshot {
    fn from(u: MasteryUpdate) -> Self {
        Self {
            streak: u.streak,
            attempts: u.attempts,
        }
    }
}

/// 完整的进度记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub student_id: String,
    pub primitive: Primitive,
    pub topic: String,
    pub streak: u32,
    pub attempts: u32,
    pub mastery_achieved: bool,
    pub last_attempt: DateTime<Utc>,
}

/// 单次练习的存档
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub student_id: String,
    pub primitive: Primitive,
    pub topic: String,
    pub problem_text: String,
    pub student_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub feedback: String,
    pub attempted_at: DateTime<Utc>,
}
