//! 存储协作方的接口
//!
//! 核心只依赖这里列出的操作。`(student_id, primitive, topic)` 上最多一条进度记录。

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::error::AppResult;
use crate::models::{
    AttemptRecord, HomeworkAssignment, HomeworkSubmission, LeaderboardEntry, MasteryUpdate,
    Primitive, ProgressKey, ProgressRecord, ProgressSnapshot, RegistrationOutcome, Student,
    SubmissionOutcome,
};
use crate::services::MasteryTracker;

pub use memory::InMemoryStore;

/// 进度存储
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// 初始化存储；进程启动时调用一次，重复调用无副作用
    async fn initialize(&self) -> AppResult<()>;

    async fn get_progress(&self, key: &ProgressKey) -> AppResult<Option<ProgressSnapshot>>;

    async fn upsert_progress(&self, record: ProgressRecord) -> AppResult<()>;

    async fn record_attempt(&self, attempt: AttemptRecord) -> AppResult<()>;

    /// 某个学生的全部进度，按 (原语, 课题) 排序
    async fn list_progress(&self, student_id: &str) -> AppResult<Vec<ProgressRecord>>;

    /// 读取已有进度、推进掌握状态并写回
    ///
    /// 默认实现是"先读后写"，两次并发提交同一个 key 时可能丢失一次更新。
    /// 需要并发正确性的实现应当覆盖此方法，把读写放在同一个临界区内。
    async fn update_progress(&self, key: &ProgressKey, is_correct: bool, at: DateTime<Utc>) -> AppResult<MasteryUpdate> {
        let prior = self.get_progress(key).await?;
        let update = MasteryTracker::advance(prior, is_correct);
        self.upsert_progress(ProgressRecord {
            student_id: key.student_id.clone(),
            primitive: key.primitive,
            topic: key.topic.clone(),
            streak: update.streak,
            attempts: update.attempts,
            mastery_achieved: update.mastery_achieved,
            last_attempt: at,
        })
        .await?;
        Ok(update)
    }
}

/// 学生与作业存储
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn register_student(&self, student_id: &str, name: &str, email: &str) -> AppResult<RegistrationOutcome>;

    async fn get_student(&self, student_id: &str) -> AppResult<Option<Student>>;

    async fn touch_last_active(&self, student_id: &str) -> AppResult<()>;

    async fn create_assignment(
        &self,
        title: &str,
        description: &str,
        lecture_id: Option<u32>,
        primitives: Vec<Primitive>,
        due_date: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// 有效作业，按截止时间排序
    async fn active_assignments(&self) -> AppResult<Vec<HomeworkAssignment>>;

    async fn submit_homework(&self, student_id: &str, assignment_id: u64, answers: JsonValue) -> AppResult<SubmissionOutcome>;

    /// 学生的作业提交，最新的在前
    async fn student_submissions(&self, student_id: &str) -> AppResult<Vec<HomeworkSubmission>>;

    /// 按已掌握课题数排序的学生列表
    async fn leaderboard(&self, primitive: Option<Primitive>, limit: usize) -> AppResult<Vec<LeaderboardEntry>>;
}
