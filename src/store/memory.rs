//! 内存存储
//!
//! 所有数据放在一把互斥锁后面，`update_progress` 的读改写在同一个临界区内完成，
//! 同一 key 的并发提交不会丢失更新。

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{AppResult, StoreError};
use crate::models::{
    AttemptRecord, HomeworkAssignment, HomeworkSubmission, LeaderboardEntry, MasteryUpdate,
    Primitive, ProgressKey, ProgressRecord, ProgressSnapshot, RegistrationOutcome, Student,
    SubmissionOutcome,
};
use crate::services::MasteryTracker;
use crate::store::{CourseStore, ProgressStore};

/// 排行榜默认条数
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Default)]
struct State {
    progress: BTreeMap<ProgressKey, ProgressRecord>,
    attempts: Vec<AttemptRecord>,
    students: HashMap<String, Student>,
    assignments: Vec<HomeworkAssignment>,
    next_assignment_id: u64,
    submissions: Vec<HomeworkSubmission>,
}

/// 内存存储
#[derive(Default)]
pub struct InMemoryStore {
    initialized: AtomicBool,
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_ready(&self) -> AppResult<()> {
        if self.initialized.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StoreError::NotInitialized.into())
        }
    }

    /// 某个学生的练习存档，按时间先后
    pub async fn attempt_history(&self, student_id: &str) -> AppResult<Vec<AttemptRecord>> {
        self.ensure_ready()?;
        let state = self.state.lock().await;
        Ok(state
            .attempts
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    async fn initialize(&self) -> AppResult<()> {
        if !self.initialized.swap(true, Ordering::AcqRel) {
            info!("🗄️ 内存存储已初始化");
        } else {
            debug!("存储已初始化，跳过");
        }
        Ok(())
    }

    async fn get_progress(&self, key: &ProgressKey) -> AppResult<Option<ProgressSnapshot>> {
        self.ensure_ready()?;
        let state = self.state.lock().await;
        Ok(state.progress.get(key).map(|r| ProgressSnapshot {
            streak: r.streak,
            attempts: r.attempts,
        }))
    }

    async fn upsert_progress(&self, record: ProgressRecord) -> AppResult<()> {
        self.ensure_ready()?;
        let key = ProgressKey::new(record.student_id.clone(), record.primitive, record.topic.clone());
        self.state.lock().await.progress.insert(key, record);
        Ok(())
    }

    async fn record_attempt(&self, attempt: AttemptRecord) -> AppResult<()> {
        self.ensure_ready()?;
        self.state.lock().await.attempts.push(attempt);
        Ok(())
    }

    async fn list_progress(&self, student_id: &str) -> AppResult<Vec<ProgressRecord>> {
        self.ensure_ready()?;
        let state = self.state.lock().await;
        Ok(state
            .progress
            .values()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn update_progress(&self, key: &ProgressKey, is_correct: bool, at: DateTime<Utc>) -> AppResult<MasteryUpdate> {
        self.ensure_ready()?;
        let mut state = self.state.lock().await;

        let prior = state.progress.get(key).map(|r| ProgressSnapshot {
            streak: r.streak,
            attempts: r.attempts,
        });
        let update = MasteryTracker::advance(prior, is_correct);

        state.progress.insert(
            key.clone(),
            ProgressRecord {
                student_id: key.student_id.clone(),
                primitive: key.primitive,
                topic: key.topic.clone(),
                streak: update.streak,
                attempts: update.attempts,
                mastery_achieved: update.mastery_achieved,
                last_attempt: at,
            },
        );

        debug!("{} 进度更新: {:?}", key, update);
        Ok(update)
    }
}

#[async_trait]
impl CourseStore for InMemoryStore {
    async fn register_student(&self, student_id: &str, name: &str, email: &str) -> AppResult<RegistrationOutcome> {
        self.ensure_ready()?;
        let mut state = self.state.lock().await;

        if state.students.contains_key(student_id) {
            return Ok(RegistrationOutcome::DuplicateStudentId);
        }
        if state.students.values().any(|s| s.email.eq_ignore_ascii_case(email)) {
            return Ok(RegistrationOutcome::DuplicateEmail);
        }

        let now = Utc::now();
        state.students.insert(
            student_id.to_string(),
            Student {
                student_id: student_id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                created_at: now,
                last_active: now,
            },
        );

        info!("👤 学生注册: {}", student_id);
        Ok(RegistrationOutcome::Registered {
            student_id: student_id.to_string(),
        })
    }

    async fn get_student(&self, student_id: &str) -> AppResult<Option<Student>> {
        self.ensure_ready()?;
        Ok(self.state.lock().await.students.get(student_id).cloned())
    }

    async fn touch_last_active(&self, student_id: &str) -> AppResult<()> {
        self.ensure_ready()?;
        if let Some(student) = self.state.lock().await.students.get_mut(student_id) {
            student.last_active = Utc::now();
        }
        Ok(())
    }

    async fn create_assignment(
        &self,
        title: &str,
        description: &str,
        lecture_id: Option<u32>,
        primitives: Vec<Primitive>,
        due_date: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.ensure_ready()?;
        let mut state = self.state.lock().await;

        state.next_assignment_id += 1;
        let id = state.next_assignment_id;
        state.assignments.push(HomeworkAssignment {
            id,
            title: title.to_string(),
            description: description.to_string(),
            lecture_id,
            primitives,
            due_date,
            created_at: Utc::now(),
            is_active: true,
        });

        Ok(id)
    }

    async fn active_assignments(&self) -> AppResult<Vec<HomeworkAssignment>> {
        self.ensure_ready()?;
        let state = self.state.lock().await;
        let mut active: Vec<_> = state.assignments.iter().filter(|a| a.is_active).cloned().collect();
        active.sort_by_key(|a| a.due_date);
        Ok(active)
    }

    async fn submit_homework(&self, student_id: &str, assignment_id: u64, answers: JsonValue) -> AppResult<SubmissionOutcome> {
        self.ensure_ready()?;
        let mut state = self.state.lock().await;

        if !state.assignments.iter().any(|a| a.id == assignment_id) {
            return Err(StoreError::UnknownAssignment { assignment_id }.into());
        }
        if state
            .submissions
            .iter()
            .any(|s| s.student_id == student_id && s.assignment_id == assignment_id)
        {
            return Ok(SubmissionOutcome::AlreadySubmitted);
        }

        state.submissions.push(HomeworkSubmission {
            student_id: student_id.to_string(),
            assignment_id,
            answers,
            score: None,
            feedback: None,
            submitted_at: Utc::now(),
            graded_at: None,
        });

        Ok(SubmissionOutcome::Submitted)
    }

    async fn student_submissions(&self, student_id: &str) -> AppResult<Vec<HomeworkSubmission>> {
        self.ensure_ready()?;
        let state = self.state.lock().await;
        // 同一时刻的提交按插入顺序倒序
        let mut submissions: Vec<_> = state
            .submissions
            .iter()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .rev()
            .collect();
        submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(submissions)
    }

    async fn leaderboard(&self, primitive: Option<Primitive>, limit: usize) -> AppResult<Vec<LeaderboardEntry>> {
        self.ensure_ready()?;
        let state = self.state.lock().await;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in state.progress.values() {
            if record.mastery_achieved && primitive.map_or(true, |p| p == record.primitive) {
                *counts.entry(record.student_id.as_str()).or_default() += 1;
            }
        }

        let mut entries: Vec<LeaderboardEntry> = counts
            .into_iter()
            .filter_map(|(student_id, mastery_count)| {
                state.students.get(student_id).map(|s| LeaderboardEntry {
                    student_id: s.student_id.clone(),
                    name: s.name.clone(),
                    mastery_count,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.mastery_count
                .cmp(&a.mastery_count)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        entries.truncate(limit);

        Ok(entries)
    }
}
