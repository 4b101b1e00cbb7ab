use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::primitive::Primitive;

/// 学生档案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// 注册结果；重复注册不是错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Registered { student_id: String },
    DuplicateStudentId,
    DuplicateEmail,
}

impl RegistrationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RegistrationOutcome::Registered { .. })
    }

    pub fn message(&self) -> &'static str {
        match self {
            RegistrationOutcome::Registered { .. } => "Student registered",
            RegistrationOutcome::DuplicateStudentId => "Student ID already exists",
            RegistrationOutcome::DuplicateEmail => "Email already registered",
        }
    }
}

/// 作业
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeworkAssignment {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub lecture_id: Option<u32>,
    pub primitives: Vec<Primitive>,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// 作业提交
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeworkSubmission {
    pub student_id: String,
    pub assignment_id: u64,
    pub answers: JsonValue,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub graded_at: Option<DateTime<Utc>>,
}

/// 作业提交结果；重复提交不是错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Submitted,
    AlreadySubmitted,
}

impl SubmissionOutcome {
    pub fn is_success(self) -> bool {
        self == SubmissionOutcome::Submitted
    }

    pub fn message(self) -> &'static str {
        match self {
            SubmissionOutcome::Submitted => "Homework submitted successfully",
            SubmissionOutcome::AlreadySubmitted => "You have already submitted this assignment",
        }
    }
}

/// 排行榜条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub student_id: String,
    pub name: String,
    pub mastery_count: usize,
}
