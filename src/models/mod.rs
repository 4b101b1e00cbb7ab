pub mod loaders;
pub mod primitive;
pub mod problem;
pub mod progress;
pub mod student;
pub mod submission;

pub use loaders::{load_practice_batch, PracticeBatch, PracticeEntry};
pub use primitive::{list_primitives, Primitive};
pub use problem::{Difficulty, GeneratedProblem, ProblemRequest};
pub use progress::{AttemptRecord, MasteryUpdate, ProgressKey, ProgressRecord, ProgressSnapshot};
pub use student::{
    HomeworkAssignment, HomeworkSubmission, LeaderboardEntry, RegistrationOutcome, Student,
    SubmissionOutcome,
};
pub use submission::{GradingResult, Submission, Verdict};
