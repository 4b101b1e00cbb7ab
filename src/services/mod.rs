pub mod extractor;
pub mod grading_service;
pub mod mastery;
pub mod problem_generator;

pub use extractor::{extract_as, extract_json_object};
pub use grading_service::GradingService;
pub use mastery::{mastery_progress, MasteryTracker, MASTERY_THRESHOLD};
pub use problem_generator::ProblemGenerator;
