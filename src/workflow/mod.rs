pub mod practice_ctx;
pub mod practice_flow;

pub use practice_ctx::PracticeCtx;
pub use practice_flow::{PracticeFlow, PracticeOutcome};
