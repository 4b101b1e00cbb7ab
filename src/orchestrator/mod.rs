//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PracticeEntry>)
//!     ↓
//! workflow::PracticeFlow (处理单条作答)
//!     ↓
//! services (判分 / 出题 / 解析 / 掌握度)
//!     ↓
//! clients (LLM 网关) + store (进度存储)
//! ```

pub mod batch_processor;

pub use batch_processor::App;
