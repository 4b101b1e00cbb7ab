pub mod toml_loader;

pub use toml_loader::{load_practice_batch, parse_practice_batch, PracticeBatch, PracticeEntry};
