pub mod health;
pub mod llm_client;

pub use health::ServiceHealth;
pub use llm_client::{LlmGateway, OllamaClient};
