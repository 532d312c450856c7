pub mod gateway;
pub mod llm;

pub use gateway::GatewayAdapter;
pub use llm::{create_adapter, AdapterConfig, CompletionAdapter, CompletionRequest, CompletionResult};
