use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fixed policy for one adapter instance. Immutable after construction;
/// every `complete` call reuses these values unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Where to POST completion requests. Required: the library bakes in
    /// no fallback URL, defaults belong to the config/CLI layer.
    pub endpoint_url: String,
    pub user_id: String,
    pub model_name: String,
    pub system_prompt: String,
    /// Sampling temperature, expected in [0, 2].
    pub temperature: f32,
    /// Nucleus-sampling mass, expected in [0, 1]. Opaque passthrough.
    pub top_p: f32,
    /// Must stay empty for the gateway backend; a non-empty list is
    /// rejected at call time before any network I/O.
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

/// One completion call's input. Built fresh per call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// The generated text. Owned by the caller; the adapter keeps no copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResult {
    pub text: String,
}

/// Uniform invocation surface an orchestrator holds instead of a concrete
/// backend. Implementations are stateless across calls and safe to share
/// between concurrent tasks.
#[async_trait]
pub trait CompletionAdapter: Send + Sync {
    /// Issue exactly one request/response cycle for `request`. No retry,
    /// no partial results: either the generated text or an error.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult>;

    fn model_name(&self) -> &str;
}

/// Construct the backend for `config`. There is a single remote-gateway
/// backend today; the factory keeps callers decoupled from that fact.
pub fn create_adapter(config: AdapterConfig) -> Result<Box<dyn CompletionAdapter>> {
    Ok(Box::new(crate::adapters::GatewayAdapter::new(config)?))
}
