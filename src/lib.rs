//! promptrelay: a pluggable completion adapter for agent pipelines.
//!
//! The crate wraps a remote text-generation endpoint behind the
//! [`CompletionAdapter`] trait so an orchestrator can issue one
//! `complete(prompt) -> text` call per reasoning step without knowing
//! which backend serves it.

pub mod adapters;
pub mod config;
pub mod error;

pub use adapters::{
    create_adapter, AdapterConfig, CompletionAdapter, CompletionRequest, CompletionResult,
    GatewayAdapter,
};
pub use error::{AdapterError, Result};
