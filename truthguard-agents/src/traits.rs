//! Common types shared by the analysis agents

use thiserror::Error;

use crate::LlmError;

/// Errors from agent operations
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Persona not found: {0}")]
    MissingPersona(String),
}
