//! Structured extraction over a text backend
//!
//! Asks the model for JSON and runs the answer through
//! [`truthguard_core::extract_json`]. Transport failures are absorbed the
//! same way malformed answers are: the caller's fallback comes back.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use truthguard_core::try_extract_json;

use crate::{LlmBackend, Persona};

/// Appended to every system role that expects a JSON answer
pub const JSON_INSTRUCTION: &str = " IMPORTANT: Format your response as valid JSON.";

/// Budget for JSON extraction calls
pub const JSON_MAX_TOKENS: u32 = 1000;

/// Request JSON from the backend, returning `fallback` on any failure
pub async fn request_json<T>(backend: &dyn LlmBackend, system: &str, user: &str, fallback: T) -> T
where
    T: DeserializeOwned + Send,
{
    let system = format!("{}{}", system, JSON_INSTRUCTION);

    let answer = match backend.generate(&system, user, JSON_MAX_TOKENS).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Error getting JSON from {}: {}", backend.model_name(), e);
            return fallback;
        }
    };

    match try_extract_json(&answer) {
        Some(value) => value,
        None => {
            debug!("No usable JSON in answer, using fallback");
            fallback
        }
    }
}

/// [`request_json`] driven by a persona's system role and user template
pub async fn request_json_with<T>(
    backend: &dyn LlmBackend,
    persona: &Persona,
    vars: &[(&str, &str)],
    fallback: T,
) -> T
where
    T: DeserializeOwned + Send,
{
    let system = persona.render_system(vars);
    let user = persona.render_user(vars);
    request_json(backend, &system, &user, fallback).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing::ScriptedBackend, LlmError};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        value: i32,
    }

    #[tokio::test]
    async fn test_json_instruction_is_appended() {
        let backend = ScriptedBackend::answering(&["```json\n{\"value\": 7}\n```"]);
        let out = request_json(&backend, "Extract.", "text", Probe { value: 0 }).await;

        assert_eq!(out, Probe { value: 7 });
        let calls = backend.calls();
        assert_eq!(calls[0].system, "Extract. IMPORTANT: Format your response as valid JSON.");
        assert_eq!(calls[0].max_tokens, 1000);
    }

    #[tokio::test]
    async fn test_transport_failure_returns_fallback() {
        let backend = ScriptedBackend::new(vec![Err(LlmError::RateLimited)]);
        let out = request_json(&backend, "Extract.", "text", Probe { value: 3 }).await;
        assert_eq!(out, Probe { value: 3 });
    }

    #[tokio::test]
    async fn test_prose_answer_returns_fallback() {
        let backend = ScriptedBackend::answering(&["I cannot produce JSON for this."]);
        let out = request_json(&backend, "Extract.", "text", Probe { value: 3 }).await;
        assert_eq!(out, Probe { value: 3 });
    }
}
