//! Scripted backends for unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{LlmBackend, LlmError};

/// One recorded `generate` call
#[derive(Debug, Clone)]
pub struct Call {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Replays queued answers in order and records every call
pub struct ScriptedBackend {
    answers: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new(answers: Vec<Result<String, LlmError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(answers: &[&str]) -> Self {
        Self::new(answers.iter().map(|a| Ok(a.to_string())).collect())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn generate(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(Call {
            system: system.to_string(),
            user: user.to_string(),
            max_tokens,
        });
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
