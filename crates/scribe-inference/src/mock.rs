//! Mock chat backend for deterministic testing.
//!
//! Provides a [`ChatBackend`] whose responses are scripted, with a call log
//! for asserting whether the model was invoked and with what history.
//!
//! ## Usage
//!
//! ```rust
//! use scribe_inference::mock::MockChatBackend;
//!
//! let backend = MockChatBackend::new().with_fixed_response("<p>answer</p>");
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use scribe_core::{ChatBackend, ChatTurn, Error, Result};

/// Mock chat backend for testing.
#[derive(Clone)]
pub struct MockChatBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<ChatCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    fixed_responses: HashMap<String, String>,
    default_response: String,
    fail: bool,
}

/// One recorded `chat` invocation.
#[derive(Debug, Clone)]
pub struct ChatCall {
    pub history: Vec<ChatTurn>,
    pub message: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fixed_responses: HashMap::new(),
            default_response: "Mock response".to_string(),
            fail: false,
        }
    }
}

impl MockChatBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned for any message without a mapping.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Map a specific live message to a specific response.
    pub fn with_response_mapping(
        mut self,
        message: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(message.into(), response.into());
        self
    }

    /// Make every call fail, for testing error propagation.
    pub fn with_failure(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail = true;
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<ChatCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of `chat` invocations so far.
    pub fn chat_call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<ChatCall> {
        self.call_log.lock().unwrap().last().cloned()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }
}

impl Default for MockChatBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String> {
        self.call_log.lock().unwrap().push(ChatCall {
            history: history.to_vec(),
            message: message.to_string(),
        });

        if self.config.fail {
            return Err(Error::Inference("mock backend failure".to_string()));
        }

        Ok(self
            .config
            .fixed_responses
            .get(message)
            .cloned()
            .unwrap_or_else(|| self.config.default_response.clone()))
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
