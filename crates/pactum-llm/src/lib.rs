//! Pactum LLM Provider Layer
//!
//! Pluggable generative text providers behind the `LlmProvider` trait from `pactum-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use pactum_llm::MockProvider;
//! use pactum_domain::{GenerationOptions, LlmProvider};
//!
//! let provider = MockProvider::new("clause");
//! let result = provider.generate("classify this", &GenerationOptions::default()).unwrap();
//! assert_eq!(result, "clause");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use pactum_domain::{GenerationOptions, LlmProvider};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail,
}

#[derive(Debug, Default)]
struct MockState {
    rules: Vec<(String, MockReply)>,
    call_count: usize,
    last_options: Option<GenerationOptions>,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured replies without any network calls. Rules match when the prompt
/// contains the registered fragment; the first registered match wins, otherwise the default
/// reply is returned.
///
/// # Examples
///
/// ```
/// use pactum_llm::MockProvider;
/// use pactum_domain::{GenerationOptions, LlmProvider};
///
/// let options = GenerationOptions::default();
/// let mut provider = MockProvider::new("other");
/// provider.add_response("SIGNATURE", "signature");
/// provider.add_error("broken");
///
/// assert_eq!(provider.generate("...IN WITNESS WHEREOF... SIGNATURE", &options).unwrap(), "signature");
/// assert!(provider.generate("a broken prompt", &options).is_err());
/// assert_eq!(provider.generate("anything else", &options).unwrap(), "other");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    model: String,
    delay: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed reply for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            model: "mock".to_string(),
            delay: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a provider that fails every call
    pub fn failing() -> Self {
        let mut provider = Self::new("");
        provider.add_error("");
        provider
    }

    /// Reply with `response` whenever the prompt contains `fragment`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.lock()
            .rules
            .push((fragment.into(), MockReply::Text(response.into())));
    }

    /// Fail whenever the prompt contains `fragment`
    pub fn add_error(&mut self, fragment: impl Into<String>) {
        self.lock().rules.push((fragment.into(), MockReply::Fail));
    }

    /// Sleep for `delay` before answering, to exercise timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Override the reported model name
    pub fn with_model_name(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.lock().call_count
    }

    /// Options passed on the most recent call
    pub fn last_options(&self) -> Option<GenerationOptions> {
        self.lock().last_options
    }

    /// Every prompt received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, Self::Error> {
        let reply = {
            let mut state = self.lock();
            state.call_count += 1;
            state.last_options = Some(*options);
            state.prompts.push(prompt.to_string());
            state
                .rules
                .iter()
                .find(|(fragment, _)| prompt.contains(fragment.as_str()))
                .map(|(_, reply)| reply.clone())
        };

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        match reply {
            Some(MockReply::Fail) => Err(LlmError::Other("Mock error".to_string())),
            Some(MockReply::Text(text)) => Ok(text),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
