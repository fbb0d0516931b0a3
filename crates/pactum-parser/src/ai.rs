//! Shared wrapper for generative text calls

use crate::error::ParserError;
use pactum_domain::{GenerationOptions, LlmProvider};
use pactum_llm::LlmError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedSemaphorePermit;
use tokio::time::timeout;
use tracing::debug;

/// A generative text provider shared across tasks
///
/// `None` wherever this appears means the AI capability is absent; the decision is made once
/// when the parser is built.
pub type SharedProvider = Arc<dyn LlmProvider<Error = LlmError> + Send + Sync>;

/// Wrap any provider for sharing
pub fn shared<L>(provider: L) -> SharedProvider
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
{
    Arc::new(provider)
}

/// Call the LLM provider with a timeout
///
/// The provider is synchronous, so the call runs on the blocking pool. A timed-out call is
/// abandoned, not cancelled. The optional `permit` moves into the blocking call and is only
/// released when the provider returns, so abandoned calls still count against the limit.
pub(crate) async fn call_llm(
    provider: &SharedProvider,
    prompt: String,
    options: GenerationOptions,
    limit: Duration,
    permit: Option<OwnedSemaphorePermit>,
) -> Result<String, ParserError> {
    let llm = Arc::clone(provider);
    debug!("Prompt length: {} chars", prompt.len());

    let task = tokio::task::spawn_blocking(move || {
        let reply = llm
            .generate(&prompt, &options)
            .map_err(|e| ParserError::Llm(e.to_string()));
        drop(permit);
        reply
    });

    let reply = timeout(limit, task)
        .await
        .map_err(|_| ParserError::Timeout)?
        .map_err(|e| ParserError::Llm(format!("Task join error: {}", e)))??;

    debug!("LLM response length: {} chars", reply.len());
    Ok(reply)
}

/// Shorten a raw reply for log output
pub(crate) fn truncate_for_log(reply: &str) -> String {
    const LIMIT: usize = 200;
    match reply.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &reply[..idx]),
        None => reply.to_string(),
    }
}
