use crate::core::error::{Result, RpgError};
use std::future::Future;

/// Attempts made by judge and generator calls
pub const MAX_ATTEMPTS: u32 = 3;

/// Run `attempt` until it succeeds or `max_attempts` are used up
pub async fn with_retries<T, F, Fut>(label: &str, max_attempts: u32, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;
    for n in 1..=max_attempts {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(label, attempt = n, error = %e, "LLM call failed");
                last_error = Some(e);
            }
        }
    }
    Err(RpgError::LlmError(format!(
        "{} failed after {} attempts: {}",
        label,
        max_attempts,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}
