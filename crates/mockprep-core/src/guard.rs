//! Timeout guard shared by every call to an external capability.

use std::future::Future;
use std::time::Duration;

use crate::error::ServiceError;

/// Default bound for question generation.
pub const QUESTION_TIMEOUT: Duration = Duration::from_secs(10);
/// Default bound for answer evaluation.
pub const EVALUATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Run `call` under `limit`, turning an elapsed deadline into
/// [`ServiceError::Timeout`]. Failures are logged here so callers only have
/// to pick their fallback value.
pub async fn guarded<T, F>(
    operation: &'static str,
    limit: Duration,
    call: F,
) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    let result = match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout(limit.as_secs())),
    };

    if let Err(e) = &result {
        if e.is_offline() {
            tracing::debug!(operation, "no service configured, using fallback");
        } else {
            tracing::warn!(operation, error = %e, "service call failed, using fallback");
        }
    }

    result
}
