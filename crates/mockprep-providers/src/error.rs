//! Mapping from HTTP client failures to [`ServiceError`].

use mockprep_core::error::ServiceError;
use serde::de::DeserializeOwned;

/// Classify a transport error from `reqwest`.
pub(crate) fn send_error(e: reqwest::Error, timeout_secs: u64, base_url: &str) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout(timeout_secs)
    } else if e.is_connect() {
        ServiceError::Network(format!("service not reachable at {base_url}: {e}"))
    } else {
        ServiceError::Network(e.to_string())
    }
}

/// Turn a non-success status into [`ServiceError::Api`], otherwise decode the
/// JSON body.
pub(crate) async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = response.status().as_u16();
    if status >= 400 {
        let message = response.text().await.unwrap_or_default();
        return Err(ServiceError::Api { status, message });
    }

    response
        .json()
        .await
        .map_err(|e| ServiceError::MalformedPayload(format!("failed to parse response: {e}")))
}
