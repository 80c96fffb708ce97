//! HTTP retry helpers for idempotent reads.
//!
//! Only reads go through here. Creates are not idempotent, so a retried
//! POST could store the same report twice; writes call `send()` once.
//!
//! ```ignore
//! let body = retry::send_json(|| client.get(&url), retry::MAX_RETRIES).await?;
//! ```

use std::time::Duration;

use reqwest::StatusCode;

use crate::ClientError;

/// Maximum number of retry attempts for transient HTTP errors.
///
/// With exponential backoff (1s, 2s, 4s) the total wait before giving up
/// is 7 seconds, short enough that an interactive list refresh does not
/// appear hung.
pub const MAX_RETRIES: u32 = 3;

/// Sends an HTTP request and parses the response body as JSON.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`] (builders are consumed by `.send()`).
/// Connection errors, timeouts, HTTP 429 and HTTP 5xx are retried up to
/// `max_retries` times with exponential backoff. Other 4xx statuses are
/// permanent and returned immediately.
///
/// # Errors
///
/// Returns [`ClientError`] if the request fails after all retries, the
/// server returns a non-retryable status, or the body is not JSON.
pub async fn send_json<F>(build_request: F, max_retries: u32) -> Result<serde_json::Value, ClientError>
where
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    let response = send_inner(&build_request, max_retries).await?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

async fn send_inner<F>(build_request: &F, max_retries: u32) -> Result<reqwest::Response, ClientError>
where
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = backoff_delay(attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < max_retries {
                    log::warn!("  transient error: {e}");
                    attempt += 1;
                    continue;
                }
                return Err(ClientError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if is_retryable_status(status) {
                    if attempt < max_retries {
                        log::warn!("  HTTP {status}, will retry");
                        attempt += 1;
                        continue;
                    }
                    return Err(ClientError::Status {
                        status: status.as_u16(),
                    });
                }

                if status.is_client_error() {
                    return Err(ClientError::Status {
                        status: status.as_u16(),
                    });
                }

                return Ok(response);
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based): 1s, 2s, 4s, ...
#[must_use]
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.saturating_sub(1).min(6))
}

/// Returns `true` for statuses worth retrying (429 and 5xx).
#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}
