//! Shared HTTP transport for providers
//!
//! Providers build and sign their own `RequestBuilder`; this module sends it,
//! logs the exchange, turns transport-level failures into [`ProviderError`]
//! and retries the transient ones. The retry here covers a single remote
//! call and has nothing to do with state polling in `cloudwait-core`.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// 单次请求退避上限
const MAX_BACKOFF: Duration = Duration::from_secs(10);
/// `Retry-After` 上限
const MAX_RETRY_AFTER_SECS: u64 = 30;
const BASE_BACKOFF_MS: u64 = 100;

pub struct HttpUtils;

impl HttpUtils {
    /// Sends one request; returns the status and body of any response the
    /// provider should interpret itself.
    ///
    /// 429 and 502-504 never reach the caller as `Ok`: see [`classify_status`].
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url_or_action}");

        let response = request_builder
            .send()
            .await
            .map_err(|e| transport_error(provider_name, &e))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("failed to read {url_or_action} response: {e}"),
            })?;
        log::debug!(
            "[{provider_name}] {url_or_action} -> HTTP {status}: {}",
            truncate_for_log(&body)
        );

        classify_status(provider_name, status, retry_after, &body)?;
        Ok((status, body))
    }

    /// [`execute_request`](Self::execute_request) with up to `max_retries`
    /// extra attempts for [`ProviderError::is_retryable`] failures.
    ///
    /// Waits 100ms, 200ms, 400ms, ... (capped at 10s) between attempts, or
    /// the 429's `Retry-After` (capped at 30s) when present.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ProviderError> {
        let mut attempt = 0;
        loop {
            // 无法克隆（流式 body）时只能发送一次
            let request = match request_builder.try_clone() {
                Some(req) if attempt < max_retries => req,
                _ => {
                    return Self::execute_request(
                        request_builder,
                        provider_name,
                        method_name,
                        url_or_action,
                    )
                    .await;
                }
            };

            match Self::execute_request(request, provider_name, method_name, url_or_action).await {
                Err(e) if e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    attempt += 1;
                    log::warn!(
                        "[{provider_name}] {url_or_action} failed ({attempt}/{max_retries}), retrying in {:.1}s: {e}",
                        delay.as_secs_f32()
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    pub fn parse_json<T: DeserializeOwned>(
        response_text: &str,
        provider_name: &str,
    ) -> Result<T, ProviderError> {
        parse_with(response_text, provider_name, "JSON", |text| {
            serde_json::from_str(text).map_err(|e| e.to_string())
        })
    }

    pub fn parse_xml<T: DeserializeOwned>(
        response_text: &str,
        provider_name: &str,
    ) -> Result<T, ProviderError> {
        parse_with(response_text, provider_name, "XML", |text| {
            quick_xml::de::from_str(text).map_err(|e| e.to_string())
        })
    }
}

fn parse_with<T>(
    text: &str,
    provider: &str,
    format: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, ProviderError> {
    parse(text).map_err(|detail| {
        log::error!(
            "[{provider}] {format} parse failed: {detail}; body: {}",
            truncate_for_log(text)
        );
        ProviderError::ParseError {
            provider: provider.to_string(),
            detail,
        }
    })
}

fn transport_error(provider: &str, e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    }
}

/// Statuses that mean "try again later" regardless of provider.
fn classify_status(
    provider: &str,
    status: u16,
    retry_after: Option<u64>,
    body: &str,
) -> Result<(), ProviderError> {
    match status {
        429 => {
            log::warn!("[{provider}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            Err(ProviderError::RateLimited {
                provider: provider.to_string(),
                retry_after,
                raw_message: Some(truncate_for_log(body)),
            })
        }
        502..=504 => {
            log::warn!("[{provider}] Server error (HTTP {status})");
            Err(ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: format!("HTTP {status}: {}", truncate_for_log(body)),
            })
        }
        _ => Ok(()),
    }
}

fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    match error {
        ProviderError::RateLimited {
            retry_after: Some(secs),
            ..
        } => Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS)),
        _ => backoff_delay(attempt),
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1_u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(BASE_BACKOFF_MS.saturating_mul(factor)).min(MAX_BACKOFF)
}
