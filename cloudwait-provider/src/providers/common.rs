//! Provider 公共工具函数

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;

use crate::error::{ProviderError, Result};

type HmacSha256 = Hmac<Sha256>;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// 默认的瞬时错误重试次数
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 2;

/// 创建带超时配置的 HTTP Client
pub fn create_http_client(provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::ConfigurationError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ HMAC-SHA256 ============

/// HMAC-SHA256 计算（EC2 SigV4 签名使用）
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so new_from_slice cannot fail here
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC can take key of any size"),
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

// ============ Endpoint 处理 ============

/// 去掉 endpoint 末尾的斜杠，并校验协议
pub fn normalize_endpoint(endpoint: &str, provider: &str) -> Result<String> {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_string())
    } else {
        Err(ProviderError::ConfigurationError {
            provider: provider.to_string(),
            detail: format!("endpoint must be an http(s) URL: '{endpoint}'"),
        })
    }
}

/// Lower-cases a provider status string and unifies separators (`in-use`,
/// `IN_USE` and `in use` all become `in_use`).
pub fn normalize_status(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
