use serde::{Deserialize, Serialize};

use crate::types::ResourceKind;

/// Error returned by every [`ComputeProvider`](crate::ComputeProvider) call.
///
/// Serialized with the variant name under `code`, e.g.
/// `{"code":"ResourceNotFound","provider":"ec2","kind":"instance",...}`.
///
/// `NetworkError`, `Timeout` and `RateLimited` are transient; the HTTP layer
/// retries them before they ever reach a caller (see
/// [`is_retryable`](Self::is_retryable)). `ResourceNotFound` is what pollers
/// turn into "not there yet" or "gone".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// Connection failure or 5xx.
    NetworkError { provider: String, detail: String },

    InvalidCredentials {
        provider: String,
        raw_message: Option<String>,
    },

    PermissionDenied {
        provider: String,
        raw_message: Option<String>,
    },

    /// 资源不存在（或已被删除）
    ResourceNotFound {
        provider: String,
        kind: ResourceKind,
        resource_id: String,
        raw_message: Option<String>,
    },

    /// Rejected request parameter, e.g. a malformed instance id.
    InvalidParameter {
        provider: String,
        param: String,
        detail: String,
    },

    /// Throttled. `retry_after` is in seconds when the API says.
    RateLimited {
        provider: String,
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    Timeout { provider: String, detail: String },

    /// 响应体无法解析
    ParseError { provider: String, detail: String },

    /// Unusable provider setup: bad endpoint, missing region, nested runtime.
    ConfigurationError { provider: String, detail: String },

    /// API error with no mapping.
    Unknown {
        provider: String,
        raw_code: Option<String>,
        raw_message: String,
    },
}

impl ProviderError {
    /// Provider id carried by every variant.
    pub fn provider(&self) -> &str {
        match self {
            Self::NetworkError { provider, .. }
            | Self::InvalidCredentials { provider, .. }
            | Self::PermissionDenied { provider, .. }
            | Self::ResourceNotFound { provider, .. }
            | Self::InvalidParameter { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::ConfigurationError { provider, .. }
            | Self::Unknown { provider, .. } => provider,
        }
    }

    /// Caused by the caller's input or account rather than by the provider
    /// misbehaving; logged at `warn` instead of `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::ResourceNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::ConfigurationError { .. }
        )
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }

    /// Transient; the HTTP layer retries these.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// `": msg"` when the API sent a message, empty otherwise.
fn with_message(message: Option<&String>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let provider = self.provider();
        match self {
            Self::NetworkError { detail, .. } => write!(f, "[{provider}] Network error: {detail}"),
            Self::InvalidCredentials { raw_message, .. } => write!(
                f,
                "[{provider}] Invalid credentials{}",
                with_message(raw_message.as_ref())
            ),
            Self::PermissionDenied { raw_message, .. } => write!(
                f,
                "[{provider}] Permission denied{}",
                with_message(raw_message.as_ref())
            ),
            Self::ResourceNotFound {
                kind, resource_id, ..
            } => write!(f, "[{provider}] {kind} '{resource_id}' not found"),
            Self::InvalidParameter { param, detail, .. } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::RateLimited {
                retry_after: Some(secs),
                ..
            } => write!(f, "[{provider}] Rate limited (retry after {secs}s)"),
            Self::RateLimited { .. } => write!(f, "[{provider}] Rate limited"),
            Self::Timeout { detail, .. } => write!(f, "[{provider}] Request timeout: {detail}"),
            Self::ParseError { detail, .. } => write!(f, "[{provider}] Parse error: {detail}"),
            Self::ConfigurationError { detail, .. } => {
                write!(f, "[{provider}] Configuration error: {detail}")
            }
            Self::Unknown { raw_message, .. } => write!(f, "[{provider}] {raw_message}"),
        }
    }
}

impl std::error::Error for ProviderError {}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found(kind: ResourceKind, id: &str) -> ProviderError {
        ProviderError::ResourceNotFound {
            provider: "ec2".to_string(),
            kind,
            resource_id: id.to_string(),
            raw_message: Some("gone".to_string()),
        }
    }

    #[test]
    fn display_formats() {
        let cases = [
            (
                ProviderError::InvalidCredentials {
                    provider: "ec2".into(),
                    raw_message: Some("AWS was not able to validate the provided access credentials".into()),
                },
                "[ec2] Invalid credentials: AWS was not able to validate the provided access credentials",
            ),
            (
                ProviderError::InvalidCredentials {
                    provider: "openstack".into(),
                    raw_message: None,
                },
                "[openstack] Invalid credentials",
            ),
            (
                not_found(ResourceKind::Instance, "i-1234"),
                "[ec2] instance 'i-1234' not found",
            ),
            (
                ProviderError::RateLimited {
                    provider: "ec2".into(),
                    retry_after: Some(30),
                    raw_message: None,
                },
                "[ec2] Rate limited (retry after 30s)",
            ),
            (
                ProviderError::ConfigurationError {
                    provider: "openstack".into(),
                    detail: "compute endpoint is empty".into(),
                },
                "[openstack] Configuration error: compute endpoint is empty",
            ),
            (
                ProviderError::Unknown {
                    provider: "ec2".into(),
                    raw_code: Some("Blocked".into()),
                    raw_message: "account blocked".into(),
                },
                "[ec2] account blocked",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn serialized_with_code_tag() {
        let json = serde_json::to_string(&not_found(ResourceKind::Volume, "vol-1")).unwrap();
        assert!(json.contains("\"code\":\"ResourceNotFound\""));
        assert!(json.contains("\"kind\":\"volume\""));

        let back: ProviderError = serde_json::from_str(&json).unwrap();
        assert!(back.is_not_found());
        assert_eq!(back.provider(), "ec2");
    }

    #[test]
    fn classification() {
        let gone = not_found(ResourceKind::Snapshot, "snap-1");
        assert!(gone.is_not_found() && gone.is_expected() && !gone.is_retryable());

        let reset = ProviderError::NetworkError {
            provider: "openstack".into(),
            detail: "connection reset".into(),
        };
        assert!(!reset.is_not_found() && !reset.is_expected() && reset.is_retryable());

        let garbled = ProviderError::ParseError {
            provider: "ec2".into(),
            detail: "unexpected end of XML".into(),
        };
        assert!(!garbled.is_retryable() && !garbled.is_expected());
    }
}
