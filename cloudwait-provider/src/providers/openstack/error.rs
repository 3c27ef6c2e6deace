//! OpenStack 错误映射
//!
//! Nova 和 Cinder 的错误体只有 fault 名称与 HTTP 状态码，映射按状态码进行：
//! 404 资源不存在，401 认证失败，403 权限拒绝，400 参数错误，413/429 频率限制。

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::OpenstackProvider;

impl ProviderErrorMapper for OpenstackProvider {
    fn provider_name(&self) -> &'static str {
        "openstack"
    }

    /// `raw.code` carries the HTTP status as a string.
    fn map_error(&self, raw: RawApiError, context: &ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("404") => self.not_found(context, Some(raw.message)),
            Some("401") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("400") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: context.kind.to_string(),
                detail: raw.message,
            },
            // Nova 旧版本用 413 表示超出速率限制
            Some("413" | "429") => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },
            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceKind;

    fn provider() -> OpenstackProvider {
        OpenstackProvider::new(
            "token".into(),
            "https://nova.example.com/v2.1/p".into(),
            "https://cinder.example.com/v3/p".into(),
        )
        .unwrap()
    }

    fn map(status: &str) -> ProviderError {
        provider().map_error(
            RawApiError::with_code(status, "message"),
            &ErrorContext::new(ResourceKind::Volume, "v1"),
        )
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            map("404"),
            ProviderError::ResourceNotFound { kind: ResourceKind::Volume, .. }
        ));
        assert!(matches!(map("401"), ProviderError::InvalidCredentials { .. }));
        assert!(matches!(map("403"), ProviderError::PermissionDenied { .. }));
        assert!(matches!(map("400"), ProviderError::InvalidParameter { .. }));
        assert!(matches!(map("413"), ProviderError::RateLimited { .. }));
        assert!(matches!(map("500"), ProviderError::Unknown { .. }));
    }
}
