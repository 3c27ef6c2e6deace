//! EC2 错误映射
//!
//! 参考: <https://docs.aws.amazon.com/AWSEC2/latest/APIReference/errors-overview.html>
//!
//! - **资源不存在**：所有 `*.NotFound` 错误码（`InvalidInstanceID.NotFound`、`InvalidVolume.NotFound` 等）
//! - **认证错误**：`AuthFailure`、`InvalidClientTokenId`、`SignatureDoesNotMatch`
//! - **权限拒绝**：`UnauthorizedOperation`
//! - **频率限制**：`RequestLimitExceeded`、`Throttling`
//! - **参数错误**：`InvalidParameterValue` 与所有 `*.Malformed` 错误码
//! - 其他错误码 fallback 到 Unknown

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Ec2Provider;

/// EC2 错误码映射实现
impl ProviderErrorMapper for Ec2Provider {
    fn provider_name(&self) -> &'static str {
        "ec2"
    }

    fn map_error(&self, raw: RawApiError, context: &ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some(code) if code.ends_with(".NotFound") => {
                self.not_found(context, Some(raw.message))
            }

            Some("AuthFailure" | "InvalidClientTokenId" | "SignatureDoesNotMatch") => {
                ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            Some("UnauthorizedOperation") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("RequestLimitExceeded" | "Throttling") => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },

            Some(code) if code == "InvalidParameterValue" || code.ends_with(".Malformed") => {
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: context.kind.to_string(),
                    detail: raw.message,
                }
            }

            _ => self.unknown_error(raw),
        }
    }
}
