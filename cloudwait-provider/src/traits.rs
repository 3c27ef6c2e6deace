use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{Attachment, Instance, ResourceHandle, ResourceKind, Snapshot, Volume};

/// Error as the remote API reported it, before mapping.
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// EC2 error code or HTTP status, depending on the provider
    pub code: Option<String>,
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 正在查询的资源，用于 NotFound 等错误
#[derive(Debug, Clone)]
pub(crate) struct ErrorContext {
    pub kind: ResourceKind,
    pub resource_id: String,
}

impl ErrorContext {
    pub fn new(kind: ResourceKind, resource_id: impl Into<String>) -> Self {
        Self {
            kind,
            resource_id: resource_id.into(),
        }
    }
}

/// Maps a provider's raw API errors onto [`ProviderError`].
pub(crate) trait ProviderErrorMapper {
    fn provider_name(&self) -> &'static str;

    fn map_error(&self, raw: RawApiError, context: &ErrorContext) -> ProviderError;

    /// The resource in `context` does not exist.
    fn not_found(&self, context: &ErrorContext, raw_message: Option<String>) -> ProviderError {
        ProviderError::ResourceNotFound {
            provider: self.provider_name().to_string(),
            kind: context.kind,
            resource_id: context.resource_id.clone(),
            raw_message,
        }
    }

    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Compute provider trait.
///
/// One lookup per call, no caching: every method returns a freshly fetched
/// representation of the remote resource.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 验证凭证是否有效
    async fn validate_credentials(&self) -> Result<bool>;

    /// Fetch the current representation of an instance.
    async fn get_instance(&self, handle: &ResourceHandle) -> Result<Instance>;

    /// Fetch the current representation of a volume, including its attachments.
    async fn get_volume(&self, handle: &ResourceHandle) -> Result<Volume>;

    /// Fetch the current representation of a snapshot.
    async fn get_snapshot(&self, handle: &ResourceHandle) -> Result<Snapshot>;

    /// Fetch the attachment of `volume` to `instance_id`.
    ///
    /// 默认实现读取卷详情并从附加列表中查找；列表中没有该实例时返回
    /// [`ProviderError::ResourceNotFound`]。Provider 可覆写以使用原生接口。
    async fn get_attachment(
        &self,
        volume: &ResourceHandle,
        instance_id: &str,
    ) -> Result<Attachment> {
        let found = self.get_volume(volume).await?;
        found
            .attachment_for(instance_id)
            .cloned()
            .ok_or_else(|| ProviderError::ResourceNotFound {
                provider: self.id().to_string(),
                kind: ResourceKind::Attachment,
                resource_id: format!("{}:{instance_id}", volume.id),
                raw_message: None,
            })
    }
}
