//! Blocking fetchers over an async [`ComputeProvider`]
//!
//! Each fetcher drives one provider call to completion on a shared
//! current-thread runtime. They must not be used from inside another tokio
//! runtime; doing so is reported as a transport error instead of panicking.

use std::future::Future;
use std::sync::Arc;

use cloudwait_provider::{
    Attachment, ComputeProvider, Instance, ProviderError, ResourceHandle, Snapshot, Volume,
};
use tokio::runtime::{Builder, Handle, Runtime};

use crate::error::{CoreError, CoreResult, FetchError};
use crate::traits::ResourceFetcher;

/// Shared current-thread runtime used to block on provider calls.
#[derive(Clone)]
pub struct BlockingBridge {
    runtime: Arc<Runtime>,
}

impl BlockingBridge {
    pub fn new() -> CoreResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CoreError::Runtime(e.to_string()))?;
        Ok(Self {
            runtime: Arc::new(runtime),
        })
    }

    fn block_on<T, Fut>(&self, provider: &str, future: Fut) -> Result<T, FetchError>
    where
        Fut: Future<Output = cloudwait_provider::Result<T>>,
    {
        if Handle::try_current().is_ok() {
            return Err(FetchError::Transport(ProviderError::ConfigurationError {
                provider: provider.to_string(),
                detail: "blocking fetcher used from inside an async runtime".to_string(),
            }));
        }
        self.runtime.block_on(future).map_err(FetchError::from)
    }
}

/// Fetches instances.
pub struct InstanceFetcher {
    provider: Arc<dyn ComputeProvider>,
    bridge: BlockingBridge,
}

impl InstanceFetcher {
    pub fn new(provider: Arc<dyn ComputeProvider>, bridge: BlockingBridge) -> Self {
        Self { provider, bridge }
    }
}

impl ResourceFetcher for InstanceFetcher {
    type Resource = Instance;

    fn fetch(&self, handle: &ResourceHandle) -> Result<Instance, FetchError> {
        self.bridge
            .block_on(self.provider.id(), self.provider.get_instance(handle))
    }
}

/// Fetches volumes with their attachment lists.
pub struct VolumeFetcher {
    provider: Arc<dyn ComputeProvider>,
    bridge: BlockingBridge,
}

impl VolumeFetcher {
    pub fn new(provider: Arc<dyn ComputeProvider>, bridge: BlockingBridge) -> Self {
        Self { provider, bridge }
    }
}

impl ResourceFetcher for VolumeFetcher {
    type Resource = Volume;

    fn fetch(&self, handle: &ResourceHandle) -> Result<Volume, FetchError> {
        self.bridge
            .block_on(self.provider.id(), self.provider.get_volume(handle))
    }
}

/// Fetches snapshots.
pub struct SnapshotFetcher {
    provider: Arc<dyn ComputeProvider>,
    bridge: BlockingBridge,
}

impl SnapshotFetcher {
    pub fn new(provider: Arc<dyn ComputeProvider>, bridge: BlockingBridge) -> Self {
        Self { provider, bridge }
    }
}

impl ResourceFetcher for SnapshotFetcher {
    type Resource = Snapshot;

    fn fetch(&self, handle: &ResourceHandle) -> Result<Snapshot, FetchError> {
        self.bridge
            .block_on(self.provider.id(), self.provider.get_snapshot(handle))
    }
}

/// Fetches the attachment of the polled volume to one instance.
///
/// The handle passed to `fetch` is the volume's.
pub struct AttachmentFetcher {
    provider: Arc<dyn ComputeProvider>,
    bridge: BlockingBridge,
    instance_id: String,
}

impl AttachmentFetcher {
    pub fn new(
        provider: Arc<dyn ComputeProvider>,
        bridge: BlockingBridge,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            bridge,
            instance_id: instance_id.into(),
        }
    }
}

impl ResourceFetcher for AttachmentFetcher {
    type Resource = Attachment;

    fn fetch(&self, handle: &ResourceHandle) -> Result<Attachment, FetchError> {
        self.bridge.block_on(
            self.provider.id(),
            self.provider.get_attachment(handle, &self.instance_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cloudwait_provider::{InstanceState, ResourceKind};

    use crate::test_utils::{instance, volume};

    /// Instance i-live exists; everything else is missing.
    struct StubProvider;

    #[async_trait]
    impl ComputeProvider for StubProvider {
        fn id(&self) -> &'static str {
            "stub"
        }

        async fn validate_credentials(&self) -> cloudwait_provider::Result<bool> {
            Ok(true)
        }

        async fn get_instance(&self, handle: &ResourceHandle) -> cloudwait_provider::Result<Instance> {
            if handle.id == "i-live" {
                Ok(instance(InstanceState::Running))
            } else {
                Err(ProviderError::ResourceNotFound {
                    provider: "stub".into(),
                    kind: ResourceKind::Instance,
                    resource_id: handle.id.clone(),
                    raw_message: None,
                })
            }
        }

        async fn get_volume(&self, _handle: &ResourceHandle) -> cloudwait_provider::Result<Volume> {
            Ok(volume(vec![]))
        }

        async fn get_snapshot(&self, _handle: &ResourceHandle) -> cloudwait_provider::Result<Snapshot> {
            Err(ProviderError::NetworkError {
                provider: "stub".into(),
                detail: "unreachable".into(),
            })
        }
    }

    fn provider() -> Arc<dyn ComputeProvider> {
        Arc::new(StubProvider)
    }

    #[test]
    fn instance_found() {
        let fetcher = InstanceFetcher::new(provider(), BlockingBridge::new().unwrap());
        let found = fetcher.fetch(&ResourceHandle::new("i-live")).unwrap();
        assert_eq!(found.state, InstanceState::Running);
    }

    #[test]
    fn instance_missing_is_not_found() {
        let fetcher = InstanceFetcher::new(provider(), BlockingBridge::new().unwrap());
        let err = fetcher.fetch(&ResourceHandle::new("i-gone")).unwrap_err();
        assert!(matches!(err, FetchError::NotFound(_)));
    }

    #[test]
    fn transport_error_passed_through() {
        let fetcher = SnapshotFetcher::new(provider(), BlockingBridge::new().unwrap());
        let err = fetcher.fetch(&ResourceHandle::new("snap-1")).unwrap_err();
        assert!(matches!(
            err,
            FetchError::Transport(ProviderError::NetworkError { .. })
        ));
    }

    #[test]
    fn default_attachment_lookup_not_found() {
        let fetcher = AttachmentFetcher::new(provider(), BlockingBridge::new().unwrap(), "i-1");
        let err = fetcher.fetch(&ResourceHandle::new("vol-1")).unwrap_err();
        assert!(matches!(err, FetchError::NotFound(_)));
    }

    #[test]
    fn bridge_shared_between_fetchers() {
        let bridge = BlockingBridge::new().unwrap();
        let instances = InstanceFetcher::new(provider(), bridge.clone());
        let volumes = VolumeFetcher::new(provider(), bridge);
        assert!(instances.fetch(&ResourceHandle::new("i-live")).is_ok());
        assert!(volumes.fetch(&ResourceHandle::new("vol-1")).is_ok());
    }

    #[test]
    fn refuses_nested_runtime() {
        let outer = Builder::new_current_thread().build().unwrap();
        let fetcher = InstanceFetcher::new(provider(), BlockingBridge::new().unwrap());
        let err = outer.block_on(async { fetcher.fetch(&ResourceHandle::new("i-live")) });
        assert!(matches!(
            err,
            Err(FetchError::Transport(ProviderError::ConfigurationError { .. }))
        ));
    }
}
