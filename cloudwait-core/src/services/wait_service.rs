//! 资源状态等待服务

use std::sync::Arc;

use cloudwait_provider::{ComputeProvider, InstanceState, ResourceHandle};

use crate::cancel::CancellationToken;
use crate::comparators::{
    ATTACHMENT_ATTACHED, INSTANCE_RUNNING, INSTANCE_STOPPED, INSTANCE_TERMINATED,
    SNAPSHOT_COMPLETED, StateEquals, VOLUME_AVAILABLE, VolumeAttached, VolumeDetached,
};
use crate::config::PollConfig;
use crate::error::{CoreResult, PollError};
use crate::fetchers::{
    AttachmentFetcher, BlockingBridge, InstanceFetcher, SnapshotFetcher, VolumeFetcher,
};
use crate::observer::{LogObserver, PollObserver};
use crate::poller::{NotFoundPolicy, PollReport, Poller};
use crate::traits::{ResourceFetcher, StateComparator};

/// Blocking waits for common resource conditions on one provider.
///
/// Every wait treats a missing resource as "not there yet"
/// ([`NotFoundPolicy::Unmatched`]) except [`instance_terminated`](Self::instance_terminated),
/// where a missing instance is the goal.
pub struct WaitService {
    provider: Arc<dyn ComputeProvider>,
    bridge: BlockingBridge,
    config: PollConfig,
    observer: Arc<dyn PollObserver>,
}

impl WaitService {
    /// 创建等待服务实例
    pub fn new(provider: Arc<dyn ComputeProvider>, config: PollConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            provider,
            bridge: BlockingBridge::new()?,
            config,
            observer: Arc::new(LogObserver),
        })
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PollObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn instance_running(
        &self,
        handle: &ResourceHandle,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollReport, PollError> {
        self.run(self.instances(), INSTANCE_RUNNING, NotFoundPolicy::Unmatched, handle, cancel)
    }

    pub fn instance_stopped(
        &self,
        handle: &ResourceHandle,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollReport, PollError> {
        self.run(self.instances(), INSTANCE_STOPPED, NotFoundPolicy::Unmatched, handle, cancel)
    }

    /// Succeeds on `Terminated` or once the instance is gone.
    pub fn instance_terminated(
        &self,
        handle: &ResourceHandle,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollReport, PollError> {
        self.run(self.instances(), INSTANCE_TERMINATED, NotFoundPolicy::Matched, handle, cancel)
    }

    pub fn instance_state(
        &self,
        handle: &ResourceHandle,
        target: InstanceState,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollReport, PollError> {
        self.run(
            self.instances(),
            StateEquals::new(target),
            NotFoundPolicy::Unmatched,
            handle,
            cancel,
        )
    }

    pub fn volume_available(
        &self,
        handle: &ResourceHandle,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollReport, PollError> {
        self.run(self.volumes(), VOLUME_AVAILABLE, NotFoundPolicy::Unmatched, handle, cancel)
    }

    /// Latest attachment of the volume is `Attached`.
    pub fn volume_attached(
        &self,
        handle: &ResourceHandle,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollReport, PollError> {
        self.run(self.volumes(), VolumeAttached, NotFoundPolicy::Unmatched, handle, cancel)
    }

    /// Volume has no attachments, or its latest one is `Detached`.
    pub fn volume_detached(
        &self,
        handle: &ResourceHandle,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollReport, PollError> {
        self.run(self.volumes(), VolumeDetached, NotFoundPolicy::Unmatched, handle, cancel)
    }

    /// `volume` is attached to `instance_id` specifically.
    pub fn attachment_attached(
        &self,
        volume: &ResourceHandle,
        instance_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollReport, PollError> {
        let fetcher =
            AttachmentFetcher::new(Arc::clone(&self.provider), self.bridge.clone(), instance_id);
        self.run(fetcher, ATTACHMENT_ATTACHED, NotFoundPolicy::Unmatched, volume, cancel)
    }

    pub fn snapshot_completed(
        &self,
        handle: &ResourceHandle,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollReport, PollError> {
        let fetcher = SnapshotFetcher::new(Arc::clone(&self.provider), self.bridge.clone());
        self.run(fetcher, SNAPSHOT_COMPLETED, NotFoundPolicy::Unmatched, handle, cancel)
    }

    // ===== 内部方法 =====

    fn instances(&self) -> InstanceFetcher {
        InstanceFetcher::new(Arc::clone(&self.provider), self.bridge.clone())
    }

    fn volumes(&self) -> VolumeFetcher {
        VolumeFetcher::new(Arc::clone(&self.provider), self.bridge.clone())
    }

    fn run<F, C>(
        &self,
        fetcher: F,
        comparator: C,
        policy: NotFoundPolicy,
        handle: &ResourceHandle,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollReport, PollError>
    where
        F: ResourceFetcher,
        C: StateComparator<F::Resource>,
    {
        let mut poller = Poller::with_checked_config(fetcher, comparator, self.config)
            .not_found_policy(policy)
            .observer(Arc::clone(&self.observer));
        if let Some(token) = cancel {
            poller = poller.cancellation(token.clone());
        }
        poller.poll(handle)
    }
}
