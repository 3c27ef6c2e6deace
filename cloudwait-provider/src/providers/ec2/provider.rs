//! EC2 `ComputeProvider` trait implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::normalize_status;
use crate::traits::{ComputeProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{
    Attachment, AttachmentStatus, Instance, InstanceState, ResourceHandle, ResourceKind,
    Snapshot, SnapshotStatus, Volume, VolumeStatus,
};
use crate::utils::datetime;

use super::Ec2Provider;
use super::types::{
    AttachmentItem, DescribeInstancesResponse, DescribeRegionsResponse,
    DescribeSnapshotsResponse, DescribeVolumesResponse, InstanceItem, SnapshotItem, VolumeItem,
};

// ============ 状态映射 ============

fn instance_state(raw: &str) -> InstanceState {
    match normalize_status(raw).as_str() {
        "pending" => InstanceState::Pending,
        "running" => InstanceState::Running,
        "stopping" => InstanceState::Stopping,
        "stopped" => InstanceState::Stopped,
        "shutting_down" => InstanceState::ShuttingDown,
        "terminated" => InstanceState::Terminated,
        _ => InstanceState::Unrecognized,
    }
}

fn volume_status(raw: &str) -> VolumeStatus {
    match normalize_status(raw).as_str() {
        "creating" => VolumeStatus::Creating,
        "available" => VolumeStatus::Available,
        "in_use" => VolumeStatus::InUse,
        "deleting" | "deleted" => VolumeStatus::Deleting,
        "error" => VolumeStatus::Error,
        _ => VolumeStatus::Unrecognized,
    }
}

fn attachment_status(raw: &str) -> AttachmentStatus {
    match normalize_status(raw).as_str() {
        "attaching" => AttachmentStatus::Attaching,
        "attached" => AttachmentStatus::Attached,
        "detaching" => AttachmentStatus::Detaching,
        "detached" => AttachmentStatus::Detached,
        _ => AttachmentStatus::Unrecognized,
    }
}

fn snapshot_status(raw: &str) -> SnapshotStatus {
    match normalize_status(raw).as_str() {
        "pending" => SnapshotStatus::Pending,
        "completed" => SnapshotStatus::Completed,
        "error" => SnapshotStatus::Error,
        _ => SnapshotStatus::Unrecognized,
    }
}

// ============ 类型转换 ============

fn convert_instance(item: InstanceItem, region: &str) -> Instance {
    let name = item
        .tag_set
        .items
        .into_iter()
        .find(|t| t.key == "Name")
        .map(|t| t.value);

    Instance {
        state: instance_state(&item.instance_state.name),
        raw_state: item.instance_state.name,
        id: item.instance_id,
        region: Some(region.to_string()),
        name,
        image_id: item.image_id,
        launched_at: item.launch_time.as_deref().and_then(datetime::parse),
    }
}

fn convert_attachment(item: AttachmentItem) -> Attachment {
    Attachment {
        id: None,
        status: attachment_status(&item.status),
        volume_id: item.volume_id,
        instance_id: item.instance_id,
        device: item.device,
        attached_at: item.attach_time.as_deref().and_then(datetime::parse),
    }
}

fn convert_volume(item: VolumeItem, region: &str) -> Volume {
    Volume {
        status: volume_status(&item.status),
        raw_status: item.status,
        id: item.volume_id,
        region: Some(region.to_string()),
        size_gb: item.size,
        attachments: item
            .attachment_set
            .items
            .into_iter()
            .map(convert_attachment)
            .collect(),
        created_at: item.create_time.as_deref().and_then(datetime::parse),
    }
}

fn convert_snapshot(item: SnapshotItem, region: &str) -> Snapshot {
    Snapshot {
        status: snapshot_status(&item.status),
        raw_status: item.status,
        id: item.snapshot_id,
        volume_id: item.volume_id,
        region: Some(region.to_string()),
        progress: item.progress.filter(|p| !p.is_empty()),
        started_at: item.start_time.as_deref().and_then(datetime::parse),
    }
}

impl Ec2Provider {
    fn region_of<'a>(&'a self, handle: &'a ResourceHandle) -> &'a str {
        handle.region.as_deref().unwrap_or(&self.default_region)
    }
}

#[async_trait]
impl ComputeProvider for Ec2Provider {
    fn id(&self) -> &'static str {
        "ec2"
    }

    async fn validate_credentials(&self) -> Result<bool> {
        let ctx = ErrorContext::new(ResourceKind::Instance, "");
        match self
            .query::<DescribeRegionsResponse>("DescribeRegions", &[], &self.default_region, &ctx)
            .await
        {
            Ok(resp) => {
                log::debug!(
                    "[ec2] Credentials valid, {} regions visible",
                    resp.region_info.items.len()
                );
                Ok(true)
            }
            Err(
                ProviderError::InvalidCredentials { .. } | ProviderError::PermissionDenied { .. },
            ) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get_instance(&self, handle: &ResourceHandle) -> Result<Instance> {
        let region = self.region_of(handle);
        let ctx = ErrorContext::new(ResourceKind::Instance, &handle.id);
        let resp: DescribeInstancesResponse = self
            .query(
                "DescribeInstances",
                &[("InstanceId.1", handle.id.as_str())],
                region,
                &ctx,
            )
            .await?;

        resp.reservation_set
            .items
            .into_iter()
            .flat_map(|r| r.instances_set.items)
            .find(|i| i.instance_id == handle.id)
            .map(|item| convert_instance(item, region))
            .ok_or_else(|| self.not_found(&ctx, None))
    }

    async fn get_volume(&self, handle: &ResourceHandle) -> Result<Volume> {
        let region = self.region_of(handle);
        let ctx = ErrorContext::new(ResourceKind::Volume, &handle.id);
        let resp: DescribeVolumesResponse = self
            .query(
                "DescribeVolumes",
                &[("VolumeId.1", handle.id.as_str())],
                region,
                &ctx,
            )
            .await?;

        resp.volume_set
            .items
            .into_iter()
            .find(|v| v.volume_id == handle.id)
            .map(|item| convert_volume(item, region))
            .ok_or_else(|| self.not_found(&ctx, None))
    }

    async fn get_snapshot(&self, handle: &ResourceHandle) -> Result<Snapshot> {
        let region = self.region_of(handle);
        let ctx = ErrorContext::new(ResourceKind::Snapshot, &handle.id);
        let resp: DescribeSnapshotsResponse = self
            .query(
                "DescribeSnapshots",
                &[("SnapshotId.1", handle.id.as_str())],
                region,
                &ctx,
            )
            .await?;

        resp.snapshot_set
            .items
            .into_iter()
            .find(|s| s.snapshot_id == handle.id)
            .map(|item| convert_snapshot(item, region))
            .ok_or_else(|| self.not_found(&ctx, None))
    }
}
