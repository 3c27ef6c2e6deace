//! OpenStack `ComputeProvider` trait implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::normalize_status;
use crate::traits::{ComputeProvider, ErrorContext};
use crate::types::{
    Attachment, AttachmentStatus, Instance, InstanceState, ResourceHandle, ResourceKind,
    Snapshot, SnapshotStatus, Volume, VolumeStatus,
};

use super::OpenstackProvider;
use super::http::Service;
use super::types::{
    CinderAttachment, ServerResponse, SnapshotResponse, VolumeAttachmentResponse, VolumeResponse,
};

// ============ 状态映射 ============

fn instance_state(raw: &str) -> InstanceState {
    match normalize_status(raw).as_str() {
        "build" | "rebuild" => InstanceState::Pending,
        "active" => InstanceState::Running,
        "shutoff" | "stopped" => InstanceState::Stopped,
        "deleted" | "soft_deleted" => InstanceState::Terminated,
        "error" => InstanceState::Error,
        _ => InstanceState::Unrecognized,
    }
}

fn volume_status(raw: &str) -> VolumeStatus {
    match normalize_status(raw).as_str() {
        "creating" | "downloading" => VolumeStatus::Creating,
        "available" => VolumeStatus::Available,
        "in_use" => VolumeStatus::InUse,
        "deleting" => VolumeStatus::Deleting,
        "error" | "error_deleting" => VolumeStatus::Error,
        _ => VolumeStatus::Unrecognized,
    }
}

fn snapshot_status(raw: &str) -> SnapshotStatus {
    match normalize_status(raw).as_str() {
        "creating" => SnapshotStatus::Pending,
        "available" => SnapshotStatus::Completed,
        "error" => SnapshotStatus::Error,
        _ => SnapshotStatus::Unrecognized,
    }
}

/// Cinder lists only live attachments; a volume mid-attach or mid-detach
/// shows up through its own status.
fn attachment_status(volume_status: VolumeStatus, raw_volume_status: &str) -> AttachmentStatus {
    match normalize_status(raw_volume_status).as_str() {
        "attaching" => AttachmentStatus::Attaching,
        "detaching" => AttachmentStatus::Detaching,
        _ if volume_status == VolumeStatus::InUse => AttachmentStatus::Attached,
        _ => AttachmentStatus::Unrecognized,
    }
}

fn convert_attachment(
    att: CinderAttachment,
    volume_id: &str,
    status: AttachmentStatus,
) -> Attachment {
    Attachment {
        id: att.attachment_id,
        volume_id: att.volume_id.unwrap_or_else(|| volume_id.to_string()),
        instance_id: att.server_id,
        device: att.device,
        status,
        attached_at: att.attached_at,
    }
}

#[async_trait]
impl ComputeProvider for OpenstackProvider {
    fn id(&self) -> &'static str {
        "openstack"
    }

    async fn validate_credentials(&self) -> Result<bool> {
        let ctx = ErrorContext::new(ResourceKind::Instance, "");
        match self
            .get::<serde_json::Value>(Service::Compute, "/flavors?limit=1", &ctx)
            .await
        {
            Ok(_) => Ok(true),
            Err(
                ProviderError::InvalidCredentials { .. } | ProviderError::PermissionDenied { .. },
            ) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get_instance(&self, handle: &ResourceHandle) -> Result<Instance> {
        let ctx = ErrorContext::new(ResourceKind::Instance, &handle.id);
        let resp: ServerResponse = self
            .get(
                Service::Compute,
                &format!("/servers/{}", urlencoding::encode(&handle.id)),
                &ctx,
            )
            .await?;

        let server = resp.server;
        let image_id = server.image_id();
        Ok(Instance {
            state: instance_state(&server.status),
            raw_state: server.status,
            id: server.id,
            region: server.availability_zone.or_else(|| handle.region.clone()),
            name: server.name,
            image_id,
            launched_at: server.created,
        })
    }

    async fn get_volume(&self, handle: &ResourceHandle) -> Result<Volume> {
        let ctx = ErrorContext::new(ResourceKind::Volume, &handle.id);
        let resp: VolumeResponse = self
            .get(
                Service::Volume,
                &format!("/volumes/{}", urlencoding::encode(&handle.id)),
                &ctx,
            )
            .await?;

        let volume = resp.volume;
        let status = volume_status(&volume.status);
        let att_status = attachment_status(status, &volume.status);
        let attachments = volume
            .attachments
            .into_iter()
            .map(|att| convert_attachment(att, &volume.id, att_status))
            .collect();

        Ok(Volume {
            status,
            raw_status: volume.status,
            region: volume.availability_zone.or_else(|| handle.region.clone()),
            id: volume.id,
            size_gb: volume.size,
            attachments,
            created_at: volume.created_at,
        })
    }

    async fn get_snapshot(&self, handle: &ResourceHandle) -> Result<Snapshot> {
        let ctx = ErrorContext::new(ResourceKind::Snapshot, &handle.id);
        let resp: SnapshotResponse = self
            .get(
                Service::Volume,
                &format!("/snapshots/{}", urlencoding::encode(&handle.id)),
                &ctx,
            )
            .await?;

        let snapshot = resp.snapshot;
        Ok(Snapshot {
            status: snapshot_status(&snapshot.status),
            raw_status: snapshot.status,
            id: snapshot.id,
            volume_id: snapshot.volume_id,
            region: handle.region.clone(),
            progress: snapshot.progress,
            started_at: snapshot.created_at,
        })
    }

    /// Nova's attachment endpoint; an existing record means the volume is attached.
    async fn get_attachment(
        &self,
        volume: &ResourceHandle,
        instance_id: &str,
    ) -> Result<Attachment> {
        let ctx = ErrorContext::new(
            ResourceKind::Attachment,
            format!("{}:{instance_id}", volume.id),
        );
        let resp: VolumeAttachmentResponse = self
            .get(
                Service::Compute,
                &format!(
                    "/servers/{}/os-volume_attachments/{}",
                    urlencoding::encode(instance_id),
                    urlencoding::encode(&volume.id)
                ),
                &ctx,
            )
            .await?;

        let att = resp.volume_attachment;
        Ok(Attachment {
            id: att.id,
            volume_id: att.volume_id,
            instance_id: att.server_id,
            device: att.device,
            status: AttachmentStatus::Attached,
            attached_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nova_status_mapping() {
        assert_eq!(instance_state("BUILD"), InstanceState::Pending);
        assert_eq!(instance_state("ACTIVE"), InstanceState::Running);
        assert_eq!(instance_state("SHUTOFF"), InstanceState::Stopped);
        assert_eq!(instance_state("SOFT_DELETED"), InstanceState::Terminated);
        assert_eq!(instance_state("ERROR"), InstanceState::Error);
        assert_eq!(instance_state("RESIZE"), InstanceState::Unrecognized);
    }

    #[test]
    fn cinder_status_mapping() {
        assert_eq!(volume_status("in-use"), VolumeStatus::InUse);
        assert_eq!(volume_status("available"), VolumeStatus::Available);
        assert_eq!(volume_status("error_deleting"), VolumeStatus::Error);
        assert_eq!(volume_status("attaching"), VolumeStatus::Unrecognized);
        assert_eq!(snapshot_status("available"), SnapshotStatus::Completed);
        assert_eq!(snapshot_status("creating"), SnapshotStatus::Pending);
    }

    #[test]
    fn attachment_status_follows_volume() {
        assert_eq!(
            attachment_status(VolumeStatus::InUse, "in-use"),
            AttachmentStatus::Attached
        );
        assert_eq!(
            attachment_status(VolumeStatus::Unrecognized, "detaching"),
            AttachmentStatus::Detaching
        );
        assert_eq!(
            attachment_status(VolumeStatus::Unrecognized, "attaching"),
            AttachmentStatus::Attaching
        );
    }
}
