//! EC2 Query API response types (XML)

use serde::Deserialize;

/// `<xxxSet><item>..</item></xxxSet>` wrapper used by every EC2 list.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ItemSet<T> {
    #[serde(rename = "item", default)]
    pub items: Vec<T>,
}

impl<T> Default for ItemSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

// ============ Errors ============

#[derive(Debug, Deserialize)]
#[serde(rename = "Response")]
pub struct ErrorResponse {
    #[serde(rename = "Errors")]
    pub errors: ErrorList,
}

#[derive(Debug, Deserialize)]
pub struct ErrorList {
    #[serde(rename = "Error", default)]
    pub error: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

// ============ Instances ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeInstancesResponse {
    #[serde(default)]
    pub reservation_set: ItemSet<Reservation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(default)]
    pub instances_set: ItemSet<InstanceItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceItem {
    pub instance_id: String,
    pub image_id: Option<String>,
    pub instance_state: InstanceStateItem,
    pub launch_time: Option<String>,
    pub placement: Option<Placement>,
    #[serde(default)]
    pub tag_set: ItemSet<Tag>,
}

#[derive(Debug, Deserialize)]
pub struct InstanceStateItem {
    pub code: Option<u32>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub availability_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Tag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

// ============ Volumes ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeVolumesResponse {
    #[serde(default)]
    pub volume_set: ItemSet<VolumeItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeItem {
    pub volume_id: String,
    #[serde(default)]
    pub size: u32,
    pub availability_zone: Option<String>,
    pub status: String,
    pub create_time: Option<String>,
    #[serde(default)]
    pub attachment_set: ItemSet<AttachmentItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentItem {
    pub volume_id: String,
    pub instance_id: String,
    pub device: Option<String>,
    pub status: String,
    pub attach_time: Option<String>,
}

// ============ Snapshots ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeSnapshotsResponse {
    #[serde(default)]
    pub snapshot_set: ItemSet<SnapshotItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    pub snapshot_id: String,
    pub volume_id: Option<String>,
    pub status: String,
    pub progress: Option<String>,
    pub start_time: Option<String>,
}

// ============ Regions ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeRegionsResponse {
    #[serde(default)]
    pub region_info: ItemSet<RegionItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionItem {
    pub region_name: String,
}
