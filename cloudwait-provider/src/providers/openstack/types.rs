//! Nova / Cinder API 类型定义

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::utils::datetime;

// ============ Errors ============

/// Fault body: `{"itemNotFound": {"message": "...", "code": 404}}`.
///
/// The outer key varies (`itemNotFound`, `badRequest`, `forbidden`, ...), so
/// it is read as a single-entry map.
pub type FaultResponse = std::collections::HashMap<String, Fault>;

#[derive(Debug, Deserialize)]
pub struct Fault {
    #[serde(default)]
    pub message: String,
    pub code: Option<u16>,
}

// ============ Nova ============

#[derive(Debug, Deserialize)]
pub struct ServerResponse {
    pub server: Server,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub id: String,
    pub name: Option<String>,
    pub status: String,
    #[serde(default, deserialize_with = "datetime::deserialize")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "OS-EXT-AZ:availability_zone")]
    pub availability_zone: Option<String>,
    /// `{"id": ...}` when booted from an image, `""` when booted from volume.
    #[serde(default)]
    pub image: serde_json::Value,
}

impl Server {
    pub fn image_id(&self) -> Option<String> {
        self.image
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeAttachmentResponse {
    pub volume_attachment: NovaVolumeAttachment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovaVolumeAttachment {
    pub id: Option<String>,
    pub volume_id: String,
    pub server_id: String,
    pub device: Option<String>,
}

// ============ Cinder ============

#[derive(Debug, Deserialize)]
pub struct VolumeResponse {
    pub volume: CinderVolume,
}

#[derive(Debug, Deserialize)]
pub struct CinderVolume {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub size: u32,
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub attachments: Vec<CinderAttachment>,
    #[serde(default, deserialize_with = "datetime::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CinderAttachment {
    pub server_id: String,
    pub attachment_id: Option<String>,
    pub volume_id: Option<String>,
    pub device: Option<String>,
    #[serde(default, deserialize_with = "datetime::deserialize")]
    pub attached_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot: CinderSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct CinderSnapshot {
    pub id: String,
    pub volume_id: Option<String>,
    pub status: String,
    #[serde(rename = "os-extended-snapshot-attributes:progress")]
    pub progress: Option<String>,
    #[serde(default, deserialize_with = "datetime::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}
