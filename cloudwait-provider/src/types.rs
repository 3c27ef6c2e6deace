use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Resource Handles ============

/// Kind of remote resource a handle or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A compute instance (EC2 instance, Nova server).
    Instance,
    /// A block storage volume.
    Volume,
    /// A point-in-time snapshot of a volume.
    Snapshot,
    /// The attachment of a volume to an instance.
    Attachment,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance => write!(f, "instance"),
            Self::Volume => write!(f, "volume"),
            Self::Snapshot => write!(f, "snapshot"),
            Self::Attachment => write!(f, "attachment"),
        }
    }
}

/// Identifies a remote object: an opaque provider id plus an optional
/// region/zone qualifier.
///
/// Handles are created by the caller and never mutated.
///
/// ```rust
/// use cloudwait_provider::ResourceHandle;
///
/// let handle = ResourceHandle::in_region("us-east-1", "i-1234");
/// assert_eq!(handle.to_string(), "us-east-1/i-1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle {
    /// Provider-specific resource identifier.
    pub id: String,
    /// Region or availability zone, when the provider needs one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ResourceHandle {
    /// A handle without a region qualifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: None,
        }
    }

    /// A handle qualified by region.
    pub fn in_region(region: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: Some(region.into()),
        }
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{region}/{}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

// ============ Instances ============

/// Lifecycle state of a compute instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    /// Being provisioned.
    Pending,
    /// Up and running.
    Running,
    /// Shutting down towards `Stopped`.
    Stopping,
    /// Stopped; can be started again.
    Stopped,
    /// Shutting down towards `Terminated`.
    ShuttingDown,
    /// Gone for good.
    Terminated,
    /// The provider reports a failure.
    Error,
    /// A state this library does not model.
    Unrecognized,
}

/// A compute instance as seen at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Provider-specific instance identifier.
    pub id: String,
    /// Region the instance lives in, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Human-readable name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current lifecycle state.
    pub state: InstanceState,
    /// Raw state string as returned by the provider.
    pub raw_state: String,
    /// Image the instance was booted from, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Launch / creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launched_at: Option<DateTime<Utc>>,
}

// ============ Volumes & Attachments ============

/// Lifecycle status of a block storage volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeStatus {
    /// Being created.
    Creating,
    /// Created and not attached.
    Available,
    /// Attached to at least one instance.
    InUse,
    /// Being deleted (or already deleted).
    Deleting,
    /// The provider reports a failure.
    Error,
    /// A status this library does not model.
    Unrecognized,
}

/// Status of a single volume-to-instance attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentStatus {
    /// Attach in progress.
    Attaching,
    /// Attached.
    Attached,
    /// Detach in progress.
    Detaching,
    /// Detached.
    Detached,
    /// A status this library does not model.
    Unrecognized,
}

/// The attachment of a volume to an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Attachment identifier, when the provider has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Attached volume.
    pub volume_id: String,
    /// Instance the volume is attached to.
    pub instance_id: String,
    /// Device name on the instance (e.g. `/dev/sdf`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Current attachment status.
    pub status: AttachmentStatus,
    /// When the attachment was made, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_at: Option<DateTime<Utc>>,
}

/// A block storage volume as seen at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Provider-specific volume identifier.
    pub id: String,
    /// Region or availability zone, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Size in GiB.
    pub size_gb: u32,
    /// Current status.
    pub status: VolumeStatus,
    /// Raw status string as returned by the provider.
    pub raw_status: String,
    /// Current attachments, in provider order.
    pub attachments: Vec<Attachment>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Volume {
    /// The most recent attachment.
    ///
    /// Ordered by `attached_at`; attachments without a timestamp sort before
    /// every timestamped one, and ties go to the later element in list order.
    pub fn latest_attachment(&self) -> Option<&Attachment> {
        self.attachments.iter().max_by_key(|a| a.attached_at)
    }

    /// The attachment to the given instance, if any.
    pub fn attachment_for(&self, instance_id: &str) -> Option<&Attachment> {
        self.attachments
            .iter()
            .filter(|a| a.instance_id == instance_id)
            .max_by_key(|a| a.attached_at)
    }
}

// ============ Snapshots ============

/// Lifecycle status of a volume snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotStatus {
    /// Still being taken.
    Pending,
    /// Complete and usable.
    Completed,
    /// The provider reports a failure.
    Error,
    /// A status this library does not model.
    Unrecognized,
}

/// A volume snapshot as seen at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Provider-specific snapshot identifier.
    pub id: String,
    /// Source volume.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<String>,
    /// Region, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Current status.
    pub status: SnapshotStatus,
    /// Raw status string as returned by the provider.
    pub raw_status: String,
    /// Provider-reported progress (e.g. `"80%"`). Informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    /// When the snapshot was started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

// ============ Provider Types ============

/// Identifies which compute provider implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Amazon EC2. Requires feature `ec2`.
    #[cfg(feature = "ec2")]
    Ec2,
    /// OpenStack Nova + Cinder. Requires feature `openstack`.
    #[cfg(feature = "openstack")]
    Openstack,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "ec2")]
            Self::Ec2 => write!(f, "ec2"),
            #[cfg(feature = "openstack")]
            Self::Openstack => write!(f, "openstack"),
        }
    }
}

/// Credentials (and endpoints) needed to construct a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderCredentials {
    /// AWS access key pair. Requires feature `ec2`.
    #[cfg(feature = "ec2")]
    Ec2 {
        /// Access key id.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Session token for temporary credentials.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_token: Option<String>,
    },
    /// Pre-issued Keystone token and service endpoints. Requires feature `openstack`.
    #[cfg(feature = "openstack")]
    Openstack {
        /// Keystone token sent as `X-Auth-Token`.
        auth_token: String,
        /// Nova endpoint including the project path (e.g. `https://nova:8774/v2.1/<project>`).
        compute_endpoint: String,
        /// Cinder endpoint including the project path (e.g. `https://cinder:8776/v3/<project>`).
        volume_endpoint: String,
    },
}

impl ProviderCredentials {
    /// The provider these credentials belong to.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "ec2")]
            Self::Ec2 { .. } => ProviderType::Ec2,
            #[cfg(feature = "openstack")]
            Self::Openstack { .. } => ProviderType::Openstack,
        }
    }
}

/// Construction options shared by all providers; unset fields keep the
/// provider defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    /// Region for handles without one (EC2 only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Endpoint override (EC2 only; OpenStack endpoints are part of the credentials).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Transient-error retries per request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}
