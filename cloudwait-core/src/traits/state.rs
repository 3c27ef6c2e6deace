use std::fmt::Debug;

use cloudwait_provider::{
    Attachment, AttachmentStatus, Instance, InstanceState, Snapshot, SnapshotStatus, Volume,
    VolumeStatus,
};

/// Extracts the discrete state of a fetched resource.
pub trait ResourceState {
    /// Closed set of states for this resource type.
    type State: Copy + PartialEq + Debug;

    fn state(&self) -> Self::State;
}

impl ResourceState for Instance {
    type State = InstanceState;

    fn state(&self) -> InstanceState {
        self.state
    }
}

impl ResourceState for Volume {
    type State = VolumeStatus;

    fn state(&self) -> VolumeStatus {
        self.status
    }
}

impl ResourceState for Attachment {
    type State = AttachmentStatus;

    fn state(&self) -> AttachmentStatus {
        self.status
    }
}

impl ResourceState for Snapshot {
    type State = SnapshotStatus;

    fn state(&self) -> SnapshotStatus {
        self.status
    }
}
