//! Built-in state comparators

use std::fmt::Debug;

use cloudwait_provider::{AttachmentStatus, InstanceState, SnapshotStatus, Volume, VolumeStatus};

use crate::traits::{ResourceState, StateComparator};

/// True when the resource's extracted state equals `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEquals<S> {
    target: S,
}

impl<S> StateEquals<S> {
    pub const fn new(target: S) -> Self {
        Self { target }
    }

    pub const fn target(&self) -> &S {
        &self.target
    }
}

impl<R, S> StateComparator<R> for StateEquals<S>
where
    R: ResourceState<State = S>,
    S: Copy + PartialEq + Debug,
{
    fn matches(&self, resource: &R) -> bool {
        resource.state() == self.target
    }

    fn describe(&self) -> String {
        format!("state == {:?}", self.target)
    }
}

pub const INSTANCE_RUNNING: StateEquals<InstanceState> = StateEquals::new(InstanceState::Running);
pub const INSTANCE_STOPPED: StateEquals<InstanceState> = StateEquals::new(InstanceState::Stopped);
pub const INSTANCE_TERMINATED: StateEquals<InstanceState> =
    StateEquals::new(InstanceState::Terminated);
pub const VOLUME_AVAILABLE: StateEquals<VolumeStatus> = StateEquals::new(VolumeStatus::Available);
pub const SNAPSHOT_COMPLETED: StateEquals<SnapshotStatus> =
    StateEquals::new(SnapshotStatus::Completed);
pub const ATTACHMENT_ATTACHED: StateEquals<AttachmentStatus> =
    StateEquals::new(AttachmentStatus::Attached);

/// Volume has an attachment and the most recent one is `Attached`.
///
/// A volume without attachments never matches; it is not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeAttached;

impl StateComparator<Volume> for VolumeAttached {
    fn matches(&self, volume: &Volume) -> bool {
        volume
            .latest_attachment()
            .is_some_and(|a| a.status == AttachmentStatus::Attached)
    }

    fn describe(&self) -> String {
        "latest attachment == Attached".to_string()
    }
}

/// Volume has no attachments, or the most recent one is `Detached`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeDetached;

impl StateComparator<Volume> for VolumeDetached {
    fn matches(&self, volume: &Volume) -> bool {
        volume
            .latest_attachment()
            .is_none_or(|a| a.status == AttachmentStatus::Detached)
    }

    fn describe(&self) -> String {
        "no attachment or latest attachment == Detached".to_string()
    }
}
