//! 测试辅助模块
//!
//! 提供脚本化的 fetcher、记录型 observer 和资源工厂方法。

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use cloudwait_provider::{
    Attachment, AttachmentStatus, Instance, InstanceState, ProviderError, ResourceHandle,
    Snapshot, SnapshotStatus, Volume, VolumeStatus,
};

use crate::config::PollConfig;
use crate::error::{FetchError, PollError};
use crate::observer::{AttemptOutcome, PollObserver};
use crate::traits::{ResourceFetcher, StateComparator};

// ===== ScriptedFetcher =====

/// Returns scripted results in order; the last entry repeats forever.
pub struct ScriptedFetcher<R> {
    script: Vec<Result<R, FetchError>>,
    calls: AtomicUsize,
}

impl<R: Clone> ScriptedFetcher<R> {
    pub fn new(script: Vec<Result<R, FetchError>>) -> Self {
        assert!(!script.is_empty(), "script must not be empty");
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn repeating(resource: R) -> Self {
        Self::new(vec![Ok(resource)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<R: Clone> ResourceFetcher for ScriptedFetcher<R> {
    type Resource = R;

    fn fetch(&self, _handle: &ResourceHandle) -> Result<R, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.script[call.min(self.script.len() - 1)].clone()
    }
}

// ===== Comparators / Observers =====

pub struct AlwaysFalse;

impl<R> StateComparator<R> for AlwaysFalse {
    fn matches(&self, _resource: &R) -> bool {
        false
    }

    fn describe(&self) -> String {
        "never".to_string()
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl PollObserver for RecordingObserver {
    fn on_start(&self, _handle: &ResourceHandle, target: &str, _config: &PollConfig) {
        self.push(format!("start {target}"));
    }

    fn on_attempt(&self, _handle: &ResourceHandle, attempt: u32, outcome: AttemptOutcome) {
        self.push(format!("attempt {attempt} {outcome:?}"));
    }

    fn on_success(&self, _handle: &ResourceHandle, attempts: u32, _elapsed: Duration) {
        self.push(format!("success {attempts}"));
    }

    fn on_failure(&self, _handle: &ResourceHandle, error: &PollError) {
        self.push(format!("failure {:?}", error.state()));
    }
}

// ===== Errors =====

pub fn not_found() -> FetchError {
    FetchError::NotFound("[test] instance 'i-1234' not found".to_string())
}

pub fn transport_error() -> FetchError {
    FetchError::Transport(ProviderError::NetworkError {
        provider: "test".to_string(),
        detail: "connection reset".to_string(),
    })
}

// ===== Resources =====

pub fn instance(state: InstanceState) -> Instance {
    Instance {
        id: "i-1234".to_string(),
        region: Some("us-east-1".to_string()),
        name: None,
        state,
        raw_state: format!("{state:?}").to_lowercase(),
        image_id: None,
        launched_at: None,
    }
}

pub fn attachment(instance_id: &str, status: AttachmentStatus, at: Option<i64>) -> Attachment {
    Attachment {
        id: None,
        volume_id: "vol-1".to_string(),
        instance_id: instance_id.to_string(),
        device: Some("/dev/sdf".to_string()),
        status,
        attached_at: at.and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
    }
}

pub fn volume(attachments: Vec<Attachment>) -> Volume {
    Volume {
        id: "vol-1".to_string(),
        region: Some("us-east-1".to_string()),
        size_gb: 8,
        status: if attachments.is_empty() {
            VolumeStatus::Available
        } else {
            VolumeStatus::InUse
        },
        raw_status: String::new(),
        attachments,
        created_at: None,
    }
}

pub fn snapshot(status: SnapshotStatus) -> Snapshot {
    Snapshot {
        id: "snap-1".to_string(),
        volume_id: Some("vol-1".to_string()),
        region: None,
        status,
        raw_status: format!("{status:?}").to_lowercase(),
        progress: None,
        started_at: None,
    }
}
