//! Cloudwait Core Library
//!
//! Blocking "wait until" logic for cloud compute resources:
//! - Generic condition poller ([`Poller`]) with timeout, attempt cap and backoff
//! - State comparators for instances, volumes, attachments and snapshots
//! - Blocking fetchers bridging the async providers in `cloudwait-provider`
//! - Ready-made waits ([`WaitService`])
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cloudwait_core::{PollConfig, WaitService};
//! use cloudwait_provider::{Ec2Provider, ResourceHandle};
//!
//! let provider = Arc::new(Ec2Provider::new("AKID".into(), "SECRET".into()).unwrap());
//! let waits = WaitService::new(provider, PollConfig::default()).unwrap();
//! let report = waits
//!     .instance_running(&ResourceHandle::in_region("us-west-2", "i-0abc"), None)
//!     .unwrap();
//! println!("running after {} attempts", report.attempts);
//! ```

pub mod cancel;
pub mod comparators;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod observer;
pub mod poller;
pub mod services;
pub mod traits;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use cancel::CancellationToken;
pub use config::PollConfig;
pub use error::{CoreError, CoreResult, FetchError, PollError};
pub use fetchers::{
    AttachmentFetcher, BlockingBridge, InstanceFetcher, SnapshotFetcher, VolumeFetcher,
};
pub use observer::{AttemptOutcome, LogObserver, NoopObserver, PollObserver};
pub use poller::{NotFoundPolicy, PollReport, PollState, Poller, create_poller};
pub use services::WaitService;
pub use traits::{ResourceFetcher, ResourceState, StateComparator};
