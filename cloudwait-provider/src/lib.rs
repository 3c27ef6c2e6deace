//! # cloudwait-provider
//!
//! Read-only lookups of cloud compute resources (instances, volumes, volume
//! attachments, snapshots) behind the async [`ComputeProvider`] trait. Each
//! call fetches the resource once and maps the provider's wire status onto
//! a small set of domain states.
//!
//! | Backend | Feature | APIs | Auth |
//! |---------|---------|------|------|
//! | Amazon EC2 | `ec2` | Query API `2016-11-15` (XML) | SigV4 |
//! | OpenStack | `openstack` | Nova v2.1, Cinder v3 (JSON) | pre-issued Keystone token |
//!
//! `all-providers` (default) turns on both. Pick the TLS stack with
//! `native-tls` (default) or `rustls`.
//!
//! ```rust,no_run
//! use cloudwait_provider::{create_provider, ProviderCredentials, ResourceHandle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(ProviderCredentials::Ec2 {
//!         access_key_id: "AKIA...".to_string(),
//!         secret_access_key: "secret".to_string(),
//!         session_token: None,
//!     })?;
//!
//!     let handle = ResourceHandle::in_region("us-east-1", "i-1234567890abcdef0");
//!     let instance = provider.get_instance(&handle).await?;
//!     println!("{} is {:?}", instance.id, instance.state);
//!     Ok(())
//! }
//! ```
//!
//! A lookup of something that does not exist fails with
//! [`ProviderError::ResourceNotFound`], including the EC2 case of an empty
//! result set. Network errors, timeouts and throttling are retried inside the
//! request (`max_retries`, default 2) before they surface.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};
pub use factory::{create_provider, create_provider_with_options};
pub use traits::ComputeProvider;
pub use types::{
    Attachment, AttachmentStatus, Instance, InstanceState, ProviderCredentials, ProviderOptions,
    ProviderType, ResourceHandle, ResourceKind, Snapshot, SnapshotStatus, Volume, VolumeStatus,
};
pub use utils::datetime;

#[cfg(feature = "ec2")]
pub use providers::{Ec2Provider, Ec2ProviderBuilder};

#[cfg(feature = "openstack")]
pub use providers::{OpenstackProvider, OpenstackProviderBuilder};
