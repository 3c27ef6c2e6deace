//! Compute Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "ec2")]
mod ec2;
#[cfg(feature = "openstack")]
mod openstack;

#[cfg(feature = "ec2")]
pub use ec2::{Ec2Provider, Ec2ProviderBuilder};
#[cfg(feature = "openstack")]
pub use openstack::{OpenstackProvider, OpenstackProviderBuilder};
