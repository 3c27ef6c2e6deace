//! OpenStack Compute Provider (Nova + Cinder)

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::{DEFAULT_MAX_RETRIES, create_http_client, normalize_endpoint};

/// OpenStack provider.
///
/// Uses a pre-issued Keystone token; instances and attachments come from Nova,
/// volumes and snapshots from Cinder. Both endpoints include the project path.
///
/// ```rust,no_run
/// use cloudwait_provider::OpenstackProvider;
///
/// let provider = OpenstackProvider::builder(
///     "gAAAAAB...".to_string(),
///     "https://nova.example.com:8774/v2.1/project-id".to_string(),
///     "https://cinder.example.com:8776/v3/project-id".to_string(),
/// )
/// .max_retries(3)
/// .build()
/// .unwrap();
/// ```
pub struct OpenstackProvider {
    pub(crate) client: Client,
    pub(crate) auth_token: String,
    pub(crate) compute_endpoint: String,
    pub(crate) volume_endpoint: String,
    pub(crate) max_retries: u32,
}

/// Builder for [`OpenstackProvider`].
pub struct OpenstackProviderBuilder {
    auth_token: String,
    compute_endpoint: String,
    volume_endpoint: String,
    max_retries: u32,
}

impl OpenstackProviderBuilder {
    /// Set the maximum number of automatic retries for transient errors (default: 2).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the [`OpenstackProvider`] instance.
    pub fn build(self) -> Result<OpenstackProvider> {
        Ok(OpenstackProvider {
            client: create_http_client("openstack")?,
            compute_endpoint: normalize_endpoint(&self.compute_endpoint, "openstack")?,
            volume_endpoint: normalize_endpoint(&self.volume_endpoint, "openstack")?,
            auth_token: self.auth_token,
            max_retries: self.max_retries,
        })
    }
}

impl OpenstackProvider {
    /// Creates a new OpenStack provider with default settings.
    pub fn new(
        auth_token: String,
        compute_endpoint: String,
        volume_endpoint: String,
    ) -> Result<Self> {
        Self::builder(auth_token, compute_endpoint, volume_endpoint).build()
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder(
        auth_token: String,
        compute_endpoint: String,
        volume_endpoint: String,
    ) -> OpenstackProviderBuilder {
        OpenstackProviderBuilder {
            auth_token,
            compute_endpoint,
            volume_endpoint,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}
