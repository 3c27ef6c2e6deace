//! Provider factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::ComputeProvider;
use crate::types::{ProviderCredentials, ProviderOptions};
use crate::utils::log_sanitizer::mask_secret;

#[cfg(feature = "ec2")]
use crate::providers::Ec2Provider;
#[cfg(feature = "openstack")]
use crate::providers::OpenstackProvider;

/// Creates a [`ComputeProvider`] instance from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`] variant.
/// The returned provider is wrapped in `Arc<dyn ComputeProvider>` so it can be
/// shared by several fetchers.
///
/// # Examples
///
/// ```rust,no_run
/// use cloudwait_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::Ec2 {
///     access_key_id: "AKIA...".to_string(),
///     secret_access_key: "secret".to_string(),
///     session_token: None,
/// }).unwrap();
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Result<Arc<dyn ComputeProvider>> {
    create_provider_with_options(credentials, &ProviderOptions::default())
}

/// Like [`create_provider`], applying region, endpoint and retry overrides.
pub fn create_provider_with_options(
    credentials: ProviderCredentials,
    options: &ProviderOptions,
) -> Result<Arc<dyn ComputeProvider>> {
    match credentials {
        #[cfg(feature = "ec2")]
        ProviderCredentials::Ec2 {
            access_key_id,
            secret_access_key,
            session_token,
        } => {
            log::debug!("Creating ec2 provider for key {}", mask_secret(&access_key_id));
            let mut builder = Ec2Provider::builder(access_key_id, secret_access_key);
            if let Some(token) = session_token {
                builder = builder.session_token(token);
            }
            if let Some(region) = &options.region {
                builder = builder.default_region(region);
            }
            if let Some(endpoint) = &options.endpoint {
                builder = builder.endpoint(endpoint);
            }
            if let Some(retries) = options.max_retries {
                builder = builder.max_retries(retries);
            }
            Ok(Arc::new(builder.build()?))
        }
        #[cfg(feature = "openstack")]
        ProviderCredentials::Openstack {
            auth_token,
            compute_endpoint,
            volume_endpoint,
        } => {
            log::debug!(
                "Creating openstack provider for {compute_endpoint} (token {})",
                mask_secret(&auth_token)
            );
            let mut builder =
                OpenstackProvider::builder(auth_token, compute_endpoint, volume_endpoint);
            if let Some(retries) = options.max_retries {
                builder = builder.max_retries(retries);
            }
            Ok(Arc::new(builder.build()?))
        }
    }
}
