//! Amazon EC2 Compute Provider

mod error;
mod http;
mod provider;
mod sign;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::{DEFAULT_MAX_RETRIES, create_http_client, normalize_endpoint};
use crate::traits::ProviderErrorMapper;

/// EC2 Query API version used for every action.
pub(crate) const EC2_API_VERSION: &str = "2016-11-15";
/// SigV4 service name.
pub(crate) const EC2_SERVICE: &str = "ec2";
/// Region used when a handle carries none.
pub(crate) const DEFAULT_REGION: &str = "us-east-1";
/// 空 body 的 SHA256 hash (固定值)
pub(crate) const EMPTY_BODY_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Amazon EC2 provider implementation.
///
/// Talks to the EC2 Query API, signing every request with AWS Signature V4.
///
/// # Construction
///
/// ```rust,no_run
/// use cloudwait_provider::Ec2Provider;
///
/// let provider = Ec2Provider::builder(
///     "your-access-key-id".to_string(),
///     "your-secret-access-key".to_string(),
/// )
/// .default_region("eu-west-1")
/// .build()
/// .unwrap();
/// ```
pub struct Ec2Provider {
    pub(crate) client: Client,
    pub(crate) access_key_id: String,
    pub(crate) secret_access_key: String,
    pub(crate) session_token: Option<String>,
    pub(crate) default_region: String,
    pub(crate) endpoint: Option<String>,
    pub(crate) max_retries: u32,
}

/// Builder for [`Ec2Provider`].
pub struct Ec2ProviderBuilder {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    default_region: String,
    endpoint: Option<String>,
    max_retries: u32,
}

impl Ec2ProviderBuilder {
    fn new(access_key_id: String, secret_access_key: String) -> Self {
        Self {
            access_key_id,
            secret_access_key,
            session_token: None,
            default_region: DEFAULT_REGION.to_string(),
            endpoint: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Session token for temporary (STS) credentials.
    pub fn session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Region used for handles without one (default: `us-east-1`).
    pub fn default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = region.into();
        self
    }

    /// Send every request to this endpoint instead of `https://ec2.{region}.amazonaws.com`.
    ///
    /// The handle's region is still used for signing.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the maximum number of automatic retries for transient errors (default: 2).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the [`Ec2Provider`] instance.
    pub fn build(self) -> Result<Ec2Provider> {
        let endpoint = self
            .endpoint
            .as_deref()
            .map(|e| normalize_endpoint(e, "ec2"))
            .transpose()?;

        Ok(Ec2Provider {
            client: create_http_client("ec2")?,
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            session_token: self.session_token,
            default_region: self.default_region,
            endpoint,
            max_retries: self.max_retries,
        })
    }
}

impl Ec2Provider {
    /// Creates a new EC2 provider with default settings (`us-east-1`, 2 retries).
    pub fn new(access_key_id: String, secret_access_key: String) -> Result<Self> {
        Self::builder(access_key_id, secret_access_key).build()
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder(access_key_id: String, secret_access_key: String) -> Ec2ProviderBuilder {
        Ec2ProviderBuilder::new(access_key_id, secret_access_key)
    }

    /// Endpoint for a region, honouring the override.
    pub(crate) fn endpoint_for(&self, region: &str) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://ec2.{region}.amazonaws.com"))
    }

    /// Splits an endpoint into the `Host` header value (`host[:port]`) and the
    /// canonical URI path, which is always `/`-terminated.
    pub(crate) fn endpoint_parts(&self, endpoint: &str) -> Result<(String, String)> {
        let rest = endpoint
            .split_once("://")
            .map(|(_, rest)| rest)
            .filter(|rest| !rest.is_empty() && !rest.starts_with('/'))
            .ok_or_else(|| crate::error::ProviderError::ConfigurationError {
                provider: self.provider_name().to_string(),
                detail: format!("cannot extract host from endpoint '{endpoint}'"),
            })?;

        let (host, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], rest[idx..].trim_end_matches('/')),
            None => (rest, ""),
        };
        Ok((host.to_string(), format!("{path}/")))
    }
}
