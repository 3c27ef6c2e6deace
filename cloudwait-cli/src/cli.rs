//! Command-line definition

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cloudwait_core::PollConfig;
use cloudwait_provider::{InstanceState, ProviderCredentials, ProviderOptions};

#[derive(Debug, Parser)]
#[command(name = "cloudwait", version, about = "Wait for a cloud resource to reach a state")]
pub struct Cli {
    #[command(flatten)]
    pub provider: ProviderArgs,

    #[command(flatten)]
    pub poll: PollArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Ec2,
    Openstack,
}

/// Provider selection and credentials.
#[derive(Debug, Args)]
pub struct ProviderArgs {
    #[arg(long, value_enum, env = "CLOUDWAIT_PROVIDER", default_value = "ec2")]
    pub provider: ProviderKind,

    /// Region for handles without one (EC2)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Endpoint override (EC2)
    #[arg(long, env = "CLOUDWAIT_EC2_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: Option<String>,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    /// Keystone token (OpenStack)
    #[arg(long, env = "OS_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Nova endpoint including the project path (OpenStack)
    #[arg(long, env = "OS_COMPUTE_ENDPOINT")]
    pub compute_endpoint: Option<String>,

    /// Cinder endpoint including the project path (OpenStack)
    #[arg(long, env = "OS_VOLUME_ENDPOINT")]
    pub volume_endpoint: Option<String>,

    /// HTTP retries per request for transient errors
    #[arg(long)]
    pub max_retries: Option<u32>,
}

impl ProviderArgs {
    pub fn credentials(&self) -> anyhow::Result<ProviderCredentials> {
        match self.provider {
            ProviderKind::Ec2 => Ok(ProviderCredentials::Ec2 {
                access_key_id: required(self.access_key_id.as_ref(), "--access-key-id")?,
                secret_access_key: required(
                    self.secret_access_key.as_ref(),
                    "--secret-access-key",
                )?,
                session_token: self.session_token.clone(),
            }),
            ProviderKind::Openstack => Ok(ProviderCredentials::Openstack {
                auth_token: required(self.auth_token.as_ref(), "--auth-token")?,
                compute_endpoint: required(self.compute_endpoint.as_ref(), "--compute-endpoint")?,
                volume_endpoint: required(self.volume_endpoint.as_ref(), "--volume-endpoint")?,
            }),
        }
    }

    pub fn options(&self) -> ProviderOptions {
        ProviderOptions {
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            max_retries: self.max_retries,
        }
    }
}

fn required(value: Option<&String>, flag: &str) -> anyhow::Result<String> {
    value
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("missing {flag} (or its environment variable)"))
}

/// Poll timing overrides, in seconds. Unset values fall back to the
/// `CLOUDWAIT_POLL_*` environment variables, then to the defaults.
#[derive(Debug, Args)]
pub struct PollArgs {
    #[arg(long, value_parser = parse_seconds)]
    pub period: Option<Duration>,

    #[arg(long, value_parser = parse_seconds)]
    pub timeout: Option<Duration>,

    #[arg(long)]
    pub max_tries: Option<u32>,

    /// Grow the interval ×1.5 per attempt up to this value
    #[arg(long, value_parser = parse_seconds)]
    pub max_period: Option<Duration>,
}

impl PollArgs {
    pub fn apply(&self, mut config: PollConfig) -> PollConfig {
        if let Some(period) = self.period {
            config = config.with_period(period);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(max_tries) = self.max_tries {
            config = config.with_max_tries(max_tries);
        }
        if let Some(max_period) = self.max_period {
            config = config.with_max_period(max_period);
        }
        config
    }
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw.parse().map_err(|e| format!("'{raw}': {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("'{raw}': {e}"))
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the credentials are accepted
    Validate,
    InstanceRunning(ResourceArg),
    InstanceStopped(ResourceArg),
    /// Succeeds on `terminated` or once the instance no longer exists
    InstanceTerminated(ResourceArg),
    InstanceState {
        #[command(flatten)]
        resource: ResourceArg,
        #[arg(long, value_enum)]
        state: TargetState,
    },
    VolumeAvailable(ResourceArg),
    VolumeAttached(ResourceArg),
    VolumeDetached(ResourceArg),
    /// Volume attached to one specific instance
    AttachmentAttached {
        #[command(flatten)]
        volume: ResourceArg,
        #[arg(long)]
        instance_id: String,
    },
    SnapshotCompleted(ResourceArg),
}

#[derive(Debug, Args)]
pub struct ResourceArg {
    pub id: String,

    /// Region of this resource (EC2); overrides --region
    #[arg(long = "in-region")]
    pub in_region: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetState {
    Pending,
    Running,
    Stopping,
    Stopped,
    ShuttingDown,
    Terminated,
    Error,
}

impl From<TargetState> for InstanceState {
    fn from(value: TargetState) -> Self {
        match value {
            TargetState::Pending => Self::Pending,
            TargetState::Running => Self::Running,
            TargetState::Stopping => Self::Stopping,
            TargetState::Stopped => Self::Stopped,
            TargetState::ShuttingDown => Self::ShuttingDown,
            TargetState::Terminated => Self::Terminated,
            TargetState::Error => Self::Error,
        }
    }
}
