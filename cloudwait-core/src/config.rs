//! Poll timing configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// 默认轮询间隔（秒）
const DEFAULT_PERIOD_SECS: u64 = 5;
/// 默认超时（秒）
const DEFAULT_TIMEOUT_SECS: u64 = 600;
/// Interval growth factor when `max_period` is set.
pub(crate) const BACKOFF_FACTOR: f64 = 1.5;

pub const ENV_PERIOD: &str = "CLOUDWAIT_POLL_PERIOD";
pub const ENV_TIMEOUT: &str = "CLOUDWAIT_POLL_TIMEOUT";
pub const ENV_MAX_TRIES: &str = "CLOUDWAIT_POLL_MAX_TRIES";
pub const ENV_MAX_PERIOD: &str = "CLOUDWAIT_POLL_MAX_PERIOD";

/// Poller timing.
///
/// Serialized as seconds (fractions allowed) under `period`, `timeout`,
/// `maxTries` and `maxPeriod`:
///
/// ```rust
/// use cloudwait_core::PollConfig;
///
/// let config = PollConfig::from_json(r#"{"period": 0.5, "timeout": 30, "maxTries": 10}"#).unwrap();
/// assert_eq!(config.max_tries, Some(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPollConfig", into = "RawPollConfig")]
pub struct PollConfig {
    /// Wait between attempts (initial wait when `max_period` is set).
    pub period: Duration,
    /// Overall deadline, measured from the first attempt.
    pub timeout: Duration,
    /// Cap on the number of attempts.
    pub max_tries: Option<u32>,
    /// Enables ×1.5 interval growth, up to this value.
    pub max_period: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(DEFAULT_PERIOD_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tries: None,
            max_period: None,
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = Some(max_tries);
        self
    }

    #[must_use]
    pub fn with_max_period(mut self, max_period: Duration) -> Self {
        self.max_period = Some(max_period);
        self
    }

    /// Checks period > 0, max_tries ≥ 1 and max_period ≥ period.
    pub fn validate(&self) -> CoreResult<()> {
        if self.period.is_zero() {
            return Err(CoreError::InvalidConfig(
                "period must be greater than zero".to_string(),
            ));
        }
        if self.max_tries == Some(0) {
            return Err(CoreError::InvalidConfig(
                "maxTries must be at least 1".to_string(),
            ));
        }
        if let Some(max_period) = self.max_period
            && max_period < self.period
        {
            return Err(CoreError::InvalidConfig(format!(
                "maxPeriod ({:.3}s) must not be shorter than period ({:.3}s)",
                max_period.as_secs_f64(),
                self.period.as_secs_f64()
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidConfig(e.to_string()))
    }

    /// Defaults overridden by `CLOUDWAIT_POLL_*` environment variables.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::default().apply_lookup(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides fields from `CLOUDWAIT_POLL_*` without validating the result.
    ///
    /// For callers that layer more overrides (CLI flags) on top and call
    /// [`validate`](Self::validate) once at the end.
    pub fn apply_env(self) -> CoreResult<Self> {
        self.apply_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`apply_env`](Self::apply_env), reading variables through `lookup`.
    /// Only malformed values are rejected here.
    pub fn apply_lookup<F>(self, lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self;
        if let Some(v) = lookup(ENV_PERIOD) {
            config.period = parse_seconds(ENV_PERIOD, &v)?;
        }
        if let Some(v) = lookup(ENV_TIMEOUT) {
            config.timeout = parse_seconds(ENV_TIMEOUT, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_TRIES) {
            let tries = v.trim().parse::<u32>().map_err(|e| {
                CoreError::InvalidConfig(format!("{ENV_MAX_TRIES}='{v}': {e}"))
            })?;
            config.max_tries = Some(tries);
        }
        if let Some(v) = lookup(ENV_MAX_PERIOD) {
            config.max_period = Some(parse_seconds(ENV_MAX_PERIOD, &v)?);
        }
        Ok(config)
    }

    /// Interval after `current`: grows ×1.5 up to `max_period`, fixed otherwise.
    pub(crate) fn next_interval(&self, current: Duration) -> Duration {
        match self.max_period {
            // 溢出时直接取上限
            Some(max_period) => {
                Duration::try_from_secs_f64(current.as_secs_f64() * BACKOFF_FACTOR)
                    .map_or(max_period, |next| next.min(max_period))
            }
            None => current,
        }
    }
}

fn seconds(name: &str, secs: f64) -> CoreResult<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| CoreError::InvalidConfig(format!("{name}={secs}: {e}")))
}

fn parse_seconds(name: &str, raw: &str) -> CoreResult<Duration> {
    let secs = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| CoreError::InvalidConfig(format!("{name}='{raw}': {e}")))?;
    seconds(name, secs)
}

/// Wire form of [`PollConfig`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPollConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_tries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_period: Option<f64>,
}

impl TryFrom<RawPollConfig> for PollConfig {
    type Error = CoreError;

    fn try_from(raw: RawPollConfig) -> CoreResult<Self> {
        let defaults = Self::default();
        let config = Self {
            period: raw
                .period
                .map(|s| seconds("period", s))
                .transpose()?
                .unwrap_or(defaults.period),
            timeout: raw
                .timeout
                .map(|s| seconds("timeout", s))
                .transpose()?
                .unwrap_or(defaults.timeout),
            max_tries: raw.max_tries,
            max_period: raw
                .max_period
                .map(|s| seconds("maxPeriod", s))
                .transpose()?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<PollConfig> for RawPollConfig {
    fn from(config: PollConfig) -> Self {
        Self {
            period: Some(config.period.as_secs_f64()),
            timeout: Some(config.timeout.as_secs_f64()),
            max_tries: config.max_tries,
            max_period: config.max_period.map(|d| d.as_secs_f64()),
        }
    }
}
