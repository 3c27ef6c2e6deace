//! Injected logging for pollers

use std::time::Duration;

use cloudwait_provider::ResourceHandle;

use crate::config::PollConfig;
use crate::error::PollError;

/// `log` target used by [`LogObserver`].
pub const LOG_TARGET: &str = "cloudwait::poller";

/// Result of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The comparator matched.
    Matched,
    /// Fetched, but not in the target state yet.
    Unmatched,
    /// The resource was not found; the not-found policy decides what that means.
    NotFound,
}

/// Receives poller progress. The poller never logs on its own.
pub trait PollObserver: Send + Sync {
    fn on_start(&self, handle: &ResourceHandle, target: &str, config: &PollConfig);

    fn on_attempt(&self, handle: &ResourceHandle, attempt: u32, outcome: AttemptOutcome);

    fn on_success(&self, handle: &ResourceHandle, attempts: u32, elapsed: Duration);

    fn on_failure(&self, handle: &ResourceHandle, error: &PollError);
}

/// Writes through the `log` facade under [`LOG_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl PollObserver for LogObserver {
    fn on_start(&self, handle: &ResourceHandle, target: &str, config: &PollConfig) {
        log::debug!(
            target: LOG_TARGET,
            "waiting for {handle} ({target}), period={:?} timeout={:?} max_tries={:?}",
            config.period,
            config.timeout,
            config.max_tries
        );
    }

    fn on_attempt(&self, handle: &ResourceHandle, attempt: u32, outcome: AttemptOutcome) {
        log::trace!(target: LOG_TARGET, "{handle} attempt {attempt}: {outcome:?}");
    }

    fn on_success(&self, handle: &ResourceHandle, attempts: u32, elapsed: Duration) {
        log::info!(
            target: LOG_TARGET,
            "{handle} reached target after {attempts} attempts ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }

    fn on_failure(&self, handle: &ResourceHandle, error: &PollError) {
        match error {
            PollError::Fetch { .. } => log::error!(target: LOG_TARGET, "{handle}: {error}"),
            _ => log::warn!(target: LOG_TARGET, "{handle}: {error}"),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PollObserver for NoopObserver {
    fn on_start(&self, _handle: &ResourceHandle, _target: &str, _config: &PollConfig) {}

    fn on_attempt(&self, _handle: &ResourceHandle, _attempt: u32, _outcome: AttemptOutcome) {}

    fn on_success(&self, _handle: &ResourceHandle, _attempts: u32, _elapsed: Duration) {}

    fn on_failure(&self, _handle: &ResourceHandle, _error: &PollError) {}
}
