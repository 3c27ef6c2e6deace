//! Blocking condition poller
//!
//! Timing: the first attempt runs immediately. After each miss the poller
//! waits `min(interval, time left)` and tries again; an attempt made once the
//! deadline is reached is the last one. A zero timeout therefore means exactly
//! one attempt.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cloudwait_provider::ResourceHandle;
use serde::{Deserialize, Serialize};

use crate::cancel::CancellationToken;
use crate::config::PollConfig;
use crate::error::{CoreResult, FetchError, PollError};
use crate::observer::{AttemptOutcome, LogObserver, PollObserver};
use crate::traits::{ResourceFetcher, StateComparator};

/// Poller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PollState {
    Polling,
    Succeeded,
    TimedOut,
    Failed,
    Cancelled,
}

/// What a `NotFound` fetch means for this poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotFoundPolicy {
    /// Not there yet: keep polling.
    #[default]
    Unmatched,
    /// Gone is the goal (deletion confirmation): succeed.
    Matched,
    /// Propagate as a fetch failure.
    Fail,
}

/// Successful poll summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    /// Fetches made, including the matching one.
    pub attempts: u32,
    pub elapsed: Duration,
    /// The poll ended on a `NotFound` under [`NotFoundPolicy::Matched`].
    pub resource_gone: bool,
}

impl PollReport {
    pub fn state(&self) -> PollState {
        PollState::Succeeded
    }
}

/// Repeats fetch + compare until the comparator matches or the poll ends.
pub struct Poller<F, C> {
    fetcher: F,
    comparator: C,
    config: PollConfig,
    not_found: NotFoundPolicy,
    observer: Arc<dyn PollObserver>,
    cancel: Option<CancellationToken>,
}

/// Creates a [`Poller`] with [`NotFoundPolicy::Unmatched`] and a [`LogObserver`].
///
/// Fails with [`CoreError::InvalidConfig`](crate::CoreError::InvalidConfig)
/// when `config` does not pass [`PollConfig::validate`].
pub fn create_poller<F, C>(
    fetcher: F,
    comparator: C,
    config: PollConfig,
) -> CoreResult<Poller<F, C>>
where
    F: ResourceFetcher,
    C: StateComparator<F::Resource>,
{
    Poller::new(fetcher, comparator, config)
}

impl<F, C> Poller<F, C>
where
    F: ResourceFetcher,
    C: StateComparator<F::Resource>,
{
    pub fn new(fetcher: F, comparator: C, config: PollConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::with_checked_config(fetcher, comparator, config))
    }

    /// `config` must already have passed [`PollConfig::validate`].
    pub(crate) fn with_checked_config(fetcher: F, comparator: C, config: PollConfig) -> Self {
        Self {
            fetcher,
            comparator,
            config,
            not_found: NotFoundPolicy::default(),
            observer: Arc::new(LogObserver),
            cancel: None,
        }
    }

    #[must_use]
    pub fn not_found_policy(mut self, policy: NotFoundPolicy) -> Self {
        self.not_found = policy;
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn PollObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Polls `handle` on the calling thread until the poll ends.
    pub fn poll(&self, handle: &ResourceHandle) -> Result<PollReport, PollError> {
        self.observer
            .on_start(handle, &self.comparator.describe(), &self.config);

        let result = self.run(handle);
        match &result {
            Ok(report) => self
                .observer
                .on_success(handle, report.attempts, report.elapsed),
            Err(e) => self.observer.on_failure(handle, e),
        }
        result
    }

    fn run(&self, handle: &ResourceHandle) -> Result<PollReport, PollError> {
        let started = Instant::now();
        // None: the deadline is beyond what Instant can represent
        let deadline = started.checked_add(self.config.timeout);
        let mut interval = self.config.period;
        let mut attempts: u32 = 0;

        loop {
            if self.is_cancelled() {
                return Err(PollError::Cancelled {
                    attempts,
                    elapsed: started.elapsed(),
                });
            }

            attempts += 1;
            let outcome = self.attempt(handle, attempts)?;
            self.observer.on_attempt(handle, attempts, outcome);

            let done = match outcome {
                AttemptOutcome::Matched => Some(false),
                AttemptOutcome::NotFound if self.not_found == NotFoundPolicy::Matched => {
                    Some(true)
                }
                _ => None,
            };
            if let Some(resource_gone) = done {
                return Ok(PollReport {
                    attempts,
                    elapsed: started.elapsed(),
                    resource_gone,
                });
            }

            if self.config.max_tries.is_some_and(|max| attempts >= max) {
                return Err(PollError::AttemptsExhausted {
                    attempts,
                    elapsed: started.elapsed(),
                });
            }

            let remaining = deadline.map_or(Duration::MAX, |d| {
                d.saturating_duration_since(Instant::now())
            });
            if remaining.is_zero() {
                return Err(PollError::TimedOut {
                    attempts,
                    elapsed: started.elapsed(),
                });
            }

            if self.sleep(interval.min(remaining)) {
                return Err(PollError::Cancelled {
                    attempts,
                    elapsed: started.elapsed(),
                });
            }
            interval = self.config.next_interval(interval);
        }
    }

    /// One fetch + compare; `Err` ends the poll.
    fn attempt(&self, handle: &ResourceHandle, attempt: u32) -> Result<AttemptOutcome, PollError> {
        match self.fetcher.fetch(handle) {
            Ok(resource) if self.comparator.matches(&resource) => Ok(AttemptOutcome::Matched),
            Ok(_) => Ok(AttemptOutcome::Unmatched),
            Err(FetchError::NotFound(_)) if self.not_found != NotFoundPolicy::Fail => {
                Ok(AttemptOutcome::NotFound)
            }
            Err(source) => Err(PollError::Fetch { attempt, source }),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Returns `true` if cancelled while waiting.
    fn sleep(&self, duration: Duration) -> bool {
        match &self.cancel {
            Some(token) => token.wait_timeout(duration),
            None => {
                thread::sleep(duration);
                false
            }
        }
    }
}
