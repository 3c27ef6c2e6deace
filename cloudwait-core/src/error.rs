//! Errors of the polling layer

use std::time::Duration;

use thiserror::Error;

pub use cloudwait_provider::ProviderError;

use crate::poller::PollState;

/// Setup errors: bad configuration, runtime creation, provider construction.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Poll configuration rejected
    #[error("Invalid poll configuration: {0}")]
    InvalidConfig(String),

    /// The blocking bridge could not start its runtime
    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// 用户输入导致的错误记 `warn`，其余记 `error`
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidConfig(_) => true,
            Self::Runtime(_) => false,
            Self::Provider(e) => e.is_expected(),
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Outcome of one remote lookup that did not produce a resource.
///
/// Every provider "does not exist" error becomes [`FetchError::NotFound`];
/// everything else is [`FetchError::Transport`].
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// The resource does not exist (or no longer exists).
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Any other failure of the lookup.
    #[error("{0}")]
    Transport(ProviderError),
}

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

/// Why a poll ended without reaching the target state.
#[derive(Error, Debug, Clone)]
pub enum PollError {
    /// The timeout elapsed before the comparator matched.
    #[error("timed out after {attempts} attempts ({:.1}s)", .elapsed.as_secs_f64())]
    TimedOut { attempts: u32, elapsed: Duration },

    /// `max_tries` attempts were made without a match.
    #[error("gave up after {attempts} attempts ({:.1}s)", .elapsed.as_secs_f64())]
    AttemptsExhausted { attempts: u32, elapsed: Duration },

    /// The cancellation token fired.
    #[error("cancelled after {attempts} attempts ({:.1}s)", .elapsed.as_secs_f64())]
    Cancelled { attempts: u32, elapsed: Duration },

    /// A fetch failed; never retried by the poller.
    #[error("fetch failed on attempt {attempt}: {source}")]
    Fetch {
        attempt: u32,
        #[source]
        source: FetchError,
    },
}

impl PollError {
    /// Terminal poller state this error corresponds to.
    pub fn state(&self) -> PollState {
        match self {
            Self::TimedOut { .. } | Self::AttemptsExhausted { .. } => PollState::TimedOut,
            Self::Cancelled { .. } => PollState::Cancelled,
            Self::Fetch { .. } => PollState::Failed,
        }
    }

    /// Number of fetches made before the poll ended.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::TimedOut { attempts, .. }
            | Self::AttemptsExhausted { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
            Self::Fetch { attempt, .. } => *attempt,
        }
    }

    /// Whether the poll gave up waiting (timeout or attempt cap).
    pub fn is_timeout(&self) -> bool {
        self.state() == PollState::TimedOut
    }
}
