use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

use crate::application::ports::store_connector::StoreConnector;

/// Fixed-backoff retry budget for the startup connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub connect_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Idle,
    Attempting { attempt: u32 },
    Connected { attempts: u32 },
    Failed { attempts: u32 },
}

#[derive(thiserror::Error, Debug)]
#[error("store unreachable after {attempts} connection attempts")]
pub struct ConnectionError {
    pub attempts: u32,
    #[source]
    pub last_error: anyhow::Error,
}

#[derive(Debug)]
pub struct Connected<H> {
    pub handle: H,
    pub attempts: u32,
}

type Observer = Box<dyn Fn(BootstrapState) + Send + Sync>;

/// Obtains the store handle before the listener binds. Consumed by
/// [`Bootstrapper::run`], so a process bootstraps at most once per instance.
/// Starts in [`BootstrapState::Idle`]; every later state is reported to the
/// observer registered with [`Bootstrapper::with_observer`].
pub struct Bootstrapper {
    policy: RetryPolicy,
    observer: Option<Observer>,
}

impl Bootstrapper {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            observer: None,
        }
    }

    /// Registers a callback invoked on every state transition.
    pub fn with_observer(
        mut self,
        observer: impl Fn(BootstrapState) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    fn transition(&self, next: BootstrapState) {
        if let Some(observer) = &self.observer {
            observer(next);
        }
    }

    pub async fn run<C>(self, connector: &C) -> Result<Connected<C::Handle>, ConnectionError>
    where
        C: StoreConnector + ?Sized,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let connect_timeout = self.policy.connect_timeout;
        let target = connector.target();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            self.transition(BootstrapState::Attempting { attempt });
            info!(attempt, max_attempts, %target, "store_connect_attempt");

            // A timeout is an ordinary failed attempt.
            let outcome = match timeout(connect_timeout, connector.connect(connect_timeout)).await
            {
                Ok(res) => res,
                Err(_) => Err(anyhow::anyhow!(
                    "connect attempt timed out after {:?}",
                    connect_timeout
                )),
            };

            match outcome {
                Ok(handle) => {
                    info!(attempt, max_attempts, %target, "store_connected");
                    self.transition(BootstrapState::Connected { attempts: attempt });
                    return Ok(Connected {
                        handle,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "store_connect_attempt_failed");
                    last_error = Some(e);
                    if attempt < max_attempts {
                        sleep(self.policy.delay).await;
                    }
                }
            }
        }

        self.transition(BootstrapState::Failed {
            attempts: max_attempts,
        });
        error!(attempts = max_attempts, %target, "store_connect_exhausted");
        Err(ConnectionError {
            attempts: max_attempts,
            last_error: last_error.unwrap_or_else(|| anyhow::anyhow!("no connection attempt made")),
        })
    }
}
