//! Retry schedule for a remote service that may be cold-starting.
//!
//! Only failures to obtain any HTTP response are retried. The operation's
//! `Result<_, TransportError>` is the predicate: an `Ok` response ends the loop,
//! whatever its status code.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{ApiError, TransportError};

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Delay to wait before each attempt. `delays.len()` is the number of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::cold_start()
    }
}

impl RetryPolicy {
    pub fn new(delays: Vec<Duration>) -> Self {
        if delays.is_empty() {
            return Self {
                delays: vec![Duration::ZERO],
            };
        }
        Self { delays }
    }

    /// One immediate try, then 2s and 5s.
    pub fn cold_start() -> Self {
        Self::new(vec![
            Duration::ZERO,
            Duration::from_secs(2),
            Duration::from_secs(5),
        ])
    }

    pub fn no_retry() -> Self {
        Self::new(vec![Duration::ZERO])
    }

    pub fn attempts(&self) -> u32 {
        self.delays.len() as u32
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    pub async fn run<T, F, Fut>(&self, sleeper: &dyn Sleeper, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut last = TransportError("no attempt made".into());
        for (attempt, delay) in self.delays.iter().enumerate() {
            if attempt > 0 {
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %last,
                    "request failed, retrying"
                );
            }
            if !delay.is_zero() {
                sleeper.sleep(*delay).await;
            }
            match op(attempt as u32).await {
                Ok(value) => return Ok(value),
                Err(e) => last = e,
            }
        }
        Err(ApiError::Unreachable {
            attempts: self.attempts(),
            last,
        })
    }
}
