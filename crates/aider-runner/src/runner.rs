use std::future::Future;
use std::time::Duration;

use crate::mode::ExecutionMode;
use crate::process::{spawn_command, SpawnOptions, SpawnResult};
use crate::Result;

// ─── RetryPolicy ──────────────────────────────────────────────────────────

/// Exponential backoff for spawn failures: `base * 2^(attempt-1)`, capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` means a single attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

// ─── Retry loop ───────────────────────────────────────────────────────────

/// Run `attempt` until it succeeds or the policy is exhausted.
///
/// Only errors are retried; a child that ran and exited non-zero is a
/// result, not a failure. The returned `retry_count` is the number of
/// retries consumed.
pub async fn retry_spawn<F, Fut>(policy: &RetryPolicy, mut attempt: F) -> Result<SpawnResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<SpawnResult>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Ok(mut result) => {
                result.retry_count = retries;
                return Ok(result);
            }
            Err(err) if retries < policy.max_retries => {
                retries += 1;
                let delay = policy.backoff_delay(retries);
                tracing::warn!(
                    attempt = retries,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "spawn failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

// ─── spawn_aider ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SpawnAiderOptions {
    pub spawn: SpawnOptions,
    pub retry: RetryPolicy,
}

/// Run aider (or the echo stand-in) with spawn-failure retries.
pub async fn spawn_aider(
    args: &[String],
    opts: &SpawnAiderOptions,
    mode: ExecutionMode,
) -> Result<SpawnResult> {
    let spawn = &opts.spawn;
    retry_spawn(&opts.retry, move || spawn_command(args, spawn, mode)).await
}
