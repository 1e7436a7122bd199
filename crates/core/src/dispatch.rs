//! Ordered delivery of outbound messages with bounded retry.
//!
//! A [`ReplySink`] is the "reply in this chat" half of a chat transport. The
//! [`Dispatcher`] sends through it one message at a time, retrying only errors
//! the transport marked as retryable so a message is never delivered twice.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::{DispatchError, OutboundMessage, TransportError};

/// Sends messages back into the conversation a request came from.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}

/// Configuration for send retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds
    pub max_backoff_ms: u64,
    /// Backoff multiplier (exponential factor)
    pub backoff_multiplier: f64,
    /// Whether to add jitter to the backoff
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 3, initial_backoff_ms: 250, max_backoff_ms: 5000, backoff_multiplier: 2.0, jitter: true }
    }
}

impl RetryConfig {
    /// Create a retry config with no retries (fail fast)
    pub fn no_retry() -> Self {
        Self { max_retries: 0, ..Default::default() }
    }

    /// Create a retry config with custom max retries
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self { max_retries, ..Default::default() }
    }

    fn next_backoff(&self, backoff_ms: u64) -> u64 {
        std::cmp::min((backoff_ms as f64 * self.backoff_multiplier) as u64, self.max_backoff_ms)
    }
}

/// Delivers messages through a [`ReplySink`].
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    retry: RetryConfig,
}

impl Dispatcher {
    pub fn new(retry: RetryConfig) -> Self {
        Self { retry }
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Sends one message, retrying retryable failures with exponential backoff.
    pub async fn send(&self, sink: &dyn ReplySink, message: &OutboundMessage) -> Result<(), TransportError> {
        let mut backoff_ms = self.retry.initial_backoff_ms;
        let mut attempt = 0;

        loop {
            let err = match sink.send(message).await {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };

            if !err.retryable || attempt >= self.retry.max_retries {
                return Err(err);
            }

            let jittered_ms = if self.retry.jitter {
                // Add 0-50% random jitter
                let jitter = rand::thread_rng().gen_range(0..=(backoff_ms / 2));
                backoff_ms + jitter
            } else {
                backoff_ms
            };
            let requested_ms = err.retry_after.map_or(0, |d| d.as_millis() as u64);
            let sleep_ms = jittered_ms.max(requested_ms);

            tracing::warn!(
                "Failed to send message (attempt {}/{}), retrying in {}ms: {}",
                attempt + 1,
                self.retry.max_retries + 1,
                sleep_ms,
                err
            );

            tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
            backoff_ms = self.retry.next_backoff(backoff_ms);
            attempt += 1;
        }
    }

    /// Sends messages in order, stopping at the first one that cannot be delivered.
    pub async fn send_all(&self, sink: &dyn ReplySink, messages: &[OutboundMessage]) -> Result<(), DispatchError> {
        for (index, message) in messages.iter().enumerate() {
            self.send(sink, message)
                .await
                .map_err(|source| DispatchError { index, source })?;
        }
        Ok(())
    }
}
