pub mod smtp;

use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::info;

pub use smtp::{SmtpAlert, SmtpAlertError};

/// Trait for delivering a formatted alert message.
///
/// Delivery is best-effort: callers bound it with a timeout and swallow
/// failures, so implementations never need to retry.
#[async_trait]
pub trait AlertTransport: Send + Sync + 'static {
    /// Error type for this alert transport implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Deliver a single message.
    async fn send(&self, message: &str) -> Result<(), Self::Error>;
}

/// Transport that only logs; used when no delivery channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlert;

#[async_trait]
impl AlertTransport for LogAlert {
    type Error = Infallible;

    async fn send(&self, message: &str) -> Result<(), Self::Error> {
        info!(alert = message, "Alert (log-only transport)");
        Ok(())
    }
}

/// Recording transport; primarily a test double.
#[derive(Clone, Default)]
pub struct MemoryAlert {
    messages: Arc<Mutex<Vec<String>>>,
}

/// Error type for MemoryAlert.
#[derive(Debug, thiserror::Error)]
pub enum MemoryAlertError {
    #[error("mutex poisoned: {0}")]
    MutexPoisoned(String),
}

impl<T> From<PoisonError<T>> for MemoryAlertError {
    fn from(err: PoisonError<T>) -> Self {
        MemoryAlertError::MutexPoisoned(err.to_string())
    }
}

impl MemoryAlert {
    /// All messages delivered so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AlertTransport for MemoryAlert {
    type Error = MemoryAlertError;

    async fn send(&self, message: &str) -> Result<(), Self::Error> {
        let mut messages = self.messages.lock()?;
        messages.push(message.to_owned());
        Ok(())
    }
}
