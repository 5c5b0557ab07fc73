//! Live order notifications
//!
//! One WebSocket per (user, restaurant) pair. The listener decodes server
//! events, reconciles them into an [`OrderBoard`](crate::board::OrderBoard)
//! and reconnects on any closure following a [`ReconnectPolicy`]:
//!
//! ```text
//! Disconnected -> Connecting -> Connected -> Backoff -> Connecting -> ...
//!                      |                        |
//!                      +------------------------+--> Stopped
//! ```

mod listener;
mod transport;

pub use listener::{ListenerHandle, NotificationListener, endpoint};
pub use transport::{FrameSource, FrameStream, WsFrameSource};

use rand::Rng;
use shared::OrderId;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// How long a customer request alert stays on screen
pub const DEFAULT_ALERT_TTL: Duration = Duration::from_secs(5);

/// Listener error type
#[derive(Debug, Clone, Error)]
pub enum ListenerError {
    /// Could not open the channel
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Channel broke while open
    #[error("Transport error: {0}")]
    Transport(String),

    /// Reconnect budget used up
    #[error("Gave up after {attempts} reconnect attempts")]
    RetriesExhausted { attempts: u32 },

    /// Listener task panicked or was aborted
    #[error("Listener task failed: {0}")]
    Task(String),
}

/// Reconnect policy
///
/// Delay for attempt `n` (1-based) is
/// `min(base * multiplier^(n-1), max) * (1 + U[0, jitter])`. Jitter only ever
/// adds time, so no reconnect fires before `base_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Extra random fraction of the delay, 0.0 disables jitter
    pub jitter: f64,
    /// Consecutive failed attempts before giving up (0 = unlimited)
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: 0.2,
            max_attempts: 20,
        }
    }
}

impl ReconnectPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed delay, no jitter, unlimited retries
    pub fn fixed(delay: Duration) -> Self {
        Self {
            base_delay: delay,
            max_delay: delay,
            multiplier: 1.0,
            jitter: 0.0,
            max_attempts: 0,
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.max(0.0);
        self
    }

    /// Set max attempts (0 = unlimited)
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Delay before attempt `attempt`, or `None` once the budget is spent
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        let sample = if self.jitter > 0.0 {
            rand::thread_rng().gen_range(0.0..=1.0)
        } else {
            0.0
        };
        self.delay_with_sample(attempt, sample)
    }

    /// Deterministic core of [`delay_for`](Self::delay_for); `sample` in [0, 1]
    pub fn delay_with_sample(&self, attempt: u32, sample: f64) -> Option<Duration> {
        if self.max_attempts != 0 && attempt > self.max_attempts {
            return None;
        }
        let base = self.base_delay.as_secs_f64();
        let cap = self.max_delay.as_secs_f64().max(base);
        let exp = attempt.saturating_sub(1).min(32) as i32;
        let backoff = (base * self.multiplier.max(1.0).powi(exp)).min(cap);
        let jitter = 1.0 + self.jitter.max(0.0) * sample.clamp(0.0, 1.0);
        Some(Duration::from_secs_f64(backoff * jitter))
    }
}

/// Why the listener stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Handle stopped (screen unmounted)
    Requested,
    RetriesExhausted,
}

/// Connection state machine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// `attempt` counts consecutive failures so far
    Connecting { attempt: u32 },
    Connected,
    /// Waiting `delay` before reconnect attempt `attempt`
    Backoff {
        attempt: u32,
        delay: Duration,
    },
    Stopped(StopReason),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting { attempt } => write!(f, "connecting (attempt {})", attempt + 1),
            Self::Connected => write!(f, "connected"),
            Self::Backoff { attempt, delay } => {
                write!(f, "retry {} in {:.1}s", attempt, delay.as_secs_f64())
            }
            Self::Stopped(StopReason::Requested) => write!(f, "stopped"),
            Self::Stopped(StopReason::RetriesExhausted) => write!(f, "gave up"),
        }
    }
}

/// User-facing alert, fire-and-forget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// An order is ready for delivery
    OrderReady { order_id: OrderId, table: String },
    /// A diner asks for attention; the UI dismisses it after `dismiss_after`
    CustomerRequest {
        table: i64,
        text: String,
        dismiss_after: Duration,
    },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderReady { order_id, table } => {
                write!(f, "Order {order_id} for table {table} is ready")
            }
            Self::CustomerRequest { text, .. } => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.base_delay, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, 20);
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = ReconnectPolicy::new()
            .with_jitter(0.0)
            .with_max_delay(Duration::from_secs(30));
        assert_eq!(policy.delay_for(1), Some(Duration::from_secs(5)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_secs(10)));
        assert_eq!(policy.delay_for(3), Some(Duration::from_secs(20)));
        assert_eq!(policy.delay_for(4), Some(Duration::from_secs(30)));
        assert_eq!(policy.delay_for(9), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_jitter_never_shortens_delay() {
        let policy = ReconnectPolicy::new().with_jitter(0.5);
        for _ in 0..200 {
            let d = policy.delay_for(1).unwrap();
            assert!(d >= Duration::from_secs(5));
            assert!(d <= Duration::from_millis(7500));
        }
        assert_eq!(
            policy.delay_with_sample(1, 1.0),
            Some(Duration::from_millis(7500))
        );
    }

    #[test]
    fn test_bounded_attempts() {
        let policy = ReconnectPolicy::new().with_max_attempts(3);
        assert!(policy.delay_for(3).is_some());
        assert!(policy.delay_for(4).is_none());

        let unlimited = ReconnectPolicy::fixed(Duration::from_secs(5));
        assert_eq!(unlimited.delay_for(10_000), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(
            ConnectionState::Connecting { attempt: 0 }.to_string(),
            "connecting (attempt 1)"
        );
        assert_eq!(
            ConnectionState::Backoff {
                attempt: 2,
                delay: Duration::from_millis(5500),
            }
            .to_string(),
            "retry 2 in 5.5s"
        );
    }
}
