//! Reconnection supervisor: turns connect failures and connection loss
//! into scheduled `ConnectDue` events according to the configured policy.
//!
//! Every timer is a child of the session cancellation token, so `/exit`
//! tears down pending retries deterministically and no stray reconnect can
//! fire against a dead session.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::config::Config;
use crate::transport::LinkEvent;

/// Retry policy, read once from config. The failure and loss paths are
/// independent flags; by default only failed connects retry, and a lost
/// link stays down until the session restarts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub on_failure: bool,
    pub on_connection_lost: bool,
}

impl From<&Config> for RetryPolicy {
    fn from(config: &Config) -> Self {
        RetryPolicy {
            delay: config.retry_delay(),
            on_failure: config.retry_on_failure,
            on_connection_lost: config.retry_on_connection_lost,
        }
    }
}

pub struct ReconnectSupervisor {
    policy: RetryPolicy,
    events: UnboundedSender<LinkEvent>,
    cancel: CancellationToken,
}

impl ReconnectSupervisor {
    pub fn new(policy: RetryPolicy, events: UnboundedSender<LinkEvent>) -> Self {
        Self {
            policy,
            events,
            cancel: CancellationToken::new(),
        }
    }

    /// Schedule a single connect attempt after `delay`. Used both for the
    /// simulated-handshake delay at startup and for policy retries.
    pub fn schedule_connect(&self, delay: Duration) {
        let events = self.events.clone();
        let cancel = self.cancel.clone();
        debug!(?delay, "connect attempt scheduled");
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = events.send(LinkEvent::ConnectDue);
                }
            }
        });
    }

    /// A connect attempt failed. Returns whether a retry was scheduled.
    pub fn on_connect_failed(&self) -> bool {
        if self.policy.on_failure {
            self.schedule_connect(self.policy.delay);
            true
        } else {
            false
        }
    }

    /// An established link dropped. Returns whether a retry was scheduled.
    pub fn on_connection_lost(&self) -> bool {
        if self.policy.on_connection_lost {
            self.schedule_connect(self.policy.delay);
            true
        } else {
            false
        }
    }

    pub fn retry_delay(&self) -> Duration {
        self.policy.delay
    }

    /// Child token for per-connection link tasks, so teardown stops them
    /// along with the timers.
    pub fn link_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    /// Cancel all pending timers and link tasks. Called on `/exit`.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::{timeout, Duration};

    fn policy(on_failure: bool, on_loss: bool) -> RetryPolicy {
        RetryPolicy {
            delay: Duration::from_millis(200),
            on_failure,
            on_connection_lost: on_loss,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failure_schedules_exactly_one_retry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let supervisor = ReconnectSupervisor::new(policy(true, false), tx);
        assert!(supervisor.on_connect_failed());

        assert_eq!(rx.recv().await, Some(LinkEvent::ConnectDue));
        // No second event arrives without another failure.
        assert!(timeout(Duration::from_secs(5), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_failures_keep_retrying() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let supervisor = ReconnectSupervisor::new(policy(true, false), tx);
        for _ in 0..3 {
            assert!(supervisor.on_connect_failed());
            assert_eq!(rx.recv().await, Some(LinkEvent::ConnectDue));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn loss_does_not_retry_by_default() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let supervisor = ReconnectSupervisor::new(policy(true, false), tx);
        assert!(!supervisor.on_connection_lost());
        assert!(timeout(Duration::from_secs(5), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn loss_retries_when_policy_enables_it() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let supervisor = ReconnectSupervisor::new(policy(true, true), tx);
        assert!(supervisor.on_connection_lost());
        assert_eq!(rx.recv().await, Some(LinkEvent::ConnectDue));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_timers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let supervisor = ReconnectSupervisor::new(policy(true, false), tx);
        supervisor.on_connect_failed();
        supervisor.shutdown();
        // The scheduled timer must never deliver after cancellation.
        assert!(timeout(Duration::from_secs(5), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_child_link_tokens() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let supervisor = ReconnectSupervisor::new(policy(true, false), tx);
        let link_token = supervisor.link_token();
        assert!(!link_token.is_cancelled());
        supervisor.shutdown();
        assert!(link_token.is_cancelled());
    }

    #[test]
    fn policy_reads_config_flags() {
        let mut config = Config::default();
        config.retry_delay_ms = 1_234;
        config.retry_on_connection_lost = true;
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.delay, Duration::from_millis(1_234));
        assert!(policy.on_failure);
        assert!(policy.on_connection_lost);
    }
}
