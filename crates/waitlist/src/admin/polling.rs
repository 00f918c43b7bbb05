use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::dashboard::{AdminDashboard, FetchMode};
use crate::http::Transport;

/// The admin view's auto-refresh schedule.
///
/// At most one timer task is alive. Stopping aborts the timer only; each
/// tick runs its silent fetch as a separate task, so a fetch already in
/// flight finishes and still lands in the cache.
pub struct PollingSession<T> {
    dashboard: Arc<AdminDashboard<T>>,
    interval: Duration,
    enabled: bool,
    handle: Option<JoinHandle<()>>,
}

impl<T: Transport + 'static> PollingSession<T> {
    /// Creates an enabled session with its timer already running.
    pub fn launch(dashboard: Arc<AdminDashboard<T>>, interval: Duration) -> Self {
        let mut session = Self {
            dashboard,
            interval,
            enabled: true,
            handle: None,
        };
        session.start();
        session
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_scheduled(&self) -> bool {
        self.handle.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Cancels any previous timer, then schedules the first tick one full
    /// interval from now.
    pub fn start(&mut self) {
        self.stop();
        let dashboard = Arc::clone(&self.dashboard);
        let period = self.interval;
        let first_tick = Instant::now() + period;
        debug!(?period, "starting waitlist polling");

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!("waitlist poll tick");
                let dashboard = Arc::clone(&dashboard);
                tokio::spawn(async move {
                    if let Err(err) = dashboard.refresh(FetchMode::Silent).await {
                        debug!(error = %err, "silent refresh kept previous cache");
                    }
                });
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("stopping waitlist polling");
            handle.abort();
        }
    }

    /// Flips auto-refresh. Re-enabling restarts the schedule from zero.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if self.enabled {
            self.start();
        } else {
            self.stop();
        }
        self.enabled
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.stop();
        self.interval = interval;
        if self.enabled {
            self.start();
        }
    }
}

impl<T> Drop for PollingSession<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
