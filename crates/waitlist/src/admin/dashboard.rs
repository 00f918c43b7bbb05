use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::domain::{StatsPayload, StatsSnapshot, WaitlistEntry};
use super::render::{table_markup, visible_rows, LOAD_FAILED_ROW};
use crate::http::{ApiRequest, ApiResponse, HttpClient, Transport, TransportError, STATS_PATH};

pub const MALFORMED_STATS: &str = "Malformed stats response";
pub const UPDATED_ERROR_LABEL: &str = "Err";

/// Who asked for the fetch. Silent fetches never touch the busy indicator
/// and never swap the table for the failure placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Manual,
    Silent,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("{0}")]
    Malformed(String),
}

/// Everything the admin page shows, read as one consistent copy.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub snapshot: Option<Arc<StatsSnapshot>>,
    pub busy: bool,
    pub error: Option<String>,
    pub load_failed: bool,
}

impl DashboardState {
    pub fn entries(&self) -> &[WaitlistEntry] {
        self.snapshot
            .as_deref()
            .map(|snapshot| snapshot.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn updated_label(&self) -> String {
        if self.error.is_some() {
            return UPDATED_ERROR_LABEL.to_string();
        }
        match &self.snapshot {
            Some(snapshot) => snapshot.updated_at.format("%H:%M:%S").to_string(),
            None => "—".to_string(),
        }
    }

    /// Rows under `filter`, or the placeholder to show. A failed manual load
    /// hides the cache until the next success.
    pub fn visible_rows(&self, filter: &str) -> Result<Vec<&WaitlistEntry>, &'static str> {
        if self.load_failed {
            return Err(LOAD_FAILED_ROW);
        }
        visible_rows(self.entries(), filter)
    }

    /// Re-rendering is local; it never fetches.
    pub fn render(&self, filter: &str) -> String {
        table_markup(self.visible_rows(filter))
    }
}

/// Owns the entry cache and the single fetch routine shared by manual
/// refreshes and the polling loop.
pub struct AdminDashboard<T> {
    client: Arc<HttpClient<T>>,
    timeout: Duration,
    state: RwLock<DashboardState>,
    changes: watch::Sender<u64>,
}

impl<T: Transport> AdminDashboard<T> {
    pub fn new(client: Arc<HttpClient<T>>, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            state: RwLock::new(DashboardState::default()),
            changes: watch::channel(0).0,
        }
    }

    /// Bumps on every state change, including silent polls, so a front end
    /// knows when to re-render.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub fn state(&self) -> DashboardState {
        self.state.read().expect("dashboard state poisoned").clone()
    }

    pub fn render(&self, filter: &str) -> String {
        self.state.read().expect("dashboard state poisoned").render(filter)
    }

    /// Racing fetches resolve last-writer-wins.
    pub async fn refresh(&self, mode: FetchMode) -> Result<Arc<StatsSnapshot>, StatsError> {
        self.update(|state| {
            if mode == FetchMode::Manual {
                state.busy = true;
            }
            state.error = None;
        });

        let result = self.fetch_snapshot().await;

        self.update(|state| {
            if mode == FetchMode::Manual {
                state.busy = false;
            }
            match &result {
                Ok(snapshot) => {
                    state.snapshot = Some(Arc::clone(snapshot));
                    state.load_failed = false;
                }
                Err(err) => {
                    state.error = Some(err.to_string());
                    if mode == FetchMode::Manual {
                        state.load_failed = true;
                    }
                }
            }
        });

        match &result {
            Ok(snapshot) => info!(
                ?mode,
                total = snapshot.total,
                entries = snapshot.entries.len(),
                "waitlist stats refreshed"
            ),
            Err(err) => warn!(?mode, error = %err, "waitlist stats refresh failed"),
        }
        result
    }

    async fn fetch_snapshot(&self) -> Result<Arc<StatsSnapshot>, StatsError> {
        let response = self
            .client
            .request(&ApiRequest::get(STATS_PATH), self.timeout)
            .await?;
        let snapshot = snapshot_from_response(response)?;
        Ok(Arc::new(snapshot))
    }

    fn update(&self, apply: impl FnOnce(&mut DashboardState)) {
        {
            let mut state = self.state.write().expect("dashboard state poisoned");
            apply(&mut state);
        }
        self.changes.send_modify(|version| *version += 1);
    }
}

fn snapshot_from_response(response: ApiResponse) -> Result<StatsSnapshot, StatsError> {
    let ApiResponse {
        status,
        ok,
        reason,
        body,
    } = response;

    if !ok {
        let message = body
            .error()
            .or_else(|| body.message())
            .map(str::to_string)
            .or(reason)
            .unwrap_or_else(|| format!("HTTP {status}"));
        return Err(StatsError::Http { status, message });
    }

    let stats = match body.get("stats") {
        Some(stats) if body.success() && stats.is_object() => stats.clone(),
        _ => {
            let message = body.error().unwrap_or(MALFORMED_STATS).to_string();
            return Err(StatsError::Malformed(message));
        }
    };

    let payload: StatsPayload = serde_json::from_value(stats).map_err(|err| {
        debug!(%err, "stats object did not match expected shape");
        StatsError::Malformed(MALFORMED_STATS.to_string())
    })?;
    Ok(payload.into_snapshot(Utc::now()))
}
