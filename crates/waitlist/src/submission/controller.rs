use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info};

use super::domain::LocalRejection;
use super::view::{ModalController, ModalVariant, SubmissionView};
use crate::http::{ApiRequest, HttpClient, Transport, SUBMIT_PATH};
use crate::outcome::{self, SubmissionOutcome};

pub const IDLE_CAPTION: &str = "Join the Waitlist";
pub const BUSY_CAPTION: &str = "Joining...";
pub const RATE_LIMIT_MARKER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// What a call to [`SubmissionController::submit`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDisposition {
    /// Another submission was already running.
    Ignored,
    /// Blocked locally; no request was made.
    Rejected(LocalRejection),
    Completed(SubmissionOutcome),
}

/// Drives one form submission at a time from validation through the
/// confirmation or error surface.
pub struct SubmissionController<T, V, M> {
    client: Arc<HttpClient<T>>,
    view: Arc<V>,
    modal: Arc<M>,
    timeout: Duration,
    phase: Mutex<SubmissionPhase>,
    rate_limit_generation: Arc<AtomicU64>,
}

impl<T, V, M> SubmissionController<T, V, M>
where
    T: Transport + 'static,
    V: SubmissionView + 'static,
    M: ModalController + 'static,
{
    pub fn new(client: Arc<HttpClient<T>>, view: Arc<V>, modal: Arc<M>, timeout: Duration) -> Self {
        Self {
            client,
            view,
            modal,
            timeout,
            phase: Mutex::new(SubmissionPhase::Idle),
            rate_limit_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        *self.phase.lock().expect("submission phase mutex poisoned")
    }

    pub async fn submit(&self) -> SubmitDisposition {
        let Some(mut attempt) = AttemptGuard::begin(&self.phase, self.view.as_ref()) else {
            debug!("submission already in progress; ignoring");
            return SubmitDisposition::Ignored;
        };

        self.view.clear_error();
        let form = self.view.read_form();
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(rejection) => {
                debug!(field = ?rejection.field, "submission blocked locally");
                self.set_phase(SubmissionPhase::Failed);
                self.view.show_error(&rejection.message);
                self.view.focus(rejection.field);
                return SubmitDisposition::Rejected(rejection);
            }
        };

        self.set_phase(SubmissionPhase::Submitting);
        attempt.set_busy(true);
        info!(email = %payload.email, skill = %payload.primary_skill, "sending waitlist payload");

        let request = ApiRequest::post(SUBMIT_PATH, json!(payload));
        let outcome = outcome::resolve(self.client.request(&request, self.timeout).await);

        attempt.set_busy(false);
        if outcome.is_success() {
            self.set_phase(SubmissionPhase::Succeeded);
            self.confirm(&outcome);
        } else {
            self.set_phase(SubmissionPhase::Failed);
            self.report_failure(&outcome);
        }

        SubmitDisposition::Completed(outcome)
    }

    fn confirm(&self, outcome: &SubmissionOutcome) {
        let message = outcome.message();
        let variant = ModalVariant::for_message(&message);
        self.modal.open(&message, variant);
        self.view.reset_form();
        self.view.set_other_service_visible(false);
    }

    fn report_failure(&self, outcome: &SubmissionOutcome) {
        self.view.show_error(&outcome.message());
        if matches!(outcome, SubmissionOutcome::RateLimited { .. }) {
            self.flag_rate_limited();
        }
        self.view.scroll_error_into_view();
    }

    /// A newer marker supersedes the pending clear of an older one.
    fn flag_rate_limited(&self) {
        let generation = self.rate_limit_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.set_rate_limited(true);

        let view = Arc::clone(&self.view);
        let current = Arc::clone(&self.rate_limit_generation);
        tokio::spawn(async move {
            tokio::time::sleep(RATE_LIMIT_MARKER).await;
            if current.load(Ordering::SeqCst) == generation {
                view.set_rate_limited(false);
            }
        });
    }

    fn set_phase(&self, next: SubmissionPhase) {
        let mut phase = self.phase.lock().expect("submission phase mutex poisoned");
        debug!(from = ?*phase, to = ?next, "submission phase");
        *phase = next;
    }
}

/// Claims the controller for one attempt and hands it back to `Idle` on drop,
/// including when the submitting future is cancelled. A busy view is
/// re-enabled on the way out.
struct AttemptGuard<'a, V: SubmissionView> {
    phase: &'a Mutex<SubmissionPhase>,
    view: &'a V,
    busy: bool,
}

impl<'a, V: SubmissionView> AttemptGuard<'a, V> {
    fn begin(phase: &'a Mutex<SubmissionPhase>, view: &'a V) -> Option<Self> {
        let mut current = phase.lock().expect("submission phase mutex poisoned");
        if *current != SubmissionPhase::Idle {
            return None;
        }
        *current = SubmissionPhase::Validating;
        Some(Self {
            phase,
            view,
            busy: false,
        })
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        let caption = if busy { BUSY_CAPTION } else { IDLE_CAPTION };
        self.view.set_busy(busy, caption);
    }
}

impl<V: SubmissionView> Drop for AttemptGuard<'_, V> {
    fn drop(&mut self) {
        if self.busy {
            self.set_busy(false);
        }
        if let Ok(mut current) = self.phase.lock() {
            *current = SubmissionPhase::Idle;
        }
    }
}
