#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;
use waitlist::http::{ApiRequest, HttpClient, RawResponse, Transport, TransportFailure};
use waitlist::submission::{FormField, FormInput, ModalController, ModalVariant, SubmissionView};

#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, Value),
    Text(u16, &'static str),
    Refused,
    Hang,
}

/// Answers every request with the current reply, optionally holding each
/// answer until the gate is notified.
pub struct ScriptedTransport {
    reply: Mutex<Reply>,
    gate: Mutex<Option<Arc<Notify>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply: Mutex::new(reply),
            gate: Mutex::new(None),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().expect("reply mutex poisoned") = reply;
    }

    pub fn gate(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().expect("gate mutex poisoned") = Some(notify.clone());
        notify
    }

    pub fn open_gate(&self) {
        *self.gate.lock().expect("gate mutex poisoned") = None;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request.clone());

        let gate = self.gate.lock().expect("gate mutex poisoned").clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let reply = self.reply.lock().expect("reply mutex poisoned").clone();
        match reply {
            Reply::Json(status, body) => Ok(RawResponse {
                status,
                reason: None,
                bytes: serde_json::to_vec(&body).expect("json body encodes"),
            }),
            Reply::Text(status, body) => Ok(RawResponse {
                status,
                reason: Some("Bad Gateway".to_string()),
                bytes: body.as_bytes().to_vec(),
            }),
            Reply::Refused => Err(TransportFailure {
                message: "connection refused".to_string(),
            }),
            Reply::Hang => {
                std::future::pending::<()>().await;
                unreachable!("pending never resolves")
            }
        }
    }
}

pub fn scripted(reply: Reply) -> Arc<HttpClient<ScriptedTransport>> {
    Arc::new(HttpClient::new(ScriptedTransport::new(reply)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Busy(bool, String),
    Error(String),
    ClearError,
    Focus(FormField),
    Scroll,
    RateLimited(bool),
    Reset,
    OtherServiceVisible(bool),
}

pub struct RecordingView {
    form: Mutex<FormInput>,
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn with_form(form: FormInput) -> Self {
        Self {
            form: Mutex::new(form),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn form(&self) -> FormInput {
        self.form.lock().expect("form mutex poisoned").clone()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().expect("events mutex poisoned").clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|event| match event {
            ViewEvent::Error(message) => Some(message),
            _ => None,
        })
    }

    pub fn rate_limited(&self) -> bool {
        self.events()
            .into_iter()
            .rev()
            .find_map(|event| match event {
                ViewEvent::RateLimited(active) => Some(active),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn busy(&self) -> bool {
        self.events()
            .into_iter()
            .rev()
            .find_map(|event| match event {
                ViewEvent::Busy(busy, _) => Some(busy),
                _ => None,
            })
            .unwrap_or(false)
    }

    fn record(&self, event: ViewEvent) {
        self.events.lock().expect("events mutex poisoned").push(event);
    }
}

impl SubmissionView for RecordingView {
    fn read_form(&self) -> FormInput {
        self.form()
    }

    fn reset_form(&self) {
        *self.form.lock().expect("form mutex poisoned") = FormInput::default();
        self.record(ViewEvent::Reset);
    }

    fn set_other_service_visible(&self, visible: bool) {
        self.record(ViewEvent::OtherServiceVisible(visible));
    }

    fn set_busy(&self, busy: bool, caption: &str) {
        self.record(ViewEvent::Busy(busy, caption.to_string()));
    }

    fn show_error(&self, message: &str) {
        self.record(ViewEvent::Error(message.to_string()));
    }

    fn clear_error(&self) {
        self.record(ViewEvent::ClearError);
    }

    fn focus(&self, field: FormField) {
        self.record(ViewEvent::Focus(field));
    }

    fn scroll_error_into_view(&self) {
        self.record(ViewEvent::Scroll);
    }

    fn set_rate_limited(&self, active: bool) {
        self.record(ViewEvent::RateLimited(active));
    }
}

#[derive(Default)]
pub struct RecordingModal {
    opened: Mutex<Vec<(String, ModalVariant)>>,
}

impl RecordingModal {
    pub fn opened(&self) -> Vec<(String, ModalVariant)> {
        self.opened.lock().expect("modal mutex poisoned").clone()
    }
}

impl ModalController for RecordingModal {
    fn open(&self, message: &str, variant: ModalVariant) {
        self.opened
            .lock()
            .expect("modal mutex poisoned")
            .push((message.to_string(), variant));
    }
}

pub fn complete_form() -> FormInput {
    FormInput {
        full_name: "Ada Obi".to_string(),
        email: "ada@example.com".to_string(),
        phone_number: "08030000000".to_string(),
        primary_skill: "Plumbing".to_string(),
        city: "Ikeja".to_string(),
        state: "Lagos".to_string(),
        years_of_experience: "3-5".to_string(),
        agreed_to_terms: true,
        ..FormInput::default()
    }
}

pub fn stats_body(emails: &[(&str, bool)]) -> Value {
    let confirmed = emails.iter().filter(|(_, confirmed)| *confirmed).count();
    let users: Vec<Value> = emails
        .iter()
        .enumerate()
        .map(|(idx, (email, confirmed))| {
            json!({
                "_id": format!("u{idx}"),
                "email": email,
                "confirmed": confirmed,
                "joinedAt": "2025-04-01T09:00:00Z"
            })
        })
        .collect();
    json!({
        "success": true,
        "stats": {
            "total": emails.len(),
            "confirmed": confirmed,
            "unconfirmed": emails.len() - confirmed,
            "users": users
        }
    })
}

/// Lets spawned tasks run to their next suspension point.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
