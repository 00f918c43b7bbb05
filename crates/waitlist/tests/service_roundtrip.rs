mod common;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{complete_form, RecordingModal, RecordingView};
use serde_json::{json, Value};
use waitlist::admin::{AdminDashboard, FetchMode};
use waitlist::http::{HttpClient, ReqwestTransport};
use waitlist::outcome::SubmissionOutcome;
use waitlist::submission::{SubmissionController, SubmitDisposition};

#[derive(Clone, Default)]
struct StubService {
    emails: Arc<Mutex<Vec<String>>>,
}

async fn join(
    State(service): State<StubService>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if email.starts_with("slow") {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
    if email.starts_with("busy") {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"success": false, "error": "Slow down"})),
        );
    }

    let mut emails = service.emails.lock().expect("stub mutex poisoned");
    if emails.contains(&email) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"success": false, "error": "This email is already on our waitlist"})),
        );
    }
    emails.push(email);
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "message": "Check your email to confirm your spot."})),
    )
}

async fn stats(State(service): State<StubService>) -> Json<Value> {
    let emails = service.emails.lock().expect("stub mutex poisoned").clone();
    let users: Vec<Value> = emails
        .iter()
        .enumerate()
        .map(|(idx, email)| {
            json!({"_id": format!("id-{idx}"), "email": email, "confirmed": false, "createdAt": "2025-06-01T12:00:00Z"})
        })
        .collect();
    Json(json!({
        "success": true,
        "stats": {"total": users.len(), "confirmed": 0, "unconfirmed": users.len(), "users": users}
    }))
}

async fn spawn_stub() -> SocketAddr {
    let app = Router::new()
        .route("/api/waitlist", post(join))
        .route("/api/waitlist/stats", get(stats))
        .with_state(StubService::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub serves");
    });
    addr
}

fn client_for(addr: SocketAddr) -> Arc<HttpClient<ReqwestTransport>> {
    let transport = ReqwestTransport::new(format!("http://{addr}")).expect("reqwest client");
    Arc::new(HttpClient::new(transport))
}

#[tokio::test]
async fn signup_then_admin_sees_entry() {
    let addr = spawn_stub().await;
    let client = client_for(addr);
    let view = Arc::new(RecordingView::with_form(complete_form()));
    let modal = Arc::new(RecordingModal::default());
    let controller = SubmissionController::new(
        client.clone(),
        view.clone(),
        modal.clone(),
        Duration::from_secs(5),
    );

    let first = controller.submit().await;
    assert!(matches!(
        first,
        SubmitDisposition::Completed(SubmissionOutcome::Success { .. })
    ));
    assert_eq!(modal.opened().len(), 1);

    let dashboard = AdminDashboard::new(client, Duration::from_secs(5));
    let snapshot = dashboard
        .refresh(FetchMode::Manual)
        .await
        .expect("stats load");
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.entries[0].email, "ada@example.com");
    assert_eq!(snapshot.entries[0].id.as_deref(), Some("id-0"));
}

#[tokio::test]
async fn duplicate_signup_is_conflict() {
    let addr = spawn_stub().await;
    let client = client_for(addr);
    let modal = Arc::new(RecordingModal::default());

    let first_view = Arc::new(RecordingView::with_form(complete_form()));
    let first = SubmissionController::new(
        client.clone(),
        first_view,
        modal.clone(),
        Duration::from_secs(5),
    );
    first.submit().await;

    let second_view = Arc::new(RecordingView::with_form(complete_form()));
    let second = SubmissionController::new(client, second_view.clone(), modal, Duration::from_secs(5));
    let disposition = second.submit().await;

    assert_eq!(
        disposition,
        SubmitDisposition::Completed(SubmissionOutcome::Conflict {
            message: "This email is already on our waitlist".to_string()
        })
    );
    assert_eq!(second_view.form(), complete_form());
}

#[tokio::test]
async fn rate_limited_signup_keeps_server_text() {
    let addr = spawn_stub().await;
    let mut form = complete_form();
    form.email = "busy@example.com".to_string();
    let view = Arc::new(RecordingView::with_form(form));
    let controller = SubmissionController::new(
        client_for(addr),
        view.clone(),
        Arc::new(RecordingModal::default()),
        Duration::from_secs(5),
    );

    let disposition = controller.submit().await;

    assert_eq!(
        disposition,
        SubmitDisposition::Completed(SubmissionOutcome::RateLimited {
            message: "Slow down".to_string()
        })
    );
    assert!(view.rate_limited());
}

#[tokio::test]
async fn slow_service_hits_client_timeout() {
    let addr = spawn_stub().await;
    let mut form = complete_form();
    form.email = "slow@example.com".to_string();
    let view = Arc::new(RecordingView::with_form(form));
    let controller = SubmissionController::new(
        client_for(addr),
        view.clone(),
        Arc::new(RecordingModal::default()),
        Duration::from_millis(200),
    );

    let disposition = controller.submit().await;

    assert_eq!(
        disposition,
        SubmitDisposition::Completed(SubmissionOutcome::Timeout)
    );
    assert!(!view.busy());
}

#[tokio::test]
async fn unreachable_service_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);

    let controller = SubmissionController::new(
        client_for(addr),
        Arc::new(RecordingView::with_form(complete_form())),
        Arc::new(RecordingModal::default()),
        Duration::from_secs(5),
    );

    assert_eq!(
        controller.submit().await,
        SubmitDisposition::Completed(SubmissionOutcome::NetworkError)
    );
}
