use std::fmt;

use tracing::{error, info, warn};

use crate::http::{ApiResponse, FieldIssue, ResponseBody, TransportError};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Successfully joined the waitlist!";
pub const DEFAULT_CONFLICT_MESSAGE: &str = "This email is already registered.";
pub const DEFAULT_RATE_LIMIT_MESSAGE: &str = "Too many requests. Please try again later.";
pub const DEFAULT_SERVER_MESSAGE: &str = "Something went wrong. Please try again later.";
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Check your connection and try again.";
pub const NETWORK_MESSAGE: &str = "Network error. Please check connection.";

/// Result of one completed submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success { message: String },
    ValidationError { details: Vec<FieldIssue> },
    Conflict { message: String },
    RateLimited { message: String },
    ServerError { status: u16, message: String },
    Timeout,
    NetworkError,
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success { .. })
    }

    /// The single user-facing line for this outcome.
    pub fn message(&self) -> String {
        match self {
            SubmissionOutcome::Success { message }
            | SubmissionOutcome::Conflict { message }
            | SubmissionOutcome::RateLimited { message }
            | SubmissionOutcome::ServerError { message, .. } => message.clone(),
            SubmissionOutcome::ValidationError { details } => details
                .iter()
                .map(|issue| format!("{}: {}", issue.field, issue.message))
                .collect::<Vec<_>>()
                .join(", "),
            SubmissionOutcome::Timeout => TIMEOUT_MESSAGE.to_string(),
            SubmissionOutcome::NetworkError => NETWORK_MESSAGE.to_string(),
        }
    }

    /// Status code the outcome was derived from; zero for transport outcomes.
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmissionOutcome::Conflict { .. } => Some(409),
            SubmissionOutcome::RateLimited { .. } => Some(429),
            SubmissionOutcome::ServerError { status, .. } => Some(*status),
            SubmissionOutcome::Timeout | SubmissionOutcome::NetworkError => Some(0),
            SubmissionOutcome::Success { .. } | SubmissionOutcome::ValidationError { .. } => None,
        }
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// First match wins: success, validation details, 409, 429, then the generic
/// fallback. Details beat the dedicated statuses.
pub fn classify(status: u16, ok: bool, body: &ResponseBody) -> SubmissionOutcome {
    if ok && body.success() {
        let message = body.message().unwrap_or(DEFAULT_SUCCESS_MESSAGE).to_string();
        info!(%message, "joined waitlist");
        return SubmissionOutcome::Success { message };
    }

    let details = body.details();
    if !details.is_empty() {
        warn!(status, ?details, "waitlist rejected submission fields");
        return SubmissionOutcome::ValidationError { details };
    }

    match status {
        409 => {
            let message = body.error().unwrap_or(DEFAULT_CONFLICT_MESSAGE).to_string();
            warn!(%message, "duplicate waitlist entry");
            SubmissionOutcome::Conflict { message }
        }
        429 => {
            warn!("waitlist rate limit exceeded");
            SubmissionOutcome::RateLimited {
                message: body.error().unwrap_or(DEFAULT_RATE_LIMIT_MESSAGE).to_string(),
            }
        }
        _ => {
            let message = body
                .error()
                .or_else(|| body.message())
                .unwrap_or(DEFAULT_SERVER_MESSAGE)
                .to_string();
            error!(status, %message, ?body, "waitlist api error");
            SubmissionOutcome::ServerError { status, message }
        }
    }
}

/// Transport failures skip classification entirely.
pub fn from_transport(err: &TransportError) -> SubmissionOutcome {
    match err {
        TransportError::Timeout => SubmissionOutcome::Timeout,
        TransportError::Network(_) => SubmissionOutcome::NetworkError,
    }
}

pub fn resolve(result: Result<ApiResponse, TransportError>) -> SubmissionOutcome {
    match result {
        Ok(response) => classify(response.status, response.ok, &response.body),
        Err(err) => from_transport(&err),
    }
}
