use std::sync::Arc;

use clap::Args;
use tracing::info;
use waitlist::config::ClientConfig;
use waitlist::error::AppError;
use waitlist::http::{HttpClient, ReqwestTransport};
use waitlist::submission::{FormInput, SubmissionController, SubmitDisposition};

use crate::terminal::{TerminalModal, TerminalView};

#[derive(Args, Debug, Default)]
pub(crate) struct SubmitArgs {
    #[arg(long, default_value = "")]
    pub(crate) full_name: String,
    #[arg(long, default_value = "")]
    pub(crate) email: String,
    #[arg(long, default_value = "")]
    pub(crate) phone: String,
    /// Primary skill; "Other" requires --other-service
    #[arg(long, default_value = "")]
    pub(crate) primary_skill: String,
    #[arg(long)]
    pub(crate) other_service: Option<String>,
    #[arg(long, default_value = "")]
    pub(crate) city: String,
    #[arg(long, default_value = "")]
    pub(crate) state: String,
    #[arg(long, default_value = "")]
    pub(crate) years_of_experience: String,
    #[arg(long)]
    pub(crate) portfolio_link: Option<String>,
    /// Opt out of early-access notifications
    #[arg(long)]
    pub(crate) no_notify: bool,
    /// Agree to the Terms & Privacy Policy
    #[arg(long)]
    pub(crate) agree_terms: bool,
}

impl SubmitArgs {
    pub(crate) fn into_form(self) -> FormInput {
        let mut form = FormInput {
            full_name: self.full_name,
            email: self.email,
            phone_number: self.phone,
            city: self.city,
            state: self.state,
            years_of_experience: self.years_of_experience,
            portfolio_link: self.portfolio_link.unwrap_or_default(),
            notify_early_access: !self.no_notify,
            agreed_to_terms: self.agree_terms,
            ..FormInput::default()
        };
        form.other_service = self.other_service.unwrap_or_default();
        form.select_primary_skill(self.primary_skill);
        form
    }
}

pub(crate) async fn run_submit(config: &ClientConfig, args: SubmitArgs) -> Result<(), AppError> {
    let transport = ReqwestTransport::new(config.api.base_url.clone())?;
    let client = Arc::new(HttpClient::new(transport));
    let controller = SubmissionController::new(
        client,
        Arc::new(TerminalView::new(args.into_form())),
        Arc::new(TerminalModal),
        config.api.submit_timeout,
    );

    info!(base_url = %config.api.base_url, "submitting waitlist signup");
    settle(controller.submit().await)
}

/// Anything short of a confirmed signup fails the command.
fn settle(disposition: SubmitDisposition) -> Result<(), AppError> {
    match disposition {
        SubmitDisposition::Completed(outcome) if outcome.is_success() => {
            info!(status = ?outcome.status(), "submission finished");
            Ok(())
        }
        SubmitDisposition::Completed(outcome) => {
            info!(status = ?outcome.status(), "submission not accepted");
            Err(AppError::Submission(outcome.message()))
        }
        SubmitDisposition::Rejected(rejection) => {
            info!(field = ?rejection.field, "submission blocked before sending");
            Err(AppError::Submission(rejection.message))
        }
        SubmitDisposition::Ignored => Err(AppError::Submission(
            "another submission is in progress".to_string(),
        )),
    }
}
