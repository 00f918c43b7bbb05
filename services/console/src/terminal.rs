use std::sync::Mutex;

use waitlist::admin::render::{joined_label, status_label};
use waitlist::admin::DashboardState;
use waitlist::submission::{FormField, FormInput, ModalController, ModalVariant, SubmissionView};

/// Form-side effects rendered as terminal lines. The form itself is the
/// set of flags the command was started with.
pub(crate) struct TerminalView {
    form: Mutex<FormInput>,
}

impl TerminalView {
    pub(crate) fn new(form: FormInput) -> Self {
        Self {
            form: Mutex::new(form),
        }
    }
}

impl SubmissionView for TerminalView {
    fn read_form(&self) -> FormInput {
        self.form.lock().expect("form mutex poisoned").clone()
    }

    fn reset_form(&self) {
        *self.form.lock().expect("form mutex poisoned") = FormInput::default();
    }

    fn set_other_service_visible(&self, _visible: bool) {}

    fn set_busy(&self, busy: bool, caption: &str) {
        if busy {
            eprintln!("{caption}");
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn clear_error(&self) {}

    fn focus(&self, field: FormField) {
        eprintln!("hint: check {}", flag_for(field));
    }

    fn scroll_error_into_view(&self) {}

    fn set_rate_limited(&self, active: bool) {
        if active {
            eprintln!("hint: rate limited, wait a few seconds before retrying");
        }
    }
}

fn flag_for(field: FormField) -> &'static str {
    match field {
        FormField::FullName => "--full-name",
        FormField::Email => "--email",
        FormField::PhoneNumber => "--phone",
        FormField::PrimarySkill => "--primary-skill",
        FormField::OtherService => "--other-service",
        FormField::City => "--city",
        FormField::State => "--state",
        FormField::YearsOfExperience => "--years-of-experience",
        FormField::PortfolioLink => "--portfolio-link",
        FormField::NotifyEarlyAccess => "--no-notify",
        FormField::AgreedToTerms => "--agree-terms",
    }
}

pub(crate) struct TerminalModal;

impl ModalController for TerminalModal {
    fn open(&self, message: &str, variant: ModalVariant) {
        let rule = "-".repeat(message.chars().count().clamp(20, 72));
        println!("{rule}");
        println!("{message}");
        if variant == ModalVariant::Delayed {
            println!("(confirmation email may arrive late)");
        }
        println!("{rule}");
    }
}

pub(crate) fn print_dashboard(state: &DashboardState, filter: &str, auto: bool) {
    let (total, confirmed, unconfirmed) = state
        .snapshot
        .as_deref()
        .map(|snapshot| (snapshot.total, snapshot.confirmed, snapshot.unconfirmed))
        .unwrap_or_default();

    println!(
        "total {total} | confirmed {confirmed} | unconfirmed {unconfirmed} | updated {} | auto {}",
        state.updated_label(),
        if auto { "on" } else { "off" }
    );
    if let Some(error) = &state.error {
        println!("! {error}");
    }
    if !filter.trim().is_empty() {
        println!("filter: {}", filter.trim());
    }

    let rows = match state.visible_rows(filter) {
        Ok(rows) => rows,
        Err(placeholder) => {
            println!("  {placeholder}");
            return;
        }
    };
    for entry in rows {
        println!(
            "  {:<40} {:<12} {}",
            entry.email,
            status_label(entry),
            joined_label(entry)
        );
    }
}
