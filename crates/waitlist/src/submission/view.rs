use super::domain::{FormField, FormInput};

/// Presentation tag on the confirmation surface. Never changes the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalVariant {
    Standard,
    Delayed,
}

impl ModalVariant {
    /// "delayed" without "check your email", case-insensitive.
    pub fn for_message(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("delayed") && !lowered.contains("check your email") {
            ModalVariant::Delayed
        } else {
            ModalVariant::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModalVariant::Standard => "standard",
            ModalVariant::Delayed => "delayed",
        }
    }
}

/// Confirmation surface collaborator. Focus trapping lives behind `open`.
pub trait ModalController: Send + Sync {
    fn open(&self, message: &str, variant: ModalVariant);
}

/// Form-side effects the submission controller drives.
pub trait SubmissionView: Send + Sync {
    fn read_form(&self) -> FormInput;
    fn reset_form(&self);
    fn set_other_service_visible(&self, visible: bool);
    /// Busy: submit control inert and caption swapped.
    fn set_busy(&self, busy: bool, caption: &str);
    fn show_error(&self, message: &str);
    fn clear_error(&self);
    fn focus(&self, field: FormField);
    fn scroll_error_into_view(&self);
    fn set_rate_limited(&self, active: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delayed_variant_requires_delay_without_email_hint() {
        assert_eq!(
            ModalVariant::for_message("Joined! Confirmation email is DELAYED."),
            ModalVariant::Delayed
        );
        assert_eq!(
            ModalVariant::for_message("Delayed slightly, please check your email soon."),
            ModalVariant::Standard
        );
        assert_eq!(
            ModalVariant::for_message("Successfully joined the waitlist!"),
            ModalVariant::Standard
        );
    }
}
