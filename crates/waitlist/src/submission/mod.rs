//! Signup form submission: local validation, one in-flight request, and the
//! confirmation or inline error that follows.

mod controller;
pub mod domain;
pub mod view;

pub use controller::{
    SubmissionController, SubmissionPhase, SubmitDisposition, BUSY_CAPTION, IDLE_CAPTION,
    RATE_LIMIT_MARKER,
};
pub use domain::{FormField, FormInput, LocalRejection, SubmissionPayload, OTHER_SKILL};
pub use view::{ModalController, ModalVariant, SubmissionView};
