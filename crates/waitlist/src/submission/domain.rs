use serde::Serialize;

pub const OTHER_SKILL: &str = "Other";

/// Controls of the signup form, used to route focus after a local rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FullName,
    Email,
    PhoneNumber,
    PrimarySkill,
    OtherService,
    City,
    State,
    YearsOfExperience,
    PortfolioLink,
    NotifyEarlyAccess,
    AgreedToTerms,
}

/// Raw form state as the view holds it, before trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub primary_skill: String,
    pub other_service: String,
    pub city: String,
    pub state: String,
    pub years_of_experience: String,
    pub portfolio_link: String,
    pub notify_early_access: bool,
    pub agreed_to_terms: bool,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            primary_skill: String::new(),
            other_service: String::new(),
            city: String::new(),
            state: String::new(),
            years_of_experience: String::new(),
            portfolio_link: String::new(),
            notify_early_access: true,
            agreed_to_terms: false,
        }
    }
}

impl FormInput {
    /// Changes the skill selection. Leaving "Other" drops any typed service.
    /// Returns whether the other-service control should be visible.
    pub fn select_primary_skill(&mut self, skill: impl Into<String>) -> bool {
        self.primary_skill = skill.into();
        let wants_other = self.primary_skill == OTHER_SKILL;
        if !wants_other {
            self.other_service.clear();
        }
        wants_other
    }

    /// Trims text fields and checks the local rules, first failure wins.
    pub fn validate(&self) -> Result<SubmissionPayload, LocalRejection> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(LocalRejection::new(FormField::Email, "Email is required"));
        }
        if !looks_like_email(email) {
            return Err(LocalRejection::new(
                FormField::Email,
                "Please enter a valid email address.",
            ));
        }
        if !self.agreed_to_terms {
            return Err(LocalRejection::new(
                FormField::AgreedToTerms,
                "You must agree to the Terms & Privacy Policy.",
            ));
        }

        let primary_skill = self.primary_skill.trim();
        let other_service = self.other_service.trim();
        if primary_skill == OTHER_SKILL && other_service.is_empty() {
            return Err(LocalRejection::new(
                FormField::OtherService,
                "Please specify your service when selecting \"Other\".",
            ));
        }

        let portfolio_link = self.portfolio_link.trim();

        Ok(SubmissionPayload {
            full_name: self.full_name.trim().to_string(),
            email: email.to_string(),
            phone_number: self.phone_number.trim().to_string(),
            primary_skill: primary_skill.to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            years_of_experience: self.years_of_experience.trim().to_string(),
            notify_early_access: self.notify_early_access,
            agreed_to_terms: self.agreed_to_terms,
            other_service: (primary_skill == OTHER_SKILL).then(|| other_service.to_string()),
            portfolio_link: (!portfolio_link.is_empty()).then(|| portfolio_link.to_string()),
        })
    }
}

/// `local@domain.tld`: no whitespace, a non-empty local part, and a dot
/// somewhere inside the domain.
pub fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot + 1 < domain.len(),
        None => false,
    }
}

/// A rule that failed before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LocalRejection {
    pub field: FormField,
    pub message: String,
}

impl LocalRejection {
    fn new(field: FormField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Body of `POST /api/waitlist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub primary_skill: String,
    pub city: String,
    pub state: String,
    pub years_of_experience: String,
    pub notify_early_access: bool,
    pub agreed_to_terms: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_link: Option<String>,
}
