use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::services::eligibility::{DeviceHints, EligibilityRequest};

/// Result type returned by the eligibility form helpers.
pub type EligibilityFormResult<T> = Result<T, EligibilityFormError>;

/// Errors that can occur while processing eligibility forms.
#[derive(Debug, Error)]
pub enum EligibilityFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// JSON payload for the promotional eligibility check.
///
/// Contact details are optional; without either the check is skipped and
/// the caller is told the state is not yet checkable.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EligibilityForm {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 7, max = 32))]
    pub phone: Option<String>,
    pub user_agent: Option<String>,
    pub locale: Option<String>,
    pub timezone_offset_minutes: Option<i32>,
    pub screen: Option<String>,
}

impl EligibilityForm {
    /// Validates and converts the payload into a guard request.
    pub fn into_request(self) -> EligibilityFormResult<EligibilityRequest> {
        self.validate()?;

        Ok(EligibilityRequest {
            email: self
                .email
                .map(|email| email.trim().to_lowercase())
                .filter(|email| !email.is_empty()),
            phone: self
                .phone
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
            hints: DeviceHints {
                user_agent: self.user_agent,
                locale: self.locale,
                timezone_offset_minutes: self.timezone_offset_minutes,
                screen: self.screen,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_the_contact_details() {
        let form = EligibilityForm {
            email: Some("User@Example.com".to_string()),
            phone: Some(" +44 1234 567890 ".to_string()),
            ..Default::default()
        };

        let request = form.into_request().expect("expected success");

        assert_eq!(request.email.as_deref(), Some("user@example.com"));
        assert_eq!(request.phone.as_deref(), Some("+44 1234 567890"));
        assert!(request.has_contact());
    }

    #[test]
    fn an_empty_form_has_no_contact() {
        let request = EligibilityForm::default()
            .into_request()
            .expect("expected success");

        assert!(!request.has_contact());
    }

    #[test]
    fn rejects_a_malformed_email() {
        let form = EligibilityForm {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };

        let result = form.into_request();

        assert!(matches!(result, Err(EligibilityFormError::Validation(_))));
    }
}
