use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::forms::sanitize_plain_text;
use crate::gateway::CustomerDetails;

/// Result type returned by the payment form helpers.
pub type PaymentFormResult<T> = Result<T, PaymentFormError>;

/// Errors that can occur while processing payment forms.
#[derive(Debug, Error)]
pub enum PaymentFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A required field is empty after sanitization.
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },
}

/// JSON payload starting payment setup for a booking.
#[derive(Debug, Deserialize, Validate)]
pub struct SetupPaymentForm {
    #[validate(length(min = 1, max = 128))]
    pub given_name: String,
    #[validate(length(min = 1, max = 128))]
    pub family_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 256))]
    pub address_line1: String,
    pub address_line2: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub city: String,
    #[validate(length(min = 1, max = 16))]
    pub postal_code: String,
    /// ISO 3166-1 alpha-2; defaults to the home market.
    #[serde(default = "default_country_code")]
    #[validate(length(equal = 2))]
    pub country_code: String,
}

fn default_country_code() -> String {
    "GB".to_string()
}

impl SetupPaymentForm {
    /// Validates and sanitizes the payload into gateway customer details.
    pub fn into_customer_details(self) -> PaymentFormResult<CustomerDetails> {
        self.validate()?;

        let given_name = required(&self.given_name, "given name")?;
        let family_name = required(&self.family_name, "family name")?;
        let address_line1 = required(&self.address_line1, "address line")?;
        let city = required(&self.city, "city")?;
        let postal_code = required(&self.postal_code, "postal code")?;

        Ok(CustomerDetails {
            given_name,
            family_name,
            email: self.email.trim().to_lowercase(),
            address_line1,
            address_line2: self
                .address_line2
                .as_deref()
                .map(sanitize_plain_text)
                .filter(|value| !value.is_empty()),
            city,
            postal_code,
            country_code: self.country_code.to_uppercase(),
        })
    }
}

fn required(value: &str, field: &'static str) -> PaymentFormResult<String> {
    let sanitized = sanitize_plain_text(value);
    if sanitized.is_empty() {
        return Err(PaymentFormError::EmptyField { field });
    }
    Ok(sanitized)
}

/// Query parameters on the redirect-return URL.
#[derive(Debug, Deserialize)]
pub struct CompleteRedirectQuery {
    /// Flow identifier handed back by the gateway.
    pub redirect_flow_id: String,
}
