use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::catalog::PricingModel;
use crate::domain::selection::Selection;
use crate::forms::sanitize_plain_text;

/// Maximum length allowed for a booking reference.
const REFERENCE_MAX_LEN: u64 = 128;

/// Result type returned by the quote form helpers.
pub type QuoteFormResult<T> = Result<T, QuoteFormError>;

/// Errors that can occur while processing quote forms.
#[derive(Debug, Error)]
pub enum QuoteFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The free subset only exists under the promotional model.
    #[error("free areas require the repeat pricing model")]
    FreeAreasOutsidePromo,
    /// The design fee cannot be negative.
    #[error("design fee cannot be negative")]
    NegativeDesignFee,
}

/// JSON payload pricing or saving one quote.
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteForm {
    /// Pricing model the quote runs under.
    pub pricing_model: PricingModel,
    /// Billed areas; the paid subset under the repeat model.
    #[validate(length(min = 1))]
    pub area_ids: Vec<i32>,
    /// Free subset under the repeat model.
    #[serde(default)]
    pub free_area_ids: Vec<i32>,
    /// Chosen ad or leaflet size.
    pub size_id: i32,
    /// Chosen duration or subscription tier.
    pub duration_id: i32,
    /// Chosen payment option.
    pub payment_option_id: i32,
    /// One-off design fee in the smallest currency unit.
    #[serde(default)]
    pub design_fee_cents: i64,
    /// Optional human-friendly reference stored on the booking.
    #[validate(length(max = REFERENCE_MAX_LEN))]
    pub reference: Option<String>,
}

impl QuoteForm {
    /// Validates and converts the payload into a domain selection plus the
    /// design fee and sanitized reference.
    pub fn into_selection(self) -> QuoteFormResult<(Selection, i64, Option<String>)> {
        self.validate()?;

        if self.pricing_model != PricingModel::Repeat && !self.free_area_ids.is_empty() {
            return Err(QuoteFormError::FreeAreasOutsidePromo);
        }

        if self.design_fee_cents < 0 {
            return Err(QuoteFormError::NegativeDesignFee);
        }

        let reference = self
            .reference
            .as_deref()
            .map(sanitize_plain_text)
            .filter(|value| !value.is_empty());

        let selection = Selection::new(self.pricing_model, self.size_id, self.duration_id)
            .with_areas(self.area_ids)
            .with_free_areas(self.free_area_ids)
            .with_payment_option(self.payment_option_id);

        Ok((selection, self.design_fee_cents, reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(model: PricingModel) -> QuoteForm {
        QuoteForm {
            pricing_model: model,
            area_ids: vec![1, 2],
            free_area_ids: Vec::new(),
            size_id: 1,
            duration_id: 1,
            payment_option_id: 7,
            design_fee_cents: 5_000,
            reference: Some("  Spring   push ".to_string()),
        }
    }

    #[test]
    fn converts_and_sanitizes() {
        let (selection, design_fee, reference) = form(PricingModel::Fixed)
            .into_selection()
            .expect("expected success");

        assert_eq!(selection.area_ids, vec![1, 2]);
        assert_eq!(design_fee, 5_000);
        assert_eq!(reference.as_deref(), Some("Spring push"));
    }

    #[test]
    fn rejects_free_areas_outside_the_promo_model() {
        let mut payload = form(PricingModel::Fixed);
        payload.free_area_ids = vec![9];

        let result = payload.into_selection();

        assert!(matches!(result, Err(QuoteFormError::FreeAreasOutsidePromo)));
    }

    #[test]
    fn allows_free_areas_under_the_promo_model() {
        let mut payload = form(PricingModel::Repeat);
        payload.free_area_ids = vec![9];

        let (selection, _, _) = payload.into_selection().expect("expected success");

        assert_eq!(selection.free_area_ids, vec![9]);
    }

    #[test]
    fn rejects_an_empty_area_list() {
        let mut payload = form(PricingModel::Fixed);
        payload.area_ids.clear();

        let result = payload.into_selection();

        assert!(matches!(result, Err(QuoteFormError::Validation(_))));
    }

    #[test]
    fn rejects_a_negative_design_fee() {
        let mut payload = form(PricingModel::Fixed);
        payload.design_fee_cents = -1;

        let result = payload.into_selection();

        assert!(matches!(result, Err(QuoteFormError::NegativeDesignFee)));
    }
}
