use serde::{Deserialize, Serialize};

use crate::domain::catalog::PricingModel;

/// Everything a user has picked in one quote session.
///
/// Ephemeral: rebuilt per request and snapshotted onto the booking as JSON at
/// quote-save time. For the repeat model `area_ids` is the paid subset and
/// `free_area_ids` the free one; other models leave `free_area_ids` empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    /// Pricing model the quote is computed under.
    pub pricing_model: PricingModel,
    /// Areas billed for the campaign.
    pub area_ids: Vec<i32>,
    /// Areas granted free under the repeat model.
    #[serde(default)]
    pub free_area_ids: Vec<i32>,
    /// Chosen ad or leaflet size.
    pub size_id: i32,
    /// Chosen duration or subscription tier.
    pub duration_id: i32,
    /// Chosen payment option.
    pub payment_option_id: i32,
}

impl Selection {
    pub fn new(pricing_model: PricingModel, size_id: i32, duration_id: i32) -> Self {
        Self {
            pricing_model,
            area_ids: Vec::new(),
            free_area_ids: Vec::new(),
            size_id,
            duration_id,
            payment_option_id: 0,
        }
    }

    pub fn with_areas(mut self, area_ids: Vec<i32>) -> Self {
        self.area_ids = area_ids;
        self
    }

    pub fn with_free_areas(mut self, free_area_ids: Vec<i32>) -> Self {
        self.free_area_ids = free_area_ids;
        self
    }

    pub fn with_payment_option(mut self, payment_option_id: i32) -> Self {
        self.payment_option_id = payment_option_id;
        self
    }
}
