use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One billed area in a breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaidAreaLine {
    /// Area identifier the line prices.
    pub area_id: i32,
    /// Area name at the time the quote was computed.
    pub name: String,
    /// Households reached in this area.
    pub reach: i64,
    /// Price for this area in the smallest currency unit.
    pub price_cents: i64,
}

/// One free area granted under the repeat model.
///
/// Itemized so the quote stays auditable; priced at zero, counted in reach
/// but not in billed circulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreeAreaLine {
    /// Area identifier the line covers.
    pub area_id: i32,
    /// Area name at the time the quote was computed.
    pub name: String,
    /// Households reached in this area.
    pub reach: i64,
    /// Months the area stays free (the initial commitment window).
    pub free_months: i32,
}

/// Itemized monetary breakdown for one selection.
///
/// Immutable once computed; recomputed from scratch whenever the selection
/// changes. Invariant:
/// `total_cents == round((subtotal - volume_discount) * duration_multiplier)`
/// and `total_cents >= 0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingBreakdown {
    /// Per-area prices for the paid subset.
    pub paid_lines: Vec<PaidAreaLine>,
    /// Free areas granted by the promotional model, when any.
    pub free_lines: Vec<FreeAreaLine>,
    /// Sum of the paid lines before discounts.
    pub subtotal_cents: i64,
    /// Volume discount percentage applied, zero when no tier matched.
    pub volume_discount_percent: Decimal,
    /// Volume discount amount in the smallest currency unit.
    pub volume_discount_cents: i64,
    /// Commitment discount factor from the chosen duration.
    pub duration_multiplier: Decimal,
    /// Final campaign total in the smallest currency unit.
    pub total_cents: i64,
    /// Households reached across paid and free areas.
    pub total_reach: i64,
    /// Circulation actually billed: paid areas only.
    pub billed_circulation: i64,
}
