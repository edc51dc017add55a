use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a payment option collects the campaign total.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOptionKind {
    /// One payment for the whole amount.
    Single,
    /// A fixed number of equal collections.
    Installment,
    /// Open-ended monthly collections managed by the gateway.
    Recurring,
}

impl PaymentOptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Installment => "installment",
            Self::Recurring => "recurring",
        }
    }

    /// Whether the derived amount is billed per installment rather than once.
    pub fn splits_installments(self) -> bool {
        matches!(self, Self::Installment | Self::Recurring)
    }
}

impl TryFrom<&str> for PaymentOptionKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "single" => Ok(Self::Single),
            "installment" => Ok(Self::Installment),
            "recurring" => Ok(Self::Recurring),
            other => Err(format!("unknown payment option kind: {other}")),
        }
    }
}

/// Reference entity describing one way to pay for a campaign.
///
/// Discount is applied before the fee, both as percentages of the amount
/// after the preceding step; the order is contractual, not incidental.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentOption {
    /// Unique identifier of the option.
    pub id: i32,
    /// Display name shown to the user.
    pub name: String,
    /// Display copy shown alongside the option.
    pub description: Option<String>,
    /// Collection style of the option.
    pub kind: PaymentOptionKind,
    /// Percentage discount applied to the amount.
    pub discount_percent: Decimal,
    /// Percentage fee applied after the discount.
    pub fee_percent: Decimal,
    /// Number of installments the amount divides across.
    pub min_installments: i32,
    /// Commitment windows this option covers (2 = extended/double term).
    pub term_multiplier: i32,
    /// Fixed fully-prepaid reduction, non-zero only on the longest term.
    pub prepaid_reduction_cents: i64,
    /// Whether the option is currently offered.
    pub is_active: bool,
    /// Timestamp for when the option record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the option record.
    pub updated_at: NaiveDateTime,
}
