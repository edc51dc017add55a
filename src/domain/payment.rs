use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// States of one collection attempt.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Created locally, not yet submitted to the banks.
    PendingSubmission,
    /// Submitted for collection.
    Submitted,
    /// Terminal success: funds confirmed.
    Confirmed,
    /// Terminal: the collection failed.
    Failed,
    /// Terminal: the collection was cancelled.
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingSubmission => "pending_submission",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed | Self::Cancelled)
    }

    /// Statuses a payment may be confirmed or failed from.
    pub fn in_flight() -> &'static [PaymentStatus] {
        &[Self::PendingSubmission, Self::Submitted]
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending_submission" => Ok(Self::PendingSubmission),
            "submitted" => Ok(Self::Submitted),
            "confirmed" => Ok(Self::Confirmed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// One collection attempt against a mandate.
///
/// For recurring plans additional payments are created by the gateway's own
/// schedule and first appear here when their webhook event arrives.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Payment {
    /// Unique identifier of the payment.
    pub id: i32,
    /// Mandate the payment collects against.
    pub mandate_id: i32,
    /// Booking the payment pays for.
    pub booking_id: i32,
    /// Gateway-side payment identifier.
    pub gateway_payment_id: String,
    /// Amount in the smallest currency unit.
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Date the collection is scheduled for, when known.
    pub charge_date: Option<NaiveDate>,
    /// Current payment status.
    pub status: PaymentStatus,
    /// Timestamp for when the payment record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the payment record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new payment.
///
/// Only inserted after the gateway call succeeded, so a gateway identifier
/// is always present.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Mandate the payment collects against.
    pub mandate_id: i32,
    /// Booking the payment pays for.
    pub booking_id: i32,
    /// Gateway-side payment identifier.
    pub gateway_payment_id: String,
    /// Amount in the smallest currency unit.
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Date the collection is scheduled for, when known.
    pub charge_date: Option<NaiveDate>,
    /// Initial status, normally `PendingSubmission`.
    pub status: PaymentStatus,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewPayment {
    pub fn new(
        mandate_id: i32,
        booking_id: i32,
        gateway_payment_id: impl Into<String>,
        amount_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            mandate_id,
            booking_id,
            gateway_payment_id: gateway_payment_id.into(),
            amount_cents,
            currency: currency.into(),
            charge_date: None,
            status: PaymentStatus::PendingSubmission,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn with_charge_date(mut self, charge_date: NaiveDate) -> Self {
        self.charge_date = Some(charge_date);
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }
}
