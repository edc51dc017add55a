use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// States of an issued invoice.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Issued and outstanding in the ledger.
    Issued,
    /// Voided by administrative override.
    Voided,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::Voided => "voided",
        }
    }
}

impl TryFrom<&str> for InvoiceStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "issued" => Ok(Self::Issued),
            "voided" => Ok(Self::Voided),
            other => Err(format!("unknown invoice status: {other}")),
        }
    }
}

/// Invoice derived from one confirmed payment.
///
/// Exactly one invoice exists per payment; creation is idempotent on the
/// payment identifier.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Invoice {
    /// Unique identifier of the invoice.
    pub id: i32,
    /// Booking the invoice bills.
    pub booking_id: i32,
    /// Confirmed payment the invoice was derived from; unique.
    pub payment_id: i32,
    /// Human-friendly invoice number.
    pub number: String,
    /// Amount in the smallest currency unit.
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Current invoice status.
    pub status: InvoiceStatus,
    /// Timestamp for when the invoice record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the invoice record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    /// Booking the invoice bills.
    pub booking_id: i32,
    /// Confirmed payment the invoice was derived from.
    pub payment_id: i32,
    /// Human-friendly invoice number.
    pub number: String,
    /// Amount in the smallest currency unit.
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewInvoice {
    pub fn new(
        booking_id: i32,
        payment_id: i32,
        amount_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            booking_id,
            payment_id,
            number: format!("ADL-{booking_id:05}-{payment_id:05}"),
            amount_cents,
            currency: currency.into(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}
