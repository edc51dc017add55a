use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// States of a direct-debit mandate.
///
/// Transitions past `PendingSubmission` happen only via confirmed gateway
/// events.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MandateStatus {
    /// Created locally, not yet submitted to the banks.
    PendingSubmission,
    /// Awaiting customer approval at the bank.
    PendingCustomerApproval,
    /// Confirmed usable for collections.
    Active,
    /// Terminal: the mandate was rejected.
    Failed,
    /// Terminal: the mandate was cancelled.
    Cancelled,
}

impl MandateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingSubmission => "pending_submission",
            Self::PendingCustomerApproval => "pending_customer_approval",
            Self::Active => "active",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }

    /// Statuses a mandate may move to `Active` or a failure status from.
    pub fn in_flight() -> &'static [MandateStatus] {
        &[Self::PendingSubmission, Self::PendingCustomerApproval]
    }
}

impl TryFrom<&str> for MandateStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending_submission" => Ok(Self::PendingSubmission),
            "pending_customer_approval" => Ok(Self::PendingCustomerApproval),
            "active" => Ok(Self::Active),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown mandate status: {other}")),
        }
    }
}

/// Standing authorization to collect payments for one booking.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Mandate {
    /// Unique identifier of the mandate.
    pub id: i32,
    /// Booking the mandate collects for.
    pub booking_id: i32,
    /// Owning user identifier.
    pub user_id: i32,
    /// Gateway customer the mandate belongs to.
    pub gateway_customer_id: String,
    /// Gateway-side mandate identifier.
    pub gateway_mandate_id: String,
    /// Current mandate status.
    pub status: MandateStatus,
    /// Timestamp for when the mandate record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the mandate record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new mandate after redirect completion.
#[derive(Debug, Clone)]
pub struct NewMandate {
    /// Booking the mandate collects for.
    pub booking_id: i32,
    /// Owning user identifier.
    pub user_id: i32,
    /// Gateway customer the mandate belongs to.
    pub gateway_customer_id: String,
    /// Gateway-side mandate identifier.
    pub gateway_mandate_id: String,
    /// Initial status, normally `PendingSubmission`.
    pub status: MandateStatus,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewMandate {
    pub fn new(
        booking_id: i32,
        user_id: i32,
        gateway_customer_id: impl Into<String>,
        gateway_mandate_id: impl Into<String>,
    ) -> Self {
        Self {
            booking_id,
            user_id,
            gateway_customer_id: gateway_customer_id.into(),
            gateway_mandate_id: gateway_mandate_id.into(),
            status: MandateStatus::PendingSubmission,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}

/// Gateway customer record reused across a user's bookings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayCustomer {
    /// Unique identifier of the record.
    pub id: i32,
    /// Owning user identifier; unique per user.
    pub user_id: i32,
    /// Gateway-side customer identifier.
    pub gateway_customer_id: String,
    /// Timestamp for when the record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new gateway customer.
#[derive(Debug, Clone)]
pub struct NewGatewayCustomer {
    /// Owning user identifier.
    pub user_id: i32,
    /// Gateway-side customer identifier.
    pub gateway_customer_id: String,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewGatewayCustomer {
    pub fn new(user_id: i32, gateway_customer_id: impl Into<String>) -> Self {
        Self {
            user_id,
            gateway_customer_id: gateway_customer_id.into(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}
