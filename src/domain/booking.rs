use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::PricingBreakdown;
use crate::domain::selection::Selection;

/// Lifecycle states for a booking.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Quote saved but not yet paid for.
    Quoted,
    /// Payment confirmed; the campaign is live.
    Active,
    /// Cancelled by administrative override.
    Cancelled,
}

impl Default for BookingStatus {
    fn default() -> Self {
        Self::Quoted
    }
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quoted => "quoted",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for BookingStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "quoted" => Ok(Self::Quoted),
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// Payment-activation stage of a booking.
///
/// Only webhook-confirmed external events advance a booking to the
/// `MandateActive`, `PaymentConfirmed`, and failure stages.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStage {
    /// No mandate set up yet.
    Unpaid,
    /// Redirect flow completed and a mandate row exists.
    MandateCreated,
    /// The gateway confirmed the mandate.
    MandateActive,
    /// A payment or subscription has been submitted for collection.
    PaymentPending,
    /// Terminal success: a collection was confirmed.
    PaymentConfirmed,
    /// Terminal failure: a collection failed or was cancelled.
    PaymentFailed,
    /// Terminal failure: the mandate failed or was cancelled.
    MandateFailed,
}

impl Default for PaymentStage {
    fn default() -> Self {
        Self::Unpaid
    }
}

impl PaymentStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::MandateCreated => "mandate_created",
            Self::MandateActive => "mandate_active",
            Self::PaymentPending => "payment_pending",
            Self::PaymentConfirmed => "payment_confirmed",
            Self::PaymentFailed => "payment_failed",
            Self::MandateFailed => "mandate_failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::PaymentConfirmed | Self::PaymentFailed | Self::MandateFailed
        )
    }

    /// The single allowed-transitions table for the payment state machine.
    ///
    /// Anything not listed here is rejected (logged, not raised) by callers,
    /// and repository updates are conditioned on these sources so a delayed
    /// event can never regress a later state.
    pub fn allowed_sources(target: PaymentStage) -> &'static [PaymentStage] {
        match target {
            Self::Unpaid => &[],
            Self::MandateCreated => &[Self::Unpaid],
            Self::MandateActive => &[Self::MandateCreated],
            Self::PaymentPending => &[Self::MandateCreated, Self::MandateActive],
            Self::PaymentConfirmed => &[Self::PaymentPending],
            Self::PaymentFailed | Self::MandateFailed => &[
                Self::Unpaid,
                Self::MandateCreated,
                Self::MandateActive,
                Self::PaymentPending,
            ],
        }
    }

    pub fn can_advance_to(self, target: PaymentStage) -> bool {
        Self::allowed_sources(target).contains(&self)
    }
}

impl TryFrom<&str> for PaymentStage {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unpaid" => Ok(Self::Unpaid),
            "mandate_created" => Ok(Self::MandateCreated),
            "mandate_active" => Ok(Self::MandateActive),
            "payment_pending" => Ok(Self::PaymentPending),
            "payment_confirmed" => Ok(Self::PaymentConfirmed),
            "payment_failed" => Ok(Self::PaymentFailed),
            "mandate_failed" => Ok(Self::MandateFailed),
            other => Err(format!("unknown payment stage: {other}")),
        }
    }
}

/// Persistent aggregate created at quote-save time.
///
/// The selection and breakdown snapshots are authoritative even if the
/// catalog changes later; they are never recomputed after creation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Booking {
    /// Unique identifier of the booking.
    pub id: i32,
    /// Owning user identifier.
    pub user_id: i32,
    /// External human-friendly reference for the booking.
    pub reference: Option<String>,
    /// Current lifecycle status.
    pub status: BookingStatus,
    /// Current payment-activation stage.
    pub payment_status: PaymentStage,
    /// Snapshot of the selections the quote was computed from.
    pub selection: Selection,
    /// Snapshot of the breakdown at quote time.
    pub breakdown: PricingBreakdown,
    /// Chosen payment option.
    pub payment_option_id: i32,
    /// One-off design fee in the smallest currency unit.
    pub design_fee_cents: i64,
    /// Derived amount billed per collection.
    pub charge_amount_cents: i64,
    /// ISO 4217 currency code for all amounts.
    pub currency: String,
    /// Redirect-flow identifier while authorization is in flight.
    pub redirect_flow_id: Option<String>,
    /// Gateway subscription identifier for recurring plans.
    pub gateway_subscription_id: Option<String>,
    /// Mandate backing the booking, once one exists.
    pub mandate_id: Option<i32>,
    /// Invoice emitted for the confirmed collection.
    pub invoice_id: Option<i32>,
    /// Timestamp for when the booking record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the booking record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Owning user identifier.
    pub user_id: i32,
    /// External human-friendly reference for the booking.
    pub reference: Option<String>,
    /// Snapshot of the selections the quote was computed from.
    pub selection: Selection,
    /// Snapshot of the breakdown at quote time.
    pub breakdown: PricingBreakdown,
    /// Chosen payment option.
    pub payment_option_id: i32,
    /// One-off design fee in the smallest currency unit.
    pub design_fee_cents: i64,
    /// Derived amount billed per collection.
    pub charge_amount_cents: i64,
    /// ISO 4217 currency code for all amounts.
    pub currency: String,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewBooking {
    pub fn new(
        user_id: i32,
        selection: Selection,
        breakdown: PricingBreakdown,
        charge_amount_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        let now = chrono::Local::now().naive_utc();
        let payment_option_id = selection.payment_option_id;
        Self {
            user_id,
            reference: None,
            selection,
            breakdown,
            payment_option_id,
            design_fee_cents: 0,
            charge_amount_cents,
            currency: currency.into(),
            updated_at: now,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_design_fee(mut self, design_fee_cents: i64) -> Self {
        self.design_fee_cents = design_fee_cents;
        self
    }
}

/// Patch data applied when updating an existing booking.
#[derive(Debug, Clone, Default)]
pub struct UpdateBooking {
    /// Optional lifecycle status update.
    pub status: Option<BookingStatus>,
    /// Optional gateway subscription reference update.
    pub gateway_subscription_id: Option<Option<String>>,
    /// Optional mandate reference update.
    pub mandate_id: Option<Option<i32>>,
    /// Optional invoice reference update.
    pub invoice_id: Option<Option<i32>>,
}

impl UpdateBooking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn gateway_subscription_id(mut self, id: Option<impl Into<String>>) -> Self {
        self.gateway_subscription_id = Some(id.map(|value| value.into()));
        self
    }

    pub fn mandate_id(mut self, mandate_id: Option<i32>) -> Self {
        self.mandate_id = Some(mandate_id);
        self
    }

    pub fn invoice_id(mut self, invoice_id: Option<i32>) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }
}
