use thiserror::Error;

use crate::db::{DbConnection, DbPool};
use crate::domain::booking::{Booking, NewBooking, PaymentStage, UpdateBooking};
use crate::domain::catalog::Catalog;
use crate::domain::invoice::{Invoice, NewInvoice};
use crate::domain::mandate::{
    GatewayCustomer, Mandate, MandateStatus, NewGatewayCustomer, NewMandate,
};
use crate::domain::payment::{NewPayment, Payment, PaymentStatus};
use crate::domain::payment_option::PaymentOption;

pub mod booking;
pub mod catalog;
pub mod mandate;
pub mod payment;

#[cfg(test)]
pub mod mock;

/// Result alias used by every repository operation.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,
    /// A uniqueness constraint rejected the write.
    #[error("record already exists")]
    Conflict,
    /// A stored value could not be converted to its domain type.
    #[error("invalid stored value: {0}")]
    Conversion(String),
    #[error(transparent)]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error(transparent)]
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => Self::Conflict,
            other => Self::Database(other),
        }
    }
}

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read access to the pricing reference data.
pub trait CatalogReader {
    /// Load every active catalog row into one in-memory snapshot.
    fn load_catalog(&self) -> RepositoryResult<Catalog>;
}

/// Read access to payment option records.
pub trait PaymentOptionReader {
    fn get_payment_option_by_id(&self, id: i32) -> RepositoryResult<Option<PaymentOption>>;
    fn list_payment_options(&self) -> RepositoryResult<Vec<PaymentOption>>;
}

/// Read-only operations over booking records.
pub trait BookingReader {
    /// Fetch a booking scoped to its owning user.
    fn get_booking_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<Booking>>;
    /// Fetch a booking without an ownership scope (webhook path).
    fn get_booking(&self, id: i32) -> RepositoryResult<Option<Booking>>;
    fn list_bookings(&self, user_id: i32) -> RepositoryResult<Vec<Booking>>;
}

/// Write operations over booking records.
pub trait BookingWriter {
    fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking>;
    fn update_booking(&self, booking_id: i32, updates: &UpdateBooking) -> RepositoryResult<Booking>;
    /// Persist a redirect-flow id single-flight: succeeds only while the
    /// booking is unpaid with no flow already claimed.
    fn claim_redirect_flow(&self, booking_id: i32, flow_id: &str) -> RepositoryResult<bool>;
    /// Conditionally advance `payment_status`, filtered on the allowed
    /// source stages for `target`. Returns `false` when no row matched.
    fn advance_payment_stage(&self, booking_id: i32, target: PaymentStage)
    -> RepositoryResult<bool>;
}

/// Read access to the per-user gateway customer record.
pub trait GatewayCustomerReader {
    fn get_gateway_customer_by_user(&self, user_id: i32)
    -> RepositoryResult<Option<GatewayCustomer>>;
}

/// Write access to the per-user gateway customer record.
pub trait GatewayCustomerWriter {
    /// Insert the customer record; `Conflict` when the user already has one.
    fn create_gateway_customer(
        &self,
        new_customer: &NewGatewayCustomer,
    ) -> RepositoryResult<GatewayCustomer>;
}

/// Read-only operations over mandate records.
pub trait MandateReader {
    fn get_mandate_by_id(&self, id: i32) -> RepositoryResult<Option<Mandate>>;
    fn get_mandate_by_gateway_id(
        &self,
        gateway_mandate_id: &str,
    ) -> RepositoryResult<Option<Mandate>>;
    fn get_mandate_for_booking(&self, booking_id: i32) -> RepositoryResult<Option<Mandate>>;
}

/// Write operations over mandate records.
pub trait MandateWriter {
    fn create_mandate(&self, new_mandate: &NewMandate) -> RepositoryResult<Mandate>;
    /// Conditionally move a mandate from one of `from` to `to`. Returns
    /// `false` when the mandate was not in a matching status.
    fn set_mandate_status(
        &self,
        mandate_id: i32,
        from: &[MandateStatus],
        to: MandateStatus,
    ) -> RepositoryResult<bool>;
}

/// Read-only operations over payment records.
pub trait PaymentReader {
    fn get_payment_by_gateway_id(
        &self,
        gateway_payment_id: &str,
    ) -> RepositoryResult<Option<Payment>>;
    fn list_payments_for_booking(&self, booking_id: i32) -> RepositoryResult<Vec<Payment>>;
}

/// Write operations over payment records.
pub trait PaymentWriter {
    fn create_payment(&self, new_payment: &NewPayment) -> RepositoryResult<Payment>;
    /// Conditionally move a payment from one of `from` to `to`. Returns
    /// `false` when the payment was not in a matching status.
    fn set_payment_status(
        &self,
        payment_id: i32,
        from: &[PaymentStatus],
        to: PaymentStatus,
    ) -> RepositoryResult<bool>;
}

/// Read access to invoice records.
pub trait InvoiceReader {
    fn get_invoice_by_payment_id(&self, payment_id: i32) -> RepositoryResult<Option<Invoice>>;
}

/// Write access to invoice records.
pub trait InvoiceWriter {
    /// Insert the invoice; `Conflict` when the payment is already invoiced.
    fn create_invoice(&self, new_invoice: &NewInvoice) -> RepositoryResult<Invoice>;
}

/// Append-only ledger of applied external webhook event ids.
pub trait WebhookEventLedger {
    fn is_webhook_event_applied(&self, event_id: &str) -> RepositoryResult<bool>;
    /// Record an applied event id. Returns `false` when another worker
    /// already recorded it.
    fn record_webhook_event(
        &self,
        event_id: &str,
        resource_type: &str,
        action: &str,
    ) -> RepositoryResult<bool>;
}
