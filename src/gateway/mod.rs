use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod rest;
pub mod webhook;

/// Result alias used by every gateway call.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by the direct-debit gateway client.
///
/// All variants are retryable from the caller's point of view: the booking
/// is left in its last good state and the user may try again.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure, including bounded-timeout expiry.
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The gateway answered with a non-success status.
    #[error("gateway rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    /// The gateway answered 2xx but the body was not understood.
    #[error("gateway response malformed: {0}")]
    Malformed(String),
}

/// Contact and address details needed to create a gateway customer.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetails {
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country_code: String,
}

/// Gateway-side customer reference.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayCustomerRef {
    pub id: String,
}

/// Request to start a redirect-based authorization flow.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRedirectFlow {
    pub customer_id: String,
    /// Opaque token binding the browser session to the flow.
    pub session_token: String,
    /// Where the gateway sends the user after authorization.
    pub success_redirect_url: String,
    pub description: String,
}

/// A started redirect flow: the user must visit `redirect_url`.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectFlow {
    pub id: String,
    pub redirect_url: String,
}

/// Result of exchanging a completed redirect flow.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletedRedirectFlow {
    pub mandate_id: String,
    pub customer_id: String,
}

/// Request for a one-off collection against a mandate.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGatewayPayment {
    pub mandate_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub charge_date: Option<NaiveDate>,
    pub description: String,
}

/// Gateway-side payment reference.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPaymentRef {
    pub id: String,
    pub charge_date: Option<NaiveDate>,
}

/// Request for a recurring collection schedule against a mandate.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGatewaySubscription {
    pub mandate_id: String,
    /// Amount collected per interval, in the smallest currency unit.
    pub amount_cents: i64,
    pub currency: String,
    /// Number of collections, `None` for open-ended schedules.
    pub count: Option<i32>,
    pub description: String,
}

/// Gateway-side subscription reference.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySubscriptionRef {
    pub id: String,
}

/// External direct-debit collaborator.
///
/// Implementations must not hold locks across calls and must bound every
/// request with a timeout; a timeout is a recoverable failure.
#[async_trait]
pub trait DirectDebitGateway: Send + Sync {
    async fn create_customer(&self, details: &CustomerDetails) -> GatewayResult<GatewayCustomerRef>;
    async fn create_redirect_flow(&self, request: &CreateRedirectFlow)
    -> GatewayResult<RedirectFlow>;
    async fn complete_redirect_flow(
        &self,
        flow_id: &str,
        session_token: &str,
    ) -> GatewayResult<CompletedRedirectFlow>;
    async fn create_payment(
        &self,
        request: &CreateGatewayPayment,
    ) -> GatewayResult<GatewayPaymentRef>;
    async fn create_subscription(
        &self,
        request: &CreateGatewaySubscription,
    ) -> GatewayResult<GatewaySubscriptionRef>;
}

#[cfg(test)]
mockall::mock! {
    pub Gateway {}

    #[async_trait]
    impl DirectDebitGateway for Gateway {
        async fn create_customer(&self, details: &CustomerDetails) -> GatewayResult<GatewayCustomerRef>;
        async fn create_redirect_flow(&self, request: &CreateRedirectFlow) -> GatewayResult<RedirectFlow>;
        async fn complete_redirect_flow(&self, flow_id: &str, session_token: &str) -> GatewayResult<CompletedRedirectFlow>;
        async fn create_payment(&self, request: &CreateGatewayPayment) -> GatewayResult<GatewayPaymentRef>;
        async fn create_subscription(&self, request: &CreateGatewaySubscription) -> GatewayResult<GatewaySubscriptionRef>;
    }
}
