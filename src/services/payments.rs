use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::domain::booking::{Booking, PaymentStage, UpdateBooking};
use crate::domain::mandate::{NewGatewayCustomer, NewMandate};
use crate::domain::payment::NewPayment;
use crate::domain::payment_option::PaymentOptionKind;
use crate::gateway::{
    CreateGatewayPayment, CreateGatewaySubscription, CreateRedirectFlow, CustomerDetails,
    DirectDebitGateway,
};
use crate::repository::{
    BookingReader, BookingWriter, GatewayCustomerReader, GatewayCustomerWriter, MandateReader,
    MandateWriter, PaymentOptionReader, PaymentReader, PaymentWriter, RepositoryError,
};
use crate::services::{ServiceError, ServiceResult};

/// Where to send the user to authorize the mandate.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSetup {
    pub flow_id: String,
    pub redirect_url: String,
}

/// Opaque token binding a booking's browser session to its redirect flow.
fn session_token(booking_id: i32) -> String {
    format!("booking-{booking_id}")
}

/// Step 1: create or reuse the gateway customer and start the redirect flow.
///
/// Single-flight per booking: the flow id is claimed with a conditional
/// update that only succeeds while the booking is unpaid with no flow.
pub async fn start_payment_setup<R, G>(
    repo: &R,
    gateway: &G,
    user: &AuthenticatedUser,
    booking_id: i32,
    details: CustomerDetails,
    return_base_url: &str,
) -> ServiceResult<PaymentSetup>
where
    R: BookingReader + BookingWriter + GatewayCustomerReader + GatewayCustomerWriter + ?Sized,
    G: DirectDebitGateway + ?Sized,
{
    let booking = repo
        .get_booking_by_id(booking_id, user.id)?
        .ok_or(ServiceError::NotFound)?;

    if booking.payment_status != PaymentStage::Unpaid {
        return Err(ServiceError::Conflict(
            "payment setup is already in progress for this booking".to_string(),
        ));
    }

    let customer_id = resolve_gateway_customer(repo, gateway, user, &details).await?;

    let flow = gateway
        .create_redirect_flow(&CreateRedirectFlow {
            customer_id,
            session_token: session_token(booking.id),
            success_redirect_url: format!(
                "{return_base_url}/bookings/{}/payment/complete",
                booking.id
            ),
            description: format!("Campaign booking {}", booking.id),
        })
        .await?;

    if !repo.claim_redirect_flow(booking.id, &flow.id)? {
        // Lost the race to a concurrent setup attempt; the orphaned external
        // flow simply expires.
        return Err(ServiceError::Conflict(
            "another payment setup attempt claimed this booking".to_string(),
        ));
    }

    Ok(PaymentSetup {
        flow_id: flow.id,
        redirect_url: flow.redirect_url,
    })
}

/// One gateway customer per user, reused across bookings. The unique
/// constraint on the user id arbitrates concurrent creation.
async fn resolve_gateway_customer<R, G>(
    repo: &R,
    gateway: &G,
    user: &AuthenticatedUser,
    details: &CustomerDetails,
) -> ServiceResult<String>
where
    R: GatewayCustomerReader + GatewayCustomerWriter + ?Sized,
    G: DirectDebitGateway + ?Sized,
{
    if let Some(existing) = repo.get_gateway_customer_by_user(user.id)? {
        return Ok(existing.gateway_customer_id);
    }

    let created = gateway.create_customer(details).await?;

    match repo.create_gateway_customer(&NewGatewayCustomer::new(user.id, created.id.clone())) {
        Ok(customer) => Ok(customer.gateway_customer_id),
        Err(RepositoryError::Conflict) => {
            let winner = repo
                .get_gateway_customer_by_user(user.id)?
                .ok_or(ServiceError::NotFound)?;
            log::info!(
                "gateway customer for user {} created concurrently, reusing {}",
                user.id,
                winner.gateway_customer_id
            );
            Ok(winner.gateway_customer_id)
        }
        Err(err) => Err(err.into()),
    }
}

/// Step 2: exchange the completed redirect flow for a mandate, then attempt
/// collection creation best-effort.
///
/// Safe to re-run from a browser refresh: once the booking has left
/// `Unpaid` the current state is returned unchanged.
pub async fn complete_redirect<R, G>(
    repo: &R,
    gateway: &G,
    user: &AuthenticatedUser,
    booking_id: i32,
    flow_id: &str,
) -> ServiceResult<Booking>
where
    R: BookingReader
        + BookingWriter
        + MandateReader
        + MandateWriter
        + PaymentReader
        + PaymentWriter
        + PaymentOptionReader
        + ?Sized,
    G: DirectDebitGateway + ?Sized,
{
    let booking = repo
        .get_booking_by_id(booking_id, user.id)?
        .ok_or(ServiceError::NotFound)?;

    if booking.redirect_flow_id.as_deref() != Some(flow_id) {
        return Err(ServiceError::Form(
            "redirect flow does not belong to this booking".to_string(),
        ));
    }

    if booking.payment_status != PaymentStage::Unpaid {
        return Ok(booking);
    }

    let completed = gateway
        .complete_redirect_flow(flow_id, &session_token(booking.id))
        .await?;

    let mandate = match repo.create_mandate(&NewMandate::new(
        booking.id,
        user.id,
        completed.customer_id,
        completed.mandate_id.clone(),
    )) {
        Ok(mandate) => mandate,
        // A concurrent completion already persisted this mandate.
        Err(RepositoryError::Conflict) => repo
            .get_mandate_by_gateway_id(&completed.mandate_id)?
            .ok_or(ServiceError::NotFound)?,
        Err(err) => return Err(err.into()),
    };

    repo.update_booking(booking.id, &UpdateBooking::new().mandate_id(Some(mandate.id)))?;

    if !repo.advance_payment_stage(booking.id, PaymentStage::MandateCreated)? {
        log::warn!(
            "booking {} could not advance to mandate_created; leaving current stage",
            booking.id
        );
    }

    // Advisory only: a failure here leaves the booking recoverable through
    // the reconcile path, and the webhook stream remains authoritative.
    if let Err(err) = create_collection(repo, gateway, booking.id).await {
        log::warn!(
            "collection creation for booking {} deferred to reconciliation: {err}",
            booking.id
        );
    }

    repo.get_booking_by_id(booking.id, user.id)?
        .ok_or(ServiceError::NotFound)
}

/// Step 3: submit the one-off payment or the recurring schedule for the
/// amount snapshotted on the booking.
///
/// Idempotent: an existing payment row or subscription id makes this a
/// no-op, so redirect completion and reconciliation may both call it.
pub async fn create_collection<R, G>(repo: &R, gateway: &G, booking_id: i32) -> ServiceResult<()>
where
    R: BookingReader
        + BookingWriter
        + MandateReader
        + PaymentReader
        + PaymentWriter
        + PaymentOptionReader
        + ?Sized,
    G: DirectDebitGateway + ?Sized,
{
    let booking = repo
        .get_booking(booking_id)?
        .ok_or(ServiceError::NotFound)?;

    let mandate = repo
        .get_mandate_for_booking(booking.id)?
        .ok_or_else(|| ServiceError::Conflict("booking has no mandate yet".to_string()))?;

    if mandate.status.is_terminal() {
        return Err(ServiceError::Conflict(
            "mandate has failed; collections cannot be created".to_string(),
        ));
    }

    if booking.gateway_subscription_id.is_some()
        || !repo.list_payments_for_booking(booking.id)?.is_empty()
    {
        return Ok(());
    }

    let option = repo
        .get_payment_option_by_id(booking.payment_option_id)?
        .ok_or_else(|| {
            ServiceError::Configuration(format!(
                "payment option {} is missing or inactive",
                booking.payment_option_id
            ))
        })?;

    match option.kind {
        PaymentOptionKind::Single => {
            let created = gateway
                .create_payment(&CreateGatewayPayment {
                    mandate_id: mandate.gateway_mandate_id.clone(),
                    amount_cents: booking.charge_amount_cents,
                    currency: booking.currency.clone(),
                    charge_date: None,
                    description: format!("Campaign booking {}", booking.id),
                })
                .await?;

            let mut new_payment = NewPayment::new(
                mandate.id,
                booking.id,
                created.id,
                booking.charge_amount_cents,
                booking.currency.clone(),
            );
            if let Some(charge_date) = created.charge_date {
                new_payment = new_payment.with_charge_date(charge_date);
            }
            repo.create_payment(&new_payment)?;
        }
        PaymentOptionKind::Installment | PaymentOptionKind::Recurring => {
            let count = match option.kind {
                PaymentOptionKind::Installment => Some(option.min_installments),
                _ => None,
            };
            let subscription = gateway
                .create_subscription(&CreateGatewaySubscription {
                    mandate_id: mandate.gateway_mandate_id.clone(),
                    amount_cents: booking.charge_amount_cents,
                    currency: booking.currency.clone(),
                    count,
                    description: format!("Campaign booking {}", booking.id),
                })
                .await?;

            repo.update_booking(
                booking.id,
                &UpdateBooking::new().gateway_subscription_id(Some(subscription.id)),
            )?;
        }
    }

    if !repo.advance_payment_stage(booking.id, PaymentStage::PaymentPending)? {
        log::warn!(
            "booking {} could not advance to payment_pending; leaving current stage",
            booking.id
        );
    }

    Ok(())
}

/// Recovery path for bookings whose mandate exists but whose collection was
/// never created (redirect completed, payment-creation call failed).
///
/// Advisory and operator/scheduler driven; webhooks stay the only authority
/// for confirmations.
pub async fn reconcile_booking<R, G>(
    repo: &R,
    gateway: &G,
    user: &AuthenticatedUser,
    booking_id: i32,
) -> ServiceResult<Booking>
where
    R: BookingReader
        + BookingWriter
        + MandateReader
        + PaymentReader
        + PaymentWriter
        + PaymentOptionReader
        + ?Sized,
    G: DirectDebitGateway + ?Sized,
{
    let booking = repo
        .get_booking_by_id(booking_id, user.id)?
        .ok_or(ServiceError::NotFound)?;

    if !matches!(
        booking.payment_status,
        PaymentStage::MandateCreated | PaymentStage::MandateActive
    ) {
        return Err(ServiceError::Conflict(
            "booking has no pending collection to reconcile".to_string(),
        ));
    }

    create_collection(repo, gateway, booking.id).await?;

    repo.get_booking_by_id(booking.id, user.id)?
        .ok_or(ServiceError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::booking::{BookingStatus, PaymentStage};
    use crate::domain::catalog::PricingModel;
    use crate::domain::mandate::{GatewayCustomer, Mandate, MandateStatus};
    use crate::domain::payment_option::{PaymentOption, PaymentOptionKind};
    use crate::domain::pricing::PricingBreakdown;
    use crate::domain::selection::Selection;
    use crate::gateway::{GatewayCustomerRef, MockGateway, RedirectFlow};
    use crate::repository::RepositoryResult;
    use crate::repository::mock::{
        MockBookingReader, MockBookingWriter, MockGatewayCustomerReader,
        MockGatewayCustomerWriter, MockMandateReader, MockMandateWriter,
        MockPaymentOptionReader, MockPaymentReader, MockPaymentWriter,
    };
    use rust_decimal::Decimal;

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 11,
            email: "user@example.com".to_string(),
            name: "User".to_string(),
        }
    }

    fn breakdown() -> PricingBreakdown {
        PricingBreakdown {
            paid_lines: Vec::new(),
            free_lines: Vec::new(),
            subtotal_cents: 40_000,
            volume_discount_percent: Decimal::ZERO,
            volume_discount_cents: 0,
            duration_multiplier: Decimal::ONE,
            total_cents: 40_000,
            total_reach: 10_000,
            billed_circulation: 10_000,
        }
    }

    fn booking(id: i32, payment_status: PaymentStage) -> Booking {
        Booking {
            id,
            user_id: 11,
            reference: None,
            status: BookingStatus::Quoted,
            payment_status,
            selection: Selection::new(PricingModel::Fixed, 1, 1)
                .with_areas(vec![1])
                .with_payment_option(7),
            breakdown: breakdown(),
            payment_option_id: 7,
            design_fee_cents: 0,
            charge_amount_cents: 40_000,
            currency: "GBP".to_string(),
            redirect_flow_id: None,
            gateway_subscription_id: None,
            mandate_id: None,
            invoice_id: None,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn mandate(id: i32, booking_id: i32, status: MandateStatus) -> Mandate {
        Mandate {
            id,
            booking_id,
            user_id: 11,
            gateway_customer_id: "CU123".to_string(),
            gateway_mandate_id: "MD123".to_string(),
            status,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn single_option() -> PaymentOption {
        PaymentOption {
            id: 7,
            name: "Pay in full".to_string(),
            description: None,
            kind: PaymentOptionKind::Single,
            discount_percent: Decimal::ZERO,
            fee_percent: Decimal::ZERO,
            min_installments: 1,
            term_multiplier: 1,
            prepaid_reduction_cents: 0,
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    #[derive(Default)]
    struct FakeRepo {
        booking_reader: MockBookingReader,
        booking_writer: MockBookingWriter,
        customer_reader: MockGatewayCustomerReader,
        customer_writer: MockGatewayCustomerWriter,
        mandate_reader: MockMandateReader,
        mandate_writer: MockMandateWriter,
        payment_reader: MockPaymentReader,
        payment_writer: MockPaymentWriter,
        option_reader: MockPaymentOptionReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self::default()
        }
    }

    impl BookingReader for FakeRepo {
        fn get_booking_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<Booking>> {
            self.booking_reader.get_booking_by_id(id, user_id)
        }

        fn get_booking(&self, id: i32) -> RepositoryResult<Option<Booking>> {
            self.booking_reader.get_booking(id)
        }

        fn list_bookings(&self, user_id: i32) -> RepositoryResult<Vec<Booking>> {
            self.booking_reader.list_bookings(user_id)
        }
    }

    impl BookingWriter for FakeRepo {
        fn create_booking(
            &self,
            new_booking: &crate::domain::booking::NewBooking,
        ) -> RepositoryResult<Booking> {
            self.booking_writer.create_booking(new_booking)
        }

        fn update_booking(
            &self,
            booking_id: i32,
            updates: &UpdateBooking,
        ) -> RepositoryResult<Booking> {
            self.booking_writer.update_booking(booking_id, updates)
        }

        fn claim_redirect_flow(&self, booking_id: i32, flow_id: &str) -> RepositoryResult<bool> {
            self.booking_writer.claim_redirect_flow(booking_id, flow_id)
        }

        fn advance_payment_stage(
            &self,
            booking_id: i32,
            target: PaymentStage,
        ) -> RepositoryResult<bool> {
            self.booking_writer.advance_payment_stage(booking_id, target)
        }
    }

    impl GatewayCustomerReader for FakeRepo {
        fn get_gateway_customer_by_user(
            &self,
            user_id: i32,
        ) -> RepositoryResult<Option<GatewayCustomer>> {
            self.customer_reader.get_gateway_customer_by_user(user_id)
        }
    }

    impl GatewayCustomerWriter for FakeRepo {
        fn create_gateway_customer(
            &self,
            new_customer: &NewGatewayCustomer,
        ) -> RepositoryResult<GatewayCustomer> {
            self.customer_writer.create_gateway_customer(new_customer)
        }
    }

    impl MandateReader for FakeRepo {
        fn get_mandate_by_id(&self, id: i32) -> RepositoryResult<Option<Mandate>> {
            self.mandate_reader.get_mandate_by_id(id)
        }

        fn get_mandate_by_gateway_id(
            &self,
            gateway_mandate_id: &str,
        ) -> RepositoryResult<Option<Mandate>> {
            self.mandate_reader
                .get_mandate_by_gateway_id(gateway_mandate_id)
        }

        fn get_mandate_for_booking(&self, booking_id: i32) -> RepositoryResult<Option<Mandate>> {
            self.mandate_reader.get_mandate_for_booking(booking_id)
        }
    }

    impl MandateWriter for FakeRepo {
        fn create_mandate(&self, new_mandate: &NewMandate) -> RepositoryResult<Mandate> {
            self.mandate_writer.create_mandate(new_mandate)
        }

        fn set_mandate_status(
            &self,
            mandate_id: i32,
            from: &[MandateStatus],
            to: MandateStatus,
        ) -> RepositoryResult<bool> {
            self.mandate_writer.set_mandate_status(mandate_id, from, to)
        }
    }

    impl PaymentReader for FakeRepo {
        fn get_payment_by_gateway_id(
            &self,
            gateway_payment_id: &str,
        ) -> RepositoryResult<Option<crate::domain::payment::Payment>> {
            self.payment_reader
                .get_payment_by_gateway_id(gateway_payment_id)
        }

        fn list_payments_for_booking(
            &self,
            booking_id: i32,
        ) -> RepositoryResult<Vec<crate::domain::payment::Payment>> {
            self.payment_reader.list_payments_for_booking(booking_id)
        }
    }

    impl PaymentWriter for FakeRepo {
        fn create_payment(
            &self,
            new_payment: &NewPayment,
        ) -> RepositoryResult<crate::domain::payment::Payment> {
            self.payment_writer.create_payment(new_payment)
        }

        fn set_payment_status(
            &self,
            payment_id: i32,
            from: &[crate::domain::payment::PaymentStatus],
            to: crate::domain::payment::PaymentStatus,
        ) -> RepositoryResult<bool> {
            self.payment_writer.set_payment_status(payment_id, from, to)
        }
    }

    impl PaymentOptionReader for FakeRepo {
        fn get_payment_option_by_id(&self, id: i32) -> RepositoryResult<Option<PaymentOption>> {
            self.option_reader.get_payment_option_by_id(id)
        }

        fn list_payment_options(&self) -> RepositoryResult<Vec<PaymentOption>> {
            self.option_reader.list_payment_options()
        }
    }

    #[actix_web::test]
    async fn setup_reuses_the_existing_gateway_customer() {
        let mut repo = FakeRepo::new();
        let mut gateway = MockGateway::new();

        repo.booking_reader
            .expect_get_booking_by_id()
            .returning(|id, _| Ok(Some(booking(id, PaymentStage::Unpaid))));

        repo.customer_reader
            .expect_get_gateway_customer_by_user()
            .times(1)
            .returning(|user_id| {
                Ok(Some(GatewayCustomer {
                    id: 1,
                    user_id,
                    gateway_customer_id: "CU123".to_string(),
                    created_at: datetime(),
                    updated_at: datetime(),
                }))
            });
        repo.customer_writer.expect_create_gateway_customer().never();
        gateway.expect_create_customer().never();

        gateway
            .expect_create_redirect_flow()
            .times(1)
            .returning(|request| {
                assert_eq!(request.customer_id, "CU123");
                assert_eq!(request.session_token, "booking-5");
                Ok(RedirectFlow {
                    id: "RF123".to_string(),
                    redirect_url: "https://pay.example.com/flow/RF123".to_string(),
                })
            });

        repo.booking_writer
            .expect_claim_redirect_flow()
            .times(1)
            .returning(|_, _| Ok(true));

        let setup = start_payment_setup(
            &repo,
            &gateway,
            &user(),
            5,
            customer_details(),
            "https://ads.example.com",
        )
        .await
        .expect("expected setup to succeed");

        assert_eq!(setup.flow_id, "RF123");
    }

    #[actix_web::test]
    async fn setup_rejects_a_booking_already_in_flight() {
        let mut repo = FakeRepo::new();
        let gateway = MockGateway::new();

        repo.booking_reader
            .expect_get_booking_by_id()
            .returning(|id, _| Ok(Some(booking(id, PaymentStage::MandateCreated))));

        let result = start_payment_setup(
            &repo,
            &gateway,
            &user(),
            5,
            customer_details(),
            "https://ads.example.com",
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[actix_web::test]
    async fn setup_survives_losing_the_customer_creation_race() {
        let mut repo = FakeRepo::new();
        let mut gateway = MockGateway::new();

        repo.booking_reader
            .expect_get_booking_by_id()
            .returning(|id, _| Ok(Some(booking(id, PaymentStage::Unpaid))));

        let mut first = true;
        repo.customer_reader
            .expect_get_gateway_customer_by_user()
            .times(2)
            .returning(move |user_id| {
                if first {
                    first = false;
                    Ok(None)
                } else {
                    Ok(Some(GatewayCustomer {
                        id: 1,
                        user_id,
                        gateway_customer_id: "CU999".to_string(),
                        created_at: datetime(),
                        updated_at: datetime(),
                    }))
                }
            });

        gateway.expect_create_customer().times(1).returning(|_| {
            Ok(GatewayCustomerRef {
                id: "CU123".to_string(),
            })
        });

        repo.customer_writer
            .expect_create_gateway_customer()
            .times(1)
            .returning(|_| Err(RepositoryError::Conflict));

        gateway
            .expect_create_redirect_flow()
            .times(1)
            .returning(|request| {
                // The concurrently created customer wins.
                assert_eq!(request.customer_id, "CU999");
                Ok(RedirectFlow {
                    id: "RF123".to_string(),
                    redirect_url: "https://pay.example.com/flow/RF123".to_string(),
                })
            });

        repo.booking_writer
            .expect_claim_redirect_flow()
            .returning(|_, _| Ok(true));

        let setup = start_payment_setup(
            &repo,
            &gateway,
            &user(),
            5,
            customer_details(),
            "https://ads.example.com",
        )
        .await
        .expect("expected setup to succeed");

        assert_eq!(setup.flow_id, "RF123");
    }

    #[actix_web::test]
    async fn a_refreshed_redirect_return_is_a_no_op() {
        let mut repo = FakeRepo::new();
        let mut gateway = MockGateway::new();

        // The booking already completed this flow; a browser refresh must
        // not hit the gateway or write anything.
        repo.booking_reader
            .expect_get_booking_by_id()
            .returning(|id, _| {
                let mut b = booking(id, PaymentStage::PaymentPending);
                b.redirect_flow_id = Some("RF123".to_string());
                b.mandate_id = Some(3);
                Ok(Some(b))
            });

        gateway.expect_complete_redirect_flow().never();
        repo.mandate_writer.expect_create_mandate().never();
        repo.booking_writer.expect_advance_payment_stage().never();

        let result = complete_redirect(&repo, &gateway, &user(), 5, "RF123")
            .await
            .expect("expected the current state back");

        assert_eq!(result.payment_status, PaymentStage::PaymentPending);
    }

    #[actix_web::test]
    async fn a_foreign_redirect_flow_is_rejected() {
        let mut repo = FakeRepo::new();
        let gateway = MockGateway::new();

        repo.booking_reader
            .expect_get_booking_by_id()
            .returning(|id, _| {
                let mut b = booking(id, PaymentStage::Unpaid);
                b.redirect_flow_id = Some("RF123".to_string());
                Ok(Some(b))
            });

        let result = complete_redirect(&repo, &gateway, &user(), 5, "RF999").await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn gateway_failure_leaves_the_booking_untouched() {
        let mut repo = FakeRepo::new();
        let mut gateway = MockGateway::new();

        repo.booking_reader
            .expect_get_booking_by_id()
            .returning(|id, _| {
                let mut b = booking(id, PaymentStage::MandateCreated);
                b.redirect_flow_id = Some("RF123".to_string());
                b.mandate_id = Some(3);
                Ok(Some(b))
            });
        repo.booking_reader
            .expect_get_booking()
            .returning(|id| Ok(Some(booking(id, PaymentStage::MandateCreated))));

        repo.mandate_reader
            .expect_get_mandate_for_booking()
            .returning(|booking_id| {
                Ok(Some(mandate(3, booking_id, MandateStatus::Active)))
            });
        repo.payment_reader
            .expect_list_payments_for_booking()
            .returning(|_| Ok(Vec::new()));
        repo.option_reader
            .expect_get_payment_option_by_id()
            .returning(|_| Ok(Some(single_option())));

        gateway.expect_create_payment().times(1).returning(|_| {
            Err(crate::gateway::GatewayError::Api {
                status: 502,
                message: "upstream unavailable".to_string(),
            })
        });

        // No payment row, no stage change: the booking stays recoverable.
        repo.payment_writer.expect_create_payment().never();
        repo.booking_writer.expect_advance_payment_stage().never();

        let result = reconcile_booking(&repo, &gateway, &user(), 5).await;

        assert!(matches!(result, Err(ServiceError::Gateway(_))));
    }

    #[actix_web::test]
    async fn reconcile_skips_bookings_that_already_collected() {
        let mut repo = FakeRepo::new();
        let gateway = MockGateway::new();

        repo.booking_reader
            .expect_get_booking_by_id()
            .returning(|id, _| {
                let mut b = booking(id, PaymentStage::MandateActive);
                b.gateway_subscription_id = Some("SB123".to_string());
                Ok(Some(b))
            });
        repo.booking_reader.expect_get_booking().returning(|id| {
            let mut b = booking(id, PaymentStage::MandateActive);
            b.gateway_subscription_id = Some("SB123".to_string());
            Ok(Some(b))
        });
        repo.mandate_reader
            .expect_get_mandate_for_booking()
            .returning(|booking_id| {
                Ok(Some(mandate(3, booking_id, MandateStatus::Active)))
            });

        // Existing subscription: no new gateway call, no new rows.
        let result = reconcile_booking(&repo, &gateway, &user(), 5).await;

        assert!(result.is_ok());
    }

    fn customer_details() -> CustomerDetails {
        CustomerDetails {
            given_name: "Ada".to_string(),
            family_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address_line1: "1 High Street".to_string(),
            address_line2: None,
            city: "London".to_string(),
            postal_code: "N1 9GU".to_string(),
            country_code: "GB".to_string(),
        }
    }
}
