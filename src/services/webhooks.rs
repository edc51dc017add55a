use serde::Serialize;

use crate::domain::booking::{BookingStatus, PaymentStage, UpdateBooking};
use crate::domain::invoice::NewInvoice;
use crate::domain::mandate::{Mandate, MandateStatus};
use crate::domain::payment::{NewPayment, Payment, PaymentStatus};
use crate::gateway::webhook::{self, WebhookEvent};
use crate::repository::{
    BookingReader, BookingWriter, InvoiceReader, InvoiceWriter, MandateReader, MandateWriter,
    PaymentReader, PaymentWriter, RepositoryError, WebhookEventLedger,
};
use crate::services::{ServiceError, ServiceResult};

/// Counts reported back for one ingested batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookSummary {
    /// Events whose effects ran in this delivery.
    pub applied: usize,
    /// Events already recorded in the ledger; safely skipped.
    pub duplicates: usize,
    /// Events naming unknown resources or actions; logged no-ops.
    pub ignored: usize,
}

enum Applied {
    Effects,
    Duplicate,
    Ignored,
}

/// Verify, parse, and apply one signed webhook delivery.
///
/// The gateway's event stream is the only authority that advances mandates,
/// payments, and booking payment status past submission. The whole handler
/// is safe to re-run: the applied-event ledger is consulted before any
/// effect, every effect is a conditional no-op-safe update, and the event id
/// is recorded only after the effects succeed, so a partial failure is
/// recovered by redelivering the same batch.
pub fn ingest_webhook<R>(
    repo: &R,
    body: &[u8],
    signature: &str,
    secret: &str,
) -> ServiceResult<WebhookSummary>
where
    R: WebhookEventLedger
        + BookingReader
        + BookingWriter
        + MandateReader
        + MandateWriter
        + PaymentReader
        + PaymentWriter
        + InvoiceReader
        + InvoiceWriter
        + ?Sized,
{
    webhook::verify_signature(body, signature, secret)
        .map_err(|_| ServiceError::Unauthorized)?;

    let batch = webhook::parse_batch(body)
        .map_err(|err| ServiceError::Form(format!("webhook payload rejected: {err}")))?;

    let mut summary = WebhookSummary::default();
    for event in &batch.events {
        match apply_event(repo, event)? {
            Applied::Effects => summary.applied += 1,
            Applied::Duplicate => summary.duplicates += 1,
            Applied::Ignored => summary.ignored += 1,
        }
    }

    Ok(summary)
}

fn apply_event<R>(repo: &R, event: &WebhookEvent) -> ServiceResult<Applied>
where
    R: WebhookEventLedger
        + BookingReader
        + BookingWriter
        + MandateReader
        + MandateWriter
        + PaymentReader
        + PaymentWriter
        + InvoiceReader
        + InvoiceWriter
        + ?Sized,
{
    if repo.is_webhook_event_applied(&event.id)? {
        log::info!("webhook event {} already applied, skipping", event.id);
        return Ok(Applied::Duplicate);
    }

    let outcome = match event.resource_type.as_str() {
        "mandates" => apply_mandate_event(repo, event)?,
        "payments" => apply_payment_event(repo, event)?,
        other => {
            log::warn!("webhook event {} names unknown resource {other}", event.id);
            Applied::Ignored
        }
    };

    if matches!(outcome, Applied::Effects)
        && !repo.record_webhook_event(&event.id, &event.resource_type, &event.action)?
    {
        // An overlapping worker recorded it first; all effects above were
        // no-op-safe, so this is still a success.
        log::info!("webhook event {} recorded concurrently", event.id);
    }

    Ok(outcome)
}

fn apply_mandate_event<R>(repo: &R, event: &WebhookEvent) -> ServiceResult<Applied>
where
    R: BookingReader + BookingWriter + MandateReader + MandateWriter + ?Sized,
{
    let Some(gateway_mandate_id) = event.links.mandate.as_deref() else {
        log::warn!("mandate event {} carries no mandate link", event.id);
        return Ok(Applied::Ignored);
    };

    let Some(mandate) = repo.get_mandate_by_gateway_id(gateway_mandate_id)? else {
        log::warn!(
            "mandate event {} names unknown mandate {gateway_mandate_id}",
            event.id
        );
        return Ok(Applied::Ignored);
    };

    match event.action.as_str() {
        "submitted" => {
            if !repo.set_mandate_status(
                mandate.id,
                &[MandateStatus::PendingSubmission],
                MandateStatus::PendingCustomerApproval,
            )? {
                log::info!("mandate {} already past submission", mandate.id);
            }
            Ok(Applied::Effects)
        }
        "active" => {
            if !repo.set_mandate_status(
                mandate.id,
                MandateStatus::in_flight(),
                MandateStatus::Active,
            )? {
                log::info!("mandate {} already resolved", mandate.id);
            }
            if !repo.advance_payment_stage(mandate.booking_id, PaymentStage::MandateActive)? {
                log::info!(
                    "booking {} is past mandate_active; mandate event left it unchanged",
                    mandate.booking_id
                );
            }
            Ok(Applied::Effects)
        }
        "failed" | "cancelled" | "expired" => {
            fail_mandate(repo, &mandate, &event.action)?;
            Ok(Applied::Effects)
        }
        other => {
            log::warn!("mandate event {} has unknown action {other}", event.id);
            Ok(Applied::Ignored)
        }
    }
}

/// A dead mandate cascades to fail the booking's payment status.
fn fail_mandate<R>(repo: &R, mandate: &Mandate, action: &str) -> ServiceResult<()>
where
    R: BookingWriter + MandateWriter + ?Sized,
{
    let target = if action == "cancelled" {
        MandateStatus::Cancelled
    } else {
        MandateStatus::Failed
    };

    let sources = [
        MandateStatus::PendingSubmission,
        MandateStatus::PendingCustomerApproval,
        MandateStatus::Active,
    ];
    if !repo.set_mandate_status(mandate.id, &sources, target)? {
        log::info!("mandate {} already terminal", mandate.id);
    }

    if !repo.advance_payment_stage(mandate.booking_id, PaymentStage::MandateFailed)? {
        log::info!(
            "booking {} already terminal; mandate failure left it unchanged",
            mandate.booking_id
        );
    }

    Ok(())
}

fn apply_payment_event<R>(repo: &R, event: &WebhookEvent) -> ServiceResult<Applied>
where
    R: BookingReader
        + BookingWriter
        + MandateReader
        + PaymentReader
        + PaymentWriter
        + InvoiceReader
        + InvoiceWriter
        + ?Sized,
{
    let Some(gateway_payment_id) = event.links.payment.as_deref() else {
        log::warn!("payment event {} carries no payment link", event.id);
        return Ok(Applied::Ignored);
    };

    let payment = match repo.get_payment_by_gateway_id(gateway_payment_id)? {
        Some(payment) => payment,
        // Recurring collections are created by the gateway's own schedule;
        // their first sign of life is this event.
        None => match upsert_scheduled_payment(repo, event, gateway_payment_id)? {
            Some(payment) => payment,
            None => return Ok(Applied::Ignored),
        },
    };

    match event.action.as_str() {
        "submitted" => {
            if !repo.set_payment_status(
                payment.id,
                &[PaymentStatus::PendingSubmission],
                PaymentStatus::Submitted,
            )? {
                log::info!("payment {} already past submission", payment.id);
            }
            Ok(Applied::Effects)
        }
        "confirmed" => {
            confirm_payment(repo, &payment)?;
            Ok(Applied::Effects)
        }
        "failed" | "cancelled" => {
            let target = if event.action == "cancelled" {
                PaymentStatus::Cancelled
            } else {
                PaymentStatus::Failed
            };
            if !repo.set_payment_status(payment.id, PaymentStatus::in_flight(), target)? {
                log::info!("payment {} already terminal", payment.id);
            }
            // Failures are scoped to the payment: the mandate may still
            // collect successfully on a later attempt.
            if !repo.advance_payment_stage(payment.booking_id, PaymentStage::PaymentFailed)? {
                log::info!(
                    "booking {} already terminal; payment failure left it unchanged",
                    payment.booking_id
                );
            }
            Ok(Applied::Effects)
        }
        other => {
            log::warn!("payment event {} has unknown action {other}", event.id);
            Ok(Applied::Ignored)
        }
    }
}

/// Materialize a gateway-scheduled payment we have no local row for yet,
/// resolved through the mandate link. Racing workers are arbitrated by the
/// unique gateway payment id.
fn upsert_scheduled_payment<R>(
    repo: &R,
    event: &WebhookEvent,
    gateway_payment_id: &str,
) -> ServiceResult<Option<Payment>>
where
    R: BookingReader + MandateReader + PaymentReader + PaymentWriter + ?Sized,
{
    let Some(gateway_mandate_id) = event.links.mandate.as_deref() else {
        log::warn!(
            "payment event {} names unknown payment {gateway_payment_id} and has no mandate link",
            event.id
        );
        return Ok(None);
    };

    let Some(mandate) = repo.get_mandate_by_gateway_id(gateway_mandate_id)? else {
        log::warn!(
            "payment event {} names unknown mandate {gateway_mandate_id}",
            event.id
        );
        return Ok(None);
    };

    let Some(booking) = repo.get_booking(mandate.booking_id)? else {
        log::warn!(
            "mandate {} references missing booking {}",
            mandate.id,
            mandate.booking_id
        );
        return Ok(None);
    };

    let new_payment = NewPayment::new(
        mandate.id,
        booking.id,
        gateway_payment_id,
        booking.charge_amount_cents,
        booking.currency.clone(),
    )
    .with_status(PaymentStatus::Submitted);

    match repo.create_payment(&new_payment) {
        Ok(payment) => Ok(Some(payment)),
        Err(RepositoryError::Conflict) => {
            Ok(repo.get_payment_by_gateway_id(gateway_payment_id)?)
        }
        Err(err) => Err(err.into()),
    }
}

/// Confirmation effects, each idempotent so a replay converges on the same
/// state: payment confirmed, invoice created exactly once keyed by the
/// payment id, booking advanced and marked active.
fn confirm_payment<R>(repo: &R, payment: &Payment) -> ServiceResult<()>
where
    R: BookingReader + BookingWriter + PaymentWriter + InvoiceReader + InvoiceWriter + ?Sized,
{
    if !repo.set_payment_status(
        payment.id,
        PaymentStatus::in_flight(),
        PaymentStatus::Confirmed,
    )? {
        log::info!("payment {} already confirmed or terminal", payment.id);
    }

    let invoice = match repo.get_invoice_by_payment_id(payment.id)? {
        Some(existing) => existing,
        None => {
            let new_invoice = NewInvoice::new(
                payment.booking_id,
                payment.id,
                payment.amount_cents,
                payment.currency.clone(),
            );
            match repo.create_invoice(&new_invoice) {
                Ok(invoice) => invoice,
                // A replayed or concurrent event already invoiced it.
                Err(RepositoryError::Conflict) => repo
                    .get_invoice_by_payment_id(payment.id)?
                    .ok_or(ServiceError::NotFound)?,
                Err(err) => return Err(err.into()),
            }
        }
    };

    if !repo.advance_payment_stage(payment.booking_id, PaymentStage::PaymentConfirmed)? {
        log::info!(
            "booking {} did not advance to payment_confirmed; checking current stage",
            payment.booking_id
        );
    }

    let confirmed = repo
        .get_booking(payment.booking_id)?
        .map(|booking| booking.payment_status == PaymentStage::PaymentConfirmed)
        .unwrap_or(false);

    if confirmed {
        repo.update_booking(
            payment.booking_id,
            &UpdateBooking::new()
                .status(BookingStatus::Active)
                .invoice_id(Some(invoice.id)),
        )?;
    }

    Ok(())
}
