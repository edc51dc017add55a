use diesel::prelude::*;

use crate::domain::invoice::{Invoice as DomainInvoice, NewInvoice as DomainNewInvoice};
use crate::domain::payment::{
    NewPayment as DomainNewPayment, Payment as DomainPayment, PaymentStatus,
};
use crate::models::invoice::{Invoice as DbInvoice, NewInvoice as DbNewInvoice};
use crate::models::payment::{NewPayment as DbNewPayment, Payment as DbPayment};
use crate::models::webhook_event::NewWebhookEvent as DbNewWebhookEvent;
use crate::repository::{
    DieselRepository, InvoiceReader, InvoiceWriter, PaymentReader, PaymentWriter,
    RepositoryResult, WebhookEventLedger,
};

impl PaymentReader for DieselRepository {
    fn get_payment_by_gateway_id(
        &self,
        gateway_payment_id: &str,
    ) -> RepositoryResult<Option<DomainPayment>> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let payment = payments::table
            .filter(payments::gateway_payment_id.eq(gateway_payment_id))
            .first::<DbPayment>(&mut conn)
            .optional()?;

        payment.map(DbPayment::try_into_domain).transpose()
    }

    fn list_payments_for_booking(&self, booking_id: i32) -> RepositoryResult<Vec<DomainPayment>> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let rows = payments::table
            .filter(payments::booking_id.eq(booking_id))
            .order(payments::id.asc())
            .load::<DbPayment>(&mut conn)?;

        rows.into_iter().map(DbPayment::try_into_domain).collect()
    }
}

impl PaymentWriter for DieselRepository {
    fn create_payment(&self, new_payment: &DomainNewPayment) -> RepositoryResult<DomainPayment> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let db_new = DbNewPayment::from(new_payment);

        let created = diesel::insert_into(payments::table)
            .values(&db_new)
            .get_result::<DbPayment>(&mut conn)?;

        created.try_into_domain()
    }

    fn set_payment_status(
        &self,
        payment_id: i32,
        from: &[PaymentStatus],
        to: PaymentStatus,
    ) -> RepositoryResult<bool> {
        use crate::schema::payments;

        let sources: Vec<&str> = from.iter().map(|status| status.as_str()).collect();

        let mut conn = self.conn()?;
        let affected = diesel::update(
            payments::table
                .filter(payments::id.eq(payment_id))
                .filter(payments::status.eq_any(sources)),
        )
        .set((
            payments::status.eq(to.as_str()),
            payments::updated_at.eq(chrono::Local::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(affected == 1)
    }
}

impl InvoiceReader for DieselRepository {
    fn get_invoice_by_payment_id(&self, payment_id: i32) -> RepositoryResult<Option<DomainInvoice>> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let invoice = invoices::table
            .filter(invoices::payment_id.eq(payment_id))
            .first::<DbInvoice>(&mut conn)
            .optional()?;

        invoice.map(DbInvoice::try_into_domain).transpose()
    }
}

impl InvoiceWriter for DieselRepository {
    fn create_invoice(&self, new_invoice: &DomainNewInvoice) -> RepositoryResult<DomainInvoice> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let db_new = DbNewInvoice::from(new_invoice);

        let created = diesel::insert_into(invoices::table)
            .values(&db_new)
            .get_result::<DbInvoice>(&mut conn)?;

        created.try_into_domain()
    }
}

impl WebhookEventLedger for DieselRepository {
    fn is_webhook_event_applied(&self, event_id: &str) -> RepositoryResult<bool> {
        use crate::schema::webhook_events;

        let mut conn = self.conn()?;
        let count: i64 = webhook_events::table
            .filter(webhook_events::event_id.eq(event_id))
            .count()
            .get_result(&mut conn)?;

        Ok(count > 0)
    }

    fn record_webhook_event(
        &self,
        event_id: &str,
        resource_type: &str,
        action: &str,
    ) -> RepositoryResult<bool> {
        use crate::schema::webhook_events;

        let mut conn = self.conn()?;
        let db_new = DbNewWebhookEvent {
            event_id,
            resource_type,
            action,
        };

        match diesel::insert_into(webhook_events::table)
            .values(&db_new)
            .execute(&mut conn)
        {
            Ok(_) => Ok(true),
            // Another worker already applied this event.
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            )) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
