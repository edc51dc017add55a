use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::invoice::{Invoice as DomainInvoice, NewInvoice as DomainNewInvoice};
use crate::models::parse_status;
use crate::repository::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::invoices)]
pub struct Invoice {
    pub id: i32,
    pub booking_id: i32,
    pub payment_id: i32,
    pub number: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::invoices)]
pub struct NewInvoice<'a> {
    pub booking_id: i32,
    pub payment_id: i32,
    pub number: &'a str,
    pub amount_cents: i64,
    pub currency: &'a str,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

impl Invoice {
    pub fn try_into_domain(self) -> Result<DomainInvoice, RepositoryError> {
        Ok(DomainInvoice {
            id: self.id,
            booking_id: self.booking_id,
            payment_id: self.payment_id,
            number: self.number,
            amount_cents: self.amount_cents,
            currency: self.currency,
            status: parse_status(&self.status, "invoices.status")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewInvoice> for NewInvoice<'a> {
    fn from(value: &'a DomainNewInvoice) -> Self {
        Self {
            booking_id: value.booking_id,
            payment_id: value.payment_id,
            number: value.number.as_str(),
            amount_cents: value.amount_cents,
            currency: value.currency.as_str(),
            status: crate::domain::invoice::InvoiceStatus::Issued.as_str(),
            updated_at: value.updated_at,
        }
    }
}
