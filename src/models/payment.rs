use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::payment::{NewPayment as DomainNewPayment, Payment as DomainPayment};
use crate::models::parse_status;
use crate::repository::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::payments)]
pub struct Payment {
    pub id: i32,
    pub mandate_id: i32,
    pub booking_id: i32,
    pub gateway_payment_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub charge_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::payments)]
pub struct NewPayment<'a> {
    pub mandate_id: i32,
    pub booking_id: i32,
    pub gateway_payment_id: &'a str,
    pub amount_cents: i64,
    pub currency: &'a str,
    pub charge_date: Option<NaiveDate>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

impl Payment {
    pub fn try_into_domain(self) -> Result<DomainPayment, RepositoryError> {
        Ok(DomainPayment {
            id: self.id,
            mandate_id: self.mandate_id,
            booking_id: self.booking_id,
            gateway_payment_id: self.gateway_payment_id,
            amount_cents: self.amount_cents,
            currency: self.currency,
            charge_date: self.charge_date,
            status: parse_status(&self.status, "payments.status")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewPayment> for NewPayment<'a> {
    fn from(value: &'a DomainNewPayment) -> Self {
        Self {
            mandate_id: value.mandate_id,
            booking_id: value.booking_id,
            gateway_payment_id: value.gateway_payment_id.as_str(),
            amount_cents: value.amount_cents,
            currency: value.currency.as_str(),
            charge_date: value.charge_date,
            status: value.status.as_str(),
            updated_at: value.updated_at,
        }
    }
}
