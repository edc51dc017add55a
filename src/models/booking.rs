use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::booking::{
    Booking as DomainBooking, NewBooking as DomainNewBooking, UpdateBooking as DomainUpdateBooking,
};
use crate::models::parse_status;
use crate::repository::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub reference: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub selection: String,
    pub breakdown: String,
    pub payment_option_id: i32,
    pub design_fee_cents: i64,
    pub charge_amount_cents: i64,
    pub currency: String,
    pub redirect_flow_id: Option<String>,
    pub gateway_subscription_id: Option<String>,
    pub mandate_id: Option<i32>,
    pub invoice_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking<'a> {
    pub user_id: i32,
    pub reference: Option<&'a str>,
    pub status: &'a str,
    pub payment_status: &'a str,
    pub selection: String,
    pub breakdown: String,
    pub payment_option_id: i32,
    pub design_fee_cents: i64,
    pub charge_amount_cents: i64,
    pub currency: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::bookings)]
pub struct UpdateBooking<'a> {
    pub status: Option<&'a str>,
    pub gateway_subscription_id: Option<Option<&'a str>>,
    pub mandate_id: Option<Option<i32>>,
    pub invoice_id: Option<Option<i32>>,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn try_into_domain(self) -> Result<DomainBooking, RepositoryError> {
        let selection = serde_json::from_str(&self.selection)
            .map_err(|err| RepositoryError::Conversion(format!("bookings.selection: {err}")))?;
        let breakdown = serde_json::from_str(&self.breakdown)
            .map_err(|err| RepositoryError::Conversion(format!("bookings.breakdown: {err}")))?;

        Ok(DomainBooking {
            id: self.id,
            user_id: self.user_id,
            reference: self.reference,
            status: parse_status(&self.status, "bookings.status")?,
            payment_status: parse_status(&self.payment_status, "bookings.payment_status")?,
            selection,
            breakdown,
            payment_option_id: self.payment_option_id,
            design_fee_cents: self.design_fee_cents,
            charge_amount_cents: self.charge_amount_cents,
            currency: self.currency,
            redirect_flow_id: self.redirect_flow_id,
            gateway_subscription_id: self.gateway_subscription_id,
            mandate_id: self.mandate_id,
            invoice_id: self.invoice_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl<'a> NewBooking<'a> {
    pub fn try_from_domain(value: &'a DomainNewBooking) -> Result<Self, RepositoryError> {
        let selection = serde_json::to_string(&value.selection)
            .map_err(|err| RepositoryError::Conversion(format!("bookings.selection: {err}")))?;
        let breakdown = serde_json::to_string(&value.breakdown)
            .map_err(|err| RepositoryError::Conversion(format!("bookings.breakdown: {err}")))?;

        Ok(Self {
            user_id: value.user_id,
            reference: value.reference.as_deref(),
            status: crate::domain::booking::BookingStatus::default().as_str(),
            payment_status: crate::domain::booking::PaymentStage::default().as_str(),
            selection,
            breakdown,
            payment_option_id: value.payment_option_id,
            design_fee_cents: value.design_fee_cents,
            charge_amount_cents: value.charge_amount_cents,
            currency: value.currency.as_str(),
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainUpdateBooking> for UpdateBooking<'a> {
    fn from(value: &'a DomainUpdateBooking) -> Self {
        Self {
            status: value.status.map(|status| status.as_str()),
            gateway_subscription_id: value
                .gateway_subscription_id
                .as_ref()
                .map(|id| id.as_ref().map(String::as_str)),
            mandate_id: value.mandate_id,
            invoice_id: value.invoice_id,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}
