use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::payment_option::PaymentOption as DomainPaymentOption;
use crate::models::{parse_decimal, parse_status};
use crate::repository::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::payment_options)]
pub struct PaymentOption {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub discount_percent: String,
    pub fee_percent: String,
    pub min_installments: i32,
    pub term_multiplier: i32,
    pub prepaid_reduction_cents: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::payment_options)]
pub struct NewPaymentOption<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub kind: &'a str,
    pub discount_percent: &'a str,
    pub fee_percent: &'a str,
    pub min_installments: i32,
    pub term_multiplier: i32,
    pub prepaid_reduction_cents: i64,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl PaymentOption {
    pub fn try_into_domain(self) -> Result<DomainPaymentOption, RepositoryError> {
        Ok(DomainPaymentOption {
            id: self.id,
            name: self.name,
            description: self.description,
            kind: parse_status(&self.kind, "payment_options.kind")?,
            discount_percent: parse_decimal(&self.discount_percent, "payment_options.discount_percent")?,
            fee_percent: parse_decimal(&self.fee_percent, "payment_options.fee_percent")?,
            min_installments: self.min_installments,
            term_multiplier: self.term_multiplier,
            prepaid_reduction_cents: self.prepaid_reduction_cents,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
