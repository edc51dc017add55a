use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::mandate::{
    GatewayCustomer as DomainGatewayCustomer, Mandate as DomainMandate,
    NewGatewayCustomer as DomainNewGatewayCustomer, NewMandate as DomainNewMandate,
};
use crate::models::parse_status;
use crate::repository::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::mandates)]
pub struct Mandate {
    pub id: i32,
    pub booking_id: i32,
    pub user_id: i32,
    pub gateway_customer_id: String,
    pub gateway_mandate_id: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::mandates)]
pub struct NewMandate<'a> {
    pub booking_id: i32,
    pub user_id: i32,
    pub gateway_customer_id: &'a str,
    pub gateway_mandate_id: &'a str,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::gateway_customers)]
pub struct GatewayCustomer {
    pub id: i32,
    pub user_id: i32,
    pub gateway_customer_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::gateway_customers)]
pub struct NewGatewayCustomer<'a> {
    pub user_id: i32,
    pub gateway_customer_id: &'a str,
    pub updated_at: NaiveDateTime,
}

impl Mandate {
    pub fn try_into_domain(self) -> Result<DomainMandate, RepositoryError> {
        Ok(DomainMandate {
            id: self.id,
            booking_id: self.booking_id,
            user_id: self.user_id,
            gateway_customer_id: self.gateway_customer_id,
            gateway_mandate_id: self.gateway_mandate_id,
            status: parse_status(&self.status, "mandates.status")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewMandate> for NewMandate<'a> {
    fn from(value: &'a DomainNewMandate) -> Self {
        Self {
            booking_id: value.booking_id,
            user_id: value.user_id,
            gateway_customer_id: value.gateway_customer_id.as_str(),
            gateway_mandate_id: value.gateway_mandate_id.as_str(),
            status: value.status.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl GatewayCustomer {
    pub fn into_domain(self) -> DomainGatewayCustomer {
        DomainGatewayCustomer {
            id: self.id,
            user_id: self.user_id,
            gateway_customer_id: self.gateway_customer_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewGatewayCustomer> for NewGatewayCustomer<'a> {
    fn from(value: &'a DomainNewGatewayCustomer) -> Self {
        Self {
            user_id: value.user_id,
            gateway_customer_id: value.gateway_customer_id.as_str(),
            updated_at: value.updated_at,
        }
    }
}
