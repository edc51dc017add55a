use diesel::prelude::*;

use crate::domain::mandate::{
    GatewayCustomer as DomainGatewayCustomer, Mandate as DomainMandate, MandateStatus,
    NewGatewayCustomer as DomainNewGatewayCustomer, NewMandate as DomainNewMandate,
};
use crate::models::mandate::{
    GatewayCustomer as DbGatewayCustomer, Mandate as DbMandate,
    NewGatewayCustomer as DbNewGatewayCustomer, NewMandate as DbNewMandate,
};
use crate::repository::{
    DieselRepository, GatewayCustomerReader, GatewayCustomerWriter, MandateReader, MandateWriter,
    RepositoryResult,
};

impl GatewayCustomerReader for DieselRepository {
    fn get_gateway_customer_by_user(
        &self,
        user_id: i32,
    ) -> RepositoryResult<Option<DomainGatewayCustomer>> {
        use crate::schema::gateway_customers;

        let mut conn = self.conn()?;
        let customer = gateway_customers::table
            .filter(gateway_customers::user_id.eq(user_id))
            .first::<DbGatewayCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(DbGatewayCustomer::into_domain))
    }
}

impl GatewayCustomerWriter for DieselRepository {
    fn create_gateway_customer(
        &self,
        new_customer: &DomainNewGatewayCustomer,
    ) -> RepositoryResult<DomainGatewayCustomer> {
        use crate::schema::gateway_customers;

        let mut conn = self.conn()?;
        let db_new = DbNewGatewayCustomer::from(new_customer);

        let created = diesel::insert_into(gateway_customers::table)
            .values(&db_new)
            .get_result::<DbGatewayCustomer>(&mut conn)?;

        Ok(created.into_domain())
    }
}

impl MandateReader for DieselRepository {
    fn get_mandate_by_id(&self, id: i32) -> RepositoryResult<Option<DomainMandate>> {
        use crate::schema::mandates;

        let mut conn = self.conn()?;
        let mandate = mandates::table
            .filter(mandates::id.eq(id))
            .first::<DbMandate>(&mut conn)
            .optional()?;

        mandate.map(DbMandate::try_into_domain).transpose()
    }

    fn get_mandate_by_gateway_id(
        &self,
        gateway_mandate_id: &str,
    ) -> RepositoryResult<Option<DomainMandate>> {
        use crate::schema::mandates;

        let mut conn = self.conn()?;
        let mandate = mandates::table
            .filter(mandates::gateway_mandate_id.eq(gateway_mandate_id))
            .first::<DbMandate>(&mut conn)
            .optional()?;

        mandate.map(DbMandate::try_into_domain).transpose()
    }

    fn get_mandate_for_booking(&self, booking_id: i32) -> RepositoryResult<Option<DomainMandate>> {
        use crate::schema::mandates;

        let mut conn = self.conn()?;
        let mandate = mandates::table
            .filter(mandates::booking_id.eq(booking_id))
            .order(mandates::id.desc())
            .first::<DbMandate>(&mut conn)
            .optional()?;

        mandate.map(DbMandate::try_into_domain).transpose()
    }
}

impl MandateWriter for DieselRepository {
    fn create_mandate(&self, new_mandate: &DomainNewMandate) -> RepositoryResult<DomainMandate> {
        use crate::schema::mandates;

        let mut conn = self.conn()?;
        let db_new = DbNewMandate::from(new_mandate);

        let created = diesel::insert_into(mandates::table)
            .values(&db_new)
            .get_result::<DbMandate>(&mut conn)?;

        created.try_into_domain()
    }

    fn set_mandate_status(
        &self,
        mandate_id: i32,
        from: &[MandateStatus],
        to: MandateStatus,
    ) -> RepositoryResult<bool> {
        use crate::schema::mandates;

        let sources: Vec<&str> = from.iter().map(|status| status.as_str()).collect();

        let mut conn = self.conn()?;
        let affected = diesel::update(
            mandates::table
                .filter(mandates::id.eq(mandate_id))
                .filter(mandates::status.eq_any(sources)),
        )
        .set((
            mandates::status.eq(to.as_str()),
            mandates::updated_at.eq(chrono::Local::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(affected == 1)
    }
}
