use diesel::prelude::*;

use crate::domain::booking::{
    Booking as DomainBooking, NewBooking as DomainNewBooking, PaymentStage,
    UpdateBooking as DomainUpdateBooking,
};
use crate::models::booking::{
    Booking as DbBooking, NewBooking as DbNewBooking, UpdateBooking as DbUpdateBooking,
};
use crate::repository::{BookingReader, BookingWriter, DieselRepository, RepositoryResult};

impl BookingReader for DieselRepository {
    fn get_booking_by_id(&self, id: i32, user_id: i32) -> RepositoryResult<Option<DomainBooking>> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;
        let booking = bookings::table
            .filter(bookings::id.eq(id))
            .filter(bookings::user_id.eq(user_id))
            .first::<DbBooking>(&mut conn)
            .optional()?;

        booking.map(DbBooking::try_into_domain).transpose()
    }

    fn get_booking(&self, id: i32) -> RepositoryResult<Option<DomainBooking>> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;
        let booking = bookings::table
            .filter(bookings::id.eq(id))
            .first::<DbBooking>(&mut conn)
            .optional()?;

        booking.map(DbBooking::try_into_domain).transpose()
    }

    fn list_bookings(&self, user_id: i32) -> RepositoryResult<Vec<DomainBooking>> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;
        let rows = bookings::table
            .filter(bookings::user_id.eq(user_id))
            .order(bookings::created_at.desc())
            .load::<DbBooking>(&mut conn)?;

        rows.into_iter().map(DbBooking::try_into_domain).collect()
    }
}

impl BookingWriter for DieselRepository {
    fn create_booking(&self, new_booking: &DomainNewBooking) -> RepositoryResult<DomainBooking> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;
        let db_new = DbNewBooking::try_from_domain(new_booking)?;

        let created = diesel::insert_into(bookings::table)
            .values(&db_new)
            .get_result::<DbBooking>(&mut conn)?;

        created.try_into_domain()
    }

    fn update_booking(
        &self,
        booking_id: i32,
        updates: &DomainUpdateBooking,
    ) -> RepositoryResult<DomainBooking> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateBooking::from(updates);

        let updated = diesel::update(bookings::table.filter(bookings::id.eq(booking_id)))
            .set(&db_updates)
            .get_result::<DbBooking>(&mut conn)?;

        updated.try_into_domain()
    }

    fn claim_redirect_flow(&self, booking_id: i32, flow_id: &str) -> RepositoryResult<bool> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;
        let target = bookings::table
            .filter(bookings::id.eq(booking_id))
            .filter(bookings::payment_status.eq(PaymentStage::Unpaid.as_str()))
            .filter(bookings::redirect_flow_id.is_null());

        let affected = diesel::update(target)
            .set((
                bookings::redirect_flow_id.eq(flow_id),
                bookings::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected == 1)
    }

    fn advance_payment_stage(
        &self,
        booking_id: i32,
        target: PaymentStage,
    ) -> RepositoryResult<bool> {
        use crate::schema::bookings;

        let sources: Vec<&str> = PaymentStage::allowed_sources(target)
            .iter()
            .map(|stage| stage.as_str())
            .collect();

        let mut conn = self.conn()?;
        let affected = diesel::update(
            bookings::table
                .filter(bookings::id.eq(booking_id))
                .filter(bookings::payment_status.eq_any(sources)),
        )
        .set((
            bookings::payment_status.eq(target.as_str()),
            bookings::updated_at.eq(chrono::Local::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(affected == 1)
    }
}
