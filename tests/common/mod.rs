//! Helpers for integration tests.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rust_decimal::Decimal;

use adlocal_campaigns::db::{DbPool, establish_connection_pool};
use adlocal_campaigns::domain::booking::{Booking, NewBooking};
use adlocal_campaigns::domain::catalog::PricingModel;
use adlocal_campaigns::domain::pricing::PricingBreakdown;
use adlocal_campaigns::domain::selection::Selection;
use adlocal_campaigns::models::catalog::{
    NewArea, NewAreaRate, NewDuration, NewSize, NewSpecialDeal, NewVolumeTier,
};
use adlocal_campaigns::models::payment_option::NewPaymentOption;
use adlocal_campaigns::repository::{BookingWriter, DieselRepository};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_utc()
}

/// Seed a small catalog: three areas, one ad size, one leaflet size, a
/// six-month duration at 0.9, a [3,5] -> 10% volume tier, a repeat deal, and
/// one payment option per collection style.
pub fn seed_catalog(pool: &DbPool) {
    use adlocal_campaigns::schema::{
        area_rates, areas, durations, payment_options, sizes, special_deals, volume_tiers,
    };

    let mut conn = pool.get().expect("connection");

    diesel::insert_into(areas::table)
        .values(&[
            NewArea {
                name: "North",
                reach: 10_000,
                is_active: true,
                updated_at: now(),
            },
            NewArea {
                name: "South",
                reach: 8_000,
                is_active: true,
                updated_at: now(),
            },
            NewArea {
                name: "East",
                reach: 6_000,
                is_active: true,
                updated_at: now(),
            },
        ])
        .execute(&mut conn)
        .expect("seed areas");

    diesel::insert_into(sizes::table)
        .values(&[
            NewSize {
                name: "Quarter page",
                kind: "ad",
                base_price_cents: 25_000,
                is_active: true,
                updated_at: now(),
            },
            NewSize {
                name: "A5 leaflet",
                kind: "leaflet",
                base_price_cents: 12_000,
                is_active: true,
                updated_at: now(),
            },
        ])
        .execute(&mut conn)
        .expect("seed sizes");

    diesel::insert_into(area_rates::table)
        .values(&[
            NewAreaRate {
                area_id: 1,
                size_id: 1,
                multiplier: Some("1.2"),
                price_cents: None,
                updated_at: now(),
            },
            NewAreaRate {
                area_id: 2,
                size_id: 1,
                multiplier: Some("0.8"),
                price_cents: None,
                updated_at: now(),
            },
            NewAreaRate {
                area_id: 1,
                size_id: 2,
                multiplier: None,
                price_cents: Some(15_000),
                updated_at: now(),
            },
        ])
        .execute(&mut conn)
        .expect("seed area rates");

    diesel::insert_into(durations::table)
        .values(&NewDuration {
            name: "6 months",
            months: 6,
            multiplier: "0.9",
            is_active: true,
            updated_at: now(),
        })
        .execute(&mut conn)
        .expect("seed durations");

    diesel::insert_into(volume_tiers::table)
        .values(&NewVolumeTier {
            min_areas: 3,
            max_areas: 5,
            discount_percent: "10",
            is_active: true,
            updated_at: now(),
        })
        .execute(&mut conn)
        .expect("seed volume tiers");

    diesel::insert_into(special_deals::table)
        .values(&NewSpecialDeal {
            name: "Book six months, double it",
            description: None,
            commitment_months: 6,
            free_months: 6,
            is_active: true,
            updated_at: now(),
        })
        .execute(&mut conn)
        .expect("seed special deals");

    diesel::insert_into(payment_options::table)
        .values(&[
            NewPaymentOption {
                name: "Pay in full",
                description: None,
                kind: "single",
                discount_percent: "0",
                fee_percent: "0",
                min_installments: 1,
                term_multiplier: 1,
                prepaid_reduction_cents: 0,
                is_active: true,
                updated_at: now(),
            },
            NewPaymentOption {
                name: "Monthly installments",
                description: None,
                kind: "installment",
                discount_percent: "5",
                fee_percent: "2",
                min_installments: 6,
                term_multiplier: 2,
                prepaid_reduction_cents: 0,
                is_active: true,
                updated_at: now(),
            },
        ])
        .execute(&mut conn)
        .expect("seed payment options");
}

/// Create a quoted booking for `user_id` with a fixed 40000-cent snapshot.
pub fn seed_booking(repo: &DieselRepository, user_id: i32) -> Booking {
    let selection = Selection::new(PricingModel::Fixed, 1, 1)
        .with_areas(vec![1])
        .with_payment_option(1);

    let breakdown = PricingBreakdown {
        paid_lines: Vec::new(),
        free_lines: Vec::new(),
        subtotal_cents: 40_000,
        volume_discount_percent: Decimal::ZERO,
        volume_discount_cents: 0,
        duration_multiplier: Decimal::ONE,
        total_cents: 40_000,
        total_reach: 10_000,
        billed_circulation: 10_000,
    };

    let new_booking = NewBooking::new(user_id, selection, breakdown, 40_000, "GBP");
    repo.create_booking(&new_booking).expect("create booking")
}
