use serde::Serialize;

use crate::DEFAULT_CURRENCY;
use crate::auth::AuthenticatedUser;
use crate::domain::booking::{Booking, NewBooking};
use crate::domain::selection::Selection;
use crate::repository::{BookingReader, BookingWriter, CatalogReader, PaymentOptionReader};
use crate::services::payment_plan::{PlanAmount, derive_plan};
use crate::services::pricing::price_selection;
use crate::services::{ServiceError, ServiceResult};

/// A priced quote: the breakdown plus the derived billing amount.
#[derive(Debug, Clone, Serialize)]
pub struct PricedQuote {
    pub breakdown: crate::domain::pricing::PricingBreakdown,
    pub plan: PlanAmount,
}

/// Price a selection against the live catalog.
///
/// `Ok(None)` means the selection is not yet computable; a negative derived
/// amount is a catalog/design-fee misconfiguration and is surfaced, never
/// hidden.
pub fn price_quote<R>(
    repo: &R,
    selection: &Selection,
    design_fee_cents: i64,
) -> ServiceResult<Option<PricedQuote>>
where
    R: CatalogReader + PaymentOptionReader + ?Sized,
{
    let Some(breakdown) = price_selection(repo, selection)? else {
        return Ok(None);
    };

    let option = repo
        .get_payment_option_by_id(selection.payment_option_id)?
        .ok_or_else(|| {
            ServiceError::Configuration(format!(
                "payment option {} is missing or inactive",
                selection.payment_option_id
            ))
        })?;

    let plan = derive_plan(
        breakdown.total_cents,
        &option,
        selection.pricing_model,
        design_fee_cents,
    );

    if plan.amount_cents < 0 {
        log::error!(
            "derived amount {} for option {} is negative; design fee {} exceeds the campaign cost",
            plan.amount_cents,
            option.id,
            design_fee_cents
        );
        return Err(ServiceError::Configuration(
            "derived billing amount is negative; check the design fee and catalog".to_string(),
        ));
    }

    Ok(Some(PricedQuote { breakdown, plan }))
}

/// Save a priced quote as a booking owned by the user.
///
/// The monetary snapshot taken here is authoritative for the rest of the
/// booking's life, regardless of later catalog changes.
pub fn save_quote<R>(
    repo: &R,
    user: &AuthenticatedUser,
    selection: Selection,
    design_fee_cents: i64,
    reference: Option<String>,
) -> ServiceResult<Booking>
where
    R: CatalogReader + PaymentOptionReader + BookingWriter + ?Sized,
{
    let quote = price_quote(repo, &selection, design_fee_cents)?.ok_or_else(|| {
        ServiceError::Form("the selection is incomplete and cannot be quoted yet".to_string())
    })?;

    let mut new_booking = NewBooking::new(
        user.id,
        selection,
        quote.breakdown,
        quote.plan.amount_cents,
        DEFAULT_CURRENCY,
    )
    .with_design_fee(design_fee_cents);

    if let Some(reference) = reference {
        new_booking = new_booking.with_reference(reference);
    }

    Ok(repo.create_booking(&new_booking)?)
}

/// Load one booking scoped to its owner.
pub fn load_booking<R>(repo: &R, user: &AuthenticatedUser, booking_id: i32) -> ServiceResult<Booking>
where
    R: BookingReader + ?Sized,
{
    repo.get_booking_by_id(booking_id, user.id)?
        .ok_or(ServiceError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    use crate::domain::catalog::{
        Area, AreaRate, Catalog, Duration, PricingModel, Size, SizeKind, VolumeTier,
    };
    use crate::domain::payment_option::{PaymentOption, PaymentOptionKind};
    use crate::repository::RepositoryResult;
    use crate::repository::mock::{MockCatalogReader, MockPaymentOptionReader};

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn catalog() -> Catalog {
        Catalog {
            areas: vec![Area {
                id: 1,
                name: "North".to_string(),
                reach: 10_000,
                is_active: true,
                created_at: datetime(),
                updated_at: datetime(),
            }],
            sizes: vec![Size {
                id: 1,
                name: "Quarter page".to_string(),
                kind: SizeKind::Ad,
                base_price_cents: 40_000,
                is_active: true,
                created_at: datetime(),
                updated_at: datetime(),
            }],
            area_rates: vec![AreaRate {
                id: 1,
                area_id: 1,
                size_id: 1,
                multiplier: Some(dec!(1.0)),
                price_cents: None,
                created_at: datetime(),
                updated_at: datetime(),
            }],
            durations: vec![Duration {
                id: 1,
                name: "6 months".to_string(),
                months: 6,
                multiplier: dec!(1.0),
                is_active: true,
                created_at: datetime(),
                updated_at: datetime(),
            }],
            volume_tiers: vec![VolumeTier {
                id: 1,
                min_areas: 3,
                max_areas: 5,
                discount_percent: dec!(10),
                is_active: true,
                created_at: datetime(),
                updated_at: datetime(),
            }],
            special_deals: Vec::new(),
        }
    }

    fn single_option() -> PaymentOption {
        PaymentOption {
            id: 7,
            name: "Pay in full".to_string(),
            description: None,
            kind: PaymentOptionKind::Single,
            discount_percent: dec!(0),
            fee_percent: dec!(0),
            min_installments: 1,
            term_multiplier: 1,
            prepaid_reduction_cents: 0,
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn selection() -> Selection {
        Selection::new(PricingModel::Fixed, 1, 1)
            .with_areas(vec![1])
            .with_payment_option(7)
    }

    struct FakeRepo {
        catalog_reader: MockCatalogReader,
        option_reader: MockPaymentOptionReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                catalog_reader: MockCatalogReader::new(),
                option_reader: MockPaymentOptionReader::new(),
            }
        }
    }

    impl crate::repository::CatalogReader for FakeRepo {
        fn load_catalog(&self) -> RepositoryResult<Catalog> {
            self.catalog_reader.load_catalog()
        }
    }

    impl crate::repository::PaymentOptionReader for FakeRepo {
        fn get_payment_option_by_id(&self, id: i32) -> RepositoryResult<Option<PaymentOption>> {
            self.option_reader.get_payment_option_by_id(id)
        }

        fn list_payment_options(&self) -> RepositoryResult<Vec<PaymentOption>> {
            self.option_reader.list_payment_options()
        }
    }

    #[test]
    fn prices_a_complete_selection() {
        let mut repo = FakeRepo::new();
        repo.catalog_reader
            .expect_load_catalog()
            .times(1)
            .returning(|| Ok(catalog()));
        repo.option_reader
            .expect_get_payment_option_by_id()
            .times(1)
            .returning(|_| Ok(Some(single_option())));

        let quote = price_quote(&repo, &selection(), 5_000)
            .expect("expected success")
            .expect("expected a computable quote");

        assert_eq!(quote.breakdown.total_cents, 40_000);
        // 40000 - 5000 fee = 35000 cost, re-added once.
        assert_eq!(quote.plan.amount_cents, 40_000);
    }

    #[test]
    fn an_incomplete_selection_prices_to_none() {
        let mut repo = FakeRepo::new();
        repo.catalog_reader
            .expect_load_catalog()
            .times(1)
            .returning(|| Ok(catalog()));
        repo.option_reader.expect_get_payment_option_by_id().never();

        let mut incomplete = selection();
        incomplete.area_ids.clear();

        let quote = price_quote(&repo, &incomplete, 0).expect("expected success");

        assert!(quote.is_none());
    }

    #[test]
    fn a_missing_payment_option_is_a_configuration_error() {
        let mut repo = FakeRepo::new();
        repo.catalog_reader
            .expect_load_catalog()
            .times(1)
            .returning(|| Ok(catalog()));
        repo.option_reader
            .expect_get_payment_option_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = price_quote(&repo, &selection(), 0);

        assert!(matches!(result, Err(ServiceError::Configuration(_))));
    }

    #[test]
    fn a_negative_derived_amount_is_a_configuration_error() {
        let mut repo = FakeRepo::new();
        repo.catalog_reader
            .expect_load_catalog()
            .times(1)
            .returning(|| Ok(catalog()));
        repo.option_reader
            .expect_get_payment_option_by_id()
            .times(1)
            .returning(|_| {
                // A prepaid reduction far above the rebuilt term drives the
                // derived amount negative.
                let mut option = single_option();
                option.kind = PaymentOptionKind::Single;
                option.min_installments = 6;
                option.term_multiplier = 2;
                option.prepaid_reduction_cents = 100_000;
                Ok(Some(option))
            });

        let mut promo = selection();
        promo.pricing_model = PricingModel::Repeat;

        let result = price_quote(&repo, &promo, 0);

        assert!(matches!(result, Err(ServiceError::Configuration(_))));
    }
}
