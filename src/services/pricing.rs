use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::catalog::{Catalog, PricingModel, Size, SizeKind};
use crate::domain::pricing::{FreeAreaLine, PaidAreaLine, PricingBreakdown};
use crate::domain::selection::Selection;
use crate::repository::CatalogReader;
use crate::services::ServiceResult;

/// Round a decimal amount to whole cents, away from zero on midpoints.
fn round_cents(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX) // catalog values large enough to overflow are broken anyway
}

/// Price one area for the chosen size under the given model.
///
/// Ad sizes use base price x per-area multiplier (1.0 when the area has no
/// override); leaflet formats use the flat per-area rate, falling back to the
/// size base price when no rate exists.
fn area_price_cents(catalog: &Catalog, area_id: i32, size: &Size, model: PricingModel) -> i64 {
    let rate = catalog.rate(area_id, size.id);
    match model {
        PricingModel::Leafleting => rate
            .and_then(|rate| rate.price_cents)
            .unwrap_or(size.base_price_cents),
        PricingModel::Fixed | PricingModel::Repeat => {
            let multiplier = rate
                .and_then(|rate| rate.multiplier)
                .unwrap_or_else(|| Decimal::ONE);
            round_cents(Decimal::from(size.base_price_cents) * multiplier)
        }
    }
}

/// Turn a selection into an itemized breakdown against a catalog snapshot.
///
/// Returns `None` while the selection is not yet computable: no areas chosen,
/// a referenced area/size/duration missing from the catalog, or a size whose
/// kind does not match the model. That state is not a fault; the quote UI
/// simply has nothing to show yet.
pub fn compute_breakdown(selection: &Selection, catalog: &Catalog) -> Option<PricingBreakdown> {
    if selection.area_ids.is_empty() {
        return None;
    }

    let size = catalog.size(selection.size_id)?;
    let duration = catalog.duration(selection.duration_id)?;

    let expected_kind = match selection.pricing_model {
        PricingModel::Leafleting => SizeKind::Leaflet,
        PricingModel::Fixed | PricingModel::Repeat => SizeKind::Ad,
    };
    if size.kind != expected_kind {
        return None;
    }

    let mut paid_lines = Vec::with_capacity(selection.area_ids.len());
    for area_id in &selection.area_ids {
        let area = catalog.area(*area_id)?;
        paid_lines.push(PaidAreaLine {
            area_id: area.id,
            name: area.name.clone(),
            reach: area.reach,
            price_cents: area_price_cents(catalog, area.id, size, selection.pricing_model),
        });
    }

    let mut free_lines = Vec::new();
    if selection.pricing_model == PricingModel::Repeat {
        let free_months = catalog
            .repeat_deal()
            .map(|deal| deal.free_months)
            .unwrap_or(duration.months);
        for area_id in &selection.free_area_ids {
            let area = catalog.area(*area_id)?;
            free_lines.push(FreeAreaLine {
                area_id: area.id,
                name: area.name.clone(),
                reach: area.reach,
                free_months,
            });
        }
    }

    let subtotal_cents: i64 = paid_lines.iter().map(|line| line.price_cents).sum();
    let subtotal = Decimal::from(subtotal_cents);

    let volume_discount_percent = catalog
        .volume_tier_for(paid_lines.len())
        .map(|tier| tier.discount_percent)
        .unwrap_or_else(|| Decimal::ZERO);
    let volume_discount_cents =
        round_cents(subtotal * volume_discount_percent / Decimal::ONE_HUNDRED);

    // Duration multiplier applies after the volume discount; the order is
    // contractual.
    let total_cents = round_cents(
        (subtotal - Decimal::from(volume_discount_cents)) * duration.multiplier,
    );

    let billed_circulation: i64 = paid_lines.iter().map(|line| line.reach).sum();
    let free_reach: i64 = free_lines.iter().map(|line| line.reach).sum();

    Some(PricingBreakdown {
        paid_lines,
        free_lines,
        subtotal_cents,
        volume_discount_percent,
        volume_discount_cents,
        duration_multiplier: duration.multiplier,
        total_cents,
        total_reach: billed_circulation + free_reach,
        billed_circulation,
    })
}

/// Load the active catalog and price a selection against it.
pub fn price_selection<R>(
    repo: &R,
    selection: &Selection,
) -> ServiceResult<Option<PricingBreakdown>>
where
    R: CatalogReader + ?Sized,
{
    let catalog = repo.load_catalog()?;
    Ok(compute_breakdown(selection, &catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    use crate::domain::catalog::{Area, AreaRate, Duration, SpecialDeal, VolumeTier};

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn area(id: i32, name: &str, reach: i64) -> Area {
        Area {
            id,
            name: name.to_string(),
            reach,
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn size(id: i32, kind: SizeKind, base_price_cents: i64) -> Size {
        Size {
            id,
            name: format!("Size {id}"),
            kind,
            base_price_cents,
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn rate_multiplier(area_id: i32, size_id: i32, multiplier: Decimal) -> AreaRate {
        AreaRate {
            id: area_id * 100 + size_id,
            area_id,
            size_id,
            multiplier: Some(multiplier),
            price_cents: None,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn rate_flat(area_id: i32, size_id: i32, price_cents: i64) -> AreaRate {
        AreaRate {
            id: area_id * 100 + size_id,
            area_id,
            size_id,
            multiplier: None,
            price_cents: Some(price_cents),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn duration(id: i32, months: i32, multiplier: Decimal) -> Duration {
        Duration {
            id,
            name: format!("{months} months"),
            months,
            multiplier,
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn tier(min_areas: i32, max_areas: i32, discount_percent: Decimal) -> VolumeTier {
        VolumeTier {
            id: min_areas,
            min_areas,
            max_areas,
            discount_percent,
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn repeat_deal(free_months: i32) -> SpecialDeal {
        SpecialDeal {
            id: 1,
            name: "Book six, double it".to_string(),
            description: None,
            commitment_months: 6,
            free_months,
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn selection(model: PricingModel, areas: Vec<i32>) -> Selection {
        Selection::new(model, 1, 1)
            .with_areas(areas)
            .with_payment_option(1)
    }

    #[test]
    fn volume_and_duration_discounts_apply_in_order() {
        // Three areas priced 500 + 300 + 200 = 1000, tier [3,5] -> 10%,
        // duration multiplier 0.9: discount 100, total 810.
        let catalog = Catalog {
            areas: vec![area(1, "North", 10_000), area(2, "South", 8_000), area(3, "East", 6_000)],
            sizes: vec![size(1, SizeKind::Ad, 250)],
            area_rates: vec![
                rate_multiplier(1, 1, dec!(2.0)),
                rate_multiplier(2, 1, dec!(1.2)),
                rate_multiplier(3, 1, dec!(0.8)),
            ],
            durations: vec![duration(1, 6, dec!(0.9))],
            volume_tiers: vec![tier(3, 5, dec!(10))],
            special_deals: Vec::new(),
        };

        let breakdown = compute_breakdown(&selection(PricingModel::Fixed, vec![1, 2, 3]), &catalog)
            .expect("expected a computable breakdown");

        assert_eq!(breakdown.subtotal_cents, 1000);
        assert_eq!(breakdown.volume_discount_percent, dec!(10));
        assert_eq!(breakdown.volume_discount_cents, 100);
        assert_eq!(breakdown.total_cents, 810);
        assert!(breakdown.total_cents >= 0);
    }

    #[test]
    fn total_matches_the_breakdown_invariant() {
        let catalog = Catalog {
            areas: vec![area(1, "North", 1_000), area(2, "South", 2_000)],
            sizes: vec![size(1, SizeKind::Ad, 400)],
            area_rates: vec![rate_multiplier(1, 1, dec!(1.5))],
            durations: vec![duration(1, 3, dec!(0.95))],
            volume_tiers: vec![tier(2, 4, dec!(5))],
            special_deals: Vec::new(),
        };

        let breakdown = compute_breakdown(&selection(PricingModel::Fixed, vec![1, 2]), &catalog)
            .expect("expected a computable breakdown");

        let expected = round_cents(
            (Decimal::from(breakdown.subtotal_cents)
                - Decimal::from(breakdown.volume_discount_cents))
                * breakdown.duration_multiplier,
        );
        assert_eq!(breakdown.total_cents, expected);
        // Area 2 has no override for this size: multiplier defaults to 1.0.
        assert_eq!(breakdown.paid_lines[1].price_cents, 400);
    }

    #[test]
    fn no_matching_tier_means_no_discount() {
        let catalog = Catalog {
            areas: vec![area(1, "North", 1_000)],
            sizes: vec![size(1, SizeKind::Ad, 400)],
            area_rates: Vec::new(),
            durations: vec![duration(1, 3, dec!(1.0))],
            volume_tiers: vec![tier(3, 5, dec!(10))],
            special_deals: Vec::new(),
        };

        let breakdown = compute_breakdown(&selection(PricingModel::Fixed, vec![1]), &catalog)
            .expect("expected a computable breakdown");

        assert_eq!(breakdown.volume_discount_percent, Decimal::ZERO);
        assert_eq!(breakdown.volume_discount_cents, 0);
        assert_eq!(breakdown.total_cents, 400);
    }

    #[test]
    fn incomplete_selection_is_not_computable() {
        let catalog = Catalog {
            areas: vec![area(1, "North", 1_000)],
            sizes: vec![size(1, SizeKind::Ad, 400)],
            area_rates: Vec::new(),
            durations: vec![duration(1, 3, dec!(1.0))],
            volume_tiers: Vec::new(),
            special_deals: Vec::new(),
        };

        // No areas chosen.
        assert!(compute_breakdown(&selection(PricingModel::Fixed, vec![]), &catalog).is_none());

        // Unknown size id.
        let mut unknown_size = selection(PricingModel::Fixed, vec![1]);
        unknown_size.size_id = 99;
        assert!(compute_breakdown(&unknown_size, &catalog).is_none());

        // Unknown duration id.
        let mut unknown_duration = selection(PricingModel::Fixed, vec![1]);
        unknown_duration.duration_id = 99;
        assert!(compute_breakdown(&unknown_duration, &catalog).is_none());

        // Ad model pointed at a leaflet format.
        let leaflet_catalog = Catalog {
            sizes: vec![size(1, SizeKind::Leaflet, 400)],
            ..catalog
        };
        assert!(
            compute_breakdown(&selection(PricingModel::Fixed, vec![1]), &leaflet_catalog).is_none()
        );
    }

    #[test]
    fn leafleting_uses_flat_rates_with_base_price_fallback() {
        let catalog = Catalog {
            areas: vec![area(1, "North", 5_000), area(2, "South", 4_000)],
            sizes: vec![size(1, SizeKind::Leaflet, 600)],
            area_rates: vec![rate_flat(1, 1, 750)],
            durations: vec![duration(1, 1, dec!(1.0))],
            volume_tiers: Vec::new(),
            special_deals: Vec::new(),
        };

        let breakdown =
            compute_breakdown(&selection(PricingModel::Leafleting, vec![1, 2]), &catalog)
                .expect("expected a computable breakdown");

        assert_eq!(breakdown.paid_lines[0].price_cents, 750);
        assert_eq!(breakdown.paid_lines[1].price_cents, 600);
        assert_eq!(breakdown.subtotal_cents, 1350);
    }

    #[test]
    fn repeat_model_itemizes_free_areas_without_billing_them() {
        // Paid areas X + Y subtotal 500; free area Z itemized at zero,
        // counted in reach but not in billed circulation.
        let catalog = Catalog {
            areas: vec![area(1, "X", 3_000), area(2, "Y", 2_000), area(3, "Z", 4_000)],
            sizes: vec![size(1, SizeKind::Ad, 250)],
            area_rates: vec![
                rate_multiplier(1, 1, dec!(1.2)),
                rate_multiplier(2, 1, dec!(0.8)),
            ],
            durations: vec![duration(1, 6, dec!(0.9))],
            volume_tiers: vec![tier(2, 4, dec!(10))],
            special_deals: vec![repeat_deal(6)],
        };

        let selection = selection(PricingModel::Repeat, vec![1, 2]).with_free_areas(vec![3]);
        let breakdown =
            compute_breakdown(&selection, &catalog).expect("expected a computable breakdown");

        assert_eq!(breakdown.subtotal_cents, 500);
        assert_eq!(breakdown.volume_discount_cents, 50);
        assert_eq!(breakdown.total_cents, 405);

        assert_eq!(breakdown.free_lines.len(), 1);
        assert_eq!(breakdown.free_lines[0].area_id, 3);
        assert_eq!(breakdown.free_lines[0].free_months, 6);

        assert_eq!(breakdown.billed_circulation, 5_000);
        assert_eq!(breakdown.total_reach, 9_000);
    }
}
