use diesel::prelude::*;

use crate::domain::catalog::Catalog;
use crate::domain::payment_option::PaymentOption as DomainPaymentOption;
use crate::models::catalog::{
    Area as DbArea, AreaRate as DbAreaRate, Duration as DbDuration, Size as DbSize,
    SpecialDeal as DbSpecialDeal, VolumeTier as DbVolumeTier,
};
use crate::models::payment_option::PaymentOption as DbPaymentOption;
use crate::repository::{CatalogReader, DieselRepository, PaymentOptionReader, RepositoryResult};

impl CatalogReader for DieselRepository {
    fn load_catalog(&self) -> RepositoryResult<Catalog> {
        use crate::schema::{area_rates, areas, durations, sizes, special_deals, volume_tiers};

        let mut conn = self.conn()?;

        let db_areas = areas::table
            .filter(areas::is_active.eq(true))
            .order(areas::name.asc())
            .load::<DbArea>(&mut conn)?;

        let db_sizes = sizes::table
            .filter(sizes::is_active.eq(true))
            .order(sizes::id.asc())
            .load::<DbSize>(&mut conn)?;

        let db_rates = area_rates::table
            .order(area_rates::id.asc())
            .load::<DbAreaRate>(&mut conn)?;

        let db_durations = durations::table
            .filter(durations::is_active.eq(true))
            .order(durations::months.asc())
            .load::<DbDuration>(&mut conn)?;

        // First-match-wins tier selection relies on this ordering.
        let db_tiers = volume_tiers::table
            .filter(volume_tiers::is_active.eq(true))
            .order(volume_tiers::min_areas.asc())
            .load::<DbVolumeTier>(&mut conn)?;

        let db_deals = special_deals::table
            .filter(special_deals::is_active.eq(true))
            .order(special_deals::id.asc())
            .load::<DbSpecialDeal>(&mut conn)?;

        Ok(Catalog {
            areas: db_areas.into_iter().map(DbArea::into_domain).collect(),
            sizes: db_sizes
                .into_iter()
                .map(DbSize::try_into_domain)
                .collect::<Result<_, _>>()?,
            area_rates: db_rates
                .into_iter()
                .map(DbAreaRate::try_into_domain)
                .collect::<Result<_, _>>()?,
            durations: db_durations
                .into_iter()
                .map(DbDuration::try_into_domain)
                .collect::<Result<_, _>>()?,
            volume_tiers: db_tiers
                .into_iter()
                .map(DbVolumeTier::try_into_domain)
                .collect::<Result<_, _>>()?,
            special_deals: db_deals
                .into_iter()
                .map(DbSpecialDeal::into_domain)
                .collect(),
        })
    }
}

impl PaymentOptionReader for DieselRepository {
    fn get_payment_option_by_id(&self, id: i32) -> RepositoryResult<Option<DomainPaymentOption>> {
        use crate::schema::payment_options;

        let mut conn = self.conn()?;
        let option = payment_options::table
            .filter(payment_options::id.eq(id))
            .filter(payment_options::is_active.eq(true))
            .first::<DbPaymentOption>(&mut conn)
            .optional()?;

        option.map(DbPaymentOption::try_into_domain).transpose()
    }

    fn list_payment_options(&self) -> RepositoryResult<Vec<DomainPaymentOption>> {
        use crate::schema::payment_options;

        let mut conn = self.conn()?;
        let options = payment_options::table
            .filter(payment_options::is_active.eq(true))
            .order(payment_options::id.asc())
            .load::<DbPaymentOption>(&mut conn)?;

        options
            .into_iter()
            .map(DbPaymentOption::try_into_domain)
            .collect()
    }
}
