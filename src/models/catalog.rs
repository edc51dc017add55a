use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::catalog::{
    Area as DomainArea, AreaRate as DomainAreaRate, Duration as DomainDuration,
    Size as DomainSize, SpecialDeal as DomainSpecialDeal, VolumeTier as DomainVolumeTier,
};
use crate::models::{parse_decimal, parse_status};
use crate::repository::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::areas)]
pub struct Area {
    pub id: i32,
    pub name: String,
    pub reach: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sizes)]
pub struct Size {
    pub id: i32,
    pub name: String,
    pub kind: String,
    pub base_price_cents: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::area_rates)]
#[diesel(belongs_to(Area, foreign_key = area_id))]
pub struct AreaRate {
    pub id: i32,
    pub area_id: i32,
    pub size_id: i32,
    pub multiplier: Option<String>,
    pub price_cents: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::durations)]
pub struct Duration {
    pub id: i32,
    pub name: String,
    pub months: i32,
    pub multiplier: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::volume_tiers)]
pub struct VolumeTier {
    pub id: i32,
    pub min_areas: i32,
    pub max_areas: i32,
    pub discount_percent: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::special_deals)]
pub struct SpecialDeal {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub commitment_months: i32,
    pub free_months: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::areas)]
pub struct NewArea<'a> {
    pub name: &'a str,
    pub reach: i64,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sizes)]
pub struct NewSize<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub base_price_cents: i64,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::area_rates)]
pub struct NewAreaRate<'a> {
    pub area_id: i32,
    pub size_id: i32,
    pub multiplier: Option<&'a str>,
    pub price_cents: Option<i64>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::durations)]
pub struct NewDuration<'a> {
    pub name: &'a str,
    pub months: i32,
    pub multiplier: &'a str,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::volume_tiers)]
pub struct NewVolumeTier<'a> {
    pub min_areas: i32,
    pub max_areas: i32,
    pub discount_percent: &'a str,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::special_deals)]
pub struct NewSpecialDeal<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub commitment_months: i32,
    pub free_months: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl Area {
    pub fn into_domain(self) -> DomainArea {
        DomainArea {
            id: self.id,
            name: self.name,
            reach: self.reach,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Size {
    pub fn try_into_domain(self) -> Result<DomainSize, RepositoryError> {
        Ok(DomainSize {
            id: self.id,
            name: self.name,
            kind: parse_status(&self.kind, "sizes.kind")?,
            base_price_cents: self.base_price_cents,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AreaRate {
    pub fn try_into_domain(self) -> Result<DomainAreaRate, RepositoryError> {
        let multiplier = self
            .multiplier
            .as_deref()
            .map(|raw| parse_decimal(raw, "area_rates.multiplier"))
            .transpose()?;
        Ok(DomainAreaRate {
            id: self.id,
            area_id: self.area_id,
            size_id: self.size_id,
            multiplier,
            price_cents: self.price_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl Duration {
    pub fn try_into_domain(self) -> Result<DomainDuration, RepositoryError> {
        Ok(DomainDuration {
            id: self.id,
            name: self.name,
            months: self.months,
            multiplier: parse_decimal(&self.multiplier, "durations.multiplier")?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl VolumeTier {
    pub fn try_into_domain(self) -> Result<DomainVolumeTier, RepositoryError> {
        Ok(DomainVolumeTier {
            id: self.id,
            min_areas: self.min_areas,
            max_areas: self.max_areas,
            discount_percent: parse_decimal(&self.discount_percent, "volume_tiers.discount_percent")?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl SpecialDeal {
    pub fn into_domain(self) -> DomainSpecialDeal {
        DomainSpecialDeal {
            id: self.id,
            name: self.name,
            description: self.description,
            commitment_months: self.commitment_months,
            free_months: self.free_months,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
