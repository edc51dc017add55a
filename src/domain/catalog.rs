use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pricing models a campaign can be quoted under.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    /// Standard fixed-term display advertising.
    Fixed,
    /// Buy-one-get-one promotional model: a paid area subset plus a free
    /// subset valid for the initial commitment window.
    Repeat,
    /// Leaflet distribution priced per area at flat VAT-inclusive rates.
    Leafleting,
}

impl PricingModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Repeat => "repeat",
            Self::Leafleting => "leafleting",
        }
    }
}

/// Kinds of creative a size record prices.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SizeKind {
    /// Display advert size, priced via base price x area multiplier.
    Ad,
    /// Leaflet format, priced via flat per-area rates.
    Leaflet,
}

impl SizeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ad => "ad",
            Self::Leaflet => "leaflet",
        }
    }
}

impl TryFrom<&str> for SizeKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ad" => Ok(Self::Ad),
            "leaflet" => Ok(Self::Leaflet),
            other => Err(format!("unknown size kind: {other}")),
        }
    }
}

/// Geographic distribution area a campaign can run in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Area {
    /// Unique identifier of the area.
    pub id: i32,
    /// Human-readable name of the area.
    pub name: String,
    /// Households reached by a campaign in this area.
    pub reach: i64,
    /// Whether the area is currently sellable.
    pub is_active: bool,
    /// Timestamp for when the area record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the area record.
    pub updated_at: NaiveDateTime,
}

/// Ad or leaflet size with its base price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Size {
    /// Unique identifier of the size.
    pub id: i32,
    /// Human-readable name, e.g. "Quarter page".
    pub name: String,
    /// Whether this is a display ad size or a leaflet format.
    pub kind: SizeKind,
    /// Base price in the smallest currency unit.
    pub base_price_cents: i64,
    /// Whether the size is currently sellable.
    pub is_active: bool,
    /// Timestamp for when the size record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the size record.
    pub updated_at: NaiveDateTime,
}

/// Per-area pricing override for one size.
///
/// Ad sizes carry a `multiplier` applied to the size base price; leaflet
/// formats carry a flat VAT-inclusive `price_cents` instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaRate {
    pub id: i32,
    pub area_id: i32,
    pub size_id: i32,
    pub multiplier: Option<Decimal>,
    pub price_cents: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Campaign duration (or subscription tier) with its commitment discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Duration {
    /// Unique identifier of the duration.
    pub id: i32,
    /// Human-readable name, e.g. "6 months".
    pub name: String,
    /// Length of the commitment in months.
    pub months: i32,
    /// Multiplicative discount factor, e.g. 0.9 for a 10% discount.
    pub multiplier: Decimal,
    /// Whether the duration is currently offered.
    pub is_active: bool,
    /// Timestamp for when the duration record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the duration record.
    pub updated_at: NaiveDateTime,
}

/// Volume discount tier keyed by the count of paid areas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VolumeTier {
    /// Unique identifier of the tier.
    pub id: i32,
    /// Inclusive lower bound on the paid-area count.
    pub min_areas: i32,
    /// Inclusive upper bound on the paid-area count.
    pub max_areas: i32,
    /// Discount percentage granted by the tier.
    pub discount_percent: Decimal,
    /// Whether the tier currently applies.
    pub is_active: bool,
    /// Timestamp for when the tier record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the tier record.
    pub updated_at: NaiveDateTime,
}

/// Promotional deal configuration for the repeat pricing model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpecialDeal {
    /// Unique identifier of the deal.
    pub id: i32,
    /// Human-readable name of the deal.
    pub name: String,
    /// Marketing copy shown alongside the deal.
    pub description: Option<String>,
    /// Paid commitment window in months.
    pub commitment_months: i32,
    /// Months the free area subset stays free.
    pub free_months: i32,
    /// Whether the deal is currently offered.
    pub is_active: bool,
    /// Timestamp for when the deal record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the deal record.
    pub updated_at: NaiveDateTime,
}

/// In-memory snapshot of the active catalog rows the pricing engine reads.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub areas: Vec<Area>,
    pub sizes: Vec<Size>,
    pub area_rates: Vec<AreaRate>,
    pub durations: Vec<Duration>,
    pub volume_tiers: Vec<VolumeTier>,
    pub special_deals: Vec<SpecialDeal>,
}

impl Catalog {
    pub fn area(&self, id: i32) -> Option<&Area> {
        self.areas.iter().find(|area| area.id == id)
    }

    pub fn size(&self, id: i32) -> Option<&Size> {
        self.sizes.iter().find(|size| size.id == id)
    }

    pub fn duration(&self, id: i32) -> Option<&Duration> {
        self.durations.iter().find(|duration| duration.id == id)
    }

    pub fn rate(&self, area_id: i32, size_id: i32) -> Option<&AreaRate> {
        self.area_rates
            .iter()
            .find(|rate| rate.area_id == area_id && rate.size_id == size_id)
    }

    /// First active tier whose inclusive range contains `paid_areas`.
    pub fn volume_tier_for(&self, paid_areas: usize) -> Option<&VolumeTier> {
        let count = paid_areas as i32;
        self.volume_tiers
            .iter()
            .find(|tier| tier.min_areas <= count && count <= tier.max_areas)
    }

    /// Deal governing the repeat model's free window, when configured.
    pub fn repeat_deal(&self) -> Option<&SpecialDeal> {
        self.special_deals.first()
    }
}
