//! Fixed pricing catalog. Per-category tier prices, curated zone lists and the
//! flat full-body package.
//!
//! Every zone name belongs to exactly one category.

use crate::domain::entities::{Area, AreaCategory, PlanTier};

/// Monthly price (whole currency units) and session count for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPrice {
    pub monthly: u32,
    pub sessions: u32,
}

const fn tier(monthly: u32, sessions: u32) -> TierPrice {
    TierPrice { monthly, sessions }
}

/// Rows ordered essential, complete, platinum.
const LARGE_PRICES: [TierPrice; 3] = [tier(800, 6), tier(675, 9), tier(575, 12)];
const MEDIUM_PRICES: [TierPrice; 3] = [tier(600, 6), tier(500, 9), tier(425, 12)];
const SMALL_PRICES: [TierPrice; 3] = [tier(400, 6), tier(335, 9), tier(285, 12)];
const PACKAGE_PRICES: [TierPrice; 3] = [tier(2299, 6), tier(1899, 9), tier(1799, 12)];

const LARGE_ZONES: &[&str] = &["Piernas Completas", "Brazos", "Espalda"];
const MEDIUM_ZONES: &[&str] = &[
    "Abdomen",
    "1/2 Piernas",
    "1/2 Brazos",
    "Rostro",
    "Bikini",
    "Glúteos",
    "Pecho",
    "Hombros",
    "1/2 Espalda",
    "Axilas",
];
const SMALL_ZONES: &[&str] = &[
    "Manos", "Pies", "Líneas", "Bigote", "Pómulos", "Mentón", "Areolas", "Patillas", "Cuello",
    "Nuca",
];

/// Selections of this many areas or more are priced as the full-body package.
pub const PACKAGE_MIN_AREAS: usize = 5;

fn tier_index(tier: PlanTier) -> usize {
    match tier {
        PlanTier::Essential => 0,
        PlanTier::Complete => 1,
        PlanTier::Platinum => 2,
    }
}

pub fn tier_price(category: AreaCategory, tier: PlanTier) -> TierPrice {
    let row = match category {
        AreaCategory::Large => &LARGE_PRICES,
        AreaCategory::Medium => &MEDIUM_PRICES,
        AreaCategory::Small => &SMALL_PRICES,
    };
    row[tier_index(tier)]
}

pub fn package_price(tier: PlanTier) -> TierPrice {
    PACKAGE_PRICES[tier_index(tier)]
}

pub fn zones(category: AreaCategory) -> &'static [&'static str] {
    match category {
        AreaCategory::Large => LARGE_ZONES,
        AreaCategory::Medium => MEDIUM_ZONES,
        AreaCategory::Small => SMALL_ZONES,
    }
}

pub fn category_of(zone: &str) -> Option<AreaCategory> {
    AreaCategory::ALL
        .into_iter()
        .find(|&c| zones(c).contains(&zone))
}

impl Area {
    /// Build an area from a catalog zone name. `None` for unknown zones.
    pub fn from_zone(name: &str) -> Option<Self> {
        category_of(name).map(|c| Area::new(c, name))
    }
}

/// All catalog zones as areas, grouped by category in catalog order.
pub fn all_areas() -> Vec<Area> {
    AreaCategory::ALL
        .into_iter()
        .flat_map(|c| zones(c).iter().map(move |z| Area::new(c, *z)))
        .collect()
}
