//! Quote calculator. Maps selected areas + plan tier to payments and sessions.
//!
//! Pure: the same `(areas, tier)` always yields the same quote. The membership
//! service recomputes it before every insert/update so stored amounts match.

use crate::domain::catalog::{self, PACKAGE_MIN_AREAS};
use crate::domain::entities::{Area, MembershipType, PlanTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub membership_type: MembershipType,
    pub plan_tier: PlanTier,
    pub monthly_payment: u32,
    pub initial_payment: u32,
    pub total_sessions: u32,
    pub savings: u32,
    /// Sum of the per-area prices before any discount or package pricing.
    pub individual_total: u32,
    /// Volume discount applied to a custom selection, in percent.
    pub discount_percent: Option<u32>,
}

impl Quote {
    fn zero(plan_tier: PlanTier) -> Self {
        Self {
            membership_type: MembershipType::Individual,
            plan_tier,
            monthly_payment: 0,
            initial_payment: 0,
            total_sessions: 0,
            savings: 0,
            individual_total: 0,
            discount_percent: None,
        }
    }
}

/// 2 areas → 20%, 3 → 25%, 4 → 30%.
fn custom_discount_percent(area_count: usize) -> Option<u32> {
    match area_count {
        2 => Some(20),
        3 => Some(25),
        4 => Some(30),
        _ => None,
    }
}

/// `round(total × (100 − pct) / 100)`, half-up, in integer arithmetic.
fn apply_discount(total: u32, pct: u32) -> u32 {
    let scaled = u64::from(total) * u64::from(100 - pct);
    ((scaled + 50) / 100) as u32
}

/// Compute the quote for a selection. Callers keep `areas` free of duplicate names.
pub fn calculate_quote(areas: &[Area], tier: PlanTier) -> Quote {
    if areas.is_empty() {
        return Quote::zero(tier);
    }

    let membership_type = MembershipType::for_area_count(areas.len());

    let (individual_total, max_sessions) =
        areas.iter().fold((0u32, 0u32), |(total, sessions), area| {
            let price = catalog::tier_price(area.category, tier);
            (total + price.monthly, sessions.max(price.sessions))
        });

    let discount_percent = match membership_type {
        MembershipType::Custom => custom_discount_percent(areas.len()),
        _ => None,
    };

    let (monthly, sessions) = match membership_type {
        MembershipType::Package => {
            debug_assert!(areas.len() >= PACKAGE_MIN_AREAS);
            let package = catalog::package_price(tier);
            (package.monthly, package.sessions)
        }
        MembershipType::Individual => (individual_total, max_sessions),
        MembershipType::Custom => (
            apply_discount(individual_total, discount_percent.unwrap_or(0)),
            max_sessions,
        ),
    };

    Quote {
        membership_type,
        plan_tier: tier,
        monthly_payment: monthly,
        initial_payment: monthly,
        total_sessions: sessions,
        savings: individual_total.saturating_sub(monthly),
        individual_total,
        discount_percent,
    }
}

/// Ordered, duplicate-free area selection. Membership type is always derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaSelection {
    areas: Vec<Area>,
}

impl AreaSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing areas, dropping repeated names (first occurrence wins).
    pub fn from_areas(areas: impl IntoIterator<Item = Area>) -> Self {
        let mut sel = Self::new();
        for a in areas {
            sel.add(a);
        }
        sel
    }

    /// Returns false when an area with the same name is already selected.
    pub fn add(&mut self, area: Area) -> bool {
        if self.contains(&area.name) {
            return false;
        }
        self.areas.push(area);
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.areas.len();
        self.areas.retain(|a| a.name != name);
        self.areas.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.areas.iter().any(|a| a.name == name)
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn membership_type(&self) -> MembershipType {
        MembershipType::for_area_count(self.areas.len())
    }

    pub fn quote(&self, tier: PlanTier) -> Quote {
        calculate_quote(&self.areas, tier)
    }

    pub fn into_areas(self) -> Vec<Area> {
        self.areas
    }
}
