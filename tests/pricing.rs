//! Quote calculator scenarios through the public API.

use clinic_admin::domain::catalog::{package_price, tier_price};
use clinic_admin::domain::{Area, AreaCategory, AreaSelection, MembershipType, PlanTier, calculate_quote};

fn areas(zones: &[&str]) -> Vec<Area> {
    zones.iter().map(|z| Area::from_zone(z).unwrap()).collect()
}

#[test]
fn test_single_large_area_complete() {
    let q = calculate_quote(&areas(&["Brazos"]), PlanTier::Complete);
    assert_eq!(q.membership_type, MembershipType::Individual);
    assert_eq!(q.monthly_payment, 675);
    assert_eq!(q.initial_payment, 675);
    assert_eq!(q.total_sessions, 9);
    assert_eq!(q.savings, 0);
}

#[test]
fn test_two_areas_get_twenty_percent_off() {
    let q = calculate_quote(&areas(&["Brazos", "Abdomen"]), PlanTier::Complete);
    assert_eq!(q.membership_type, MembershipType::Custom);
    assert_eq!(q.individual_total, 1175);
    assert_eq!(q.monthly_payment, 940);
    assert_eq!(q.savings, 235);
    assert_eq!(q.total_sessions, 9);
}

#[test]
fn test_five_areas_use_package_price() {
    let picked = areas(&["Manos", "Pies", "Bigote", "Axilas", "Brazos"]);
    let q = calculate_quote(&picked, PlanTier::Essential);
    assert_eq!(q.membership_type, MembershipType::Package);
    assert_eq!(q.monthly_payment, package_price(PlanTier::Essential).monthly);
    assert_eq!(q.total_sessions, 6);

    // Package price ignores which zones were picked.
    let other = calculate_quote(
        &areas(&["Piernas Completas", "Espalda", "Brazos", "Pecho", "Rostro"]),
        PlanTier::Essential,
    );
    assert_eq!(other.monthly_payment, q.monthly_payment);
}

#[test]
fn test_discount_by_area_count() {
    for (zones, pct) in [
        (&["Manos", "Pies"][..], 80),
        (&["Manos", "Pies", "Bigote"][..], 75),
        (&["Manos", "Pies", "Bigote", "Nuca"][..], 70),
    ] {
        let picked = areas(zones);
        let total: u32 = picked
            .iter()
            .map(|a| tier_price(a.category, PlanTier::Platinum).monthly)
            .sum();
        let q = calculate_quote(&picked, PlanTier::Platinum);
        assert_eq!(q.monthly_payment, (total * pct + 50) / 100);
        assert_eq!(q.savings, total - q.monthly_payment);
    }
}

#[test]
fn test_selection_refuses_duplicates() {
    let mut sel = AreaSelection::new();
    assert!(sel.add(Area::new(AreaCategory::Large, "Brazos")));
    assert!(!sel.add(Area::new(AreaCategory::Large, "Brazos")));
    assert_eq!(sel.len(), 1);
    assert_eq!(sel.quote(PlanTier::Complete), calculate_quote(sel.areas(), PlanTier::Complete));
}
