//! Local fallback store and JSON state file on a temp directory.

use chrono::NaiveDate;
use clinic_admin::adapters::clock::SystemClock;
use clinic_admin::adapters::persistence::{SqliteMembershipStore, StateJson};
use clinic_admin::domain::{
    Area, GuardStatus, MembershipPatch, MembershipStatus, MembershipType, NewMembership,
    PlanTier,
};
use clinic_admin::ports::{Clock, MembershipStore, StatePort};
use clinic_admin::usecases::AttemptGuardService;
use std::sync::Arc;
use std::time::Duration;

fn membership(name: &str, zones: &[&str]) -> NewMembership {
    let areas: Vec<Area> = zones.iter().map(|z| Area::from_zone(z).unwrap()).collect();
    let quote = clinic_admin::domain::calculate_quote(&areas, PlanTier::Complete);
    NewMembership {
        client_name: name.into(),
        client_phone: "5512345678".into(),
        client_email: None,
        membership_type: quote.membership_type,
        plan_name: PlanTier::Complete,
        areas,
        monthly_payment: quote.monthly_payment,
        initial_payment: quote.initial_payment,
        total_sessions: quote.total_sessions,
        start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        notes: Some("first visit".into()),
    }
}

#[tokio::test]
async fn test_sqlite_store_crud() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteMembershipStore::connect(dir.path()).await.unwrap();
    assert!(store.db_path().ends_with("memberships.db"));

    let first = store
        .insert(&membership("Ana Lopez Garcia", &["Brazos"]))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = store
        .insert(&membership("Bea Ruiz Soto", &["Brazos", "Abdomen"]))
        .await
        .unwrap();
    assert_ne!(first, second);

    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, second, "newest first");
    assert_eq!(records[0].membership_type, MembershipType::Custom);
    assert_eq!(records[0].monthly_payment, 940);
    assert_eq!(records[0].areas.len(), 2);
    assert_eq!(records[1].status, MembershipStatus::Active);
    assert_eq!(records[1].completed_sessions, 0);
    assert_eq!(records[1].client_email, None);

    let patch = MembershipPatch {
        status: Some(MembershipStatus::Completed),
        completed_sessions: Some(9),
        notes: Some(None),
        ..Default::default()
    };
    store.update(&first, &patch).await.unwrap();
    let updated = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.id == first)
        .unwrap();
    assert_eq!(updated.status, MembershipStatus::Completed);
    assert_eq!(updated.progress_percent(), 100);
    assert_eq!(updated.notes, None);
    assert!(updated.updated_at >= updated.created_at);

    assert!(store.update("missing", &patch).await.is_err());

    store.delete(&second).await.unwrap();
    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, first);
}

#[tokio::test]
async fn test_sqlite_store_reopens_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = SqliteMembershipStore::connect(dir.path()).await.unwrap();
        store
            .insert(&membership("Ana Lopez Garcia", &["Brazos"]))
            .await
            .unwrap();
    }
    let store = SqliteMembershipStore::connect(dir.path()).await.unwrap();
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_state_json_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let state = StateJson::new(&path);
    state.load().await.unwrap();
    state.set("is_authenticated", "true").await.unwrap();
    state.set("login_attempts", "2").await.unwrap();
    state.remove("login_attempts").await.unwrap();
    assert!(path.exists());

    let reloaded = StateJson::new(&path);
    reloaded.load().await.unwrap();
    assert_eq!(
        reloaded.get("is_authenticated").await.unwrap().as_deref(),
        Some("true")
    );
    assert_eq!(reloaded.get("login_attempts").await.unwrap(), None);
}

#[tokio::test]
async fn test_corrupt_state_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();

    let state = StateJson::new(&path);
    state.load().await.unwrap();
    assert_eq!(state.get("pin_attempts").await.unwrap(), None);
}

#[tokio::test]
async fn test_lockout_persists_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    {
        let state = StateJson::new(&path);
        state.load().await.unwrap();
        let state: Arc<dyn StatePort> = Arc::new(state);
        let guard = AttemptGuardService::action_pin(state, Arc::clone(&clock));
        guard.load().await.unwrap();
        for _ in 0..3 {
            guard.record_failure().await.unwrap();
        }
    }

    let state = StateJson::new(&path);
    state.load().await.unwrap();
    assert!(state.get("pin_blocked_until").await.unwrap().is_some());
    let state: Arc<dyn StatePort> = Arc::new(state);
    let guard = AttemptGuardService::action_pin(state, clock);
    match guard.load().await.unwrap() {
        GuardStatus::Locked { remaining_secs } => {
            assert!(remaining_secs > 890 && remaining_secs <= 900)
        }
        other => panic!("expected lockout after restart, got {:?}", other),
    }
}
