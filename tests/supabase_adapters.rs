//! Hosted backend adapters against a mock PostgREST/GoTrue server.

use clinic_admin::adapters::supabase::{
    SupabaseAuthAdapter, SupabaseClient, SupabaseMembershipStore,
};
use clinic_admin::domain::{
    Area, DomainError, MembershipPatch, MembershipStatus, MembershipType, NewMembership,
    PlanTier, SignInOutcome,
};
use clinic_admin::ports::{AuthPort, MembershipStore};
use httpmock::Method::PATCH;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;

const ANON_KEY: &str = "anon-test-key";

fn adapters(server: &MockServer) -> (Arc<SupabaseClient>, SupabaseAuthAdapter, SupabaseMembershipStore) {
    let client = Arc::new(SupabaseClient::new(server.base_url(), ANON_KEY));
    let auth = SupabaseAuthAdapter::new(Arc::clone(&client));
    let store = SupabaseMembershipStore::new(Arc::clone(&client));
    (client, auth, store)
}

fn record_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "client_name": name,
        "client_phone": "5512345678",
        "client_email": "ana@example.com",
        "membership_type": "individual",
        "plan_name": "completa",
        "areas": [{"category": "grandes", "name": "Brazos"}],
        "monthly_payment": 675.0,
        "initial_payment": 675,
        "total_sessions": 9,
        "completed_sessions": 0,
        "start_date": "2024-05-01",
        "end_date": null,
        "status": "activa",
        "notes": null,
        "created_at": "2024-05-01T10:00:00+00:00",
        "updated_at": "2024-05-01T10:00:00+00:00"
    })
}

fn new_membership() -> NewMembership {
    NewMembership {
        client_name: "Ana Lopez Garcia".into(),
        client_phone: "5512345678".into(),
        client_email: Some("ana@example.com".into()),
        membership_type: MembershipType::Custom,
        plan_name: PlanTier::Complete,
        areas: vec![
            Area::from_zone("Brazos").unwrap(),
            Area::from_zone("Abdomen").unwrap(),
        ],
        monthly_payment: 940,
        initial_payment: 940,
        total_sessions: 9,
        start_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        notes: None,
    }
}

#[tokio::test]
async fn test_sign_in_stores_token_for_store_requests() {
    let server = MockServer::start_async().await;
    let token_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/v1/token")
                .query_param("grant_type", "password")
                .header("apikey", ANON_KEY)
                .json_body(json!({"email": "admin@clinic.mx", "password": "s3cret"}));
            then.status(200).json_body(json!({
                "access_token": "user-jwt",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "r",
                "user": {"id": "u1", "email": "admin@clinic.mx"}
            }));
        })
        .await;
    let list_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/memberships")
                .query_param("select", "*")
                .query_param("order", "created_at.desc")
                .header("apikey", ANON_KEY)
                .header("Authorization", "Bearer user-jwt");
            then.status(200)
                .json_body(json!([record_json("b", "Bea Ruiz Soto"), record_json("a", "Ana Lopez Garcia")]));
        })
        .await;

    let (client, auth, store) = adapters(&server);
    let outcome = auth
        .sign_in_with_password("admin@clinic.mx", "s3cret")
        .await
        .unwrap();
    match outcome {
        SignInOutcome::Authenticated(session) => {
            assert_eq!(session.access_token, "user-jwt");
            assert_eq!(session.user_email.as_deref(), Some("admin@clinic.mx"));
        }
        other => panic!("expected session, got {:?}", other),
    }
    assert_eq!(client.access_token().await.as_deref(), Some("user-jwt"));

    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "b");
    assert_eq!(records[0].monthly_payment, 675);
    assert_eq!(records[1].status, MembershipStatus::Active);

    token_mock.assert_async().await;
    list_mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_credentials_are_an_outcome() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/v1/token");
            then.status(400).json_body(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            }));
        })
        .await;

    let (client, auth, _) = adapters(&server);
    let outcome = auth
        .sign_in_with_password("admin@clinic.mx", "wrong")
        .await
        .unwrap();
    assert_eq!(outcome, SignInOutcome::InvalidCredentials);
    assert!(client.access_token().await.is_none());
}

#[tokio::test]
async fn test_auth_server_failure_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/v1/token");
            then.status(503).body("upstream down");
        })
        .await;

    let (_, auth, _) = adapters(&server);
    let err = auth
        .sign_in_with_password("admin@clinic.mx", "s3cret")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(_)));
}

#[tokio::test]
async fn test_sign_out_clears_token() {
    let server = MockServer::start_async().await;
    let logout = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/v1/logout")
                .header("Authorization", "Bearer user-jwt");
            then.status(204);
        })
        .await;

    let (client, auth, _) = adapters(&server);
    client.set_access_token(Some("user-jwt".into())).await;
    auth.sign_out().await.unwrap();
    assert!(client.access_token().await.is_none());
    logout.assert_async().await;

    // Nothing to revoke: no request is made.
    auth.sign_out().await.unwrap();
    logout.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_insert_returns_assigned_id() {
    let server = MockServer::start_async().await;
    let insert = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/memberships")
                .header("Prefer", "return=representation")
                .header("Authorization", format!("Bearer {}", ANON_KEY))
                .json_body_partial(
                    r#"{"client_name": "Ana Lopez Garcia", "membership_type": "personalizada", "plan_name": "completa", "monthly_payment": 940, "start_date": "2024-05-01"}"#,
                );
            then.status(201)
                .json_body(json!([record_json("9d2e", "Ana Lopez Garcia")]));
        })
        .await;

    let (_, _, store) = adapters(&server);
    let id = store.insert(&new_membership()).await.unwrap();
    assert_eq!(id, "9d2e");
    insert.assert_async().await;
}

#[tokio::test]
async fn test_update_and_delete_target_one_row() {
    let server = MockServer::start_async().await;
    let patch_mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/rest/v1/memberships")
                .query_param("id", "eq.abc")
                .json_body(json!({"status": "pausada", "notes": null}));
            then.status(204);
        })
        .await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/rest/v1/memberships")
                .query_param("id", "eq.abc");
            then.status(204);
        })
        .await;

    let (_, _, store) = adapters(&server);
    let patch = MembershipPatch {
        status: Some(MembershipStatus::Paused),
        notes: Some(None),
        ..Default::default()
    };
    store.update("abc", &patch).await.unwrap();
    store.delete("abc").await.unwrap();

    patch_mock.assert_async().await;
    delete_mock.assert_async().await;
}

#[tokio::test]
async fn test_store_failure_maps_to_store_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/memberships");
            then.status(500).body("boom");
        })
        .await;

    let (_, _, store) = adapters(&server);
    let err = store.list().await.unwrap_err();
    assert!(matches!(err, DomainError::Store(_)));
}
