//! Contract tests for PostgrestStore against a mocked REST interface.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET | `/rest/v1/participants` | `fetch_all_*` |
//! | GET | `/rest/v1/participants?ticketId=eq.` | `find_by_ticket_*` |
//! | POST | `/rest/v1/participants` | `insert_*` |
//! | PATCH | `/rest/v1/participants?checkedIn=is.false` | `mark_checked_in_*` |
//! | DELETE | `/rest/v1/participants?id=eq.` | `delete_*` |
//! | GET | `/rest/v1/admins` | `admin_exists_*` |

use accred_client::{attempt_check_in, PostgrestStore, StoreConfig, StoreError, TicketStore};
use accred_core::{CheckInOutcome, CheckInPolicy, ParticipantId, TicketId};
use chrono::{TimeZone, Utc};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store(server: &MockServer) -> PostgrestStore {
    PostgrestStore::new(&StoreConfig {
        url: server.uri().parse().unwrap(),
        api_key: zeroize::Zeroizing::new("anon-key".into()),
        timeout_secs: 5,
    })
    .unwrap()
}

fn row(ticket: &str, checked_in: bool) -> serde_json::Value {
    serde_json::json!({
        "id": "550e8400-e29b-41d4-a716-446655440000",
        "ticketId": ticket,
        "firstName": "Moussa",
        "lastName": "Ndiaye",
        "email": "m.ndiaye@example.sn",
        "phone": "781112233",
        "company": "Orange",
        "jobTitle": null,
        "industry": "Télécommunications",
        "interestType": "none",
        "selectedOfferings": [],
        "opinion": "",
        "referralForum": ["LinkedIn"],
        "referralAssirou": [],
        "registeredAt": "2026-02-01T10:00:00.000Z",
        "welcomeMessage": "Bienvenue",
        "checkedIn": checked_in,
        "checkedInAt": if checked_in { serde_json::json!("2026-03-05T08:30:00Z") } else { serde_json::Value::Null }
    })
}

// ── GET participants ────────────────────────────────────────────────

#[tokio::test]
async fn fetch_all_sends_keys_and_ordering() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/participants"))
        .and(query_param("select", "*"))
        .and(query_param("order", "registeredAt.desc"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([row("AS-2026-0002", true), row("AS-2026-0001", false)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let all = store(&server).fetch_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].checked_in());
    assert_eq!(all[1].job_title, "");
}

#[tokio::test]
async fn fetch_all_maps_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/participants"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = store(&server).fetch_all().await.unwrap_err();
    match err {
        StoreError::Api { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_all_rejects_inconsistent_rows() {
    let server = MockServer::start().await;
    let mut bad = row("AS-2026-0003", false);
    bad["checkedIn"] = serde_json::json!(true);
    Mock::given(method("GET"))
        .and(path("/rest/v1/participants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([bad])))
        .mount(&server)
        .await;

    let err = store(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Deserialization { .. }));
}

// ── GET participants?ticketId ───────────────────────────────────────

#[tokio::test]
async fn find_by_ticket_filters_on_ticket() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/participants"))
        .and(query_param("ticketId", "eq.AS-2026-0007"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([row("AS-2026-0007", false)])))
        .mount(&server)
        .await;

    let ticket = TicketId::normalize("as-2026-0007").unwrap();
    let found = store(&server).find_by_ticket(&ticket).await.unwrap().unwrap();
    assert_eq!(found.ticket_id, ticket);
}

#[tokio::test]
async fn find_by_ticket_returns_none_for_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/participants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let ticket = TicketId::normalize("AS-2026-9999").unwrap();
    assert!(store(&server).find_by_ticket(&ticket).await.unwrap().is_none());
}

// ── POST participants ───────────────────────────────────────────────

#[tokio::test]
async fn insert_maps_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/participants"))
        .and(header("prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let existing: accred_core::Participant = serde_json::from_value(row("AS-2026-0001", false)).unwrap();
    let err = store(&server).insert(&existing).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));
}

#[tokio::test]
async fn insert_sends_wire_shape_and_returns_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/participants"))
        .and(body_partial_json(serde_json::json!({
            "ticketId": "AS-2026-0001",
            "checkedIn": false,
            "checkedInAt": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([row("AS-2026-0001", false)])))
        .expect(1)
        .mount(&server)
        .await;

    let p: accred_core::Participant = serde_json::from_value(row("AS-2026-0001", false)).unwrap();
    let stored = store(&server).insert(&p).await.unwrap();
    assert_eq!(stored, p);
}

// ── PATCH participants (conditional check-in) ───────────────────────

#[tokio::test]
async fn mark_checked_in_only_targets_unchecked_rows() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/participants"))
        .and(query_param("ticketId", "eq.AS-2026-0007"))
        .and(query_param("checkedIn", "is.false"))
        .and(body_partial_json(serde_json::json!({
            "checkedIn": true,
            "checkedInAt": "2026-03-05T08:30:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([row("AS-2026-0007", true)])))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = TicketId::normalize("AS-2026-0007").unwrap();
    let at = Utc.with_ymd_and_hms(2026, 3, 5, 8, 30, 0).unwrap();
    let updated = store(&server).mark_checked_in(&ticket, at).await.unwrap().unwrap();
    assert_eq!(updated.checked_in_at(), Some(at));
}

#[tokio::test]
async fn check_in_writes_once_for_first_scan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/participants"))
        .and(query_param("ticketId", "eq.AS-2026-0007"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([row("AS-2026-0007", false)])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/participants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([row("AS-2026-0007", true)])))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = attempt_check_in(&store(&server), " as-2026-0007 ", CheckInPolicy::Idempotent, Utc::now())
        .await
        .unwrap();
    assert!(matches!(outcome, CheckInOutcome::CheckedIn(_)));
}

#[tokio::test]
async fn check_in_of_unknown_ticket_never_writes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/participants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = attempt_check_in(&store(&server), "AS-2026-4040", CheckInPolicy::Idempotent, Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome, CheckInOutcome::NotFound);
}

// ── DELETE participants ─────────────────────────────────────────────

#[tokio::test]
async fn delete_reports_removed_rows() {
    let server = MockServer::start().await;
    let id = ParticipantId::from_uuid("550e8400-e29b-41d4-a716-446655440000".parse().unwrap());
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/participants"))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([row("AS-2026-0001", false)])))
        .mount(&server)
        .await;

    assert!(store(&server).delete(id).await.unwrap());
}

#[tokio::test]
async fn delete_of_missing_row_is_false() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/participants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    assert!(!store(&server).delete(ParticipantId::new()).await.unwrap());
}

// ── GET admins ──────────────────────────────────────────────────────

#[tokio::test]
async fn admin_exists_matches_username_and_password() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/admins"))
        .and(query_param("username", "eq.admin"))
        .and(query_param("password", "eq.p@ss&word"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"username": "admin"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/admins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let store = store(&server);
    assert!(store.admin_exists("admin", "p@ss&word").await.unwrap());
    assert!(!store.admin_exists("admin", "nope").await.unwrap());
}

#[tokio::test]
async fn verify_admin_is_fail_closed_on_store_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/admins"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(!accred_client::verify_admin(&store(&server), "admin", "secret").await);
}
