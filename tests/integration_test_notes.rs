mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_free_plan_limit_then_upgrade() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "acme").await;
    let (_, member) = app.invite(&acme.token, "member@acme.test", "member").await;

    for i in 1..=3 {
        let res = app.create_note(&member, &format!("Note {}", i)).await;
        assert_eq!(res.status(), StatusCode::CREATED, "note {}", i);
    }

    let blocked = app.create_note(&member, "Note 4").await;
    assert_eq!(blocked.status(), StatusCode::FORBIDDEN);
    let body = parse_body(blocked).await;
    assert_eq!(body["limitReached"], true);
    assert_eq!(body["error"], "Note limit reached. Upgrade to Pro for unlimited notes.");

    let upgraded = app.request("POST", "/tenants/acme/upgrade", Some(&acme.token), None).await;
    assert_eq!(upgraded.status(), StatusCode::OK);
    let body = parse_body(upgraded).await;
    assert_eq!(body["message"], "Tenant upgraded to Pro successfully");
    assert_eq!(body["tenant"]["plan"], "pro");
    assert_eq!(body["tenant"]["noteLimit"], -1);

    // Same token as before the upgrade.
    let res = app.create_note(&member, "Note 4").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let listing = parse_body(app.request("GET", "/notes", Some(&member), None).await).await;
    assert_eq!(listing["notes"].as_array().unwrap().len(), 4);

    // Upgrading twice is harmless.
    let again = app.request("POST", "/tenants/acme/upgrade", Some(&acme.token), None).await;
    assert_eq!(again.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_limit_is_counted_per_user() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "acme").await;
    let (_, member) = app.invite(&acme.token, "member@acme.test", "member").await;

    for i in 1..=3 {
        assert_eq!(app.create_note(&acme.token, &format!("Admin {}", i)).await.status(), StatusCode::CREATED);
    }
    assert_eq!(app.create_note(&acme.token, "Admin 4").await.status(), StatusCode::FORBIDDEN);

    assert_eq!(app.create_note(&member, "Member 1").await.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_deleting_a_note_frees_a_slot() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "acme").await;

    let mut ids = Vec::new();
    for i in 1..=3 {
        let res = app.create_note(&acme.token, &format!("Note {}", i)).await;
        ids.push(parse_body(res).await["note"]["id"].as_str().unwrap().to_string());
    }
    assert_eq!(app.create_note(&acme.token, "Note 4").await.status(), StatusCode::FORBIDDEN);

    let deleted = app.request("DELETE", &format!("/notes/{}", ids[0]), Some(&acme.token), None).await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(parse_body(deleted).await["message"], "Note deleted successfully");

    assert_eq!(app.create_note(&acme.token, "Note 4").await.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_note_crud() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "acme").await;

    let created = app.request("POST", "/notes", Some(&acme.token), Some(json!({
        "title": "  Groceries  ",
        "content": "Milk"
    }))).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let note = parse_body(created).await["note"].clone();
    assert_eq!(note["title"], "Groceries");
    assert_eq!(note["userId"], acme.user_id.as_str());
    assert_eq!(note["tenantId"], acme.tenant_id.as_str());
    let uri = format!("/notes/{}", note["id"].as_str().unwrap());

    let updated = app.request("PUT", &uri, Some(&acme.token), Some(json!({
        "title": "Groceries",
        "content": "Milk, eggs"
    }))).await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(parse_body(updated).await["note"]["content"], "Milk, eggs");

    let fetched = parse_body(app.request("GET", &uri, Some(&acme.token), None).await).await;
    assert_eq!(fetched["note"]["content"], "Milk, eggs");

    assert_eq!(app.request("DELETE", &uri, Some(&acme.token), None).await.status(), StatusCode::OK);
    assert_eq!(app.request("GET", &uri, Some(&acme.token), None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.request("DELETE", &uri, Some(&acme.token), None).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_note_validation() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "acme").await;

    let cases = [
        json!({ "content": "Body" }),
        json!({ "title": "   ", "content": "Body" }),
        json!({ "title": "t".repeat(201), "content": "Body" }),
        json!({ "title": "Title", "content": "c".repeat(10_001) }),
    ];
    for payload in cases {
        let res = app.request("POST", "/notes", Some(&acme.token), Some(payload)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    // Rejected notes do not count against the limit.
    for i in 1..=3 {
        assert_eq!(app.create_note(&acme.token, &format!("Note {}", i)).await.status(), StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_token_of_deleted_user_cannot_create_notes() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "acme").await;
    let (member_id, member) = app.invite(&acme.token, "member@acme.test", "member").await;

    let deleted = app.request("DELETE", &format!("/users/{}", member_id), Some(&acme.token), None).await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let res = app.create_note(&member, "Orphan").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(parse_body(res).await["error"], "Unauthorized");
}
