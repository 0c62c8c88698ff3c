mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_cross_tenant_note_access_looks_like_missing_note() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "acme").await;
    let globex = app.signup("Globex", "globex").await;

    let created = app.create_note(&acme.token, "Acme secret").await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let note_id = parse_body(created).await["note"]["id"].as_str().unwrap().to_string();

    let missing_uri = format!("/notes/{}", uuid::Uuid::new_v4());
    let foreign_uri = format!("/notes/{}", note_id);
    let update = json!({ "title": "Hijacked", "content": "Hijacked" });

    for (method, body) in [("GET", None), ("PUT", Some(update.clone())), ("DELETE", None)] {
        let missing = app.request(method, &missing_uri, Some(&globex.token), body.clone()).await;
        let foreign = app.request(method, &foreign_uri, Some(&globex.token), body).await;

        assert_eq!(foreign.status(), StatusCode::NOT_FOUND, "{}", method);
        assert_eq!(missing.status(), foreign.status(), "{}", method);
        assert_eq!(parse_body(missing).await, parse_body(foreign).await, "{}", method);
    }

    // The note survived every attempt.
    let still_there = app.request("GET", &foreign_uri, Some(&acme.token), None).await;
    assert_eq!(still_there.status(), StatusCode::OK);
    assert_eq!(parse_body(still_there).await["note"]["title"], "Acme secret");

    // And never shows up in the other tenant's listing.
    let listing = parse_body(app.request("GET", "/notes", Some(&globex.token), None).await).await;
    assert_eq!(listing["notes"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_notes_are_private_to_their_creator() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "acme").await;
    let (_, alice) = app.invite(&acme.token, "alice@acme.test", "member").await;
    let (_, bob) = app.invite(&acme.token, "bob@acme.test", "member").await;

    let created = app.create_note(&alice, "Alice only").await;
    let note_uri = format!("/notes/{}", parse_body(created).await["note"]["id"].as_str().unwrap());

    for token in [&bob, &acme.token] {
        let res = app.request("GET", &note_uri, Some(token), None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(parse_body(res).await["error"], "Note not found");

        let res = app.request("DELETE", &note_uri, Some(token), None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    let bob_list = parse_body(app.request("GET", "/notes", Some(&bob), None).await).await;
    assert!(bob_list["notes"].as_array().unwrap().is_empty());

    let alice_list = parse_body(app.request("GET", "/notes", Some(&alice), None).await).await;
    assert_eq!(alice_list["notes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cross_tenant_user_access_looks_like_missing_user() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "acme").await;
    let globex = app.signup("Globex", "globex").await;

    let uri = format!("/users/{}", globex.user_id);
    for (method, body) in [("GET", None), ("PUT", Some(json!({ "role": "member" }))), ("DELETE", None)] {
        let res = app.request(method, &uri, Some(&acme.token), body).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", method);
        assert_eq!(parse_body(res).await["error"], "User not found");
    }

    // Globex admin is untouched.
    let globex_users = parse_body(app.request("GET", "/users", Some(&globex.token), None).await).await;
    let users = globex_users["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["role"], "admin");
}

#[tokio::test]
async fn test_tenant_routes_reject_other_slugs() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "acme").await;
    app.signup("Globex", "globex").await;

    let own = app.request("GET", "/tenants/acme", Some(&acme.token), None).await;
    assert_eq!(own.status(), StatusCode::OK);
    let own_body = parse_body(own).await;
    assert_eq!(own_body["tenant"]["slug"], "acme");
    assert_eq!(own_body["tenant"]["plan"], "free");

    let other = app.request("GET", "/tenants/globex", Some(&acme.token), None).await;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(other).await["error"], "Forbidden. Cannot access other tenants.");

    let upgrade_other = app.request("POST", "/tenants/globex/upgrade", Some(&acme.token), None).await;
    assert_eq!(upgrade_other.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(upgrade_other).await["error"], "Cannot upgrade other tenants");

    // Globex stayed on the free plan.
    let globex_token = app.login("admin@globex.test", common::PASSWORD).await;
    let globex = parse_body(app.request("GET", "/tenants/globex", Some(&globex_token), None).await).await;
    assert_eq!(globex["tenant"]["plan"], "free");
}
