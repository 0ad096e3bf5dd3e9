// SPDX-License-Identifier: MIT

//! Contact CRUD, filtering, referral, and ownership integration tests.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn create_and_fetch_contact() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    let id = app
        .create_contact(
            &token,
            json!({
                "fullName": "Linus Benedict",
                "firm": "Kernel Labs",
                "role": "Maintainer",
                "email": "linus@kernel.example",
                "reachedOut": true,
            }),
        )
        .await;

    let (status, body) = app
        .request("GET", &format!("/api/contacts/{id}"), Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "Linus Benedict");
    assert_eq!(body["firm"], "Kernel Labs");
    assert_eq!(body["reachedOut"], true);
    assert_eq!(body["responded"], false);
    assert_eq!(body["referredBy"], serde_json::Value::Null);
    assert_eq!(body["notes"], json!([]));
}

#[tokio::test]
async fn create_requires_full_name() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/contacts",
            Some(&token),
            Some(json!({ "firm": "Anonymous Inc" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Full name is required");

    // Whitespace-only names are rejected too
    let (status, _) = app
        .request(
            "POST",
            "/api/contacts",
            Some(&token),
            Some(json!({ "fullName": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_is_newest_first_and_filterable() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    app.create_contact(&token, json!({ "fullName": "First", "firm": "Acme" }))
        .await;
    app.create_contact(
        &token,
        json!({ "fullName": "Second", "firm": "Globex", "reachedOut": true }),
    )
    .await;
    app.create_contact(
        &token,
        json!({ "fullName": "Third", "firm": "Acme", "reachedOut": true, "responded": true }),
    )
    .await;

    let (status, body) = app.request("GET", "/api/contacts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["fullName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);

    let (_, body) = app
        .request("GET", "/api/contacts?firm=Acme", Some(&token), None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app
        .request(
            "GET",
            "/api/contacts?reachedOut=true&responded=false",
            Some(&token),
            None,
        )
        .await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["fullName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second"]);

    // Substring search spans name, firm, role, and email
    let (_, body) = app
        .request("GET", "/api/contacts?search=glob", Some(&token), None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["fullName"], "Second");
}

#[tokio::test]
async fn referral_links_appear_on_both_sides() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    let referrer = app
        .create_contact(&token, json!({ "fullName": "Referrer" }))
        .await;
    let referred = app
        .create_contact(
            &token,
            json!({ "fullName": "Referred", "referredById": referrer }),
        )
        .await;

    let (_, body) = app
        .request("GET", &format!("/api/contacts/{referred}"), Some(&token), None)
        .await;
    assert_eq!(body["referredBy"]["id"], referrer.as_str());
    assert_eq!(body["referredBy"]["fullName"], "Referrer");

    let (_, body) = app
        .request("GET", &format!("/api/contacts/{referrer}"), Some(&token), None)
        .await;
    assert_eq!(body["referredContacts"][0]["id"], referred.as_str());
    assert_eq!(body["referredContacts"][0]["fullName"], "Referred");
}

#[tokio::test]
async fn referrer_must_belong_to_same_user() {
    let app = common::create_test_app().await;
    let (_, ada) = app.register_user("ada@example.com", "Ada").await;
    let (_, bob) = app.register_user("bob@example.com", "Bob").await;

    let adas_contact = app
        .create_contact(&ada, json!({ "fullName": "Ada's Contact" }))
        .await;

    let (status, body) = app
        .request(
            "POST",
            "/api/contacts",
            Some(&bob),
            Some(json!({ "fullName": "Bob's Contact", "referredById": adas_contact })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Invalid referrer");

    // The update path revalidates a changed referrer the same way
    let bobs_contact = app
        .create_contact(&bob, json!({ "fullName": "Bob's Contact" }))
        .await;
    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/contacts/{bobs_contact}"),
            Some(&bob),
            Some(json!({ "referredById": adas_contact })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Invalid referrer");
}

#[tokio::test]
async fn update_merges_patch_and_clears_nulls() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    let id = app
        .create_contact(
            &token,
            json!({
                "fullName": "Patch Target",
                "firm": "Old Firm",
                "email": "old@example.com",
            }),
        )
        .await;

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/contacts/{id}"),
            Some(&token),
            Some(json!({
                "firm": "New Firm",
                "email": null,
                "responded": true,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    // Omitted fields untouched, provided fields replaced, nulls cleared
    assert_eq!(body["fullName"], "Patch Target");
    assert_eq!(body["firm"], "New Firm");
    assert_eq!(body["email"], serde_json::Value::Null);
    assert_eq!(body["responded"], true);
}

#[tokio::test]
async fn update_can_detach_referrer() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    let referrer = app
        .create_contact(&token, json!({ "fullName": "Referrer" }))
        .await;
    let referred = app
        .create_contact(
            &token,
            json!({ "fullName": "Referred", "referredById": referrer }),
        )
        .await;

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/contacts/{referred}"),
            Some(&token),
            Some(json!({ "referredById": null })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["referredBy"], serde_json::Value::Null);
}

#[tokio::test]
async fn delete_contact_cascades_notes_and_detaches_referrals() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    let referrer = app
        .create_contact(&token, json!({ "fullName": "Referrer" }))
        .await;
    let referred = app
        .create_contact(
            &token,
            json!({ "fullName": "Referred", "referredById": referrer }),
        )
        .await;
    let (status, _) = app
        .request(
            "POST",
            "/api/notes",
            Some(&token),
            Some(json!({ "contactId": referrer, "content": "met at conf" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request("DELETE", &format!("/api/contacts/{referrer}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Contact deleted successfully");

    // Gone for real
    let (status, _) = app
        .request("GET", &format!("/api/contacts/{referrer}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Referred contact survives with the link cleared
    let (status, body) = app
        .request("GET", &format!("/api/contacts/{referred}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["referredBy"], serde_json::Value::Null);
}

#[tokio::test]
async fn contacts_are_invisible_across_users() {
    let app = common::create_test_app().await;
    let (_, ada) = app.register_user("ada@example.com", "Ada").await;
    let (_, bob) = app.register_user("bob@example.com", "Bob").await;

    let id = app
        .create_contact(&ada, json!({ "fullName": "Ada's Contact" }))
        .await;

    // Bob's list excludes it
    let (_, body) = app.request("GET", "/api/contacts", Some(&bob), None).await;
    assert_eq!(body, json!([]));

    // Every per-id route answers 404 for Bob, identical to a missing id
    let (get_status, get_body) = app
        .request("GET", &format!("/api/contacts/{id}"), Some(&bob), None)
        .await;
    let (missing_status, missing_body) = app
        .request("GET", "/api/contacts/no-such-id", Some(&bob), None)
        .await;
    assert_eq!(get_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(get_body, missing_body);

    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/contacts/{id}"),
            Some(&bob),
            Some(json!({ "firm": "Hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request("DELETE", &format!("/api/contacts/{id}"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Ada's contact is untouched
    let (status, body) = app
        .request("GET", &format!("/api/contacts/{id}"), Some(&ada), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firm"], serde_json::Value::Null);
}

#[tokio::test]
async fn list_includes_referral_link_and_latest_note() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    let referrer = app
        .create_contact(&token, json!({ "fullName": "Referrer" }))
        .await;
    let referred = app
        .create_contact(
            &token,
            json!({ "fullName": "Referred", "referredById": referrer }),
        )
        .await;

    for content in ["older note", "newest note"] {
        let (status, _) = app
            .request(
                "POST",
                "/api/notes",
                Some(&token),
                Some(json!({ "contactId": referred, "content": content })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app.request("GET", "/api/contacts", Some(&token), None).await;
    let entry = body
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == referred.as_str())
        .unwrap();

    assert_eq!(entry["referredBy"]["fullName"], "Referrer");
    // Single most recent note, not the full history
    assert_eq!(entry["notes"].as_array().unwrap().len(), 1);
    assert_eq!(entry["notes"][0]["content"], "newest note");
}
