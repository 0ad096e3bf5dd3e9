// SPDX-License-Identifier: MIT

//! Dashboard statistics integration tests.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn stats_for_empty_account() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    let (status, body) = app
        .request("GET", "/api/dashboard/stats", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalContacts"], 0);
    assert_eq!(body["reachedOut"], 0);
    assert_eq!(body["responded"], 0);
    assert_eq!(body["responseRate"], 0.0);
    assert_eq!(body["topFirms"], json!([]));
    assert_eq!(body["recentContacts"], json!([]));
}

#[tokio::test]
async fn stats_counts_and_rounds_response_rate() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    // 3 reached out, 1 responded: 33.3% after rounding to one decimal
    app.create_contact(&token, json!({ "fullName": "A", "reachedOut": true }))
        .await;
    app.create_contact(&token, json!({ "fullName": "B", "reachedOut": true }))
        .await;
    app.create_contact(
        &token,
        json!({ "fullName": "C", "reachedOut": true, "responded": true }),
    )
    .await;
    app.create_contact(&token, json!({ "fullName": "D" })).await;

    let (_, body) = app
        .request("GET", "/api/dashboard/stats", Some(&token), None)
        .await;

    assert_eq!(body["totalContacts"], 4);
    assert_eq!(body["reachedOut"], 3);
    assert_eq!(body["responded"], 1);
    assert_eq!(body["responseRate"], 33.3);
}

#[tokio::test]
async fn top_firms_break_ties_by_first_appearance() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    // Alpha and Beta tie on 3; Alpha was seen first so it must rank first.
    for (name, firm) in [
        ("c1", "Alpha"),
        ("c2", "Beta"),
        ("c3", "Alpha"),
        ("c4", "Beta"),
        ("c5", "Alpha"),
        ("c6", "Beta"),
        ("c7", "Gamma"),
    ] {
        app.create_contact(&token, json!({ "fullName": name, "firm": firm }))
            .await;
    }

    let (_, body) = app
        .request("GET", "/api/dashboard/stats", Some(&token), None)
        .await;

    let firms: Vec<(&str, u64)> = body["topFirms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| (f["name"].as_str().unwrap(), f["count"].as_u64().unwrap()))
        .collect();
    assert_eq!(firms, vec![("Alpha", 3), ("Beta", 3), ("Gamma", 1)]);
}

#[tokio::test]
async fn recent_contacts_newest_first_capped_at_five() {
    let app = common::create_test_app().await;
    let (_, token) = app.register_user("ada@example.com", "Ada").await;

    for i in 1..=7 {
        app.create_contact(
            &token,
            json!({ "fullName": format!("Contact {i}"), "jobTitle": "Engineer" }),
        )
        .await;
    }

    let (_, body) = app
        .request("GET", "/api/dashboard/stats", Some(&token), None)
        .await;

    let recent = body["recentContacts"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["name"], "Contact 7");
    assert_eq!(recent[4]["name"], "Contact 3");
    // Role falls back to the job title when unset
    assert_eq!(recent[0]["role"], "Engineer");
}

#[tokio::test]
async fn stats_ignore_other_users() {
    let app = common::create_test_app().await;
    let (_, ada) = app.register_user("ada@example.com", "Ada").await;
    let (_, bob) = app.register_user("bob@example.com", "Bob").await;

    app.create_contact(&ada, json!({ "fullName": "Ada's", "reachedOut": true }))
        .await;

    let (_, body) = app
        .request("GET", "/api/dashboard/stats", Some(&bob), None)
        .await;
    assert_eq!(body["totalContacts"], 0);
}
