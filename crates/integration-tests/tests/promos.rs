//! Promo validation over HTTP.
//!
//! Codes used here are expected to be absent from the database, so the
//! accepted path is covered by the engine's unit tests instead.

use giftly_integration_tests::{client, guest_token, post};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn cart() -> Value {
    json!([
        { "product_id": 1, "vendor_id": 1, "quantity": 2, "subtotal": "40.00" },
        { "product_id": 2, "vendor_id": 2, "quantity": 1, "subtotal": "15.50" }
    ])
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_validate_requires_token() {
    let resp = post(&client(), "/api/promos/validate")
        .json(&json!({ "code": "WELCOME10", "items": cart() }))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["error"], "Missing bearer token");
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_validate_rejects_unknown_token() {
    let resp = post(&client(), "/api/promos/validate")
        .bearer_auth("gft_not-a-real-token")
        .json(&json!({ "code": "WELCOME10", "items": cart() }))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and GIFTLY_TEST_TOKEN"]
async fn test_validate_missing_code() {
    let Some(token) = guest_token() else { return };

    let resp = post(&client(), "/api/promos/validate")
        .bearer_auth(token)
        .json(&json!({ "items": cart() }))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["valid"], false);
    assert_eq!(body["error"], "Promo code is required");
}

#[tokio::test]
#[ignore = "Requires running server and GIFTLY_TEST_TOKEN"]
async fn test_validate_unknown_code() {
    let Some(token) = guest_token() else { return };

    let resp = post(&client(), "/api/promos/validate")
        .bearer_auth(token)
        .json(&json!({ "code": "NO-SUCH-CODE-42", "items": cart() }))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["valid"], false);
    assert_eq!(body["error"], "Promo code not found");
}

#[tokio::test]
#[ignore = "Requires running server and GIFTLY_TEST_TOKEN"]
async fn test_shop_validate_requires_vendor() {
    let Some(token) = guest_token() else { return };

    let resp = post(&client(), "/api/shop/promos/validate")
        .bearer_auth(token)
        .json(&json!({ "code": "WELCOME10", "items": cart() }))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["error"], "vendor_id is required");
}

#[tokio::test]
#[ignore = "Requires running server and GIFTLY_TEST_TOKEN"]
async fn test_validate_malformed_body() {
    let Some(token) = guest_token() else { return };

    let resp = post(&client(), "/api/promos/validate")
        .bearer_auth(token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["valid"], false);
}
