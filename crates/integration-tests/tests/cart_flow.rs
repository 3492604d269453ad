//! Cart mutations through the storefront's forms.

use axum::http::StatusCode;
use freshcart_integration_tests::wiremock::matchers::{body_json, header, method, path};
use freshcart_integration_tests::wiremock::{Mock, ResponseTemplate};
use freshcart_integration_tests::{TestApp, cart_body};
use serde_json::json;

#[tokio::test]
async fn add_sends_token_and_returns_to_page() {
    let app = TestApp::spawn().await;
    app.mock_sign_in().await;
    app.mock_cart(1).await;
    let cookie = app.sign_in().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/cart"))
        .and(header("token", "test-token"))
        .and(body_json(json!({"productId": "prod-2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(2)))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .post(
            "/cart/add",
            &[("product_id", "prod-2"), ("return_to", "/about")],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/about"));

    let about = app.get("/about", Some(&cookie)).await;
    assert!(about.body.contains("Product added to cart"));
    assert!(about.body.contains("data-cart-count>2<"));
}

#[tokio::test]
async fn add_rejects_offsite_return_path() {
    let app = TestApp::spawn().await;
    app.mock_sign_in().await;
    app.mock_cart(1).await;
    let cookie = app.sign_in().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(2)))
        .mount(&app.api)
        .await;

    let response = app
        .post(
            "/cart/add",
            &[("product_id", "prod-2"), ("return_to", "//evil.example")],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.location(), Some("/cart"));
}

#[tokio::test]
async fn decrement_to_zero_sends_nothing() {
    let app = TestApp::spawn().await;
    app.mock_sign_in().await;
    app.mock_cart(1).await;
    let cookie = app.sign_in().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(1)))
        .expect(0)
        .mount(&app.api)
        .await;

    let response = app
        .post(
            "/cart/update",
            &[("product_id", "prod-1"), ("quantity", "0")],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/cart"));
}

#[tokio::test]
async fn update_reports_failure_as_notice() {
    let app = TestApp::spawn().await;
    app.mock_sign_in().await;
    app.mock_cart(1).await;
    let cookie = app.sign_in().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/cart/prod-1"))
        .and(body_json(json!({"count": 4})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "fail",
            "errors": {"msg": "Invalid count"}
        })))
        .expect(1)
        .mount(&app.api)
        .await;

    app.post(
        "/cart/update",
        &[("product_id", "prod-1"), ("quantity", "4")],
        Some(&cookie),
    )
    .await;

    let about = app.get("/about", Some(&cookie)).await;
    assert!(about.body.contains("Failed to update quantity: fail"));
    // Count unchanged by a failed mutation.
    assert!(about.body.contains("data-cart-count>1<"));
}

#[tokio::test]
async fn clear_zeroes_badge() {
    let app = TestApp::spawn().await;
    app.mock_sign_in().await;
    app.mock_cart(4).await;
    let cookie = app.sign_in().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "success"})))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app.post("/cart/clear", &[], Some(&cookie)).await;
    assert_eq!(response.location(), Some("/cart"));

    let about = app.get("/about", Some(&cookie)).await;
    assert!(about.body.contains("Cart cleared"));
    assert!(about.body.contains("data-cart-count>0<"));
}

#[tokio::test]
async fn cart_page_lists_lines() {
    let app = TestApp::spawn().await;
    app.mock_sign_in().await;
    app.mock_cart(2).await;
    let cookie = app.sign_in().await;

    let page = app.get("/cart", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Woman Shawl Cotton"));
    assert!(page.body.contains("298 EGP"));
}
