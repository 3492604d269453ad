//! Checkout: validation first, then exactly one order request.

use axum::http::StatusCode;
use freshcart_integration_tests::wiremock::matchers::{body_json, header, method, path};
use freshcart_integration_tests::wiremock::{Mock, ResponseTemplate};
use freshcart_integration_tests::TestApp;
use serde_json::json;

async fn signed_in() -> (TestApp, String) {
    let app = TestApp::spawn().await;
    app.mock_sign_in().await;
    app.mock_cart(1).await;
    let cookie = app.sign_in().await;
    (app, cookie)
}

#[tokio::test]
async fn invalid_phone_renders_field_error_without_requests() {
    let (app, cookie) = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders/cart-1"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.api)
        .await;
    let before = app.api.received_requests().await.unwrap().len();

    let response = app
        .post(
            "/checkout",
            &[("details", "12 Nile Street"), ("phone", "123"), ("city", "Cairo")],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Invalid Egyptian phone number"));
    // The form keeps what was typed.
    assert!(response.body.contains("12 Nile Street"));

    let after = app.api.received_requests().await.unwrap().len();
    assert_eq!(before, after);
}

#[tokio::test]
async fn empty_form_lists_every_required_field() {
    let (app, cookie) = signed_in().await;

    let response = app
        .post(
            "/checkout",
            &[("details", ""), ("phone", ""), ("city", "")],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Address details are required"));
    assert!(response.body.contains("Phone number is required"));
    assert!(response.body.contains("City is required"));
}

#[tokio::test]
async fn valid_form_places_one_order_and_redirects() {
    let (app, cookie) = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders/cart-1"))
        .and(header("token", "test-token"))
        .and(body_json(json!({
            "shippingAddress": {
                "details": "12 Nile Street",
                "phone": "01012345678",
                "city": "Cairo"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": {
                "_id": "order-1",
                "totalOrderPrice": 149,
                "paymentMethodType": "cash",
                "isPaid": false,
                "isDelivered": false,
                "cartItems": []
            }
        })))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .post(
            "/checkout",
            &[
                ("details", "12 Nile Street"),
                ("phone", "01012345678"),
                ("city", "Cairo"),
            ],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/allorders"));
}

#[tokio::test]
async fn failed_order_shows_message() {
    let (app, cookie) = signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders/cart-1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .post(
            "/checkout",
            &[
                ("details", "12 Nile Street"),
                ("phone", "01012345678"),
                ("city", "Cairo"),
            ],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Failed to place order. Please try again."));
}

#[tokio::test]
async fn order_history_uses_stored_user_id() {
    let (app, cookie) = signed_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders/user/user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.api)
        .await;

    let page = app.get("/allorders", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("You have no orders yet."));
}
