//! Protected pages require a token; public pages do not.

use axum::http::StatusCode;
use freshcart_integration_tests::TestApp;

#[tokio::test]
async fn protected_pages_redirect_to_login_without_token() {
    let app = TestApp::spawn().await;

    for uri in [
        "/",
        "/products",
        "/products?page=2",
        "/productdetails/prod-1/Electronics",
        "/cart",
        "/checkout",
        "/allorders",
        "/about",
    ] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(response.location(), Some("/login"), "GET {uri}");
    }

    let response = app.post("/cart/add", &[("product_id", "prod-1")], None).await;
    assert_eq!(response.location(), Some("/login"));

    // The guard answers before anything reaches the API.
    assert!(app.api.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn public_pages_render_without_token() {
    let app = TestApp::spawn().await;

    let login = app.get("/login", None).await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body.contains("Login now"));

    let register = app.get("/register", None).await;
    assert_eq!(register.status, StatusCode::OK);

    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body, "ok");
}

#[tokio::test]
async fn unknown_path_renders_not_found() {
    let app = TestApp::spawn().await;

    let response = app.get("/no-such-page", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("/no-such-page"));
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::spawn().await;

    let response = app.get("/health", None).await;
    assert!(response.headers.contains_key("x-request-id"));
}
