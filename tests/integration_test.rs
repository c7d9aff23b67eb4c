mod common;

use actix_web::cookie::Cookie;
use actix_web::test;
use serde_json::json;
use serial_test::serial;

use common::{cleanup_test_data, make_admin_token, TestApp};

#[actix_rt::test]
#[serial]
async fn test_full_api_integration() {
    let test_app = TestApp::new().await;

    // Clean up any existing test data
    cleanup_test_data(&test_app.client).await;

    let app = test::init_service(test_app.create_app()).await;

    // Test 1: Health check
    let req = test::TestRequest::get().uri("/health").to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    println!("✓ Health check passed");

    // Test 2: Auth status reports unauthenticated without the cookie
    let req = test::TestRequest::get().uri("/api/auth/status").to_request();

    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["authenticated"], json!(false));
    println!("✓ Auth status endpoint passed");

    // Test 3: Login rejects incomplete credentials
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&json!({ "email": "admin@example.com" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    println!("✓ Login validation passed");

    // Test 4: Dashboard data requires the admin cookie
    for endpoint in ["/api/trips", "/api/stats", "/api/opt-outs"] {
        let req = test::TestRequest::get().uri(endpoint).to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401, "expected 401 for {}", endpoint);
    }
    println!("✓ Protected endpoints rejected without auth");

    // Test 5: The same endpoints respond once the cookie is present
    for endpoint in ["/api/trips", "/api/stats", "/api/opt-outs"] {
        let req = test::TestRequest::get()
            .uri(endpoint)
            .cookie(Cookie::new("admin-token", make_admin_token(1)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success(), "expected success for {}", endpoint);
    }
    println!("✓ Protected endpoints responded with auth");

    // Test 6: Logout clears the cookie
    let req = test::TestRequest::post().uri("/api/auth/logout").to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    println!("✓ Logout passed");
}

// Test cleanup after each run
#[actix_rt::test]
#[serial]
async fn test_cleanup() {
    let test_app = TestApp::new().await;
    cleanup_test_data(&test_app.client).await;
}
