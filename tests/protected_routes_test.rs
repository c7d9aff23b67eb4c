mod common;

use actix_web::cookie::Cookie;
use actix_web::test;
use serial_test::serial;

use common::{make_admin_token, TestApp};

const PROTECTED_ENDPOINTS: [&str; 7] = [
    "/api/trips",
    "/api/trips/1",
    "/api/clients",
    "/api/stats",
    "/api/configs",
    "/api/logs",
    "/api/opt-outs",
];

#[actix_rt::test]
#[serial]
async fn test_protected_routes_without_auth() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    for endpoint in PROTECTED_ENDPOINTS {
        let req = test::TestRequest::get().uri(endpoint).to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401, "expected 401 for {}", endpoint);
    }
}

#[actix_rt::test]
#[serial]
async fn test_protected_route_with_garbage_cookie() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/trips")
        .cookie(Cookie::new("admin-token", "not-a-jwt"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
#[serial]
async fn test_protected_route_with_expired_token() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    // Expired an hour ago, well past the validation leeway.
    let req = test::TestRequest::get()
        .uri("/api/trips")
        .cookie(Cookie::new("admin-token", make_admin_token(-1)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
#[serial]
async fn test_protected_route_with_valid_cookie() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/trips")
        .cookie(Cookie::new("admin-token", make_admin_token(1)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_rt::test]
#[serial]
async fn test_protected_route_with_bearer_header() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/stats")
        .insert_header((
            "Authorization",
            format!("Bearer {}", make_admin_token(1)),
        ))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
