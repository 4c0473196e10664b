//! Per-route request budgets exercised over HTTP.

mod common;

use std::net::SocketAddr;

use actix_web::test;

use common::{init_app, test_state, MockAppwrite};

fn peer(addr: &str) -> SocketAddr {
    addr.parse().unwrap()
}

fn login_request(peer_addr: SocketAddr) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/v1/auth/login")
        .peer_addr(peer_addr)
        .set_json(serde_json::json!({
            "email": "limited@x.com",
            "password": "wrong-password",
        }))
        .to_request()
}

#[actix_web::test]
async fn eleventh_login_within_window_is_limited() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    // Ten failed logins consume the full budget (limit 10/min)
    for _ in 0..10 {
        let resp = test::call_service(&app, login_request(peer("10.1.1.1:40000"))).await;
        assert_eq!(resp.status().as_u16(), 401);
    }

    let resp = test::call_service(&app, login_request(peer("10.1.1.1:40000"))).await;
    assert_eq!(resp.status().as_u16(), 429);

    let retry_after: u64 = resp
        .headers()
        .get("retry-after")
        .expect("429 must carry Retry-After")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1 && retry_after <= 60);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(body["status"], 429);
}

#[actix_web::test]
async fn other_clients_keep_their_own_budget() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    for _ in 0..=10 {
        test::call_service(&app, login_request(peer("10.1.1.1:40000"))).await;
    }

    // Exhausted for 10.1.1.1, but 10.1.1.2 is untouched
    let resp = test::call_service(&app, login_request(peer("10.1.1.2:40000"))).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_web::test]
async fn register_budget_is_separate_from_login() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    for _ in 0..=10 {
        test::call_service(&app, login_request(peer("10.1.1.3:40000"))).await;
    }

    // Login budget exhausted; register still within its own quota
    let req = test::TestRequest::post()
        .uri("/v1/auth/register")
        .peer_addr(peer("10.1.1.3:40000"))
        .set_json(serde_json::json!({
            "email": "separate@x.com",
            "password": "password1",
            "name": "S",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
}

#[actix_web::test]
async fn refresh_is_not_rate_limited() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    // Well past every other route's budget; refresh must never answer 429
    for _ in 0..15 {
        let req = test::TestRequest::post()
            .uri("/v1/auth/refresh")
            .peer_addr(peer("10.1.1.4:40000"))
            .set_json(serde_json::json!({ "refresh_token": "not-a-real-token" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401);
    }
}
