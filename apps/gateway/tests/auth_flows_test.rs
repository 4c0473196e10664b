//! End-to-end auth flows against the in-memory Appwrite stand-in.

mod common;

use std::sync::atomic::Ordering;

use actix_web::test;

use common::{init_app, register_user, test_state, MockAppwrite};

#[actix_web::test]
async fn register_returns_created_with_token_pair() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    let (status, body) = register_user(&app, "a@x.com", "password1", "A").await;

    assert_eq!(status, 201);
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(body["expires_in"], 15 * 60);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["name"], "A");
    assert_eq!(body["user"]["subscription_tier"], "free");
    assert_eq!(body["user"]["email_verified"], false);
    assert!(!body["user"]["id"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn register_duplicate_email_rejected() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    let (status, _) = register_user(&app, "dup@x.com", "password1", "First").await;
    assert_eq!(status, 201);

    let (status, body) = register_user(&app, "dup@x.com", "password2", "Second").await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "USER_ALREADY_EXISTS");
}

#[actix_web::test]
async fn register_succeeds_when_verification_email_fails() {
    let mock = MockAppwrite::new();
    mock.fail_verification.store(true, Ordering::SeqCst);
    let app = init_app(test_state(mock)).await;

    let (status, body) = register_user(&app, "flaky-mail@x.com", "password1", "F").await;

    assert_eq!(status, 201);
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn register_validates_request_body() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    let (status, body) = register_user(&app, "a@x.com", "short", "A").await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "INVALID_PASSWORD");

    let (status, body) = register_user(&app, "not-an-email", "password1", "A").await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "INVALID_EMAIL");

    let req = test::TestRequest::post()
        .uri("/v1/auth/register")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"email": "a@x.com""#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn login_returns_token_pair_for_registered_user() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    let (_, registered) = register_user(&app, "b@x.com", "password1", "B").await;

    let req = test::TestRequest::post()
        .uri("/v1/auth/login")
        .set_json(serde_json::json!({ "email": "b@x.com", "password": "password1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    // The session's user id is authoritative and matches the registered one
    assert_eq!(body["user"]["id"], registered["user"]["id"]);
    assert_eq!(body["user"]["subscription_tier"], "free");
}

#[actix_web::test]
async fn login_failures_carry_no_enumeration_hint() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    register_user(&app, "c@x.com", "password1", "C").await;

    let wrong_password = test::TestRequest::post()
        .uri("/v1/auth/login")
        .set_json(serde_json::json!({ "email": "c@x.com", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, wrong_password).await;
    assert_eq!(resp.status().as_u16(), 401);
    let wrong_password_body: serde_json::Value = test::read_body_json(resp).await;

    let unknown_user = test::TestRequest::post()
        .uri("/v1/auth/login")
        .set_json(serde_json::json!({ "email": "nobody@x.com", "password": "password1" }))
        .to_request();
    let resp = test::call_service(&app, unknown_user).await;
    assert_eq!(resp.status().as_u16(), 401);
    let unknown_user_body: serde_json::Value = test::read_body_json(resp).await;

    // Identical code and detail for both failure modes
    assert_eq!(wrong_password_body["code"], "INVALID_CREDENTIALS");
    assert_eq!(wrong_password_body["code"], unknown_user_body["code"]);
    assert_eq!(wrong_password_body["detail"], unknown_user_body["detail"]);
    assert_eq!(wrong_password_body["detail"], "Invalid email or password");
}

#[actix_web::test]
async fn refresh_mints_new_pair_and_old_token_stays_valid() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    let (_, registered) = register_user(&app, "d@x.com", "password1", "D").await;
    let old_refresh = registered["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/v1/auth/refresh")
        .set_json(serde_json::json!({ "refresh_token": old_refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["id"], registered["user"]["id"]);

    // No rotation invalidation: the old refresh token works until expiry
    let req = test::TestRequest::post()
        .uri("/v1/auth/refresh")
        .set_json(serde_json::json!({ "refresh_token": old_refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_web::test]
async fn refresh_rejects_access_token() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    let (_, registered) = register_user(&app, "e@x.com", "password1", "E").await;
    let access = registered["access_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/v1/auth/refresh")
        .set_json(serde_json::json!({ "refresh_token": access }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "UNAUTHORIZED_WRONG_TOKEN_KIND");
}

#[actix_web::test]
async fn refresh_fails_when_user_is_gone() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock.clone())).await;

    let (_, registered) = register_user(&app, "f@x.com", "password1", "F").await;
    let refresh = registered["refresh_token"].as_str().unwrap();
    let user_id = registered["user"]["id"].as_str().unwrap();

    mock.remove_document(user_id);

    let req = test::TestRequest::post()
        .uri("/v1/auth/refresh")
        .set_json(serde_json::json!({ "refresh_token": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "USER_NOT_FOUND");
}

#[actix_web::test]
async fn me_returns_profile_for_access_token() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    let (_, registered) = register_user(&app, "g@x.com", "password1", "G").await;
    let access = registered["access_token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {access}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "g@x.com");
    assert_eq!(body["subscription_tier"], "free");
    assert_eq!(body["email_verified"], false);
}

#[actix_web::test]
async fn me_rejects_refresh_token() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    let (_, registered) = register_user(&app, "h@x.com", "password1", "H").await;
    let refresh = registered["refresh_token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {refresh}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "UNAUTHORIZED_WRONG_TOKEN_KIND");
}

#[actix_web::test]
async fn me_requires_bearer_token() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    let req = test::TestRequest::get().uri("/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "UNAUTHORIZED_MISSING_BEARER");

    let req = test::TestRequest::get()
        .uri("/v1/auth/me")
        .insert_header(("Authorization", "Bearer not-a-real-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "UNAUTHORIZED_MALFORMED_TOKEN");
}

#[actix_web::test]
async fn logout_acknowledges_and_requires_auth() {
    let mock = MockAppwrite::new();
    let app = init_app(test_state(mock)).await;

    let (_, registered) = register_user(&app, "i@x.com", "password1", "I").await;
    let access = registered["access_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/v1/auth/logout")
        .insert_header(("Authorization", format!("Bearer {access}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Successfully logged out");

    let req = test::TestRequest::post().uri("/v1/auth/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}
