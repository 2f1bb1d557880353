mod common;

use common::{cart_json, user_json, Harness};
use serde_json::json;
use storefront_client::stores::SessionState;
use storefront_client::{CredentialStore, RouteDecision};
use storefront_shared::{LoginRequest, RegisterForm};

fn login_request() -> LoginRequest {
    LoginRequest {
        email: "ana@example.com".into(),
        password: "secret1".into(),
    }
}

#[tokio::test]
async fn login_stores_token_and_unlocks_private_routes() {
    let h = Harness::start("/").await;
    h.backend.respond(
        "POST",
        "/auth/login",
        200,
        json!({ "access_token": "tok-1", "user": user_json("u1", "ana@example.com") }),
    );

    assert_eq!(
        h.shop.visit("/checkout"),
        RouteDecision::Redirect("/auth/login?redirect=%2Fcheckout".into())
    );

    let user = h.shop.session.login(&login_request()).await.unwrap();
    assert_eq!(user.id, "u1");

    let state = h.shop.session.snapshot();
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
    assert_eq!(h.credentials.token().as_deref(), Some("tok-1"));

    let sent: serde_json::Value =
        serde_json::from_str(&h.backend.hits("POST", "/auth/login")[0].body).unwrap();
    assert_eq!(
        sent,
        json!({ "email": "ana@example.com", "password": "secret1" })
    );

    assert_eq!(h.shop.visit("/checkout"), RouteDecision::Allow);
    let last = h.navigator.history().pop();
    assert_eq!(last.as_deref(), Some("/checkout"));
}

#[tokio::test]
async fn failed_login_reports_server_message() {
    let h = Harness::start("/auth/login").await;
    h.backend.respond(
        "POST",
        "/auth/login",
        400,
        json!({ "message": "Invalid credentials" }),
    );

    assert!(h.shop.session.login(&login_request()).await.is_err());

    let state = h.shop.session.snapshot();
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    assert!(h.credentials.load().is_none());

    h.shop.session.clear_error();
    assert_eq!(h.shop.session.snapshot().error, None);
}

#[tokio::test]
async fn failed_login_without_message_uses_default() {
    let h = Harness::start("/auth/login").await;
    h.backend.respond_raw(
        "POST",
        "/auth/login",
        std::time::Duration::ZERO,
        502,
        "<html>".into(),
    );

    assert!(h.shop.session.login(&login_request()).await.is_err());
    let state = h.shop.session.snapshot();
    assert_eq!(state.error.as_deref(), Some("Login failed"));
}

#[tokio::test]
async fn register_sends_full_name() {
    let h = Harness::start("/auth/register").await;
    h.backend.respond(
        "POST",
        "/auth/register",
        201,
        json!({ "access_token": "tok-2", "user": user_json("u2", "luis@example.com") }),
    );

    let form = RegisterForm {
        first_name: "Luis".into(),
        last_name: "Pérez".into(),
        email: "luis@example.com".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
    };
    h.shop.session.register(&form).await.unwrap();

    let sent: serde_json::Value =
        serde_json::from_str(&h.backend.hits("POST", "/auth/register")[0].body).unwrap();
    assert_eq!(
        sent,
        json!({ "email": "luis@example.com", "password": "secret1", "name": "Luis Pérez" })
    );
    assert!(h.shop.session.is_authenticated());
    assert_eq!(h.credentials.token().as_deref(), Some("tok-2"));
}

#[tokio::test]
async fn init_restores_session_from_stored_token() {
    let h = Harness::signed_in("/", "tok-1").await;
    h.backend.respond(
        "GET",
        "/auth/profile",
        200,
        user_json("u1", "ana@example.com"),
    );

    let user = h.shop.session.init().await.unwrap().unwrap();
    assert_eq!(user.email, "ana@example.com");
    assert!(h.shop.session.is_authenticated());

    // Already authenticated: nothing more to do.
    assert!(h.shop.session.init().await.is_none());
    assert_eq!(h.backend.hits("GET", "/auth/profile").len(), 1);
}

#[tokio::test]
async fn init_discards_token_the_server_does_not_know() {
    let h = Harness::signed_in("/", "tok-1").await;
    h.backend.respond(
        "GET",
        "/auth/profile",
        404,
        json!({ "message": "User not found" }),
    );

    let result = h.shop.session.init().await.unwrap();
    assert!(result.unwrap_err().is_not_found());

    let state = h.shop.session.snapshot();
    assert!(!state.is_authenticated);
    assert_eq!(state.user, None);
    assert_eq!(state.error.as_deref(), Some("User not found"));
    assert_eq!(h.credentials.clear_count(), 1);
    assert!(h.credentials.load().is_none());

    assert!(h.shop.session.init().await.is_none());
    assert_eq!(h.backend.hits("GET", "/auth/profile").len(), 1);
}

#[tokio::test]
async fn init_without_token_does_nothing() {
    let h = Harness::start("/").await;
    assert!(h.shop.session.init().await.is_none());
    assert!(h.backend.requests().is_empty());
}

#[tokio::test]
async fn logout_forgets_user_and_token() {
    let h = Harness::start("/").await;
    h.backend.respond(
        "POST",
        "/auth/login",
        200,
        json!({ "access_token": "tok-1", "user": user_json("u1", "ana@example.com") }),
    );
    h.shop.session.login(&login_request()).await.unwrap();

    h.shop.session.logout();

    assert_eq!(h.shop.session.snapshot(), SessionState::default());
    assert!(h.credentials.load().is_none());
    assert_eq!(
        h.shop.guard("/profile"),
        RouteDecision::Redirect("/auth/login?redirect=%2Fprofile".into())
    );
}

#[tokio::test]
async fn unauthorized_from_any_endpoint_resets_session() {
    let h = Harness::signed_in("/cart", "tok-1").await;
    h.backend.respond(
        "GET",
        "/auth/profile",
        200,
        user_json("u1", "ana@example.com"),
    );
    h.backend.respond("GET", "/cart", 401, json!({ "message": "Unauthorized" }));

    h.shop.session.get_current_user().await.unwrap();
    assert!(h.shop.session.is_authenticated());

    assert!(h.shop.cart.fetch_cart().await.is_err());

    assert!(!h.shop.session.is_authenticated());
    assert_eq!(h.shop.session.user(), None);
    assert!(h.credentials.load().is_none());
    assert_eq!(h.navigator.history(), vec!["/cart", "/auth/login"]);
}

#[tokio::test]
async fn refresh_replaces_stored_token() {
    let h = Harness::signed_in("/", "tok-1").await;
    h.backend.respond(
        "POST",
        "/auth/refresh",
        200,
        json!({ "access_token": "tok-2" }),
    );

    h.shop.session.refresh_token().await.unwrap();

    assert_eq!(
        h.backend.hits("POST", "/auth/refresh")[0].authorization.as_deref(),
        Some("Bearer tok-1")
    );
    assert_eq!(h.credentials.token().as_deref(), Some("tok-2"));
}

#[tokio::test]
async fn refresh_is_skipped_for_fresh_tokens() {
    let h = Harness::signed_in("/", "tok-1").await;
    assert!(!h.shop.session.refresh_if_needed().await.unwrap());
    assert!(h.backend.requests().is_empty());
}

#[tokio::test]
async fn password_reset_flow_settles_loading() {
    let h = Harness::start("/auth/forgot-password").await;
    h.backend.respond(
        "POST",
        "/auth/forgot-password",
        200,
        json!({ "message": "sent" }),
    );
    h.backend.respond(
        "POST",
        "/auth/reset-password",
        400,
        json!({ "message": ["token expired"] }),
    );

    h.shop
        .session
        .forgot_password("ana@example.com")
        .await
        .unwrap();
    assert!(!h.shop.session.snapshot().is_loading);

    let reset = h.shop.session.reset_password("abc", "secret2").await;
    assert!(reset.is_err());
    let state = h.shop.session.snapshot();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("token expired"));
}

#[tokio::test]
async fn cart_survives_unrelated_session_errors() {
    let h = Harness::signed_in("/", "tok-1").await;
    h.backend.respond(
        "GET",
        "/cart",
        200,
        cart_json("c1", &[("i1", "p1", 10.0, 1)], 10.0),
    );
    h.backend.respond("GET", "/auth/profile", 500, json!({ "message": "boom" }));

    h.shop.cart.fetch_cart().await.unwrap();
    assert!(h.shop.session.get_current_user().await.is_err());

    assert_eq!(h.shop.session.snapshot().error.as_deref(), Some("boom"));
    assert_eq!(h.credentials.token().as_deref(), Some("tok-1"));
    assert_eq!(h.shop.cart.item_count(), 1);
}
