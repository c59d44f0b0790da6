//! End-to-end tests against a running gateway.

use reqwest::header::{COOKIE, LOCATION};
use reqwest::{Method, StatusCode};
use vhost_gateway::security::Principal;

mod common;

#[tokio::test]
async fn test_virtual_host_root_serves_default_document() {
    let gateway = common::start_gateway(common::fixture_config()).await;

    let res = common::client()
        .get(gateway.url("/127.0.0.1/"))
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(LOCATION).unwrap(), "/127.0.0.1/");
    let expected = std::fs::read_to_string(common::fixture_dir().join("index.html")).unwrap();
    assert_eq!(res.text().await.unwrap(), expected);
}

#[tokio::test]
async fn test_unmatched_path_has_no_location() {
    let gateway = common::start_gateway(common::fixture_config()).await;

    let res = common::client()
        .get(gateway.url("/assets/missing.js"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get(LOCATION).is_none());
}

#[tokio::test]
async fn test_public_asset_is_served_with_location() {
    let gateway = common::start_gateway(common::fixture_config()).await;

    let res = common::client()
        .get(gateway.url("/assets/app.js"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(LOCATION).unwrap(), "/assets/app.js");
}

#[tokio::test]
async fn test_secured_path_requires_session() {
    let gateway = common::start_gateway(common::fixture_config()).await;
    let client = common::client();

    let res = client.get(gateway.url("/private.txt")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    gateway
        .contexts
        .save("abc", Principal::new("alice").with_authority("ROLE_USER"));

    let res = client
        .get(gateway.url("/private.txt"))
        .header(COOKIE, "SESSION=abc")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(LOCATION).unwrap(), "/private.txt");
    assert_eq!(res.text().await.unwrap().trim(), "members only");
}

#[tokio::test]
async fn test_unknown_session_is_rejected() {
    let gateway = common::start_gateway(common::fixture_config()).await;

    let res = common::client()
        .get(gateway.url("/private.txt"))
        .header(COOKIE, "SESSION=nobody")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_redirect_when_configured() {
    let mut config = common::fixture_config();
    config.security.login_redirect = Some("/oauth2/authorization/google".into());
    let gateway = common::start_gateway(config).await;

    let res = common::client()
        .get(gateway.url("/private.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers().get(LOCATION).unwrap(),
        "/oauth2/authorization/google"
    );
}

#[tokio::test]
async fn test_preflight_never_requires_authentication() {
    let gateway = common::start_gateway(common::fixture_config()).await;

    let res = common::client()
        .request(Method::OPTIONS, gateway.url("/private.txt"))
        .send()
        .await
        .unwrap();
    assert_ne!(res.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(res.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let gateway = common::start_gateway(common::fixture_config()).await;

    let res = common::client()
        .get(gateway.url("/index.html"))
        .send()
        .await
        .unwrap();
    let id = res.headers().get("x-request-id").expect("request id header");
    assert!(!id.is_empty());

    let res = common::client()
        .get(gateway.url("/index.html"))
        .header("x-request-id", "caller-supplied")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), "caller-supplied");
}
