use crate::e2e::helpers;

use helpers::{ProxyContext, BLING_TOKEN_PATH, TEST_BASIC_AUTH, TEST_CLIENT_SECRET};
use httpmock::Method::POST;
use hyper::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use test_context::test_context;

const EXCHANGE: &str = "/api/bling/exchange";

#[test_context(ProxyContext)]
#[tokio::test]
async fn it_should_reject_non_post_methods(ctx: &ProxyContext) {
    for method in [Method::GET, Method::PUT, Method::PATCH, Method::DELETE] {
        let response = ctx.client.raw(method.clone(), EXCHANGE, None).await.unwrap();

        response
            .assert_status(StatusCode::METHOD_NOT_ALLOWED)
            .assert_header("allow", "POST")
            .assert_error_message("Method not allowed");
    }
}

#[test_context(ProxyContext)]
#[tokio::test]
async fn it_should_require_a_code_by_default(ctx: &ProxyContext) {
    let mock = ctx
        .bling
        .mock_async(|when, then| {
            when.method(POST).path(BLING_TOKEN_PATH);
            then.status(200).body("{}");
        })
        .await;

    let response = ctx.client.post(EXCHANGE, &json!({})).await.unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        &json!({"error": "authorization_code grant requires code"})
    );
    mock.assert_hits_async(0).await;
}

#[test_context(ProxyContext)]
#[tokio::test]
async fn it_should_require_a_refresh_token_for_refresh_grants(ctx: &ProxyContext) {
    let response = ctx
        .client
        .post(EXCHANGE, &json!({"grant_type": "refresh_token", "code": "abc"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("refresh_token grant requires refresh_token");
}

#[test_context(ProxyContext)]
#[tokio::test]
async fn it_should_exchange_an_authorization_code(ctx: &ProxyContext) {
    let mock = ctx
        .bling
        .mock_async(|when, then| {
            when.method(POST)
                .path(BLING_TOKEN_PATH)
                .header("authorization", TEST_BASIC_AUTH)
                .header("accept", "1.0")
                .header("content-type", "application/x-www-form-urlencoded")
                .body("grant_type=authorization_code&code=auth-code-1");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"abc","expires_in":3600}"#);
        })
        .await;

    let response = ctx
        .client
        .post(EXCHANGE, &json!({"code": "auth-code-1"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), r#"{"access_token":"abc","expires_in":3600}"#);
    assert!(!response.text().contains(TEST_CLIENT_SECRET));
    assert!(!response.text().contains("client_secret"));
    mock.assert_async().await;
}

#[test_context(ProxyContext)]
#[tokio::test]
async fn it_should_infer_the_refresh_token_grant(ctx: &ProxyContext) {
    let mock = ctx
        .bling
        .mock_async(|when, then| {
            when.method(POST)
                .path(BLING_TOKEN_PATH)
                .body("grant_type=refresh_token&refresh_token=rt-123");
            then.status(200)
                .body(r#"{"access_token":"new","refresh_token":"rt-456","expires_in":21600}"#);
        })
        .await;

    let response = ctx
        .client
        .post(EXCHANGE, &json!({"refresh_token": "rt-123"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json(),
        &json!({"access_token": "new", "refresh_token": "rt-456", "expires_in": 21600})
    );
    mock.assert_async().await;
}

#[test_context(ProxyContext)]
#[tokio::test]
async fn it_should_fall_back_to_query_parameters(ctx: &ProxyContext) {
    let mock = ctx
        .bling
        .mock_async(|when, then| {
            when.method(POST)
                .path(BLING_TOKEN_PATH)
                .body("grant_type=authorization_code&code=from-query");
            then.status(200).body(r#"{"access_token":"q"}"#);
        })
        .await;

    let empty = ctx
        .client
        .raw(Method::POST, &format!("{}?code=from-query", EXCHANGE), None)
        .await
        .unwrap();
    empty.assert_status(StatusCode::OK);

    let malformed = ctx
        .client
        .raw(
            Method::POST,
            &format!("{}?code=from-query", EXCHANGE),
            Some("{\"code\": "),
        )
        .await
        .unwrap();
    malformed.assert_status(StatusCode::OK);

    mock.assert_hits_async(2).await;
}

#[test_context(ProxyContext)]
#[tokio::test]
async fn it_should_report_provider_rejections_as_bad_gateway(ctx: &ProxyContext) {
    ctx.bling
        .mock_async(|when, then| {
            when.method(POST).path(BLING_TOKEN_PATH);
            then.status(401)
                .body(r#"{"error":{"type":"invalid_client","message":"invalid_client"}}"#);
        })
        .await;

    let response = ctx
        .client
        .post(EXCHANGE, &json!({"code": "stale"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body = response.json();
    assert_eq!(body["status"], json!(401));
    assert_eq!(
        body["data"],
        json!({"error": {"type": "invalid_client", "message": "invalid_client"}})
    );
    assert!(body["error"].as_str().is_some());
    assert!(!response.text().contains(TEST_CLIENT_SECRET));
}

#[test_context(ProxyContext)]
#[tokio::test]
async fn it_should_wrap_non_json_provider_bodies(ctx: &ProxyContext) {
    ctx.bling
        .mock_async(|when, then| {
            when.method(POST).path(BLING_TOKEN_PATH);
            then.status(500).body("<html>Internal Server Error</html>");
        })
        .await;

    let response = ctx
        .client
        .post(EXCHANGE, &json!({"code": "abc"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json()["status"], json!(500));
    assert_eq!(
        response.json()["data"],
        json!({"raw": "<html>Internal Server Error</html>"})
    );
}

#[tokio::test]
async fn it_should_fail_fast_without_client_credentials() {
    let ctx = ProxyContext::start(false).await;
    let mock = ctx
        .bling
        .mock_async(|when, then| {
            when.method(POST).path(BLING_TOKEN_PATH);
            then.status(200).body(r#"{"access_token":"abc"}"#);
        })
        .await;

    for body in [
        json!({"code": "abc"}),
        json!({"refresh_token": "rt"}),
        json!({"grant_type": "authorization_code", "code": "abc"}),
    ] {
        let response = ctx.client.post(EXCHANGE, &body).await.unwrap();

        response
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
            .assert_error_message("Server misconfigured");
    }

    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn it_should_report_unreachable_provider_as_transport_failure() {
    // Bind then release a port so nothing is listening on it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let bling = httpmock::MockServer::start_async().await;
    let token_url = format!("http://127.0.0.1:{}{}", port, BLING_TOKEN_PATH);
    let ctx = ProxyContext::start_with(bling, &token_url, true).await;

    let response = ctx
        .client
        .post(EXCHANGE, &json!({"code": "abc"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Token exchange failed");
}

#[test_context(ProxyContext)]
#[tokio::test]
async fn it_should_time_out_slow_providers(ctx: &ProxyContext) {
    ctx.bling
        .mock_async(|when, then| {
            when.method(POST).path(BLING_TOKEN_PATH);
            then.status(200)
                .delay(Duration::from_secs(3))
                .body(r#"{"access_token":"late"}"#);
        })
        .await;

    let response = ctx
        .client
        .post(EXCHANGE, &json!({"code": "abc"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Token exchange failed");
}
