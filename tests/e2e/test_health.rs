use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn it_should_return_ok_for_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[tokio::test]
#[serial]
async fn it_should_report_ready_when_speech_is_configured() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["provider"], "mock");
    assert_eq!(body["speech"], "configured");
}

#[tokio::test]
#[serial]
async fn it_should_report_missing_api_key() {
    let ctx = TestContext::unconfigured().await.unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body()["speech"], "missing_api_key");

    // Liveness and the lesson catalog are unaffected
    ctx.client
        .get("/health")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    ctx.client
        .get("/api/lessons")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn it_should_include_request_id_in_responses() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx.client.get("/api/lessons/missing").await.unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_header_exists("x-request-id");
}

#[tokio::test]
#[serial]
async fn it_should_echo_incoming_request_id() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .get_with_header("/health", "x-request-id", "lesson-screen-42")
        .await
        .unwrap();

    response.assert_header("x-request-id", "lesson-screen-42");
}
