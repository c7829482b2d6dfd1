use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn it_should_explain_a_word() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post("/api/explain", &json!({ "text": "没关系" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body();
    assert_eq!(body["text"], "没关系");
    assert_eq!(body["explanation"], "没关系 is a useful everyday word.");
    assert_eq!(body["cached"], false);
}

#[tokio::test]
#[serial]
async fn it_should_cache_repeat_explanations() {
    let ctx = TestContext::new().await.unwrap();

    ctx.client
        .post("/api/explain", &json!({ "text": "好吃" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .post("/api/explain", &json!({ "text": " 好吃 " }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body()["cached"], true);
    assert_eq!(ctx.speech.explain_count(), 1);
}

#[tokio::test]
#[serial]
async fn it_should_reject_empty_text() {
    let ctx = TestContext::new().await.unwrap();

    ctx.client
        .post("/api/explain", &json!({ "text": "" }))
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text cannot be empty");

    assert_eq!(ctx.speech.explain_count(), 0);
}

#[tokio::test]
#[serial]
async fn it_should_fail_without_api_key() {
    let ctx = TestContext::unconfigured().await.unwrap();

    ctx.client
        .post("/api/explain", &json!({ "text": "你好" }))
        .await
        .unwrap()
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
