use crate::e2e::helpers;

use helpers::speech_mocks::{MockSpeechRepository, CLIP_SAMPLES};
use helpers::{wait_for_json, TestContext};
use hyper::StatusCode;
use panda_tutor::domain::audio::AudioSettings;
use panda_tutor::infrastructure::repositories::SpeechError;
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn it_should_resolve_text_to_pcm() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post("/api/audio/resolve", &json!({ "text": "你好" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("content-type", "audio/L16;rate=24000;channels=1");
    response.assert_header("x-duration-ms", "100");
    assert_eq!(response.body_bytes.len(), CLIP_SAMPLES * 2);
}

#[tokio::test]
#[serial]
async fn it_should_serve_repeat_requests_from_cache() {
    let ctx = TestContext::new().await.unwrap();

    for _ in 0..3 {
        ctx.client
            .post("/api/audio/resolve", &json!({ "text": "谢谢" }))
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    // Whitespace variants share one entry
    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "  谢谢 " }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert_eq!(ctx.speech.calls_for("谢谢"), 1);
}

#[tokio::test]
#[serial]
async fn it_should_synthesize_once_for_concurrent_requests() {
    let ctx = TestContext::new().await.unwrap();

    let mut requests = Vec::new();
    for _ in 0..5 {
        let client = ctx.client.clone();
        requests.push(async move {
            client
                .post("/api/audio/resolve", &json!({ "text": "再见" }))
                .await
        });
    }

    for result in futures::future::join_all(requests).await {
        result.unwrap().assert_status(StatusCode::OK);
    }

    assert_eq!(ctx.speech.calls_for("再见"), 1);
}

#[tokio::test]
#[serial]
async fn it_should_validate_text_length() {
    let ctx = TestContext::new().await.unwrap();

    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "   " }))
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text cannot be empty");

    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "好".repeat(1_001) }))
        .await
        .unwrap()
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    assert!(ctx.speech.calls().is_empty());
}

#[tokio::test]
#[serial]
async fn it_should_back_off_after_rate_limit() {
    let ctx = TestContext::new().await.unwrap();
    ctx.speech.fail_next(
        "对不起",
        SpeechError::RateLimited {
            message: "quota exhausted".to_string(),
            retry_after: None,
        },
    );

    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "对不起" }))
        .await
        .unwrap()
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    // Inside the backoff window the failure is replayed without a new call
    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "对不起" }))
        .await
        .unwrap()
        .assert_status(StatusCode::TOO_MANY_REQUESTS)
        .assert_error_message("quota exhausted");

    assert_eq!(ctx.speech.calls_for("对不起"), 1);

    let stats = ctx.client.get("/api/audio/stats").await.unwrap();
    assert_eq!(stats.body()["failed"], 1);
}

#[tokio::test]
#[serial]
async fn it_should_retry_network_failures_once_backoff_elapses() {
    let speech = MockSpeechRepository::new();
    let settings = AudioSettings {
        network_backoff: std::time::Duration::from_millis(100),
        ..AudioSettings::default()
    };
    let ctx = TestContext::with_speech(speech, settings).await.unwrap();
    ctx.speech
        .fail_next("没关系", SpeechError::Transient("connection reset".to_string()));

    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "没关系" }))
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_GATEWAY);

    tokio::time::sleep(std::time::Duration::from_millis(150)).await;

    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "没关系" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert_eq!(ctx.speech.calls_for("没关系"), 2);
}

#[tokio::test]
#[serial]
async fn it_should_map_rejected_synthesis_to_unprocessable() {
    let ctx = TestContext::new().await.unwrap();
    ctx.speech
        .fail_next("龙", SpeechError::Rejected("blocked by safety filter".to_string()));

    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "龙" }))
        .await
        .unwrap()
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // Permanent until the cache is cleared
    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "龙" }))
        .await
        .unwrap()
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(ctx.speech.calls_for("龙"), 1);

    ctx.client
        .delete("/api/audio/cache")
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "龙" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    assert_eq!(ctx.speech.calls_for("龙"), 2);
}

#[tokio::test]
#[serial]
async fn it_should_reject_synthesis_without_api_key() {
    let ctx = TestContext::unconfigured().await.unwrap();

    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "你好" }))
        .await
        .unwrap()
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_message("not configured");
}

#[tokio::test]
#[serial]
async fn it_should_run_prefetch_jobs_to_completion() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post(
            "/api/audio/prefetch",
            &json!({ "texts": ["一", "二", " ", "三"], "priority": "high" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::ACCEPTED);
    let body = response.body();
    assert_eq!(body["priority"], "high");
    assert_eq!(body["total"], 3);
    let job_id = body["jobId"].as_str().unwrap().to_string();

    let status = wait_for_json(
        &ctx.client,
        &format!("/api/audio/prefetch/{}", job_id),
        |status| status["state"] == "drained",
    )
    .await;
    assert_eq!(status["dispatched"], 3);
    assert_eq!(status["remaining"], 0);

    wait_for_json(&ctx.client, "/api/audio/stats", |stats| stats["ready"] == 3).await;

    // Already warm: resolving does not call the provider again
    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "二" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    assert_eq!(ctx.speech.calls_for("二"), 1);
}

#[tokio::test]
#[serial]
async fn it_should_validate_prefetch_requests() {
    let ctx = TestContext::new().await.unwrap();

    ctx.client
        .post("/api/audio/prefetch", &json!({ "texts": [] }))
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.client
        .post(
            "/api/audio/prefetch",
            &json!({ "texts": ["一"], "priority": "urgent" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let texts: Vec<String> = (0..201).map(|i| format!("第{}", i)).collect();
    ctx.client
        .post("/api/audio/prefetch", &json!({ "texts": texts }))
        .await
        .unwrap()
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
#[serial]
async fn it_should_cancel_prefetch_jobs() {
    let ctx = TestContext::new().await.unwrap();

    let texts: Vec<String> = (1..=40).map(|i| format!("第{}课", i)).collect();
    let response = ctx
        .client
        .post("/api/audio/prefetch", &json!({ "texts": texts, "priority": "low" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::ACCEPTED);
    let job_id = response.body()["jobId"].as_str().unwrap().to_string();

    ctx.client
        .delete(&format!("/api/audio/prefetch/{}", job_id))
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    let status = ctx
        .client
        .get(&format!("/api/audio/prefetch/{}", job_id))
        .await
        .unwrap();
    status.assert_status(StatusCode::OK);
    assert_eq!(status.body()["state"], "cancelled");

    // Nothing new is dispatched after cancellation settles
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let settled = ctx.speech.calls().len();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert_eq!(ctx.speech.calls().len(), settled);
    assert!(settled < 40);
}

#[tokio::test]
#[serial]
async fn it_should_return_not_found_for_unknown_job() {
    let ctx = TestContext::new().await.unwrap();
    let job_id = uuid::Uuid::new_v4();

    ctx.client
        .get(&format!("/api/audio/prefetch/{}", job_id))
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);

    ctx.client
        .delete(&format!("/api/audio/prefetch/{}", job_id))
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn it_should_play_and_settle() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post("/api/audio/play", &json!({ "text": "好" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::ACCEPTED);
    let sequence = response.body()["sequence"].as_u64().unwrap();
    assert_eq!(response.body()["key"], "好");

    let playback = wait_for_json(&ctx.client, "/api/audio/playback", |body| {
        body["playback"]["phase"] == "settled"
    })
    .await;
    assert_eq!(playback["playback"]["sequence"].as_u64(), Some(sequence));
    assert_eq!(playback["playback"]["error"], serde_json::Value::Null);
}

#[tokio::test]
#[serial]
async fn it_should_keep_failed_playback_visible_as_errored() {
    let ctx = TestContext::new().await.unwrap();
    ctx.speech
        .fail_next("错", SpeechError::Rejected("unsupported text".to_string()));

    ctx.client
        .post("/api/audio/play", &json!({ "text": "错" }))
        .await
        .unwrap()
        .assert_status(StatusCode::ACCEPTED);

    let playback = wait_for_json(&ctx.client, "/api/audio/playback", |body| {
        body["playback"]["phase"] == "errored"
    })
    .await;
    assert_eq!(playback["playback"]["error"]["kind"], "synthesis_rejected");

    // Still errored once the session has finished
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let again = ctx.client.get("/api/audio/playback").await.unwrap();
    assert_eq!(again.body()["playback"]["phase"], "errored");
}

#[tokio::test]
#[serial]
async fn it_should_let_latest_play_win() {
    let ctx = TestContext::new().await.unwrap();

    let first = ctx
        .client
        .post("/api/audio/play", &json!({ "text": "是" }))
        .await
        .unwrap();
    let second = ctx
        .client
        .post("/api/audio/play", &json!({ "text": "不是" }))
        .await
        .unwrap();

    let first_sequence = first.body()["sequence"].as_u64().unwrap();
    let second_sequence = second.body()["sequence"].as_u64().unwrap();
    assert!(second_sequence > first_sequence);

    let playback = wait_for_json(&ctx.client, "/api/audio/playback", |body| {
        body["playback"]["phase"] == "settled"
    })
    .await;
    assert_eq!(playback["playback"]["key"], "不是");
    assert_eq!(playback["playback"]["sequence"].as_u64(), Some(second_sequence));
}

#[tokio::test]
#[serial]
async fn it_should_report_empty_playback_before_any_play() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/api/audio/playback").await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body()["playback"], serde_json::Value::Null);
}

#[tokio::test]
#[serial]
async fn it_should_clear_ready_entries() {
    let ctx = TestContext::new().await.unwrap();

    ctx.client
        .post("/api/audio/resolve", &json!({ "text": "好" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let stats = ctx.client.get("/api/audio/stats").await.unwrap();
    assert_eq!(stats.body()["ready"], 1);
    assert_eq!(stats.body()["readyBytes"], CLIP_SAMPLES * 2);
    assert_eq!(stats.body()["maxBytes"], 50 * 1024 * 1024);

    ctx.client
        .delete("/api/audio/cache")
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    let stats = ctx.client.get("/api/audio/stats").await.unwrap();
    assert_eq!(stats.body()["ready"], 0);
    assert_eq!(stats.body()["readyBytes"], 0);
}
