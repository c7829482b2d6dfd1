use crate::e2e::helpers;

use helpers::{wait_for_json, TestContext};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serial_test::serial;

fn lesson_ids(group: &Value) -> Vec<String> {
    group["lessons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|lesson| lesson["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
#[serial]
async fn it_should_list_lessons_grouped_by_level() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/api/lessons").await.unwrap();
    response.assert_status(StatusCode::OK);

    let groups = response.body().as_array().unwrap();
    let levels: Vec<&str> = groups
        .iter()
        .map(|group| group["level"].as_str().unwrap())
        .collect();
    assert_eq!(levels, vec!["Beginner", "Intermediate", "Advanced"]);

    let beginner = lesson_ids(&groups[0]);
    assert_eq!(beginner[0], "greetings-essentials");
    assert!(beginner.contains(&"ordering-coffee".to_string()));
    assert!(beginner.contains(&"basic-grammar-quiz".to_string()));

    let greetings = &groups[0]["lessons"][0];
    assert_eq!(greetings["type"], "VOCABULARY");
    assert_eq!(greetings["isLocked"], false);
    assert!(greetings["itemCount"].as_u64().unwrap() > 5);
}

#[tokio::test]
#[serial]
async fn it_should_filter_lessons_by_level() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/api/lessons?level=advanced").await.unwrap();
    response.assert_status(StatusCode::OK);

    let groups = response.body().as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["level"], "Advanced");

    ctx.client
        .get("/api/lessons?level=expert")
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Unknown level");
}

#[tokio::test]
#[serial]
async fn it_should_return_full_dialogue_content() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/api/lessons/ordering-coffee").await.unwrap();
    response.assert_status(StatusCode::OK);

    let body = response.body();
    assert_eq!(body["type"], "DIALOGUE");
    assert_eq!(body["level"], "Beginner");

    let lines = body["content"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["speaker"], "A");
    assert_eq!(lines[0]["hanzi"], "你好，我要一杯拿铁。");
}

#[tokio::test]
#[serial]
async fn it_should_return_not_found_for_unknown_lesson() {
    let ctx = TestContext::new().await.unwrap();

    ctx.client
        .get("/api/lessons/klingon-basics")
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);

    ctx.client
        .post_empty("/api/lessons/klingon-basics/open")
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn it_should_prefetch_first_words_when_opening_vocabulary() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post_empty("/api/lessons/greetings-essentials/open")
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let body = response.body();
    assert_eq!(body["lessonId"], "greetings-essentials");
    assert_eq!(body["prefetchCount"], 5);
    assert_eq!(body["supersededLessonId"], Value::Null);
    let job_id = body["prefetchJobId"].as_str().unwrap().to_string();

    let status = wait_for_json(
        &ctx.client,
        &format!("/api/audio/prefetch/{}", job_id),
        |status| status["state"] == "drained",
    )
    .await;
    assert_eq!(status["total"], 5);
    assert_eq!(status["dispatched"], 5);

    ctx.speech.wait_for_calls(5).await;
    let mut calls = ctx.speech.calls();
    calls.sort();
    let mut expected = vec!["你好", "谢谢", "再见", "对不起", "没关系"];
    expected.sort();
    assert_eq!(calls, expected);

    let stats = wait_for_json(&ctx.client, "/api/audio/stats", |stats| {
        stats["ready"] == 5
    })
    .await;
    assert_eq!(stats["pending"], 0);
}

#[tokio::test]
#[serial]
async fn it_should_supersede_previous_lesson_on_open() {
    let ctx = TestContext::new().await.unwrap();

    let first = ctx
        .client
        .post_empty("/api/lessons/numbers-time/open")
        .await
        .unwrap();
    first.assert_status(StatusCode::OK);
    let first_job = first.body()["prefetchJobId"].as_str().unwrap().to_string();

    let second = ctx
        .client
        .post_empty("/api/lessons/ordering-coffee/open")
        .await
        .unwrap();
    second.assert_status(StatusCode::OK);
    assert_eq!(second.body()["supersededLessonId"], "numbers-time");
    assert_eq!(second.body()["prefetchCount"], 4);

    // The first job either finished before the switch or was cancelled by it
    let status = ctx
        .client
        .get(&format!("/api/audio/prefetch/{}", first_job))
        .await
        .unwrap();
    status.assert_status(StatusCode::OK);
    let state = status.body()["state"].as_str().unwrap().to_string();
    assert!(state == "cancelled" || state == "drained", "state was {}", state);
}

#[tokio::test]
#[serial]
async fn it_should_close_only_the_active_lesson() {
    let ctx = TestContext::new().await.unwrap();

    ctx.client
        .post_empty("/api/lessons/ordering-coffee/open")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .post_empty("/api/lessons/ordering-coffee/close")
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body()["closed"], true);

    let response = ctx
        .client
        .post_empty("/api/lessons/ordering-coffee/close")
        .await
        .unwrap();
    assert_eq!(response.body()["closed"], false);
}

#[tokio::test]
#[serial]
async fn it_should_not_prefetch_anything_for_quiz_lessons() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post_empty("/api/lessons/basic-grammar-quiz/open")
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body()["prefetchCount"], 0);
    assert_eq!(response.body()["prefetchJobId"], Value::Null);

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(ctx.speech.calls().is_empty());
}
