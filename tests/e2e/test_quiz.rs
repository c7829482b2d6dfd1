use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn it_should_grade_a_correct_answer() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post(
            "/api/lessons/basic-grammar-quiz/answers",
            &json!({ "questionId": "basic-grammar-quiz-q2", "selectedOption": 1 }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body();
    assert_eq!(body["correct"], true);
    assert_eq!(body["correctOption"], 1);
    assert!(body.get("mistake").is_none());

    let mistakes = ctx.client.get("/api/mistakes").await.unwrap();
    assert_eq!(mistakes.body().as_array().unwrap().len(), 0);
}

#[tokio::test]
#[serial]
async fn it_should_record_wrong_answers_newest_first() {
    let ctx = TestContext::new().await.unwrap();

    let first = ctx
        .client
        .post(
            "/api/lessons/basic-grammar-quiz/answers",
            &json!({ "questionId": "basic-grammar-quiz-q3", "selectedOption": 1 }),
        )
        .await
        .unwrap();
    first.assert_status(StatusCode::OK);
    assert_eq!(first.body()["correct"], false);
    assert_eq!(first.body()["correctAnswer"], "他不忙 (Tā bù máng)");
    assert_eq!(first.body()["mistake"]["userAnswer"], "他没忙 (Tā méi máng)");

    ctx.client
        .post(
            "/api/lessons/vocabulary-challenge/answers",
            &json!({ "questionId": "vocabulary-challenge-q2", "selectedOption": 0 }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx.client.get("/api/mistakes").await.unwrap();
    response.assert_status(StatusCode::OK);
    let mistakes = response.body().as_array().unwrap();
    assert_eq!(mistakes.len(), 2);
    assert_eq!(mistakes[0]["correctAnswer"], "好吃 (Hǎochī)");
    assert_eq!(mistakes[1]["question"], "Translate: \"He is not busy.\"");
    assert!(mistakes[0]["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
#[serial]
async fn it_should_clear_the_mistake_notebook() {
    let ctx = TestContext::new().await.unwrap();

    ctx.client
        .post(
            "/api/lessons/basic-grammar-quiz/answers",
            &json!({ "questionId": "basic-grammar-quiz-q1", "selectedOption": 3 }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    ctx.client
        .delete("/api/mistakes")
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    let response = ctx.client.get("/api/mistakes").await.unwrap();
    assert_eq!(response.body().as_array().unwrap().len(), 0);
}

#[tokio::test]
#[serial]
async fn it_should_reject_invalid_answers() {
    let ctx = TestContext::new().await.unwrap();

    ctx.client
        .post(
            "/api/lessons/basic-grammar-quiz/answers",
            &json!({ "questionId": "basic-grammar-quiz-q1", "selectedOption": 7 }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("out of range");

    ctx.client
        .post(
            "/api/lessons/greetings-essentials/answers",
            &json!({ "questionId": "greetings-essentials-1", "selectedOption": 0 }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("not a quiz");

    ctx.client
        .post(
            "/api/lessons/basic-grammar-quiz/answers",
            &json!({ "questionId": "basic-grammar-quiz-q9", "selectedOption": 0 }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}
