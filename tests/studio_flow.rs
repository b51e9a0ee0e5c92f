use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use socialsync::core::images::ingest_batch;
use socialsync::core::llm::GeminiClient;
use socialsync::core::studio::{
    Phase, Studio, TriggerRejected, GENERATE_FAILED_MESSAGE, REFINE_FAILED_MESSAGE,
};

const ENDPOINT: &str = "/models/gemini-2.5-flash:generateContent";

fn reply(tweet: &str) -> ResponseTemplate {
    let content = json!({
        "twitter": { "content": tweet, "hashtags": ["coffee"] },
        "xiaohongshu": {
            "title": "咖啡时光",
            "content": "今天的咖啡☕️",
            "tags": ["咖啡", "日常"]
        }
    });
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "parts": [{ "text": content.to_string() }] } }]
    }))
}

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::with_options(Some("k".to_string()), "gemini-2.5-flash", server.uri(), None)
        .expect("client builds")
}

async fn prompts(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("recording on")
        .iter()
        .map(|r| r.body_json::<Value>().expect("json body"))
        .collect()
}

#[tokio::test]
async fn test_generate_with_attached_image_then_refine() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image_path = dir.path().join("cup.png");
    std::fs::write(&image_path, b"desk").expect("write image");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(reply("Morning coffee ☕"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(reply("Coffee."))
        .mount(&server)
        .await;

    let client = client(&server);
    let mut studio = Studio::new();
    studio.set_text("Coffee time");
    let batch = ingest_batch(&[image_path]).await.expect("ingest");
    studio.append_images(batch);

    assert_eq!(studio.generate(&client).await, Ok(true));
    assert_eq!(studio.phase(), Phase::Idle);
    assert_eq!(
        studio.generated().map(|c| c.twitter.content.as_str()),
        Some("Morning coffee ☕")
    );

    assert_eq!(studio.refine(&client, "Make it shorter").await, Ok(true));
    assert_eq!(
        studio.generated().map(|c| c.twitter.content.as_str()),
        Some("Coffee.")
    );

    let bodies = prompts(&server).await;
    assert_eq!(bodies.len(), 2);
    for body in &bodies {
        let parts = body["contents"][0]["parts"].as_array().expect("parts");
        assert!(parts[0]["text"]
            .as_str()
            .expect("prompt")
            .contains("\"Coffee time\""));
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "ZGVzaw==");
    }
    let refine_prompt = bodies[1]["contents"][0]["parts"][0]["text"]
        .as_str()
        .expect("prompt");
    assert!(refine_prompt.contains("\"Make it shorter\""));
    // The earlier output is never fed back.
    assert!(!refine_prompt.contains("Morning coffee"));
}

#[tokio::test]
async fn test_server_failure_keeps_draft_and_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(reply("First take"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client(&server);
    let mut studio = Studio::new();
    studio.set_text("Hello");
    assert_eq!(studio.generate(&client).await, Ok(true));

    assert_eq!(studio.refine(&client, "Add more emojis").await, Ok(false));
    assert_eq!(studio.error(), Some(REFINE_FAILED_MESSAGE));
    assert_eq!(studio.draft().text, "Hello");
    assert_eq!(
        studio.generated().map(|c| c.twitter.content.as_str()),
        Some("First take")
    );

    assert_eq!(studio.generate(&client).await, Ok(false));
    assert_eq!(studio.error(), Some(GENERATE_FAILED_MESSAGE));
    assert!(studio.generated().is_some());
}

#[tokio::test]
async fn test_unconfigured_client_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply("never"))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::with_options(None, "gemini-2.5-flash", server.uri(), None)
        .expect("client builds");
    let mut studio = Studio::new();

    assert_eq!(
        studio.generate(&client).await,
        Err(TriggerRejected::EmptyDraft)
    );

    studio.set_text("Hello");
    assert_eq!(studio.generate(&client).await, Ok(false));
    assert_eq!(studio.error(), Some(GENERATE_FAILED_MESSAGE));
}
