//! Wire-level tests for the completion client against a mock HTTP server.

use std::time::Duration;

use hairscan_core::{AnalysisBackend, AnalysisResult, Error, ErrorKind};
use hairscan_inference::openai::{OpenAIBackend, OpenAIConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> OpenAIBackend {
    let config = OpenAIConfig {
        base_url: server.uri(),
        api_key: Some("sk-test".to_string()),
        vision_model: "vision-test".to_string(),
        text_model: "text-test".to_string(),
        timeout_seconds: 5,
        skip_tls_verify: false,
    };
    OpenAIBackend::new(config).expect("Failed to create backend")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ],
        "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
    })
}

fn sample_analysis() -> AnalysisResult {
    AnalysisResult {
        density_score: 64.0,
        scalp_exposure_percent: 22.5,
        parting_width_px: 10.0,
        baby_hairs_visible: true,
        raw_stage: 1,
        hairline_stability: Some(false),
        left_right_symmetry: Some("正常".to_string()),
    }
}

#[tokio::test]
async fn test_extract_features_sends_vision_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "model": "vision-test",
            "max_tokens": 1000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "```json\n{\"density_score\": 70, \"scalp_exposure_percent\": 20, \"parting_width_px\": 8, \"baby_hairs_visible\": true, \"stage\": 2}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let analysis = backend.extract_features(b"ABC").await.unwrap();

    assert_eq!(analysis.density_score, 70.0);
    assert_eq!(analysis.raw_stage, 2);
    assert!(analysis.hairline_stability.is_none());

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = body["messages"][0]["content"].as_array().unwrap();
    assert_eq!(parts[0]["type"], "text");
    assert_eq!(parts[1]["type"], "image_url");
    assert_eq!(parts[1]["image_url"]["url"], "data:image/jpeg;base64,QUJD");
}

#[tokio::test]
async fn test_generate_advice_uses_text_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "text-test", "max_tokens": 500 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Here you go: {\"summary\": \"恢复不错\", \"advice\": \"保持作息\"} good luck",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let advice = backend.generate_advice(&sample_analysis()).await.unwrap();

    assert_eq!(advice.summary, "恢复不错");
    assert_eq!(advice.advice, "保持作息");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("\"density_score\""));
}

#[tokio::test]
async fn test_http_error_is_transport_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "The server had an error", "type": "server_error" }
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.extract_features(b"img").await.unwrap_err();

    match err {
        Error::Transport { status, message } => {
            assert_eq!(status, Some(500));
            assert!(message.contains("The server had an error"));
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_is_transport() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.generate_advice(&sample_analysis()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_empty_content_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.extract_features(b"img").await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse));
}

#[tokio::test]
async fn test_missing_choices_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.extract_features(b"img").await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse));
}

#[tokio::test]
async fn test_prose_reply_is_extraction_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("I cannot analyze this image, sorry.")),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.extract_features(b"img").await.unwrap_err();

    match err {
        Error::Extraction { excerpt } => assert!(excerpt.starts_with("I cannot analyze")),
        other => panic!("expected extraction error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_field_is_schema_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "{\"density_score\": 70, \"scalp_exposure_percent\": 20, \"parting_width_px\": 8, \"baby_hairs_visible\": true}",
        )))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.extract_features(b"img").await.unwrap_err();

    match err {
        Error::Schema { field, .. } => assert_eq!(field, "stage"),
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_transport() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.extract_features(b"img").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_unconfigured_backend_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let config = OpenAIConfig {
        base_url: server.uri(),
        api_key: Some("your-api-key-here".to_string()),
        ..Default::default()
    };
    let backend = OpenAIBackend::new(config).unwrap();

    let err = backend.extract_features(b"img").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_unresolved_key_reference_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let config = OpenAIConfig {
        base_url: server.uri(),
        api_key: Some("${OPENAI_API_KEY}".to_string()),
        ..Default::default()
    };
    let backend = OpenAIBackend::new(config).unwrap();

    let err = backend.generate_advice(&sample_analysis()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_partial_usage_is_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "content": "{\"summary\": \"a\", \"advice\": \"b\"}" } }
            ],
            "usage": { "prompt_tokens": 10 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let advice = backend.generate_advice(&sample_analysis()).await.unwrap();

    assert_eq!(advice.summary, "a");
    assert_eq!(advice.advice, "b");
}

#[tokio::test]
async fn test_slow_server_times_out_as_transport() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("{\"summary\": \"a\", \"advice\": \"b\"}"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = OpenAIConfig {
        base_url: server.uri(),
        api_key: Some("sk-test".to_string()),
        timeout_seconds: 1,
        ..Default::default()
    };
    let backend = OpenAIBackend::new(config).unwrap();

    let err = backend.generate_advice(&sample_analysis()).await.unwrap_err();
    match err {
        Error::Transport { status, message } => {
            assert_eq!(status, None);
            assert!(message.contains("timed out"), "unexpected message: {}", message);
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}
