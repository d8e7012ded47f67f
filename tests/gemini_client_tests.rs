//! Gemini client tests with mocked network responses
//!
//! These tests use wiremock to stand in for the Gemini REST API and validate:
//! - Request shape (endpoint, API key header, generation config)
//! - Candidate text extraction
//! - Error mapping
//! - Failed HTTP calls becoming failed chain steps

use review_chain::llm::client::{LLMClient, ProviderRequest};
use review_chain::llm::gemini::GeminiClient;
use review_chain::llm::{GenerationClient, GenerationOutcome, Provider};
use review_chain::workflows::ChainExecutor;
use review_chain::{AgentSpec, AppError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Helper Functions =============

/// Create a mock generateContent response with the given text parts
fn mock_generate_response(parts: &[&str]) -> serde_json::Value {
    let parts: Vec<serde_json::Value> = parts.iter().map(|t| json!({ "text": t })).collect();
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5 }
    })
}

fn mock_error_response(code: u16, message: &str) -> serde_json::Value {
    json!({
        "error": { "code": code, "message": message, "status": "INVALID_ARGUMENT" }
    })
}

fn request(prompt: &str) -> ProviderRequest {
    ProviderRequest {
        api_key: "test-key".to_string(),
        model: "gemini-2.5-flash".to_string(),
        prompt: prompt.to_string(),
        temperature: 0.2,
        max_output_tokens: 1500,
    }
}

// ============= Client Tests =============

#[tokio::test]
async fn test_generate_content_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Summarise this" }] }],
            "generationConfig": { "maxOutputTokens": 1500 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_generate_response(&["Summary"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(server.uri()).unwrap();
    let text = client.complete(&request("Summarise this")).await.unwrap();

    assert_eq!(text.as_deref(), Some("Summary"));
}

#[tokio::test]
async fn test_parts_are_concatenated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(mock_generate_response(&["Part one, ", "part two"])),
        )
        .mount(&server)
        .await;

    let client = GeminiClient::new(format!("{}/", server.uri())).unwrap();
    let text = client.complete(&request("p")).await.unwrap();

    assert_eq!(text.as_deref(), Some("Part one, part two"));
}

#[tokio::test]
async fn test_no_candidates_is_no_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(server.uri()).unwrap();
    assert_eq!(client.complete(&request("p")).await.unwrap(), None);

    // Through the generation client the empty answer becomes the placeholder
    let generation = GenerationClient::new(std::sync::Arc::new(client));
    let outcome = generation
        .generate(&review_chain::GenerationRequest {
            api_key: "test-key",
            model: "gemini-2.5-flash",
            system_prompt: "S",
            user_prompt: "U",
            context: "C",
            temperature: 0.0,
            max_tokens: 10,
        })
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        GenerationOutcome::Success { ref text, .. } if text == "No response generated."
    ));
}

#[tokio::test]
async fn test_api_error_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(mock_error_response(400, "API key not valid")),
        )
        .mount(&server)
        .await;

    let client = GeminiClient::new(server.uri()).unwrap();
    let result = client.complete(&request("p")).await;

    match result {
        Err(AppError::LLM(message)) => assert_eq!(message, "API key not valid"),
        other => panic!("expected LLM error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_error_keeps_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = GeminiClient::new(server.uri()).unwrap();
    match client.complete(&request("p")).await {
        Err(AppError::LLM(message)) => {
            assert!(message.contains("503"));
            assert!(message.contains("upstream unavailable"));
        }
        other => panic!("expected LLM error, got {:?}", other),
    }
}

// ============= Chain over HTTP =============

#[tokio::test]
async fn test_chain_over_http_with_one_failing_step() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_generate_response(&["extracted"])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(mock_error_response(429, "Resource exhausted")),
        )
        .mount(&server)
        .await;

    let provider = Provider::Gemini {
        api_base: server.uri(),
    };
    let executor = ChainExecutor::new(
        GenerationClient::new(provider.create_client().unwrap()),
        "test-key",
    );
    let agents = vec![
        AgentSpec::new("1", "Extract", "S1", "U1"),
        AgentSpec::new("2", "Review", "S2", "U2").with_model("gemini-2.5-pro"),
    ];

    let report = executor.execute("document", &agents).await.unwrap();

    assert_eq!(
        report.outputs(),
        vec![
            "extracted".to_string(),
            "Error generating content: Resource exhausted".to_string()
        ]
    );
    assert!(report.metrics()[0].tokens > 0);
    assert_eq!(report.metrics()[1].tokens, 0);
    assert_eq!(report.metrics()[1].provider, "Gemini");
}
