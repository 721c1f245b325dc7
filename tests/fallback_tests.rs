use helpdesk::config::LlmConfig;
use helpdesk::intent::catalog::builtin_table;
use helpdesk::services::llm::{self, FallbackResponder, OpenAiResponder};
use helpdesk::Chatbot;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn llm_config(server: &MockServer, api_key: Option<&str>) -> LlmConfig {
    LlmConfig {
        api_key: api_key.map(str::to_string),
        base_url: server.uri(),
        timeout_secs: 1,
        ..LlmConfig::default()
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn test_returns_message_content_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test_key"))
        .and(body_partial_json(json!({ "model": "gpt-3.5-turbo", "max_tokens": 150 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("This is a response from the API")))
        .expect(1)
        .mount(&server)
        .await;

    let responder = OpenAiResponder::new(llm_config(&server, Some("test_key")));
    let answer = responder.answer("What is the weather today?").await;
    assert_eq!(answer.as_deref(), Some("This is a response from the API"));
}

#[tokio::test]
async fn test_content_is_passed_through_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Sure thing.\n")))
        .mount(&server)
        .await;

    let responder = OpenAiResponder::new(llm_config(&server, Some("test_key")));
    assert_eq!(responder.answer("hi").await.as_deref(), Some("  Sure thing.\n"));
}

#[tokio::test]
async fn test_whitespace_only_content_is_no_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
        .mount(&server)
        .await;

    let responder = OpenAiResponder::new(llm_config(&server, Some("test_key")));
    assert_eq!(responder.answer("hi").await, None);
}

#[tokio::test]
async fn test_no_api_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let config = llm_config(&server, None);
    let selected = llm::from_config(&config);
    assert!(!selected.is_enabled());
    assert_eq!(selected.answer("What is the weather today?").await, None);

    // A blank key counts as missing even on the HTTP responder itself.
    let blank = OpenAiResponder::new(llm_config(&server, Some("   ")));
    assert_eq!(blank.answer("What is the weather today?").await, None);
}

#[tokio::test]
async fn test_server_error_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let responder = OpenAiResponder::new(llm_config(&server, Some("test_key")));
    assert_eq!(responder.answer("What is the weather today?").await, None);
}

#[tokio::test]
async fn test_malformed_body_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let responder = OpenAiResponder::new(llm_config(&server, Some("test_key")));
    assert_eq!(responder.answer("hi").await, None);
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let responder = OpenAiResponder::new(llm_config(&server, Some("test_key")));
    assert_eq!(responder.answer("hi").await, None);
}

#[tokio::test]
async fn test_chatbot_falls_back_to_canned_reply_on_provider_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let table = builtin_table().unwrap();
    let canned = table.get("product_info").unwrap().responses.clone();
    let bot = Chatbot::builder(table)
        .fallback(llm::from_config(&llm_config(&server, Some("test_key"))))
        .build();

    let reply = bot.process_input("What is the weather today?", None, None).await;
    assert_eq!(reply.intent, "product_info");
    assert!(canned.contains(&reply.response));
    assert!(bot.status().llm_fallback);
}
