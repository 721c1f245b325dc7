use helpdesk::config::{load_intent_table, ChatbotConfig, DEFAULT_CACHE_TTL_SECS, MAX_CACHE_TTL_SECS};
use helpdesk::intent::IntentClassifier;
use helpdesk::{Chatbot, ChatbotError};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = ChatbotConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
    assert_eq!(config.escalation_threshold, 0.3);
    assert!(config.llm.api_key().is_none());
    assert!(config.intents_path.is_none());
}

#[test]
fn test_env_overrides() {
    let config = ChatbotConfig::from_lookup(lookup(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("OPENAI_BASE_URL", "http://localhost:9000/v1/"),
        ("CHATBOT_CACHE_TTL_SECS", "30"),
        ("CHATBOT_ESCALATION_THRESHOLD", "0.5"),
    ]))
    .unwrap();

    assert_eq!(config.llm.api_key(), Some("sk-test"));
    assert_eq!(config.llm.base_url, "http://localhost:9000/v1");
    assert_eq!(config.cache_ttl_secs, 30);
    assert_eq!(config.escalation_threshold, 0.5);
}

#[test]
fn test_invalid_values_are_rejected() {
    let err = ChatbotConfig::from_lookup(lookup(&[("CHATBOT_ESCALATION_THRESHOLD", "1.5")])).unwrap_err();
    assert!(matches!(err, ChatbotError::Config(_)));

    let err = ChatbotConfig::from_lookup(lookup(&[("CHATBOT_CACHE_TTL_SECS", "ten")])).unwrap_err();
    assert!(matches!(err, ChatbotError::Config(_)));

    let err = ChatbotConfig::from_lookup(lookup(&[("CHATBOT_KEEP_HISTORY", "maybe")])).unwrap_err();
    assert!(matches!(err, ChatbotError::Config(_)));
}

#[test]
fn test_cache_ttl_ceiling() {
    let max = MAX_CACHE_TTL_SECS.to_string();
    let config = ChatbotConfig::from_lookup(lookup(&[("CHATBOT_CACHE_TTL_SECS", max.as_str())])).unwrap();
    assert_eq!(config.cache_ttl_secs, MAX_CACHE_TTL_SECS);

    let huge = u64::MAX.to_string();
    let err = ChatbotConfig::from_lookup(lookup(&[("CHATBOT_CACHE_TTL_SECS", huge.as_str())])).unwrap_err();
    assert!(matches!(err, ChatbotError::Config(_)));

    let config = ChatbotConfig {
        cache_ttl_secs: u64::MAX,
        ..ChatbotConfig::default()
    };
    assert!(matches!(Chatbot::from_config(&config), Err(ChatbotError::Config(_))));
}

#[tokio::test]
async fn test_log_only_transcript_keeps_no_history() {
    let config = ChatbotConfig::from_lookup(lookup(&[("CHATBOT_KEEP_HISTORY", "false")])).unwrap();
    assert!(!config.keep_history);
    let bot = Chatbot::from_config(&config).unwrap();

    let reply = bot.process_input("hello", Some(7), Some("s1")).await;
    assert_eq!(reply.intent, "greeting");
    assert!(bot.conversation_history(7, 10).is_empty());
    assert_eq!(bot.analytics().total_conversations, 0);

    let bot = Chatbot::from_config(&ChatbotConfig::default()).unwrap();
    bot.process_input("hello", Some(7), Some("s1")).await;
    assert_eq!(bot.conversation_history(7, 10).len(), 1);
}

#[test]
fn test_intent_table_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "intents": [
                {{ "name": "delivery", "patterns": ["courier", "where's my parcel"], "responses": ["Couriers ship within 48 hours."] }}
            ],
            "fallback_responses": ["Sorry?"]
        }}"#
    )
    .unwrap();

    let table = load_intent_table(file.path()).unwrap();
    let classifier = IntentClassifier::new(Arc::new(table));
    assert_eq!(classifier.classify("Where's my parcel?").intent, "delivery");
    assert_eq!(classifier.classify("hello").intent, "default");

    let config = ChatbotConfig {
        intents_path: Some(file.path().to_path_buf()),
        ..ChatbotConfig::default()
    };
    let bot = Chatbot::from_config(&config).unwrap();
    assert_eq!(bot.status().capabilities, ["delivery"]);
}

#[test]
fn test_broken_intent_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    assert!(matches!(load_intent_table(file.path()), Err(ChatbotError::Parse(_))));

    let missing = std::path::Path::new("/definitely/not/here.json");
    assert!(matches!(load_intent_table(missing), Err(ChatbotError::Io(_))));
}
