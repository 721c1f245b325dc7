use helpdesk::{Chatbot, ChatbotConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Line-oriented driver: each stdin line is a chat message, each stdout line a JSON reply.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = ChatbotConfig::from_env()?;
    let bot = Chatbot::from_config(&config)?;
    tracing::info!(
        llm_fallback = bot.status().llm_fallback,
        cache_ttl_secs = config.cache_ttl_secs,
        "helpdesk ready"
    );

    let user_id = std::env::var("CHATBOT_USER_ID").ok().and_then(|v| v.parse().ok());
    let session_id = std::env::var("CHATBOT_SESSION_ID").ok();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = match line {
            ":faq" => serde_json::to_string(bot.common_questions())?,
            ":stats" => serde_json::to_string(&bot.analytics())?,
            ":status" => serde_json::to_string(&bot.status())?,
            ":human" => serde_json::to_string(&bot.escalate_to_human("requested from console", user_id))?,
            _ => {
                let reply = bot.process_input(line, user_id, session_id.as_deref()).await;
                serde_json::to_string(&reply)?
            }
        };
        println!("{}", output);
    }

    Ok(())
}
