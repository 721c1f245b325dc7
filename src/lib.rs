pub mod cache;
pub mod channel;
pub mod chatbot;
pub mod config;
pub mod error;
pub mod intent;
pub mod response;
pub mod services;
pub mod transcript;

pub use chatbot::{ChatReply, Chatbot, ChatbotBuilder};
pub use config::ChatbotConfig;
pub use error::ChatbotError;
