//! Message extraction for chat-platform webhooks.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Facebook,
    Telegram,
    WhatsApp,
    Generic,
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    /// Unknown platform names are treated as generic payloads.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Platform::Facebook,
            "telegram" => Platform::Telegram,
            "whatsapp" => Platform::WhatsApp,
            _ => Platform::Generic,
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Facebook => "facebook",
            Platform::Telegram => "telegram",
            Platform::WhatsApp => "whatsapp",
            Platform::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// Pull the user's text out of a webhook body. `None` if absent or blank.
pub fn extract_message(platform: Platform, body: &Value) -> Option<String> {
    let pointer = match platform {
        Platform::Facebook => "/entry/0/messaging/0/message/text",
        Platform::Telegram => "/message/text",
        Platform::WhatsApp => "/messages/0/text/body",
        Platform::Generic => "/message",
    };

    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
