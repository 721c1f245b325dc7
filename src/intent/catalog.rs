//! Built-in marketplace support intents and FAQ.

use serde::{Deserialize, Serialize};

use super::types::{IntentDefinition, IntentTable};
use crate::error::ChatbotError;

pub fn builtin_intents() -> Vec<IntentDefinition> {
    vec![
        IntentDefinition::new(
            "greeting",
            &[
                "hello", "hi", "hey", "good morning", "good afternoon", "good evening",
                "morning", "afternoon", "evening", "greetings", "sup", "whats up", "howdy",
            ],
            &[
                "Hello! How can I help you today?",
                "Hi there! How can I assist you?",
                "Greetings! What can I do for you?",
                "Hey! Need help with something?",
            ],
            &[
                "Tell me about your marketplace",
                "How do I list items?",
                "What are your fees?",
            ],
        ),
        IntentDefinition::new(
            "farewell",
            &[
                "goodbye", "good bye", "bye", "see you", "talk to you later", "see ya", "cya",
                "have a good day", "thanks bye", "thank you goodbye",
            ],
            &[
                "Goodbye! Feel free to reach out if you need anything else.",
                "See you later! Have a great day!",
                "Thank you for chatting with me. Have a wonderful day!",
                "Take care! Don't hesitate to come back if you have more questions.",
            ],
            &[],
        ),
        IntentDefinition::new(
            "help",
            &[
                "help", "support", "assist", "need help", "can you help", "how do i",
                "what can i do", "how to", "tutorial", "guide", "instructions",
                "customer service",
            ],
            &[
                "I'm here to help! You can ask me about our products, pricing, shipping, returns, or account issues.",
                "I can assist with product information, order status, account management, and common questions.",
                "Sure, I can provide information about our marketplace, selling process, payment methods, or policies.",
            ],
            &["View FAQ", "Contact support", "Knowledge base"],
        ),
        IntentDefinition::new(
            "product_info",
            &[
                "product", "item", "what is", "tell me about", "information about",
                "details about", "specs", "specifications", "features", "price", "cost",
                "how much", "pricing", "buy", "purchase",
            ],
            &[
                "To get product information, please provide the product name or ID.",
                "You can search for products using our search bar or browse categories.",
                "For specific product details, visit the product page or contact the seller directly.",
            ],
            &["Search for products", "Browse categories", "Contact seller"],
        ),
        IntentDefinition::new(
            "account",
            &[
                "account", "profile", "settings", "login", "sign in", "register", "signup",
                "sign up", "password", "forgot password", "reset password", "verification",
                "email", "change", "update", "my account",
            ],
            &[
                "For account issues, please visit the account settings page or contact support.",
                "You can update your profile information and security settings in your account dashboard.",
                "If you're having trouble with login, try resetting your password or contacting support.",
            ],
            &["Update profile", "Change password", "Manage privacy settings"],
        ),
        IntentDefinition::new(
            "order",
            &[
                "order", "purchase", "shipment", "shipping", "delivery", "tracking",
                "tracking number", "status", "cancel", "return", "refund", "invoice",
                "payment", "receipt", "buy",
            ],
            &[
                "For order inquiries, please check your account dashboard for order history and status.",
                "You can track your order using the tracking number provided in your confirmation email.",
                "For returns or refunds, please follow the process in our help center.",
            ],
            &["Check order status", "Return policy", "Shipping options"],
        ),
        IntentDefinition::new(
            "technical_issue",
            &[
                "not working", "broken", "error", "issue", "problem", "bug", "doesn't work",
                "can't access", "site down", "slow", "crash", "won't load", "loading",
                "timeout", "freeze", "malfunction",
            ],
            &[
                "I'm sorry you're experiencing technical issues. Try refreshing the page or clearing your browser cache.",
                "If the problem persists, please contact our technical support team with details about the issue.",
                "For urgent technical issues, please submit a ticket through our support portal.",
            ],
            &[],
        ),
    ]
}

pub fn fallback_responses() -> Vec<String> {
    [
        "I'm not sure I understand. Can you rephrase your question?",
        "Could you provide more details about what you need help with?",
        "I'm here to help with common questions about our marketplace, products, or accounts.",
        "You might want to check our FAQ section for common questions.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn generic_follow_ups() -> Vec<String> {
    ["Need more help?", "Check our FAQ", "Contact human agent"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn builtin_table() -> Result<IntentTable, ChatbotError> {
    IntentTable::new(builtin_intents(), fallback_responses(), generic_follow_ups())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

pub fn common_questions() -> Vec<FaqEntry> {
    [
        (
            "How do I list an item for sale?",
            "To list an item, click the \"Post Ad\" button, fill in the details, add photos, and submit. Your ad will be reviewed and published shortly.",
        ),
        (
            "What payment methods do you accept?",
            "We accept various payment methods including credit cards, bank transfers, mobile money, and other local payment options depending on your region.",
        ),
        (
            "How long does shipping take?",
            "Shipping times vary by location and seller. Usually, it takes 2-7 business days. Specific times are listed in the product description.",
        ),
        (
            "Can I return an item?",
            "Return policies depend on the seller. Check the individual product page for specific return conditions and timeframes.",
        ),
        (
            "How do I contact a seller?",
            "Use the \"Contact Seller\" button on the product page to message them directly through our platform.",
        ),
    ]
    .iter()
    .map(|(q, a)| FaqEntry {
        question: q.to_string(),
        answer: a.to_string(),
    })
    .collect()
}
