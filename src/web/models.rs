use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::DEFAULT_MAX_TOKENS;
use crate::error::RelayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "system")]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// One inbound `/api/chat` call.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub key: Option<String>,
    /// Explicit persona for this call; wins over the session selection.
    pub persona: Option<String>,
    pub session_id: Option<Uuid>,
}

impl ChatRequest {
    /// Parse a request body leniently: fields with the wrong JSON type are
    /// treated as absent, and an empty body is an empty object.
    pub fn from_json(body: &[u8], default_model: &str) -> Result<Self, RelayError> {
        let payload: Value = if body.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(body)?
        };

        let messages = match payload.get("messages").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter_map(|item| match ChatMessage::deserialize(item) {
                    Ok(message) => Some(message),
                    Err(e) => {
                        warn!("Skipping malformed chat message: {}", e);
                        None
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        let text_field = |name: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Ok(Self {
            messages,
            model: text_field("model").unwrap_or_else(|| default_model.to_string()),
            max_tokens: payload
                .get("max_tokens")
                .and_then(token_limit)
                .unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: payload.get("temperature").and_then(Value::as_f64),
            key: text_field("key").filter(|k| !k.is_empty()),
            persona: text_field("persona"),
            session_id: text_field("session_id").and_then(|s| Uuid::parse_str(&s).ok()),
        })
    }
}

/// Any JSON number holding a whole value in `u32` range, so `500` and `500.0`
/// both count.
fn token_limit(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let n = value.as_f64()?;
    if n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n) {
        Some(n as u32)
    } else {
        None
    }
}

pub fn last_user_text(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .last()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
}

/// Body of `POST /api/bmad-agent`.
#[derive(Debug, Default, Deserialize)]
pub struct AgentRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}
