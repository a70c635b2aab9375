//! Upstream completion API.
//!
//! [`Upstream`] opens exactly one streaming call and hands back the raw body
//! stream; it never parses the SSE payload.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use log::{debug, info};
use reqwest::Client;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::RelayError;
use crate::web::models::ChatMessage;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, RelayError>> + Send>>;

/// JSON body of the upstream call. Built fresh for every relay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub stream: bool,
}

pub struct UpstreamResponse {
    pub status: u16,
    pub body: ByteStream,
}

#[async_trait]
pub trait Upstream: Send + Sync {
    /// Open the upstream connection. Errors here happen before any byte has
    /// been sent to the caller.
    async fn open(
        &self,
        request: &UpstreamRequest,
        api_key: &str,
    ) -> Result<UpstreamResponse, RelayError>;
}

/// Anthropic Messages API over HTTPS.
pub struct AnthropicUpstream {
    client: Client,
    url: String,
    version: String,
}

impl AnthropicUpstream {
    pub fn new(config: &AppConfig) -> reqwest::Result<Self> {
        info!("Using upstream completion API at: {}", config.upstream_url);

        // No overall request timeout: the relay session bounds streaming time.
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.upstream_url.clone(),
            version: config.anthropic_version.clone(),
        })
    }
}

#[async_trait]
impl Upstream for AnthropicUpstream {
    async fn open(
        &self,
        request: &UpstreamRequest,
        api_key: &str,
    ) -> Result<UpstreamResponse, RelayError> {
        info!(
            "Opening upstream stream: model={} messages={} max_tokens={}",
            request.model,
            request.messages.len(),
            request.max_tokens
        );
        debug!("Upstream system prompt present: {}", request.system.is_some());

        let response = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.version)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::UpstreamConnect(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| RelayError::UpstreamStream(e.to_string())));

        Ok(UpstreamResponse {
            status,
            body: Box::pin(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::models::Role;
    use serde_json::json;

    #[test]
    fn test_request_body_omits_absent_fields() {
        let request = UpstreamRequest {
            model: "claude-3-haiku-20240307".to_string(),
            messages: vec![ChatMessage::new(Role::User, "hello")],
            system: None,
            max_tokens: 1024,
            temperature: None,
            stream: true,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "claude-3-haiku-20240307",
                "messages": [{"role": "user", "content": "hello"}],
                "max_tokens": 1024,
                "stream": true
            })
        );
    }

    #[test]
    fn test_request_body_with_system_and_temperature() {
        let request = UpstreamRequest {
            model: "m".to_string(),
            messages: Vec::new(),
            system: Some("You are ECHO".to_string()),
            max_tokens: 500,
            temperature: Some(0.5),
            stream: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["system"], "You are ECHO");
        assert_eq!(value["temperature"], 0.5);
    }
}
