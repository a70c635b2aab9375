#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::future;
use futures::stream::{self, StreamExt};

use echo_relay::config::AppConfig;
use echo_relay::error::RelayError;
use echo_relay::upstream::{Upstream, UpstreamRequest, UpstreamResponse};

pub const TEST_KEY: &str = "sk-ant-test";

#[derive(Clone)]
pub enum Behaviour {
    Chunks(Vec<String>),
    /// First chunk, then nothing until the caller hangs up.
    Hang(String),
    /// Accepts the call and never sends response headers.
    Silent,
    Refuse,
}

/// Upstream double that records every call and whether its body was dropped.
#[derive(Clone)]
pub struct FakeUpstream {
    behaviour: Behaviour,
    pub calls: Arc<Mutex<Vec<(UpstreamRequest, String)>>>,
    pub closed: Arc<AtomicBool>,
}

impl FakeUpstream {
    pub fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn streaming<S: Into<String>>(chunks: impl IntoIterator<Item = S>) -> Self {
        Self::new(Behaviour::Chunks(chunks.into_iter().map(Into::into).collect()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_request(&self) -> UpstreamRequest {
        self.calls.lock().unwrap().last().cloned().unwrap().0
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct CloseFlag(Arc<AtomicBool>);

impl Drop for CloseFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn open(
        &self,
        request: &UpstreamRequest,
        api_key: &str,
    ) -> Result<UpstreamResponse, RelayError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), api_key.to_string()));

        let body = match &self.behaviour {
            Behaviour::Refuse => {
                return Err(RelayError::UpstreamConnect("connection refused".into()))
            }
            Behaviour::Chunks(chunks) => {
                let items: Vec<Result<Bytes, RelayError>> = chunks
                    .iter()
                    .map(|c| Ok(Bytes::from(c.clone())))
                    .collect();
                stream::iter(items).boxed()
            }
            Behaviour::Silent => {
                future::pending::<stream::BoxStream<'static, Result<Bytes, RelayError>>>().await
            }
            Behaviour::Hang(first) => {
                let items: Vec<Result<Bytes, RelayError>> = vec![Ok(Bytes::from(first.clone()))];
                stream::iter(items).chain(stream::pending()).boxed()
            }
        };

        let flag = CloseFlag(self.closed.clone());
        let body = body.map(move |item| {
            let _held = &flag;
            item
        });
        Ok(UpstreamResponse {
            status: 200,
            body: Box::pin(body),
        })
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        api_key: Some(TEST_KEY.to_string()),
        ..AppConfig::default()
    }
}

pub fn sse_frame(json: &str) -> String {
    format!("data: {}\n\n", json)
}

/// Concatenated text of every content delta in an SSE body, accepting both
/// typed-event and choices/delta frames.
pub fn delta_text(body: &[u8]) -> String {
    let text = std::str::from_utf8(body).unwrap();
    text.lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .filter_map(|data| serde_json::from_str::<serde_json::Value>(data).ok())
        .filter_map(|frame| {
            frame["delta"]["text"]
                .as_str()
                .or_else(|| frame["choices"][0]["delta"]["content"].as_str())
                .map(str::to_string)
        })
        .collect()
}

/// JSON payloads of every `data:` line.
pub fn frames(body: &[u8]) -> Vec<serde_json::Value> {
    std::str::from_utf8(body)
        .unwrap()
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|data| serde_json::from_str(data).unwrap())
        .collect()
}
