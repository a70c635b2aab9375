//! Relay core.
//!
//! Per inbound request:
//!
//! ```text
//! Validating ─┬─> CommandShortCircuit ─> Done
//!             └─> Enhancing ─> Connecting ─> Streaming ─> Done | Error
//! ```
//!
//! `Error` is reachable from `Validating` (no credential), `Connecting`
//! (upstream unreachable) and `Streaming` (surfaced only as a closed
//! connection). At most one upstream connection is opened per request and it
//! is never retried.

mod session;

use std::sync::Arc;

use bytes::Bytes;
use futures::future::Either;
use futures::{stream, Stream};
use log::{debug, error, info, warn};
use serde_json::json;
use tokio::time::{timeout_at, Instant};

use crate::config::AppConfig;
use crate::error::RelayError;
use crate::persona::{self, PersonaSessions};
use crate::upstream::{Upstream, UpstreamRequest};
use crate::web::models::ChatRequest;

pub use session::StreamSession;

pub enum RelayReply {
    /// Answered locally by the command interceptor.
    Synthesized(String),
    Streaming(StreamSession),
}

impl RelayReply {
    /// Response body in SSE wire format. Synthesized text uses the typed
    /// event shape so clients parse it like an upstream reply.
    pub fn into_body(self) -> impl Stream<Item = Result<Bytes, RelayError>> + Send + 'static {
        match self {
            RelayReply::Synthesized(text) => {
                let frames = command_frames(&text).into_iter().map(Ok::<Bytes, RelayError>);
                Either::Left(stream::iter(frames))
            }
            RelayReply::Streaming(session) => Either::Right(session.into_stream()),
        }
    }
}

/// A synthesized reply: one content frame followed by one terminal frame.
pub fn command_frames(text: &str) -> Vec<Bytes> {
    let delta = json!({ "type": "content_block_delta", "delta": { "text": text } });
    let stop = json!({ "type": "message_stop" });
    vec![sse_frame(&delta), sse_frame(&stop)]
}

fn sse_frame(data: &serde_json::Value) -> Bytes {
    Bytes::from(format!("data: {}\n\n", data))
}

pub struct Relay {
    config: AppConfig,
    upstream: Arc<dyn Upstream>,
    personas: Arc<PersonaSessions>,
}

impl Relay {
    pub fn new(
        config: AppConfig,
        upstream: Arc<dyn Upstream>,
        personas: Arc<PersonaSessions>,
    ) -> Self {
        Self {
            config,
            upstream,
            personas,
        }
    }

    pub async fn relay(&self, request: ChatRequest) -> Result<RelayReply, RelayError> {
        // The total budget covers waiting for upstream headers as well as
        // streaming the body.
        let deadline = Instant::now() + self.config.total_timeout;

        debug!("relay: validating");
        let api_key = request
            .key
            .clone()
            .or_else(|| self.config.api_key.clone())
            .filter(|k| !k.is_empty())
            .ok_or(RelayError::MissingCredential)?;

        let ChatRequest {
            messages,
            model,
            max_tokens,
            temperature,
            persona: explicit_persona,
            session_id,
            ..
        } = request;

        let (messages, system) = if self.config.personas_enabled {
            let current = self.personas.resolve(explicit_persona.as_deref(), session_id);

            let command = persona::intercept(&messages, &current);
            if command.matched {
                if let (Some(selected), Some(session)) = (command.selected, session_id) {
                    self.personas.select(session, selected);
                    debug!(
                        "relay: session {} now on {} ({} sessions tracked)",
                        session,
                        selected,
                        self.personas.session_count()
                    );
                }
                info!(
                    "Command answered locally (persona {} -> {})",
                    current,
                    command.selected.unwrap_or(current.as_str())
                );
                return Ok(RelayReply::Synthesized(
                    command.response_text.unwrap_or_default(),
                ));
            }

            debug!("relay: enhancing with persona {}", current);
            let enhanced = persona::enhance(messages, &current);
            (enhanced.messages, Some(enhanced.system))
        } else {
            (messages, None)
        };

        let upstream_request = UpstreamRequest {
            model,
            messages,
            system,
            max_tokens,
            temperature,
            stream: true,
        };

        debug!("relay: connecting");
        let opened = timeout_at(deadline, self.upstream.open(&upstream_request, &api_key))
            .await
            .unwrap_or_else(|_| {
                Err(RelayError::UpstreamConnect(format!(
                    "no response headers within {:?}",
                    self.config.total_timeout
                )))
            });
        let response = opened.map_err(|e| {
            error!("Error contacting upstream API: {}", e);
            e
        })?;

        if !(200..300).contains(&response.status) {
            // Passed through as-is; the client sees the upstream error body.
            warn!("Upstream answered with status {}", response.status);
        }

        debug!("relay: streaming");
        Ok(RelayReply::Streaming(StreamSession::with_deadline(
            response.body,
            self.config.idle_timeout,
            self.config.total_timeout,
            deadline,
        )))
    }
}
