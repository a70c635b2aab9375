use actix_files::NamedFile;
use actix_web::http::header::{HeaderValue, CONTENT_TYPE};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use serde_json::json;

use crate::error::RelayError;
use crate::persona::{self, PERSONAS};
use crate::static_files;
use crate::web::models::{AgentRequest, ChatRequest};
use crate::AppState;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Chat API endpoint: SSE relay to the upstream completion API
pub async fn chat(
    data: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, RelayError> {
    let request = ChatRequest::from_json(&body, &data.config.default_model)?;

    info!(
        "Chat request: {} messages, model {} (max_tokens: {}, session: {:?})",
        request.messages.len(),
        request.model,
        request.max_tokens,
        request.session_id
    );

    let reply = data.relay.relay(request).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("cache-control", "no-cache"))
        .insert_header(("connection", "keep-alive"))
        .streaming(reply.into_body()))
}

// Persona listing and switching
pub async fn agent(data: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let payload: AgentRequest = if body.is_empty() {
        AgentRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Invalid persona request: {}", e);
                return HttpResponse::BadRequest().json(json!({ "error": "Invalid JSON payload" }));
            }
        }
    };

    let current = data.personas.resolve(None, payload.session_id);

    let response = match payload.action.as_deref() {
        Some("list") => {
            let agents: serde_json::Map<String, serde_json::Value> = PERSONAS
                .iter()
                .map(|p| (p.id.to_string(), json!(p)))
                .collect();
            json!({ "agents": agents, "current": current })
        }
        Some("switch") => match payload.agent.as_deref().and_then(persona::find) {
            Some(selected) => {
                if let Some(session) = payload.session_id {
                    data.personas.select(session, selected.id);
                }
                info!(
                    "Persona switched to {} (session: {:?}, {} sessions tracked)",
                    selected.id,
                    payload.session_id,
                    data.personas.session_count()
                );
                json!({ "success": true, "agent": selected.id, "info": selected })
            }
            None => json!({ "success": false, "error": "Invalid agent name" }),
        },
        Some("current") => json!({ "agent": current, "info": persona::find(&current) }),
        _ => json!({ "error": "Invalid action" }),
    };

    HttpResponse::Ok().json(response)
}

// Fallback: files from the public directory
pub async fn static_file(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, RelayError> {
    let asset = static_files::resolve(&data.config.public_dir, req.path()).await?;
    let file = NamedFile::open_async(&asset.path)
        .await?
        .disable_content_disposition();

    let mut response = file.into_response(&req);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(asset.content_type));
    Ok(response)
}
