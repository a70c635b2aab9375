mod common;

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use common::{delta_text, test_config, FakeUpstream};
use echo_relay::persona::PERSONAS;
use echo_relay::web::routes;
use echo_relay::AppState;

macro_rules! app {
    ($upstream:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(
                    test_config(),
                    Arc::new($upstream.clone()),
                )))
                .configure(routes::configure),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {
        test::call_service(
            $app,
            test::TestRequest::post()
                .uri($uri)
                .set_json($body)
                .to_request(),
        )
        .await
    };
}

/// Text of the chat reply to one user message in a session.
macro_rules! chat_text {
    ($app:expr, $content:expr, $session:expr) => {{
        let resp = post_json!(
            $app,
            "/api/chat",
            json!({
                "messages": [{ "role": "user", "content": $content }],
                "session_id": $session.to_string()
            })
        );
        assert_eq!(resp.status(), 200);
        delta_text(&test::read_body(resp).await)
    }};
}

macro_rules! current_persona {
    ($app:expr, $session:expr) => {{
        let resp = post_json!(
            $app,
            "/api/bmad-agent",
            json!({ "action": "current", "session_id": $session })
        );
        let value: Value = test::read_body_json(resp).await;
        value
    }};
}

#[actix_web::test]
async fn test_switch_command_updates_only_its_session() {
    let upstream = FakeUpstream::streaming(["data: {}\n\n"]);
    let app = app!(upstream);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let reply = chat_text!(&app, "*/agent architect", alice);
    assert!(reply.starts_with("# Specialist Engagement: Winston - System Architect"));

    assert_eq!(current_persona!(&app, alice)["agent"], "architect");
    assert_eq!(current_persona!(&app, bob)["agent"], "echo");

    // A normal message from alice is enhanced with the architect instruction.
    let resp = post_json!(
        &app,
        "/api/chat",
        json!({
            "messages": [{ "role": "user", "content": "design a queue" }],
            "session_id": alice.to_string()
        })
    );
    let _ = test::read_body(resp).await;
    assert!(upstream
        .last_request()
        .system
        .unwrap()
        .starts_with("You are Winston - System Architect"));

    // Bob's conversation still gets the facilitator.
    let resp = post_json!(
        &app,
        "/api/chat",
        json!({
            "messages": [{ "role": "user", "content": "hello" }],
            "session_id": bob.to_string()
        })
    );
    let _ = test::read_body(resp).await;
    assert!(upstream
        .last_request()
        .system
        .unwrap()
        .starts_with("You are ECHO, a BMad Methodology"));
    assert_eq!(upstream.call_count(), 2);
}

#[actix_web::test]
async fn test_invalid_switch_lists_names_and_keeps_selection() {
    let upstream = FakeUpstream::streaming(["data: {}\n\n"]);
    let app = app!(upstream);
    let session = Uuid::new_v4();

    chat_text!(&app, "*pm", session);
    let reply = chat_text!(&app, "*/agent wizard", session);

    assert!(reply.contains("\"wizard\""));
    for persona in PERSONAS {
        assert!(reply.contains(persona.id), "missing {}", persona.id);
    }
    assert_eq!(current_persona!(&app, session)["agent"], "pm");
    assert_eq!(upstream.call_count(), 0);
}

#[actix_web::test]
async fn test_status_reports_session_persona() {
    let upstream = FakeUpstream::streaming(["data: {}\n\n"]);
    let app = app!(upstream);
    let session = Uuid::new_v4();

    chat_text!(&app, "*ux-expert", session);
    let status = chat_text!(&app, "  *status  ", session);
    assert!(status.contains("**Active Specialist:** Sally - UX Design Expert"));
}

#[actix_web::test]
async fn test_agent_endpoint_actions() {
    let upstream = FakeUpstream::streaming(Vec::<String>::new());
    let app = app!(upstream);
    let session = Uuid::new_v4();

    let resp = post_json!(&app, "/api/bmad-agent", json!({ "action": "list" }));
    let list: Value = test::read_body_json(resp).await;
    assert_eq!(list["current"], "echo");
    assert_eq!(list["agents"].as_object().unwrap().len(), PERSONAS.len());
    assert_eq!(list["agents"]["po"]["name"], "Sarah");

    let resp = post_json!(
        &app,
        "/api/bmad-agent",
        json!({ "action": "switch", "agent": "analyst", "session_id": session })
    );
    let switched: Value = test::read_body_json(resp).await;
    assert_eq!(switched["success"], true);
    assert_eq!(switched["info"]["title"], "Mary - Business Analyst");
    assert_eq!(current_persona!(&app, session)["agent"], "analyst");

    let resp = post_json!(
        &app,
        "/api/bmad-agent",
        json!({ "action": "switch", "agent": "wizard", "session_id": session })
    );
    let refused: Value = test::read_body_json(resp).await;
    assert_eq!(
        refused,
        json!({ "success": false, "error": "Invalid agent name" })
    );

    let resp = post_json!(&app, "/api/bmad-agent", json!({ "action": "dance" }));
    let unknown: Value = test::read_body_json(resp).await;
    assert_eq!(unknown, json!({ "error": "Invalid action" }));
}

#[actix_web::test]
async fn test_agent_endpoint_rejects_malformed_json() {
    let upstream = FakeUpstream::streaming(Vec::<String>::new());
    let app = app!(upstream);

    let req = test::TestRequest::post()
        .uri("/api/bmad-agent")
        .set_payload("{oops")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid JSON payload");
}

#[actix_web::test]
async fn test_health_check() {
    let upstream = FakeUpstream::streaming(Vec::<String>::new());
    let app = app!(upstream);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn test_switch_without_session_is_not_remembered() {
    let upstream = FakeUpstream::streaming(Vec::<String>::new());
    let app = app!(upstream);

    let resp = post_json!(
        &app,
        "/api/bmad-agent",
        json!({ "action": "switch", "agent": "architect" })
    );
    let switched: Value = test::read_body_json(resp).await;
    assert_eq!(switched["success"], true);
    assert_eq!(switched["agent"], "architect");

    // Nothing identifies the caller, so later requests see the default.
    let resp = post_json!(&app, "/api/bmad-agent", json!({ "action": "current" }));
    let current: Value = test::read_body_json(resp).await;
    assert_eq!(current["agent"], "echo");

    let resp = post_json!(&app, "/api/bmad-agent", json!({ "action": "list" }));
    let list: Value = test::read_body_json(resp).await;
    assert_eq!(list["current"], "echo");
}
