//! ECHO relay server.
//!
//! Serves the browser chat UI and relays `POST /api/chat` to an upstream
//! completion API as a Server-Sent-Events stream, answering persona commands
//! locally.

pub mod config;
pub mod error;
pub mod persona;
pub mod relay;
pub mod static_files;
pub mod upstream;
pub mod web;

use std::sync::Arc;

use config::AppConfig;
use persona::PersonaSessions;
use relay::Relay;
use upstream::Upstream;

// App state structure
pub struct AppState {
    pub config: AppConfig,
    pub relay: Relay,
    pub personas: Arc<PersonaSessions>,
}

impl AppState {
    pub fn new(config: AppConfig, upstream: Arc<dyn Upstream>) -> Self {
        let personas = Arc::new(PersonaSessions::new(
            config.session_capacity,
            config.session_idle,
        ));
        Self {
            relay: Relay::new(config.clone(), upstream, personas.clone()),
            config,
            personas,
        }
    }
}
