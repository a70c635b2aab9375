use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};

use echo_relay::config::AppConfig;
use echo_relay::persona::{self, DEFAULT_PERSONA};
use echo_relay::upstream::AnthropicUpstream;
use echo_relay::web::routes;
use echo_relay::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    info!("Starting ECHO relay on {}:{}", config.host, config.port);

    if config.api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; chat requests must carry their own key");
    }
    if config.personas_enabled {
        info!("Persona commands: ENABLED (default persona: {})", DEFAULT_PERSONA);
        info!(
            "Available personas: {}",
            persona::ids().collect::<Vec<_>>().join(", ")
        );
    } else {
        info!("Persona commands: DISABLED");
    }

    let upstream = AnthropicUpstream::new(&config).context("failed to build upstream client")?;

    let bind_addr = (config.host.clone(), config.port);
    let payload_limit = config.max_body_bytes;
    let app_state = web::Data::new(AppState::new(config, Arc::new(upstream)));

    // Start web server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(web::PayloadConfig::new(payload_limit))
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(bind_addr.clone())
    .with_context(|| format!("failed to bind {}:{}", bind_addr.0, bind_addr.1))?
    .run()
    .await
    .context("server error")?;

    Ok(())
}
