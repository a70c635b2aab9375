use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web;

use crate::web::handlers;

fn api_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(api_cors())
            .route("/chat", web::post().to(handlers::chat))
            .route("/bmad-agent", web::post().to(handlers::agent)),
    )
    .route("/health", web::get().to(handlers::health_check))
    .default_service(web::to(handlers::static_file));
}
