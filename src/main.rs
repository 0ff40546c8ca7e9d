use actix_cors::Cors;
use actix_web::{get, middleware::NormalizePath, web, App, HttpResponse, HttpServer, Responder};
use tracing_actix_web::TracingLogger;

use resume_render_api::{
    constants::MAX_JSON_PAYLOAD_BYTES,
    graceful_shutdown::shutdown_signal,
    handlers::json_error::{json_error_handler, not_found},
    middlewares::{auth::ApiKeyMiddleware, host::HostFilter},
    routes::configure_routes,
    settings::AppConfig,
    AppState,
};

#[get("/")]
async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Resume Render API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if config.uses_default_secret() {
        tracing::warn!("Using default API secret! Please set API_SECRET env var.");
    }

    let app_state = web::Data::new(AppState::new(&config));

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let workers = config.worker_count;
    let cors_origins = config.cors_origins();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(
                web::JsonConfig::default()
                    .limit(MAX_JSON_PAYLOAD_BYTES)
                    .error_handler(json_error_handler),
            )
            .wrap(NormalizePath::trim())
            .wrap(ApiKeyMiddleware)
            .wrap(HostFilter)
            .wrap(TracingLogger::default())
            .wrap(build_cors(&cors_origins))
            .service(home)
            .configure(configure_routes)
            .default_service(web::route().to(not_found))
    })
    .workers(workers)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}

fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    for origin in origins {
        if origin == "*" {
            return Cors::permissive();
        }
        cors = cors.allowed_origin(origin);
    }

    cors
}
