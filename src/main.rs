use actix_cors::Cors;
use actix_web::{middleware::Compress, web, App, HttpServer};
use utoipa_swagger_ui::SwaggerUi;

mod auth;
mod config;
mod error;
mod identity;
mod image;
mod models;
mod openapi;
mod rate_limit;
mod routes;
mod security;
mod storage;
mod store;
mod tags;

use openapi::ApiDoc;
use rate_limit::{InMemoryRateLimiter, RateLimitConfig, RateLimiterFacade};
use routes::AppState;
use security::SecurityHeaders;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi; // bring trait into scope for ApiDoc::openapi()

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Environment variables must be set externally (shell, systemd, Docker).
    // Load .env automatically only in debug builds.
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }

    config::validate_env(cfg!(feature = "rest-store"));

    // Structured logging initialisation
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("Bootstrapping complaint service");

    let cfg = config::Config::from_env();

    #[cfg(feature = "rest-store")]
    let (record_store, identity_provider) = {
        let url = std::env::var("STORE_URL").expect("STORE_URL must be set");
        let key = std::env::var("STORE_KEY").expect("STORE_KEY must be set");
        info!("Using remote record store at {url}");
        let record_store: Arc<dyn store::RecordStore> =
            Arc::new(store::rest::RestStore::new(&url, &key));
        let identity_provider: Arc<dyn identity::IdentityProvider> =
            Arc::new(identity::rest::RestIdentityProvider::new(&url, &key));
        (record_store, identity_provider)
    };

    #[cfg(all(feature = "inmem-store", not(feature = "rest-store")))]
    let (record_store, identity_provider) = {
        info!("Using in-memory store backend");
        let record_store: Arc<dyn store::RecordStore> = Arc::new(store::inmem::InMemStore::new());
        let identity_provider: Arc<dyn identity::IdentityProvider> =
            Arc::new(identity::inmem::InMemIdentityProvider::new());
        (record_store, identity_provider)
    };

    let objects = storage::build_object_store().await;

    let rate_limiter = cfg.rate_limit_enabled.then(|| {
        RateLimiterFacade::new(InMemoryRateLimiter::new(true), RateLimitConfig::from_env())
    });

    let state = AppState {
        store: record_store,
        identity: identity_provider,
        objects,
        rate_limiter,
    };

    let openapi = ApiDoc::openapi();
    info!("OpenAPI spec generated");

    let allowed_origins = cfg.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default()
            .allow_any_header()
            .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .supports_credentials()
            .max_age(3600);
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(TracingLogger::default())
            .wrap(Compress::default())
            .wrap(SecurityHeaders::from_env())
            .wrap(cors)
            .configure(routes::config)
            .service(SwaggerUi::new("/docs/{_:.*}").url("/docs/openapi.json", openapi.clone()))
            .app_data(web::Data::new(state.clone()))
    })
    .bind((cfg.bind_addr.as_str(), cfg.port))?;

    info!("Listening on http://{}:{}", cfg.bind_addr, cfg.port);

    server.run().await
}
