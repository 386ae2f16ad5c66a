use actix_cors::Cors;
use actix_middleware::{Logging, RateLimitMiddleware};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use civic_service::{handlers, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

fn build_cors(allowed_origins: Option<&str>) -> Cors {
    let cors = match allowed_origins {
        None => Cors::default().allow_any_origin(),
        Some(origins) => origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .fold(Cors::default(), |cors, origin| {
                if origin == "*" {
                    cors.allow_any_origin()
                } else {
                    cors.allowed_origin(origin)
                }
            }),
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Starting civic-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        env = %config.app.env,
        data_dir = %config.storage.data_dir.display(),
        "Configuration loaded"
    );
    if config.news.api_key.is_none() {
        tracing::warn!("NEWS_API_KEY not set; /api/news will serve the fallback article");
    }

    let state = web::Data::new(
        AppState::from_config(&config).context("Failed to initialize record storage")?,
    );
    let rate_limit = RateLimitMiddleware::new(config.rate_limit.middleware_config());
    let jwt_secret = config.auth.jwt_secret.clone();
    let cors_origins = config.app.cors_allowed_origins.clone();

    let bind_address = format!("{}:{}", config.app.host, config.app.http_port);
    tracing::info!("Starting HTTP server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(|cfg| handlers::configure(cfg, &jwt_secret))
            .wrap(Logging::default())
            .wrap(rate_limit.clone())
            .wrap(build_cors(cors_origins.as_deref()))
            .wrap(tracing_actix_web::TracingLogger::default())
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server error")?;

    tracing::info!("civic-service stopped");
    Ok(())
}
