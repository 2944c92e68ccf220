use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use auth_core::JwtKeys;
use content_api::config::Config;
use content_api::handlers;
use content_api::middleware::JwtAuthMiddleware;
use content_api::storage::{ObjectStorage, S3Storage};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    db_pool: sqlx::PgPool,
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.db_pool).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "content-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "content-api"
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"status": "alive"}))
}

/// Content API
///
/// CRUD service for the Vidora platform: tweets, videos, and the
/// subscription data model, behind a bearer-credential gate.
///
/// # Routes
///
/// - `/api/v1/tweets/*` - Create, list-by-user, update, delete tweets
/// - `/api/v1/videos/*` - Publish, read, update, delete videos
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Failed to load config: {}", e)))?;

    tracing::info!(
        env = %config.app.env,
        "Starting content-api on {}:{}",
        config.app.host,
        config.app.port
    );

    // Database pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("Failed to connect to Postgres: {}", e),
            )
        })?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Migration failed: {}", e)))?;
    tracing::info!("Database migrations applied");

    // Credential verification keys
    let jwt_keys = JwtKeys::from_secret(&config.auth.jwt_secret);

    // Object storage
    let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::from_config(&config.storage).await);
    tracing::info!(bucket = %config.storage.bucket, "Object storage client initialized");

    let db_pool_data = web::Data::new(db_pool.clone());
    let jwt_keys_data = web::Data::new(jwt_keys);
    let storage_data = web::Data::new(storage);
    let health_state = web::Data::new(HealthState { db_pool });

    let allowed_origins = config.cors.allowed_origins.clone();

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(db_pool_data.clone())
            .app_data(jwt_keys_data.clone())
            .app_data(storage_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            // Health check endpoints
            .route("/health", web::get().to(health_summary))
            .route("/health/live", web::get().to(liveness_check))
            .service(
                web::scope("/api/v1")
                    .wrap(JwtAuthMiddleware)
                    .service(
                        web::scope("/tweets")
                            .service(
                                web::resource("").route(web::post().to(handlers::create_tweet)),
                            )
                            .service(
                                web::resource("/user/{user_id}")
                                    .route(web::get().to(handlers::get_user_tweets)),
                            )
                            .service(
                                web::resource("/{tweet_id}")
                                    .route(web::patch().to(handlers::update_tweet))
                                    .route(web::delete().to(handlers::delete_tweet)),
                            ),
                    )
                    .service(
                        web::scope("/videos")
                            .service(
                                web::resource("").route(web::post().to(handlers::publish_video)),
                            )
                            .service(
                                web::resource("/{video_id}/publish")
                                    .route(web::patch().to(handlers::toggle_publish)),
                            )
                            .service(
                                web::resource("/{video_id}")
                                    .route(web::get().to(handlers::get_video))
                                    .route(web::patch().to(handlers::update_video))
                                    .route(web::delete().to(handlers::delete_video)),
                            ),
                    ),
            )
    })
    .bind((config.app.host.as_str(), config.app.port))?
    .run();

    tracing::info!("HTTP server is running");
    let result = server.await;
    tracing::info!("content-api shutting down");
    result
}
