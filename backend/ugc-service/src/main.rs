use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use bearer_auth::{RemoteValidator, TokenVerifier};
use bson::doc;
use mongodb::Client;
use redis::aio::ConnectionManager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ugc_service::db::MongoStore;
use ugc_service::handlers::{self, AppState};
use ugc_service::services::LogForwarder;
use ugc_service::Config;

struct HealthState {
    mongo: mongodb::Database,
    redis: Option<ConnectionManager>,
}

impl HealthState {
    async fn check_mongo(&self) -> Result<(), mongodb::error::Error> {
        self.mongo.run_command(doc! { "ping": 1 }).await.map(|_| ())
    }

    async fn check_redis(&self) -> Result<(), redis::RedisError> {
        let Some(manager) = &self.redis else {
            return Ok(());
        };
        let mut conn = manager.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "unexpected PING response",
            )))
        }
    }
}

async fn health_summary() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "ugc-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    if let Err(e) = state.check_mongo().await {
        return HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "ready": false,
            "error": format!("MongoDB ping failed: {}", e),
        }));
    }

    if let Err(e) = state.check_redis().await {
        return HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "ready": false,
            "error": format!("Redis ping failed: {}", e),
        }));
    }

    HttpResponse::Ok().json(serde_json::json!({ "ready": true }))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting ugc-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize MongoDB client and verify the connection
    let mongo_client = Client::with_uri_str(&config.mongo.url).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to create MongoDB client: {e}"),
        )
    })?;
    let mongo_db = mongo_client.database(&config.mongo.db_name);
    mongo_db
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("MongoDB ping failed: {e}"),
            )
        })?;
    tracing::info!("Connected to MongoDB at {}", config.mongo.url);

    let store = Arc::new(MongoStore::new(&mongo_client, &config.mongo.db_name));

    // Token verification: remote validation with a Redis cache unless
    // disabled for development.
    let (verifier, redis_manager) = if config.auth.validate {
        let auth_url = match config.auth.url.clone() {
            Some(url) => url,
            None => {
                eprintln!("ERROR: AUTH_URL must be set when JWT_VALIDATE is enabled");
                std::process::exit(1);
            }
        };

        let redis_client = redis::Client::open(config.redis.url.as_str()).map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to create Redis client: {e}"),
            )
        })?;
        let redis_manager = ConnectionManager::new(redis_client).await.map_err(|e| {
            io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("Failed to connect to Redis: {e}"),
            )
        })?;
        tracing::info!("Redis connection established");

        let validator = RemoteValidator::new(
            redis_manager.clone(),
            auth_url,
            config.auth.cache_expire_secs,
        );
        (
            Arc::new(TokenVerifier::with_remote(validator)),
            Some(redis_manager),
        )
    } else {
        tracing::warn!("JWT_VALIDATE=false: tokens are only decoded locally");
        (Arc::new(TokenVerifier::local_only()), None)
    };

    let mut state = AppState::new(store);
    if let Some(logs_url) = config.logs.url.clone() {
        tracing::info!("Bookmark log forwarding enabled: {}", logs_url);
        state = state.with_log_forwarder(LogForwarder::new(logs_url));
    }
    let state = web::Data::new(state);

    let health_state = web::Data::new(HealthState {
        mongo: mongo_db,
        redis: redis_manager,
    });

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let cors_origins = config.app.cors_allowed_origins.clone();

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/ready", web::get().to(readiness_summary))
            .service(handlers::api_scope(verifier.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
