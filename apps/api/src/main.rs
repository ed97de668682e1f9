mod cache;
mod config;
mod cv;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod mbti;
mod models;
mod polling;
mod profile;
mod recommend;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::db::create_pool;
use crate::jobs::board::HttpJobBoard;
use crate::llm_client::LlmClient;
use crate::polling::CancellationToken;
use crate::recommend::courses::CourseFeed;
use crate::recommend::demo::DemoRecommender;
use crate::recommend::live::LlmRecommender;
use crate::recommend::source::{FallbackRecommender, Recommender};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3Store;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let store = Arc::new(S3Store::new(
        s3,
        config.s3_bucket.clone(),
        config.storage_public_url.clone(),
    ));
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(&config)?);
    if config.llm_api_key().is_some() {
        info!("LLM client initialized (model: {})", llm.model());
    } else {
        info!("No LLM API key set; LLM routes will answer 'not configured'");
    }

    let recommender: Arc<dyn Recommender> = Arc::new(LlmRecommender::new(llm.clone()));
    let fallback = FallbackRecommender::new(recommender.clone(), Arc::new(DemoRecommender));

    let job_board = Arc::new(HttpJobBoard::new(&config.job_board_url)?);
    let course_feed = config
        .course_feed_url
        .as_deref()
        .map(CourseFeed::new)
        .transpose()?;

    let cache_ttl = Duration::from_secs(config.cache_ttl_secs);
    let shutdown = CancellationToken::new();

    // Build app state
    let state = AppState {
        db,
        store,
        llm,
        job_board,
        recommender,
        fallback,
        course_feed,
        job_cache: TtlCache::new(cache_ttl),
        course_cache: TtlCache::new(cache_ttl),
        poll_policy: config.poll_policy(),
        shutdown: shutdown.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C and cancels `token` so pending polls return immediately.
async fn shutdown_signal(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown requested");
    token.cancel();
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "jobmatch-static",
    );

    let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path rather than by virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
