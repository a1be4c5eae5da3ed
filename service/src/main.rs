#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Extension, Router,
};
use std::net::SocketAddr;
use storefront_edge::{
    build_info::BuildInfoProvider,
    config::Config,
    http::security::{security_headers_middleware, HeaderPolicy},
    rest,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load and validate configuration first (fail-fast)
    let config = Config::load().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up logging from config
    std::env::set_var("RUST_LOG", &config.logging.level);
    tracing_subscriber::fmt::init();

    // Init banner so container logs clearly show startup
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "storefront-edge starting up"
    );

    let build_info = BuildInfoProvider::from_env().build_info();
    tracing::info!(
        version = %build_info.version,
        git_sha = %build_info.git_sha,
        build_time = %build_info.build_time,
        "resolved build metadata"
    );

    // Build CORS layer from config
    let cors_origins = &config.cors.allowed_origins;
    let allow_origin: AllowOrigin = if cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow any origin - not recommended for production");
        AllowOrigin::any()
    } else if cors_origins.is_empty() {
        tracing::info!(
            "CORS allowed origins not configured - cross-origin requests will be blocked"
        );
        AllowOrigin::list(Vec::<HeaderValue>::new())
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        tracing::info!(origins = ?cors_origins, "CORS allowed origins configured");
        AllowOrigin::list(origins)
    };

    // Build the response header policy if enabled
    let policy = if config.security_headers.enabled {
        tracing::info!(
            csp = config.environment.is_production(),
            "Security headers enabled"
        );
        Some(HeaderPolicy::from_config(
            &config.security_headers,
            config.environment,
        ))
    } else {
        tracing::info!("Security headers disabled");
        None
    };

    // Build the app
    let mut app = Router::new()
        .route("/health", get(rest::health_check))
        .route("/build-info", get(rest::get_build_info))
        .layer(Extension(build_info))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any)
                .allow_origin(allow_origin),
        );

    // Add security headers middleware if enabled
    if let Some(policy) = policy {
        app = app
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(Extension(policy));
    }

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Starting server at http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
