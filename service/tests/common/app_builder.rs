//! Test app builder that mirrors main.rs wiring with injectable configuration.
//!
//! This module provides a [`TestAppBuilder`] that constructs an Axum router
//! matching the production configuration in `main.rs`, but with test-specific
//! routes, environments, and header configurations.
//!
//! # Preset Builders
//!
//! - [`TestAppBuilder::minimal()`] - Health check only
//! - [`TestAppBuilder::full()`] - Production-mode app with CORS and security headers

use axum::{
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Extension, Router,
};
use storefront_edge::{
    build_info::BuildInfoProvider,
    config::{Environment, SecurityHeadersConfig},
    http::security::{security_headers_middleware, HeaderPolicy},
    rest,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Passthrough handler standing in for downstream application routes.
async fn page_ok() -> impl IntoResponse {
    StatusCode::OK
}

/// Builder for test applications that mirrors main.rs wiring.
///
/// Use the builder pattern to construct an Axum router with the exact same
/// layer ordering as production, while injecting test routes and
/// configuration.
pub struct TestAppBuilder {
    /// Whether to include health check route
    include_health: bool,
    /// Whether to include the build-info route
    include_build_info: bool,
    /// Extra passthrough routes standing in for application pages/assets
    routes: Vec<&'static str>,
    /// CORS allowed origins (None means no CORS layer)
    cors_origins: Option<Vec<String>>,
    /// Security headers config (None means no security headers layer)
    security_headers: Option<SecurityHeadersConfig>,
    /// Deployment environment the header policy is built for
    environment: Environment,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    /// Create a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            include_health: false,
            include_build_info: false,
            routes: Vec::new(),
            cors_origins: None,
            security_headers: None,
            environment: Environment::Development,
        }
    }

    // =========================================================================
    // Preset Builders
    // =========================================================================

    /// Create a minimal app with only the health check endpoint.
    ///
    /// Use this for simple connectivity tests.
    #[must_use]
    pub fn minimal() -> Self {
        Self::new().with_health()
    }

    /// Create a production-mode app mirroring main.rs wiring.
    ///
    /// Includes health check, build info, CORS, and the security headers
    /// layer built for [`Environment::Production`].
    #[must_use]
    pub fn full() -> Self {
        Self::minimal()
            .with_build_info()
            .with_cors(&["http://localhost:3000"])
            .with_security_headers_default()
            .with_environment(Environment::Production)
    }

    // =========================================================================
    // Component Configuration
    // =========================================================================

    /// Include health check route (/health).
    #[must_use]
    pub fn with_health(mut self) -> Self {
        self.include_health = true;
        self
    }

    /// Include the build-info route (/build-info).
    #[must_use]
    pub fn with_build_info(mut self) -> Self {
        self.include_build_info = true;
        self
    }

    /// Register a passthrough route standing in for an application page.
    #[must_use]
    pub fn with_route(mut self, path: &'static str) -> Self {
        self.routes.push(path);
        self
    }

    /// Configure CORS with specific allowed origins.
    ///
    /// Pass an empty slice to block all cross-origin requests.
    /// Pass `&["*"]` to allow any origin.
    #[must_use]
    pub fn with_cors(mut self, origins: &[&str]) -> Self {
        self.cors_origins = Some(origins.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Enable security headers with default configuration.
    #[must_use]
    pub fn with_security_headers_default(mut self) -> Self {
        self.security_headers = Some(SecurityHeadersConfig::default());
        self
    }

    /// Enable security headers with custom configuration.
    #[must_use]
    pub fn with_security_headers(mut self, config: SecurityHeadersConfig) -> Self {
        self.security_headers = Some(config);
        self
    }

    /// Set the deployment environment the header policy is built for.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Build the Axum router.
    ///
    /// The layer ordering matches main.rs exactly:
    /// 1. Routes (pages, build-info, health)
    /// 2. Extensions (build info)
    /// 3. CORS layer
    /// 4. Security headers middleware (outermost)
    #[must_use]
    pub fn build(self) -> Router {
        let build_info = BuildInfoProvider::from_env().build_info();

        // Start building the router
        let mut app = Router::new();

        // Add routes
        for path in &self.routes {
            app = app.route(path, get(page_ok));
        }

        if self.include_build_info {
            app = app.route("/build-info", get(rest::get_build_info));
        }

        if self.include_health {
            app = app.route("/health", get(rest::health_check));
        }

        // Add extensions
        app = app.layer(Extension(build_info));

        // Add CORS layer if configured
        if let Some(origins) = self.cors_origins {
            let allow_origin: AllowOrigin = if origins.iter().any(|o| o == "*") {
                AllowOrigin::any()
            } else if origins.is_empty() {
                AllowOrigin::list(Vec::<HeaderValue>::new())
            } else {
                let header_values: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|origin| origin.parse().ok())
                    .collect();
                AllowOrigin::list(header_values)
            };

            app = app.layer(
                CorsLayer::new()
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers(Any)
                    .allow_origin(allow_origin),
            );
        }

        // Add security headers middleware if configured
        if let Some(config) = self.security_headers {
            if config.enabled {
                let policy = HeaderPolicy::from_config(&config, self.environment);
                app = app
                    .layer(middleware::from_fn(security_headers_middleware))
                    .layer(Extension(policy));
            }
        }

        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_minimal_builder_creates_health_route() {
        let app = TestAppBuilder::minimal().build();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_full_builder_applies_security_headers() {
        let app = TestAppBuilder::full().build();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::X_FRAME_OPTIONS),
            Some(&HeaderValue::from_static("DENY"))
        );
    }

    #[tokio::test]
    async fn test_with_route_registers_passthrough_page() {
        let app = TestAppBuilder::new().with_route("/dashboard").build();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
