//! Security headers middleware for HTTP responses.
//!
//! This module builds the fixed response header policy (Content-Security-Policy
//! plus clickjacking, MIME sniffing, referrer, and browser-feature headers) and
//! provides the middleware that applies it to every non-exempt response.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
        HeaderName, HeaderValue,
    },
    middleware::Next,
    response::Response,
    Extension,
};

use crate::config::{Environment, SecurityHeadersConfig};
use crate::http::exempt::ExemptPaths;

/// CSP directives in emission order. Inline and eval stay enabled in
/// `script-src` so the embedded Stripe checkout script keeps working.
const CSP_DIRECTIVES: [&str; 12] = [
    "default-src 'self'",
    "script-src 'self' 'unsafe-inline' 'unsafe-eval' https://js.stripe.com https://www.google-analytics.com/analytics.js blob:",
    "style-src 'self' 'unsafe-inline' https://js.stripe.com",
    "img-src 'self' data: https: blob:",
    "font-src 'self' data: https:",
    "connect-src 'self' https://api.stripe.com https://js.stripe.com https://*.stripe.com wss: ws:",
    "frame-src 'self' https://js.stripe.com https://hooks.stripe.com https://*.stripe.com",
    "child-src 'self' https://js.stripe.com https://*.stripe.com",
    "worker-src 'self' blob:",
    "object-src 'none'",
    "base-uri 'self'",
    "form-action 'self' https://js.stripe.com",
];

/// Assemble the `Content-Security-Policy` value from [`CSP_DIRECTIVES`].
#[must_use]
pub fn content_security_policy() -> String {
    CSP_DIRECTIVES.join("; ")
}

/// Pre-built response header policy, shared across requests via Axum's
/// `Extension` layer.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    headers: Vec<(HeaderName, HeaderValue)>,
    exempt: ExemptPaths,
}

impl HeaderPolicy {
    /// Build the policy for the given deployment environment.
    ///
    /// The CSP header is attached only in production; the remaining four
    /// headers do not vary with the environment.
    #[must_use]
    pub fn new(environment: Environment, exempt: ExemptPaths) -> Self {
        let mut headers = Vec::new();

        // Content-Security-Policy (production only - omitted entirely elsewhere)
        if environment.is_production() {
            if let Ok(value) = HeaderValue::from_str(&content_security_policy()) {
                headers.push((CONTENT_SECURITY_POLICY, value));
            }
        }

        headers.push((X_FRAME_OPTIONS, HeaderValue::from_static("DENY")));
        headers.push((X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")));
        headers.push((
            REFERRER_POLICY,
            HeaderValue::from_static("origin-when-cross-origin"),
        ));
        headers.push((
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        ));

        Self { headers, exempt }
    }

    /// Build the policy from configuration, wrapped for sharing across requests.
    #[must_use]
    pub fn from_config(config: &SecurityHeadersConfig, environment: Environment) -> Arc<Self> {
        Arc::new(Self::new(environment, ExemptPaths::from_config(config)))
    }

    /// Headers applied to non-exempt responses.
    #[must_use]
    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    /// Whether a request path is excluded from header injection.
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt.is_exempt(path)
    }
}

/// Middleware to add the policy headers to responses.
///
/// Reads the pre-built [`HeaderPolicy`] from an `Extension` and extends every
/// non-exempt response with its headers. It should be added as the outermost
/// layer so headers are applied to all routes.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, Extension, Router};
/// use storefront_edge::config::{Environment, SecurityHeadersConfig};
/// use storefront_edge::http::security::{security_headers_middleware, HeaderPolicy};
///
/// let policy = HeaderPolicy::from_config(
///     &SecurityHeadersConfig::default(),
///     Environment::Production,
/// );
///
/// let app = Router::new()
///     // ... routes ...
///     .layer(middleware::from_fn(security_headers_middleware))
///     .layer(Extension(policy));
/// ```
pub async fn security_headers_middleware(
    Extension(policy): Extension<Arc<HeaderPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let exempt = policy.is_exempt(request.uri().path());
    let mut response = next.run(request).await;
    if !exempt {
        let response_headers = response.headers_mut();
        for (name, value) in policy.headers() {
            response_headers.insert(name.clone(), value.clone());
        }
    }
    response
}
