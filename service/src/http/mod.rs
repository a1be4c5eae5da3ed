//! HTTP utilities and middleware.
//!
//! This module provides shared HTTP functionality used by the application server.

pub mod exempt;
pub mod security;

pub use exempt::ExemptPaths;
pub use security::{security_headers_middleware, HeaderPolicy};
