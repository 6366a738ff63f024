//! # Middleware
//!
//! Request metrics and HTTP tracing. Admin authentication lives in
//! [`crate::auth`].

pub mod metrics;
pub mod tracing_layer;
