//! URL shortener service implementation.
//!
//! This crate provides the coordination service that ties a code generator
//! to a link repository, and the gRPC adapter exposing it. Core types are
//! re-exported from `shortlink_core`.

pub mod bootstrap;
pub mod grpc;
pub mod service;

pub use bootstrap::build_shortener;
pub use grpc::ShortenerGrpcServer;
pub use service::{ShortenerService, DEFAULT_GENERATE_TIMEOUT};
pub use shortlink_core::{ShortCode, Shortener, ShortenerError};
