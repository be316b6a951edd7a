//! gRPC transport for the [`Shortener`](shortlink_core::Shortener) contract.

mod server;
mod status;

pub use server::ShortenerGrpcServer;
pub use status::{panic_response, status_from};
