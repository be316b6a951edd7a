use clap::Parser;
use shortlink_storage::StorageArgs;
use shortlink_telemetry::TelemetryArgs;
use std::net::SocketAddr;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "SHORTLINK_GATEWAY_HTTP_LISTEN_ADDR";
pub const GRPC_LISTEN_ADDR_ENV: &str = "SHORTLINK_GATEWAY_GRPC_LISTEN_ADDR";
pub const GENERATE_TIMEOUT_ENV: &str = "SHORTLINK_GATEWAY_GENERATE_TIMEOUT_MS";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "shortlink-gateway-http-server")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Also serve the gRPC API from this process, over the same links.
    #[arg(long, env = GRPC_LISTEN_ADDR_ENV)]
    pub grpc_listen_addr: Option<SocketAddr>,

    #[arg(long, env = GENERATE_TIMEOUT_ENV, default_value_t = 3000)]
    pub generate_timeout_ms: u64,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub telemetry: TelemetryArgs,
}

impl CLI {
    pub fn generate_timeout(&self) -> Duration {
        Duration::from_millis(self.generate_timeout_ms)
    }
}
