mod cli;

use crate::cli::CLI;
use clap::Parser;
use shortlink_proto_schema::v1::shortener_service_server::ShortenerServiceServer;
use shortlink_shortener::grpc::panic_response;
use shortlink_shortener::{build_shortener, ShortenerGrpcServer};
use tonic::transport::Server;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    let _telemetry =
        shortlink_telemetry::init(&config.telemetry.clone().into_config("shortlink-shortener"))?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage.backend,
        generate_timeout_ms = config.generate_timeout_ms,
        "starting shortener gRPC server"
    );

    let shortener = build_shortener(&config.storage, config.generate_timeout()).await?;

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<ShortenerServiceServer<ShortenerGrpcServer>>()
        .await;

    Server::builder()
        .layer(TraceLayer::new_for_grpc())
        .layer(CatchPanicLayer::custom(panic_response))
        .add_service(health_service)
        .add_service(ShortenerGrpcServer::new(shortener).into_service())
        .serve_with_shutdown(config.listen_addr, shutdown_signal())
        .await?;

    info!("shortener gRPC server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
