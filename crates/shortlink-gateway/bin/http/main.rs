mod cli;

use crate::cli::CLI;
use clap::Parser;
use shortlink_core::Shortener;
use shortlink_gateway::{App, AppState};
use shortlink_proto_schema::v1::shortener_service_server::ShortenerServiceServer;
use shortlink_shortener::grpc::panic_response;
use shortlink_shortener::{build_shortener, ShortenerGrpcServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tonic::transport::Server;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    let _telemetry =
        shortlink_telemetry::init(&config.telemetry.clone().into_config("shortlink-gateway"))?;

    let shortener = build_shortener(&config.storage, config.generate_timeout()).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(
        listen_addr = %listener.local_addr()?,
        storage_backend = %config.storage.backend,
        "starting gateway server"
    );

    let app = App::router(AppState::new(Arc::clone(&shortener)));
    let http = async {
        axum::serve(listener, app)
            .with_graceful_shutdown(stopped(shutdown_rx.clone()))
            .await
            .map_err(anyhow::Error::from)
    };

    match config.grpc_listen_addr {
        Some(grpc_addr) => {
            let grpc = serve_grpc(grpc_addr, shortener, shutdown_rx.clone());
            tokio::try_join!(http, grpc)?;
        }
        None => http.await?,
    }

    info!("gateway server stopped");
    Ok(())
}

async fn serve_grpc(
    listen_addr: SocketAddr,
    shortener: Arc<dyn Shortener>,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    info!(listen_addr = %listen_addr, "starting co-hosted gRPC server");

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<ShortenerServiceServer<ShortenerGrpcServer>>()
        .await;

    Server::builder()
        .layer(TraceLayer::new_for_grpc())
        .layer(CatchPanicLayer::custom(panic_response))
        .add_service(health_service)
        .add_service(ShortenerGrpcServer::new(shortener).into_service())
        .serve_with_shutdown(listen_addr, stopped(shutdown))
        .await?;
    Ok(())
}

async fn stopped(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
