use crate::grpc::status_from;
use shortlink_core::Shortener;
use shortlink_proto_schema::v1 as proto;
use shortlink_proto_schema::v1::shortener_service_server::{
    ShortenerService, ShortenerServiceServer,
};
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::instrument;

/// Adapts any [`Shortener`] to the generated `ShortenerService` trait.
#[derive(Clone)]
pub struct ShortenerGrpcServer {
    shortener: Arc<dyn Shortener>,
}

impl ShortenerGrpcServer {
    pub fn new(shortener: Arc<dyn Shortener>) -> Self {
        Self { shortener }
    }

    /// Wraps the adapter into a tonic service ready for `add_service`.
    pub fn into_service(self) -> ShortenerServiceServer<Self> {
        ShortenerServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl ShortenerService for ShortenerGrpcServer {
    #[instrument(skip_all, fields(long_url = %request.get_ref().long_url))]
    async fn create_url(
        &self,
        request: Request<proto::CreateUrlRequest>,
    ) -> Result<Response<proto::CreateUrlResponse>, Status> {
        let request = request.into_inner();

        let short_code = self
            .shortener
            .create_short_link(&request.long_url)
            .await
            .map_err(status_from)?;

        Ok(Response::new(proto::CreateUrlResponse {
            short_code: short_code.into_string(),
        }))
    }

    #[instrument(skip_all, fields(short_code = %request.get_ref().short_code))]
    async fn get_url(
        &self,
        request: Request<proto::GetUrlRequest>,
    ) -> Result<Response<proto::GetUrlResponse>, Status> {
        let request = request.into_inner();

        let long_url = self
            .shortener
            .resolve_short_link(&request.short_code)
            .await
            .map_err(status_from)?;

        Ok(Response::new(proto::GetUrlResponse { long_url }))
    }
}
