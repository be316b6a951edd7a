use shortlink_core::ShortenerError;
use std::any::Any;
use tonic::body::Body;
use tonic::codegen::http;
use tonic::{Code, Status};

/// Maps a service failure onto a gRPC status.
///
/// The message always reads `Error: <description>`.
pub fn status_from(err: ShortenerError) -> Status {
    let code = match &err {
        ShortenerError::GenerateTimeout(_) => Code::Cancelled,
        ShortenerError::NotFound(_) => Code::NotFound,
        ShortenerError::InvalidLink(_) | ShortenerError::InvalidShortCode(_) => {
            Code::InvalidArgument
        }
        ShortenerError::Storage(_) => Code::Internal,
    };
    Status::new(code, format!("Error: {err}"))
}

/// Turns a handler panic into an `INTERNAL` status response.
///
/// Meant for `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> http::Response<Body> {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "gRPC handler panicked");

    Status::internal("Error: internal server error").into_http()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortlink_core::StorageError;
    use std::time::Duration;

    #[test]
    fn timeout_is_cancelled() {
        let status = status_from(ShortenerError::GenerateTimeout(Duration::from_secs(3)));
        assert_eq!(status.code(), Code::Cancelled);
        assert_eq!(
            status.message(),
            "Error: generate short link timeout after 3000ms"
        );
    }

    #[test]
    fn not_found_keeps_its_code() {
        let status = status_from(ShortenerError::NotFound("GoodLink12".to_string()));
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "Error: link not found: GoodLink12");
    }

    #[test]
    fn validation_failures_are_invalid_argument() {
        let link = status_from(ShortenerError::InvalidLink("httpgooglecom".to_string()));
        let code = status_from(ShortenerError::InvalidShortCode("x".repeat(20)));
        assert_eq!(link.code(), Code::InvalidArgument);
        assert_eq!(code.code(), Code::InvalidArgument);
    }

    #[test]
    fn panic_maps_to_internal_status() {
        let response = panic_response(Box::new("boom"));

        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(response.headers()["grpc-status"], "13");

        let response = panic_response(Box::new(String::from("boom")));
        assert_eq!(response.headers()["grpc-status"], "13");
    }

    #[test]
    fn storage_failures_are_internal() {
        let status = status_from(ShortenerError::Storage(StorageError::Unavailable(
            "db shutdown".to_string(),
        )));
        assert_eq!(status.code(), Code::Internal);
        assert!(status.message().starts_with("Error: storage error:"));
    }
}
