use crate::error::{AppError, Result};
use crate::model::CreateLinkRequest;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// `POST /` with `{"link": ...}`; answers with the short code as a JSON string.
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<Json<String>> {
    let Json(request) = payload.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;

    let code = state.shortener().create_short_link(&request.link).await?;
    Ok(Json(code.into_string()))
}

/// `GET /{code}`; redirects to the long URL, which is echoed in the body.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response> {
    let long_url = state.shortener().resolve_short_link(&code).await?;

    let location = HeaderValue::from_str(&long_url)
        .map_err(|_| AppError::InvalidRedirect(long_url.clone()))?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, location)],
        Json(long_url),
    )
        .into_response())
}
