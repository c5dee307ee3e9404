use std::any::Any;

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const ERROR_PAGE_PATH: &str = "/customer/home/error";

/// Sends browsers to the generic error page when a request fails with a 5xx
/// outside development. API clients keep the JSON body.
pub async fn error_page(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.config.environment.is_development() {
        return next.run(request).await;
    }
    let wants_html = request
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"));
    let is_error_page = request.uri().path().eq_ignore_ascii_case(ERROR_PAGE_PATH);

    let response = next.run(request).await;
    if wants_html && !is_error_page && response.status().is_server_error() {
        return Redirect::to(ERROR_PAGE_PATH).into_response();
    }
    response
}

/// Panic handler for `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "request handler panicked");

    let body = ApiResponse::success(
        "Internal Server Error",
        serde_json::json!({ "error": "Internal Server Error" }),
        Some(Meta::empty()),
    );
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
