//! Request pipeline around the routes.

use std::time::Duration;

use axum::{
    Json, Router,
    handler::HandlerWithoutStateExt,
    http::{HeaderName, HeaderValue, Request, Response, StatusCode, Uri, header},
    middleware::from_fn_with_state,
};
use tower::{Layer, limit::ConcurrencyLimitLayer, util::MapRequestLayer};
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::{
    middleware::{
        errors::{error_page, panic_response},
        https::enforce_https,
        path::lowercase_path,
        session::create_session_layer,
    },
    response::{ApiResponse, Meta},
    routes::{create_router, doc::scalar_docs},
    state::AppState,
};

pub const MAX_BODY_BYTES: usize = 1024 * 1024;
pub const MAX_CONCURRENT_REQUESTS: usize = 100;
const HSTS_VALUE: &str = "max-age=2592000";

/// Builds the full application: routes, static files and middleware.
pub fn build_app(state: AppState) -> Router {
    let production = !state.config.environment.is_development();
    let static_files = ServeDir::new(&state.config.web_root)
        .append_index_html_on_directories(false)
        .not_found_service(not_found.into_service());

    let routes = create_router()
        .merge(scalar_docs())
        .fallback_service(static_files)
        .layer(create_session_layer(production))
        .with_state(state.clone());
    let routes = MapRequestLayer::new(lowercase_path).layer(routes);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_request(|request: &Request<_>, _span: &tracing::Span| {
            tracing::debug!(method = %request.method(), uri = %request.uri(), "request started");
        })
        .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
            tracing::info!(
                status = %response.status(),
                ms = %latency.as_millis(),
                "request finished"
            );
        });

    let app = Router::new()
        .fallback_service(routes)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .layer(from_fn_with_state(state.clone(), enforce_https));

    let app = if production {
        app.layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        ))
    } else {
        app
    };

    app.layer(from_fn_with_state(state, error_page))
        .layer(CatchPanicLayer::custom(panic_response))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
