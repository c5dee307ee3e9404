use axum::{
    extract::{Request, State},
    http::{HeaderMap, Uri, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::state::AppState;

/// Redirects plain-HTTP requests to HTTPS outside development.
///
/// TLS terminates at the proxy, so the original scheme is read from
/// `X-Forwarded-Proto`.
pub async fn enforce_https(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.config.environment.is_development() {
        return next.run(request).await;
    }
    match https_location(request.headers(), request.uri()) {
        Some(location) => Redirect::permanent(&location).into_response(),
        None => next.run(request).await,
    }
}

fn https_location(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let proto = headers.get("x-forwarded-proto")?.to_str().ok()?;
    if !proto.eq_ignore_ascii_case("http") {
        return None;
    }
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    Some(format!("https://{host}{path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_http_gets_https_location() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", HeaderValue::from_static("http"));
        headers.insert(header::HOST, HeaderValue::from_static("books.test"));
        let uri: Uri = "/customer/home/details?productId=1".parse().unwrap();
        assert_eq!(
            https_location(&headers, &uri).as_deref(),
            Some("https://books.test/customer/home/details?productId=1")
        );
    }

    #[test]
    fn forwarded_https_passes() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        headers.insert(header::HOST, HeaderValue::from_static("books.test"));
        assert!(https_location(&headers, &Uri::from_static("/")).is_none());
        assert!(https_location(&HeaderMap::new(), &Uri::from_static("/")).is_none());
    }
}
