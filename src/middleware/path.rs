use axum::{extract::Request, http::Uri};

/// Lowercases the request path so `/Admin/Order/GetAll` and
/// `/admin/order/getAll` reach the same route. The query string is kept
/// verbatim.
pub fn lowercase_path(mut request: Request) -> Request {
    let uri = request.uri();
    let path = uri.path();
    if !path.bytes().any(|b| b.is_ascii_uppercase()) {
        return request;
    }

    let lowered = match uri.query() {
        Some(query) => format!("{}?{}", path.to_ascii_lowercase(), query),
        None => path.to_ascii_lowercase(),
    };
    let mut parts = uri.clone().into_parts();
    match lowered.parse() {
        Ok(path_and_query) => parts.path_and_query = Some(path_and_query),
        Err(_) => return request,
    }
    if let Ok(new_uri) = Uri::from_parts(parts) {
        *request.uri_mut() = new_uri;
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn lowered(uri: &str) -> String {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        lowercase_path(request).uri().to_string()
    }

    #[test]
    fn path_is_lowered_query_is_kept() {
        assert_eq!(
            lowered("/Admin/Order/GetAll?status=InProcess"),
            "/admin/order/getall?status=InProcess"
        );
        assert_eq!(lowered("/identity/Account/Login"), "/identity/account/login");
        assert_eq!(lowered("/health"), "/health");
    }
}
