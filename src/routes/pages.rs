//! Server-rendered pages. Data is fetched by the page scripts.

use axum::response::Html;

use crate::middleware::auth::AuthUser;

const ORDER_INDEX_HTML: &str = include_str!("../../views/admin/order/index.html");
const ERROR_HTML: &str = include_str!("../../views/error.html");

pub async fn order_index(_user: AuthUser) -> Html<&'static str> {
    Html(ORDER_INDEX_HTML)
}

pub async fn error() -> Html<&'static str> {
    Html(ERROR_HTML)
}
