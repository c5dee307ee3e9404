use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use tower_sessions::Session;

use crate::{
    dto::{
        cart::{AddToCartRequest, CartCount},
        products::ProductList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
    routes::{
        pages,
        params::{ProductIdQuery, ProductQuery},
    },
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/index", get(index))
        .route("/details", get(details).post(add_to_cart))
        .route("/error", get(pages::error))
}

#[utoipa::path(
    get,
    path = "/customer/home/index",
    params(ProductQuery),
    responses(
        (status = 200, description = "Catalog", body = ApiResponse<ProductList>)
    ),
    tag = "Home"
)]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/customer/home/details",
    params(ProductIdQuery),
    responses(
        (status = 200, description = "Product", body = ApiResponse<Product>),
        (status = 404, description = "No such product")
    ),
    tag = "Home"
)]
pub async fn details(
    State(state): State<AppState>,
    Query(query): Query<ProductIdQuery>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::get_product(&state, query.product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/customer/home/details",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Added to cart", body = ApiResponse<CartCount>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Home"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartCount>>> {
    let resp = catalog_service::add_to_cart(&state, &user, &session, payload).await?;
    Ok(Json(resp))
}
